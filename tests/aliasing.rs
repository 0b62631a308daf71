//! Ownership, aliasing, and addressing behavior of images and windows.
use approx::assert_relative_eq;
use image_raster::{Bounds, Error, Image};

#[test]
fn every_pixel_starts_at_the_initializer() {
    let image = Image::with_bounds(Bounds::new(-3, 3, -2, 2), 1.5f32).unwrap();
    for y in -2..=2 {
        for x in -3..=3 {
            assert_eq!(image.at(x, y).unwrap(), 1.5);
        }
    }

    let image = Image::new(5, 4, -7i16).unwrap();
    assert_eq!(image.bounds(), Bounds::new(1, 5, 1, 4));
    for y in 1..=4 {
        for x in 1..=5 {
            assert_eq!(image.at(x, y).unwrap(), -7);
        }
    }
}

#[test]
fn bounds_violations_name_the_axes() {
    let image = Image::with_bounds(Bounds::new(1, 10, 1, 5), 0f64).unwrap();

    let err = image.at(11, 3).unwrap_err();
    assert_eq!(
        err.to_string(),
        "attempt to access column 11, valid range is 1 to 10"
    );

    let err = image.at(3, -1).unwrap_err();
    assert_eq!(
        err.to_string(),
        "attempt to access row -1, valid range is 1 to 5"
    );

    let err = image.at(0, 6).unwrap_err();
    assert_eq!(
        err.to_string(),
        "attempt to access column 0, valid range is 1 to 10 \
         and attempt to access row 6, valid range is 1 to 5"
    );
}

#[test]
fn operations_on_the_empty_image_are_refused() {
    let image = Image::<i32>::empty();
    assert!(!image.is_defined());
    assert_eq!(image.at(1, 1).unwrap_err(), Error::UndefinedImage);
    assert_eq!(
        image.subimage(Bounds::new(1, 1, 1, 1)).unwrap_err(),
        Error::UndefinedImage
    );
    assert_eq!(
        image.view().at(1, 1).unwrap_err(),
        Error::UndefinedImage
    );
}

#[test]
fn writes_through_any_handle_are_visible_through_all() {
    let mut image = Image::new(6, 6, 0i32).unwrap();
    let whole = image.view();
    let writer = image.subimage_mut(Bounds::new(2, 5, 2, 5)).unwrap();

    writer.set(4, 2, 42).unwrap();
    assert_eq!(image.at(4, 2).unwrap(), 42);
    assert_eq!(whole.at(4, 2).unwrap(), 42);

    image.set(5, 5, 7).unwrap();
    assert_eq!(writer.at(5, 5).unwrap(), 7);
    assert_eq!(whole.at(5, 5).unwrap(), 7);
}

#[test]
fn nested_windows_match_a_single_window() {
    let mut image = Image::new(9, 9, 0i32).unwrap();
    for y in 1..=9 {
        for x in 1..=9 {
            image.set(x, y, 100 * y + x).unwrap();
        }
    }

    let innermost = Bounds::new(4, 6, 5, 7);
    let nested = image
        .subimage(Bounds::new(2, 8, 2, 8))
        .unwrap()
        .subimage(Bounds::new(3, 7, 3, 8))
        .unwrap()
        .subimage(innermost)
        .unwrap();
    let direct = image.subimage(innermost).unwrap();

    assert!(nested.ptr_eq(&direct));
    assert_eq!(nested.bounds(), innermost);
    for y in 5..=7 {
        for x in 4..=6 {
            assert_eq!(nested.at(x, y).unwrap(), direct.at(x, y).unwrap());
            assert_eq!(nested.at(x, y).unwrap(), 100 * y + x);
        }
    }
}

#[test]
fn window_bounds_must_be_contained() {
    let image = Image::new(4, 4, 0f32).unwrap();
    let err = image.subimage(Bounds::new(0, 3, 1, 4)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "subimage bounds (0..=3, 1..=4) are outside the image bounds (1..=4, 1..=4)"
    );
}

#[test]
fn reuse_keeps_previous_contents_in_place() {
    let mut image = Image::new(4, 4, 0i32).unwrap();
    for y in 1..=4 {
        for x in 1..=4 {
            image.set(x, y, 10 * y + x).unwrap();
        }
    }

    // No window is alive, the new area fits: storage is reused and the
    // cells are reinterpreted under the new stride, not re-filled. The
    // first eight cells were rows (11..14, 21..24) of the old layout.
    image.resize(Bounds::new(1, 4, 1, 2)).unwrap();
    assert_eq!(image.stride(), 4);
    assert_eq!(image.at(1, 1).unwrap(), 11);
    assert_eq!(image.at(4, 2).unwrap(), 24);

    // Shrinking the width reinterprets the same cells under stride 3.
    image.resize(Bounds::new(1, 3, 1, 2)).unwrap();
    assert_eq!(image.at(1, 2).unwrap(), 14);
}

#[test]
fn resizing_under_a_window_leaves_the_window_intact() {
    let mut image = Image::new(4, 4, 7.0f64).unwrap();
    let before = image.view();

    image.resize(Bounds::new(1, 2, 1, 2)).unwrap();
    let after = image.view();
    assert!(!before.ptr_eq(&after), "a live window forces reallocation");

    image.fill(-1.0);
    for y in 1..=4 {
        for x in 1..=4 {
            assert_eq!(before.at(x, y).unwrap(), 7.0);
        }
    }
}

#[test]
fn copies_pair_pixels_by_origin_offset() {
    let mut source = Image::new(4, 4, 0f64).unwrap();
    for y in 1..=4 {
        for x in 1..=4 {
            source.set(x, y, (10 * y + x) as f64).unwrap();
        }
    }

    // Same 2x2 shape, different corners of two different images.
    let from = source.subimage(Bounds::new(3, 4, 3, 4)).unwrap();
    let target = Image::with_bounds(Bounds::new(-10, -9, 0, 1), 0f64).unwrap();
    let into = target.view_mut();
    into.copy_from(&from).unwrap();

    assert_eq!(target.at(-10, 0).unwrap(), 33.0);
    assert_eq!(target.at(-9, 0).unwrap(), 34.0);
    assert_eq!(target.at(-10, 1).unwrap(), 43.0);
    assert_eq!(target.at(-9, 1).unwrap(), 44.0);

    let err = target.view_mut().copy_from(&source.view()).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { .. }));
}

#[test]
fn double_inversion_restores_nonzero_pixels() {
    let mut image = Image::new(3, 3, 0f64).unwrap();
    for y in 1..=3 {
        for x in 1..=3 {
            image.set(x, y, (10 * y + x) as f64).unwrap();
        }
    }
    image.set(2, 2, 0.0).unwrap();

    let window = image.view_mut();
    window.invert_self();
    assert_eq!(image.at(2, 2).unwrap(), 0.0);
    assert_relative_eq!(image.at(1, 1).unwrap(), 1.0 / 11.0);

    window.invert_self();
    assert_eq!(image.at(2, 2).unwrap(), 0.0);
    for y in 1..=3 {
        for x in 1..=3 {
            if (x, y) != (2, 2) {
                assert_relative_eq!(image.at(x, y).unwrap(), (10 * y + x) as f64);
            }
        }
    }
}

#[test]
fn custom_transforms_run_through_the_same_primitive() {
    let image = Image::new(3, 2, 2i32).unwrap();
    let window = image.view_mut();

    let mut visited = 0;
    window.transform(|v| {
        visited += 1;
        v * v
    });
    assert_eq!(visited, 6);
    assert_eq!(image.at(3, 2).unwrap(), 4);

    let other = Image::new(3, 2, 10i32).unwrap();
    window.transform_from(&other.view(), |d, s| d + s).unwrap();
    assert_eq!(image.at(1, 1).unwrap(), 14);
}

#[test]
fn owned_copies_are_independent() {
    let image = Image::new(3, 3, 5i16).unwrap();
    let window = image.subimage(Bounds::new(2, 3, 2, 3)).unwrap();

    let copy = window.to_image();
    assert_eq!(copy.bounds(), Bounds::new(2, 3, 2, 3));
    assert!(!copy.view().ptr_eq(&window));

    image.view_mut().fill(0);
    assert_eq!(copy.at(2, 2).unwrap(), 5);
    assert_eq!(window.at(2, 2).unwrap(), 0);
}

#[test]
fn windows_keep_the_storage_alive() {
    let window = {
        let image = Image::new(2, 2, 3.5f32).unwrap();
        image.subimage(Bounds::new(2, 2, 1, 2)).unwrap()
    };
    // The owner is gone; the window still co-owns the allocation.
    assert_eq!(window.at(2, 1).unwrap(), 3.5);
    assert_eq!(window.at(2, 2).unwrap(), 3.5);
    assert!(window.at(1, 1).is_err());
}

#[test]
fn scalar_arithmetic_applies_to_whole_windows() {
    let mut image = Image::new(2, 2, 1.0f64).unwrap();
    image *= 4.0;
    image += 2.0;
    image -= 1.0;
    assert_eq!(image.at(1, 2).unwrap(), 5.0);

    let mut half = image.subimage_mut(Bounds::new(1, 1, 1, 2)).unwrap();
    half *= 10.0;
    assert_eq!(image.at(1, 1).unwrap(), 50.0);
    assert_eq!(image.at(2, 1).unwrap(), 5.0);
}
