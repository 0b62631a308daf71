//! The elementwise transform primitive behind fills, inversion, and copies.
//!
//! Every per-pixel image operation funnels through the two visitors here so
//! that bounds handling and shape checking exist in exactly one place. The
//! visitors walk the destination's bounds row-major and touch each
//! coordinate exactly once; nothing depends on the global buffer order, so
//! windows with a wider parent stride behave the same as compact images.
use bytemuck::Zeroable;

use crate::element::Element;
use crate::error::{Error, Result};
use crate::image::RawImage;

/// Replace every pixel `v` inside `image`'s bounds with `f(v)`.
///
/// An undefined image holds no pixels and is left untouched.
pub(crate) fn transform<T, F>(image: &RawImage<T>, mut f: F)
where
    T: Element,
    F: FnMut(T) -> T,
{
    let Ok(buffer) = image.buffer() else { return };
    let bounds = image.bounds();
    for y in bounds.ymin()..=bounds.ymax() {
        let row = image.index_of(bounds.xmin(), y);
        for i in 0..bounds.width() as usize {
            buffer.set(row + i, f(buffer.get(row + i)));
        }
    }
}

/// Replace every destination pixel `d` with `f(d, s)`, where `s` is the
/// source pixel at the same offset from its own origin.
///
/// The two images must have the same shape; their origins may differ. The
/// check precedes any write. Pixels are visited one at a time in row-major
/// order, with no intermediate buffer: when the operands overlap in one
/// shared allocation, the caller owns the consequences.
pub(crate) fn combine<T, F>(target: &RawImage<T>, source: &RawImage<T>, mut f: F) -> Result<()>
where
    T: Element,
    F: FnMut(T, T) -> T,
{
    let (tb, sb) = (target.bounds(), source.bounds());
    if !tb.is_same_shape_as(&sb) {
        return Err(Error::ShapeMismatch {
            left: tb,
            right: sb,
        });
    }
    // Same shape from here on: either both are defined or both are empty.
    let (Ok(dst), Ok(src)) = (target.buffer(), source.buffer()) else {
        return Ok(());
    };
    for row in 0..tb.height() {
        let trow = target.index_of(tb.xmin(), tb.ymin() + row as i32);
        let srow = source.index_of(sb.xmin(), sb.ymin() + row as i32);
        for i in 0..tb.width() as usize {
            dst.set(trow + i, f(dst.get(trow + i), src.get(srow + i)));
        }
    }
    Ok(())
}

/// `0` stays `0`; anything else becomes its reciprocal, computed in `f64`
/// and narrowed back to the storage type.
///
/// For the integral storage types the narrowing truncates, so the
/// reciprocal of any value of magnitude above one lands on zero.
pub(crate) fn reciprocal<T: Element>(value: T) -> T {
    if value == T::zeroed() {
        T::zeroed()
    } else {
        T::from_f64(1.0 / value.as_f64())
    }
}
