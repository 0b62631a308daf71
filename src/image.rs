// Distributed under The MIT License (MIT)
//
// Copyright (c) 2026 The `image-rs` developers
//! Defines the owning [`Image`] container and its aliasing windows.
//!
//! An [`Image`] owns a bounded, contiguous pixel allocation. [`View`] and
//! [`ViewMut`] are windows over the same storage: they co-own the
//! allocation (it lives until the last referencer is dropped) and carry
//! their own bounds and addressing origin, so a window may span a strict
//! sub-rectangle of its parent. Mutation through any window is visible
//! through every other handle on the same storage; that aliasing is the
//! point of the design, not an accident. All handles are single-threaded
//! (`Rc` + `Cell` underneath).
mod raw;

use core::cell::Cell;
use core::fmt;
use core::ops::{AddAssign, MulAssign, SubAssign};

pub(crate) use self::raw::RawImage;
use crate::bounds::Bounds;
use crate::element::Element;
use crate::error::{Error, Result};
use crate::{cd, transform};

/// An owning, resizable pixel image.
///
/// Construction allocates storage spanning the requested bounds and fills
/// it with an initial value. The image can later be [resized][`Image::resize`]
/// any number of times; storage is reused in place when possible and
/// reallocated otherwise.
///
/// `Clone` makes an independent deep copy. Sharing storage is the job of
/// the window types, never of the owner.
///
/// ```
/// use image_raster::{Bounds, Image};
/// # fn demo() -> image_raster::Result<()> {
/// let mut image = Image::new(16, 16, 0.0f64)?;
/// image.set(3, 5, 2.5)?;
///
/// // Windows alias the same pixels.
/// let window = image.subimage_mut(Bounds::new(2, 6, 2, 6))?;
/// window.fill(1.0);
/// assert_eq!(image.at(3, 5)?, 1.0);
/// # Ok(()) }
/// # demo().unwrap();
/// ```
pub struct Image<T> {
    raw: RawImage<T>,
}

/// A read-only window into an image.
///
/// The window co-owns the underlying storage, so it stays valid after the
/// image it was carved from is dropped. Cloning shares the same pixels.
#[derive(Clone)]
pub struct View<T> {
    raw: RawImage<T>,
}

/// A mutable window into an image.
///
/// Like [`View`], but additionally exposes the write surface. Writes go
/// through `&self`: the underlying cells are shared, and every handle on
/// the same storage observes them.
#[derive(Clone)]
pub struct ViewMut<T> {
    raw: RawImage<T>,
}

/// Constructors and owner-only operations.
impl<T: Element> Image<T> {
    /// Allocate `ncol` by `nrow` pixels with 1-based bounds, every pixel
    /// set to `init`.
    ///
    /// Fails when either extent is non-positive; the error names whichever
    /// dimensions are at fault.
    pub fn new(ncol: i32, nrow: i32, init: T) -> Result<Self> {
        if ncol <= 0 || nrow <= 0 {
            return Err(Error::NonPositiveExtent { ncol, nrow });
        }
        Ok(Image {
            raw: RawImage::alloc(Bounds::new(1, ncol, 1, nrow), init)?,
        })
    }

    /// Allocate an image spanning `bounds`, every pixel set to `init`.
    ///
    /// Undefined bounds yield a valid image holding no pixels. Defined
    /// bounds with non-positive extent are refused.
    pub fn with_bounds(bounds: Bounds, init: T) -> Result<Self> {
        Ok(Image {
            raw: RawImage::alloc(bounds, init)?,
        })
    }

    /// The image holding no pixels.
    pub fn empty() -> Self {
        Image {
            raw: RawImage::empty(),
        }
    }

    /// Change the image extent, preferring to reuse the allocation.
    ///
    /// Three cases, decided in order:
    ///
    /// - undefined `new_bounds` deallocate immediately and leave the empty
    ///   image;
    /// - if the new pixel count fits the current allocation *and* no window
    ///   co-owns it, the allocation is reused: only bounds and stride
    ///   change, and the surviving cells keep whatever values they held —
    ///   callers must not assume any particular fill on this path;
    /// - otherwise fresh storage is allocated. Windows created earlier keep
    ///   referencing the old allocation and never observe the resize.
    ///
    /// Which of the last two cases ran is observable through
    /// [`View::ptr_eq`] on windows taken before and after.
    pub fn resize(&mut self, new_bounds: Bounds) -> Result<()> {
        self.raw.resize(new_bounds)
    }

    /// Bounds-checked write.
    pub fn set(&mut self, x: i32, y: i32, value: T) -> Result<()> {
        self.raw.set(x, y, value)
    }

    /// Overwrite every pixel with `value`.
    pub fn fill(&mut self, value: T) {
        transform::transform(&self.raw, |_| value);
    }

    /// Replace every pixel with its guarded reciprocal.
    ///
    /// Zero stays zero; any other value `v` becomes `1 / v`, computed in
    /// `f64` and narrowed back to the storage type.
    pub fn invert_self(&mut self) {
        transform::transform(&self.raw, transform::reciprocal);
    }

    /// Copy every pixel from `source`, matching coordinates by their offset
    /// from the respective origins.
    ///
    /// The source must have the same shape as this image (not necessarily
    /// the same origin).
    pub fn copy_from(&mut self, source: &View<T>) -> Result<()> {
        transform::combine(&self.raw, &source.raw, |_, s| s)
    }

    /// A read-only window spanning the whole image.
    pub fn view(&self) -> View<T> {
        View {
            raw: self.raw.clone(),
        }
    }

    /// A mutable window spanning the whole image.
    pub fn view_mut(&self) -> ViewMut<T> {
        ViewMut {
            raw: self.raw.clone(),
        }
    }

    /// A read-only window spanning `bounds`, which must lie entirely inside
    /// the image bounds.
    pub fn subimage(&self, bounds: Bounds) -> Result<View<T>> {
        Ok(View {
            raw: self.raw.subimage(bounds)?,
        })
    }

    /// A mutable window spanning `bounds`, which must lie entirely inside
    /// the image bounds.
    pub fn subimage_mut(&self, bounds: Bounds) -> Result<ViewMut<T>> {
        Ok(ViewMut {
            raw: self.raw.subimage(bounds)?,
        })
    }
}

/// Read access, shared by every image kind.
impl<T: Element> Image<T> {
    pub fn bounds(&self) -> Bounds {
        self.raw.bounds()
    }

    /// Elements per storage row. Zero for an image holding no pixels.
    pub fn stride(&self) -> usize {
        self.raw.stride()
    }

    /// Does the image hold any pixels?
    pub fn is_defined(&self) -> bool {
        self.raw.is_defined()
    }

    /// Bounds-checked read.
    ///
    /// Fails on an image holding no pixels, or with a diagnostic naming
    /// the offending axis (or axes) and the valid range otherwise.
    pub fn at(&self, x: i32, y: i32) -> Result<T> {
        self.raw.at(x, y)
    }

    /// Apply the charge-diffusion correction, returning a fresh image over
    /// the same bounds.
    ///
    /// The model redistributes signal between each pixel and its four
    /// immediate neighbors, weighted by the caller-supplied directional
    /// kernels. The four kernels are single-row `f64` images of
    /// `(2 * dmax + 1)^2` weights each, one weight per footprint pixel,
    /// flattened iy-outer/ix-inner; `dmax` must be non-negative and the
    /// kernel lengths must agree. Pixels within `dmax` of an image edge
    /// are carried over unchanged so that total flux is conserved.
    pub fn apply_cd(
        &self,
        a_l: &View<f64>,
        a_r: &View<f64>,
        a_b: &View<f64>,
        a_t: &View<f64>,
        dmax: i32,
    ) -> Result<Image<T>> {
        Ok(Image {
            raw: cd::apply_cd(&self.raw, &a_l.raw, &a_r.raw, &a_b.raw, &a_t.raw, dmax)?,
        })
    }
}

impl<T: Element> View<T> {
    pub fn bounds(&self) -> Bounds {
        self.raw.bounds()
    }

    /// Elements per storage row of the *backing allocation*; exceeds the
    /// window's own width when the window is narrower than its parent.
    pub fn stride(&self) -> usize {
        self.raw.stride()
    }

    pub fn is_defined(&self) -> bool {
        self.raw.is_defined()
    }

    /// Bounds-checked read against the window's own bounds.
    pub fn at(&self, x: i32, y: i32) -> Result<T> {
        self.raw.at(x, y)
    }

    /// A window into this window. Nested windows address the backing
    /// storage exactly as one window with the innermost bounds would.
    pub fn subimage(&self, bounds: Bounds) -> Result<View<T>> {
        Ok(View {
            raw: self.raw.subimage(bounds)?,
        })
    }

    /// Copy the window's pixels into a fresh, independent image.
    pub fn to_image(&self) -> Image<T> {
        Image {
            raw: self.raw.to_owned_raw(),
        }
    }

    /// Do both windows address the same allocation?
    pub fn ptr_eq(&self, other: &View<T>) -> bool {
        self.raw.same_storage(&other.raw)
    }

    /// See [`Image::apply_cd`].
    pub fn apply_cd(
        &self,
        a_l: &View<f64>,
        a_r: &View<f64>,
        a_b: &View<f64>,
        a_t: &View<f64>,
        dmax: i32,
    ) -> Result<Image<T>> {
        Ok(Image {
            raw: cd::apply_cd(&self.raw, &a_l.raw, &a_r.raw, &a_b.raw, &a_t.raw, dmax)?,
        })
    }
}

/// Read access, mirroring [`View`].
impl<T: Element> ViewMut<T> {
    pub fn bounds(&self) -> Bounds {
        self.raw.bounds()
    }

    pub fn stride(&self) -> usize {
        self.raw.stride()
    }

    pub fn is_defined(&self) -> bool {
        self.raw.is_defined()
    }

    pub fn at(&self, x: i32, y: i32) -> Result<T> {
        self.raw.at(x, y)
    }

    /// This window, read-only.
    pub fn as_view(&self) -> View<T> {
        View {
            raw: self.raw.clone(),
        }
    }

    pub fn subimage(&self, bounds: Bounds) -> Result<View<T>> {
        Ok(View {
            raw: self.raw.subimage(bounds)?,
        })
    }

    pub fn subimage_mut(&self, bounds: Bounds) -> Result<ViewMut<T>> {
        Ok(ViewMut {
            raw: self.raw.subimage(bounds)?,
        })
    }

    pub fn ptr_eq(&self, other: &ViewMut<T>) -> bool {
        self.raw.same_storage(&other.raw)
    }

    /// See [`Image::apply_cd`].
    pub fn apply_cd(
        &self,
        a_l: &View<f64>,
        a_r: &View<f64>,
        a_b: &View<f64>,
        a_t: &View<f64>,
        dmax: i32,
    ) -> Result<Image<T>> {
        Ok(Image {
            raw: cd::apply_cd(&self.raw, &a_l.raw, &a_r.raw, &a_b.raw, &a_t.raw, dmax)?,
        })
    }
}

/// The write surface of a mutable window.
impl<T: Element> ViewMut<T> {
    /// Bounds-checked write. Every handle sharing the storage observes it.
    pub fn set(&self, x: i32, y: i32, value: T) -> Result<()> {
        self.raw.set(x, y, value)
    }

    /// Bounds-checked access to a pixel's shared cell, for repeated
    /// reads and writes of one location.
    pub fn cell(&self, x: i32, y: i32) -> Result<&Cell<T>> {
        self.raw.cell(x, y)
    }

    /// Overwrite every pixel in the window with `value`.
    pub fn fill(&self, value: T) {
        self.transform(|_| value);
    }

    /// Replace every pixel with its guarded reciprocal; see
    /// [`Image::invert_self`].
    pub fn invert_self(&self) {
        self.transform(transform::reciprocal);
    }

    /// Copy every pixel from `source`; shapes must match, origins may
    /// differ.
    pub fn copy_from(&self, source: &View<T>) -> Result<()> {
        self.transform_from(source, |_, s| s)
    }

    /// Replace every pixel `v` in the window with `f(v)`.
    ///
    /// This is the elementwise primitive the other write operations are
    /// built on; each coordinate inside the window is visited exactly once.
    pub fn transform<F: FnMut(T) -> T>(&self, f: F) {
        transform::transform(&self.raw, f);
    }

    /// Replace every pixel `d` with `f(d, s)`, pairing pixels by their
    /// offset from the respective origins. Shapes must match.
    pub fn transform_from<F: FnMut(T, T) -> T>(&self, source: &View<T>, f: F) -> Result<()> {
        transform::combine(&self.raw, &source.raw, f)
    }
}

impl<T: Element> Default for Image<T> {
    fn default() -> Self {
        Image::empty()
    }
}

impl<T: Element> Clone for Image<T> {
    /// Deep copy into fresh, compactly strided storage.
    fn clone(&self) -> Self {
        Image {
            raw: self.raw.to_owned_raw(),
        }
    }
}

impl<T: Element> PartialEq for Image<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw.pixels_eq(&other.raw)
    }
}

impl<T: Element> PartialEq for View<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw.pixels_eq(&other.raw)
    }
}

impl<T: Element> PartialEq for ViewMut<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw.pixels_eq(&other.raw)
    }
}

impl<T: Element> AddAssign<T> for Image<T> {
    fn add_assign(&mut self, rhs: T) {
        transform::transform(&self.raw, |v| v + rhs);
    }
}

impl<T: Element> SubAssign<T> for Image<T> {
    fn sub_assign(&mut self, rhs: T) {
        transform::transform(&self.raw, |v| v - rhs);
    }
}

impl<T: Element> MulAssign<T> for Image<T> {
    fn mul_assign(&mut self, rhs: T) {
        transform::transform(&self.raw, |v| v * rhs);
    }
}

impl<T: Element> AddAssign<T> for ViewMut<T> {
    fn add_assign(&mut self, rhs: T) {
        self.transform(|v| v + rhs);
    }
}

impl<T: Element> SubAssign<T> for ViewMut<T> {
    fn sub_assign(&mut self, rhs: T) {
        self.transform(|v| v - rhs);
    }
}

impl<T: Element> MulAssign<T> for ViewMut<T> {
    fn mul_assign(&mut self, rhs: T) {
        self.transform(|v| v * rhs);
    }
}

impl<T: Element> fmt::Debug for Image<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Image")
            .field("bounds", &self.bounds())
            .field("stride", &self.stride())
            .finish()
    }
}

impl<T: Element> fmt::Debug for View<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("View")
            .field("bounds", &self.bounds())
            .field("stride", &self.stride())
            .finish()
    }
}

impl<T: Element> fmt::Debug for ViewMut<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ViewMut")
            .field("bounds", &self.bounds())
            .field("stride", &self.stride())
            .finish()
    }
}
