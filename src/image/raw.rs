use bytemuck::Zeroable;
use log::debug;

use crate::bounds::Bounds;
use crate::buf::PixelBuffer;
use crate::element::Element;
use crate::error::{Error, Result};

/// Inner storage-and-layout implementation.
///
/// Not exposed: a single implementation serves the owning image and both
/// window flavors, which differ only in the operations they re-export.
///
/// The fields obey one invariant. Either `bounds` is undefined and there is
/// no buffer, no offset and no stride; or `bounds` is defined with positive
/// extent, `stride` is at least the width, and every in-bounds pixel maps
/// through [`RawImage::index_of`] to a valid buffer index. A window shares
/// its parent's buffer and stride and differs only in `offset` and
/// `bounds`; an owning image always has `offset == 0`.
#[derive(Clone, Debug)]
pub(crate) struct RawImage<T> {
    buffer: Option<PixelBuffer<T>>,
    offset: usize,
    stride: usize,
    bounds: Bounds,
}

impl<T: Element> RawImage<T> {
    /// The image holding no pixels.
    pub(crate) fn empty() -> Self {
        RawImage {
            buffer: None,
            offset: 0,
            stride: 0,
            bounds: Bounds::undefined(),
        }
    }

    /// Allocate fresh storage spanning `bounds`, every cell set to `fill`.
    ///
    /// Undefined bounds produce the empty image; defined bounds with a
    /// non-positive extent are refused.
    pub(crate) fn alloc(bounds: Bounds, fill: T) -> Result<Self> {
        if !bounds.is_defined() {
            return Ok(Self::empty());
        }
        let (width, height) = (bounds.width(), bounds.height());
        if width <= 0 || height <= 0 {
            return Err(Error::InvalidBounds { bounds });
        }
        let len = width
            .checked_mul(height)
            .and_then(|area| usize::try_from(area).ok())
            .ok_or(Error::InvalidBounds { bounds })?;
        Ok(RawImage {
            buffer: Some(PixelBuffer::new(len, fill)),
            offset: 0,
            stride: width as usize,
            bounds,
        })
    }

    pub(crate) fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub(crate) fn stride(&self) -> usize {
        self.stride
    }

    pub(crate) fn is_defined(&self) -> bool {
        self.buffer.is_some()
    }

    pub(crate) fn buffer(&self) -> Result<&PixelBuffer<T>> {
        self.buffer.as_ref().ok_or(Error::UndefinedImage)
    }

    /// Buffer index of the pixel `(x, y)`. Callers guarantee containment.
    pub(crate) fn index_of(&self, x: i32, y: i32) -> usize {
        self.offset
            + (y - self.bounds.ymin()) as usize * self.stride
            + (x - self.bounds.xmin()) as usize
    }

    /// Bounds-checked read.
    pub(crate) fn at(&self, x: i32, y: i32) -> Result<T> {
        let buffer = self.buffer()?;
        if !self.bounds.contains(x, y) {
            return Err(Error::OutOfBounds {
                x,
                y,
                bounds: self.bounds,
            });
        }
        Ok(buffer.get(self.index_of(x, y)))
    }

    /// Bounds-checked write.
    pub(crate) fn set(&self, x: i32, y: i32, value: T) -> Result<()> {
        let buffer = self.buffer()?;
        if !self.bounds.contains(x, y) {
            return Err(Error::OutOfBounds {
                x,
                y,
                bounds: self.bounds,
            });
        }
        buffer.set(self.index_of(x, y), value);
        Ok(())
    }

    /// Bounds-checked access to the pixel's cell.
    pub(crate) fn cell(&self, x: i32, y: i32) -> Result<&core::cell::Cell<T>> {
        let buffer = self.buffer()?;
        if !self.bounds.contains(x, y) {
            return Err(Error::OutOfBounds {
                x,
                y,
                bounds: self.bounds,
            });
        }
        Ok(buffer.cell(self.index_of(x, y)))
    }

    /// Carve a window spanning `bounds` out of this image.
    ///
    /// The window shares the storage: its offset moves by the row and
    /// column delta between the two origins, and it keeps the parent's
    /// stride. A narrower window's rows are therefore not contiguous in
    /// the buffer.
    pub(crate) fn subimage(&self, bounds: Bounds) -> Result<RawImage<T>> {
        let buffer = self.buffer()?;
        if !self.bounds.contains_bounds(&bounds) {
            return Err(Error::SubImageOutOfRange {
                sub: bounds,
                image: self.bounds,
            });
        }
        let offset = self.offset
            + (bounds.ymin() - self.bounds.ymin()) as usize * self.stride
            + (bounds.xmin() - self.bounds.xmin()) as usize;
        Ok(RawImage {
            buffer: Some(buffer.clone()),
            offset,
            stride: self.stride,
            bounds,
        })
    }

    /// Three-way resize for the owning image.
    ///
    /// Undefined bounds deallocate immediately. Otherwise the existing
    /// allocation is reused in place when the new pixel count fits into it
    /// and no window co-owns it; the surviving cells keep whatever values
    /// they had. In every other case fresh storage is allocated and the old
    /// buffer is left to the windows still referencing it.
    pub(crate) fn resize(&mut self, new_bounds: Bounds) -> Result<()> {
        debug_assert_eq!(self.offset, 0, "resize is an owner operation");
        if !new_bounds.is_defined() {
            debug!("resize to undefined bounds releases the image storage");
            *self = Self::empty();
            return Ok(());
        }
        let (width, height) = (new_bounds.width(), new_bounds.height());
        if width <= 0 || height <= 0 {
            return Err(Error::InvalidBounds { bounds: new_bounds });
        }
        let area = width
            .checked_mul(height)
            .and_then(|area| usize::try_from(area).ok())
            .ok_or(Error::InvalidBounds { bounds: new_bounds })?;
        match &self.buffer {
            Some(buffer)
                if self.bounds.is_defined() && area <= buffer.len() && buffer.is_sole_owner() =>
            {
                debug!(
                    "resize to {} reuses the {}-element allocation",
                    new_bounds,
                    buffer.len()
                );
                self.bounds = new_bounds;
                self.stride = width as usize;
            }
            _ => {
                debug!("resize to {} allocates fresh storage", new_bounds);
                *self = Self::alloc(new_bounds, T::zeroed())?;
            }
        }
        Ok(())
    }

    /// Copy this image's pixels into fresh, compactly strided storage.
    pub(crate) fn to_owned_raw(&self) -> RawImage<T> {
        let Some(buffer) = &self.buffer else {
            return Self::empty();
        };
        let bounds = self.bounds;
        let width = bounds.width() as usize;
        let height = bounds.height() as usize;
        let mut values = Vec::with_capacity(width * height);
        for row in 0..height {
            let start = self.offset + row * self.stride;
            for i in 0..width {
                values.push(buffer.get(start + i));
            }
        }
        RawImage {
            buffer: Some(PixelBuffer::from_vec(values)),
            offset: 0,
            stride: width,
            bounds,
        }
    }

    /// Do both images address the same allocation?
    pub(crate) fn same_storage(&self, other: &RawImage<T>) -> bool {
        match (&self.buffer, &other.buffer) {
            (Some(a), Some(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Allocation identity for tests, without holding a reference.
    #[cfg(test)]
    pub(crate) fn storage_id(&self) -> Option<usize> {
        self.buffer.as_ref().map(PixelBuffer::id)
    }

    /// Identical bounds and identical pixel values within them.
    pub(crate) fn pixels_eq(&self, other: &RawImage<T>) -> bool {
        if self.bounds != other.bounds {
            return false;
        }
        let (Some(a), Some(b)) = (&self.buffer, &other.buffer) else {
            return self.buffer.is_none() && other.buffer.is_none();
        };
        let bounds = self.bounds;
        for y in bounds.ymin()..=bounds.ymax() {
            let left = self.index_of(bounds.xmin(), y);
            let right = other.index_of(bounds.xmin(), y);
            for i in 0..bounds.width() as usize {
                if a.get(left + i) != b.get(right + i) {
                    return false;
                }
            }
        }
        true
    }
}
