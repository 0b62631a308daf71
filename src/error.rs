//! Error values reported by image construction, access, and correction.
//!
//! Every precondition is checked at the call site and surfaces immediately;
//! no operation mutates anything before its checks pass, and nothing is
//! clamped or retried. These are usage errors for the caller to fix, not
//! transient faults.
use crate::bounds::Bounds;

/// Result alias for the fallible operations of this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Why an image operation was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// An operation needed pixel storage but the image has none.
    #[error("attempt to access an undefined image")]
    UndefinedImage,

    /// A coordinate lies outside the image bounds.
    ///
    /// The message names each offending axis together with the attempted
    /// value and the valid range; when both axes are out of range, both
    /// descriptions appear joined with "and".
    #[error("{}", out_of_bounds_message(.x, .y, .bounds))]
    OutOfBounds { x: i32, y: i32, bounds: Bounds },

    /// An image was requested with a non-positive column or row count.
    #[error("{}", non_positive_message(.ncol, .nrow))]
    NonPositiveExtent { ncol: i32, nrow: i32 },

    /// A defined rectangle whose extent is non-positive cannot back an
    /// allocation.
    #[error("attempt to create an image over defined but invalid bounds {bounds}")]
    InvalidBounds { bounds: Bounds },

    /// Two operands were required to have equal width and height.
    #[error("bounds {left} and {right} do not have the same shape")]
    ShapeMismatch { left: Bounds, right: Bounds },

    /// A requested window is not contained in the image it is carved from.
    #[error("subimage bounds {sub} are outside the image bounds {image}")]
    SubImageOutOfRange { sub: Bounds, image: Bounds },

    /// The charge-diffusion footprint radius was negative.
    #[error("charge diffusion requires a non-negative kernel extent, got dmax = {dmax}")]
    KernelExtent { dmax: i32 },

    /// The leftward kernel does not hold `(2 * dmax + 1)^2` weights.
    #[error(
        "charge diffusion kernel holds {found} weights, but dmax = {dmax} requires {expected}"
    )]
    KernelLength {
        dmax: i32,
        expected: i64,
        found: i64,
    },

    /// One of the remaining kernels disagrees with the leftward kernel.
    #[error(
        "charge diffusion kernel {which} holds {found} weights where {expected} are required"
    )]
    KernelLengthMismatch {
        which: &'static str,
        expected: i64,
        found: i64,
    },
}

fn out_of_bounds_message(x: &i32, y: &i32, bounds: &Bounds) -> String {
    let mut parts = Vec::new();
    if *x < bounds.xmin() || *x > bounds.xmax() {
        parts.push(format!(
            "attempt to access column {}, valid range is {} to {}",
            x,
            bounds.xmin(),
            bounds.xmax()
        ));
    }
    if *y < bounds.ymin() || *y > bounds.ymax() {
        parts.push(format!(
            "attempt to access row {}, valid range is {} to {}",
            y,
            bounds.ymin(),
            bounds.ymax()
        ));
    }
    if parts.is_empty() {
        // Unreachable through the checked accessors; kept so the message
        // stays meaningful for a hand-built error value.
        return format!("attempt to access ({}, {}) outside bounds {}", x, y, bounds);
    }
    parts.join(" and ")
}

fn non_positive_message(ncol: &i32, nrow: &i32) -> String {
    match (*ncol <= 0, *nrow <= 0) {
        (true, true) => format!(
            "attempt to create an image with non-positive ncol ({}) and nrow ({})",
            ncol, nrow
        ),
        (true, false) => format!("attempt to create an image with non-positive ncol ({})", ncol),
        _ => format!("attempt to create an image with non-positive nrow ({})", nrow),
    }
}
