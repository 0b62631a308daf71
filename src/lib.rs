// Distributed under The MIT License (MIT)
//
// Copyright (c) 2026 The `image-rs` developers
//! # Raster
//!
//! Bounded 2D pixel arrays over shared storage.
//!
//! The crate revolves around one owning allocation type and two aliasing
//! window types:
//!
//! - [`Image`] owns a contiguous pixel buffer spanning an inclusive
//!   [`Bounds`] rectangle, and can be resized with a reuse-over-reallocate
//!   policy.
//! - [`View`] and [`ViewMut`] are windows into the same storage. They
//!   co-own the buffer (it lives until the last referencer drops) and carry
//!   their own bounds and origin, so a window may cover a strict
//!   sub-rectangle of its parent while keeping the parent's row stride.
//!
//! Element access is bounds-checked and failures carry the offending
//! coordinate and the valid range. All per-pixel operations (fills,
//! reciprocal inversion, copies, scalar arithmetic) run through a single
//! elementwise transform primitive, and a charge-diffusion correction
//! ([`Image::apply_cd`]) models pixel-to-pixel charge spreading with four
//! caller-supplied directional kernels.
//!
//! Sharing is unsynchronized (`Rc` + `Cell`): handles stay on one thread,
//! and mutation through any handle is immediately visible through every
//! other handle on the same storage.
//!
//! ## Usage
//!
//! ```
//! use image_raster::{Bounds, Image};
//! # fn demo() -> image_raster::Result<()> {
//! let image = Image::new(64, 64, 0.0f64)?;
//!
//! // Windows alias the image without copying.
//! let spot = image.subimage_mut(Bounds::new(30, 34, 30, 34))?;
//! spot.fill(100.0);
//! assert_eq!(image.at(32, 32)?, 100.0);
//!
//! // Out-of-range access reports the violated axis.
//! assert!(image.at(65, 1).is_err());
//! # Ok(()) }
//! # demo().unwrap();
//! ```
#![deny(unsafe_code)]

mod bounds;
mod buf;
mod cd;
mod element;
mod error;
mod image;
mod transform;

pub use self::bounds::Bounds;
pub use self::element::Element;
pub use self::error::{Error, Result};
pub use self::image::{Image, View, ViewMut};
