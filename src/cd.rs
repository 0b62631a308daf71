//! Charge-diffusion pixel correction driven by packed directional kernels.
//!
//! The model redistributes signal between a pixel and its four immediate
//! neighbors: for every pixel inside the kernel footprint of `(x, y)`, the
//! half-sum averages toward the top, bottom, left and right neighbors are
//! weighted by four caller-supplied kernels and accumulated onto the center
//! value. The kernels are empirical and tuned against a fixed memory
//! layout: a `(2 * dmax + 1)^2`-element footprint flattened into a single
//! image row, iy-outer and ix-inner. That flattening order is part of the
//! data contract and must not change.
//!
//! Pixels closer than `dmax` to any image edge are carried over unchanged.
//! A partial footprint would not conserve total flux, so edge pixels are
//! exempted rather than approximated with clamped or mirrored neighbors.
use bytemuck::Zeroable;
use log::trace;

use crate::element::Element;
use crate::error::{Error, Result};
use crate::image::RawImage;

pub(crate) fn apply_cd<T: Element>(
    source: &RawImage<T>,
    a_l: &RawImage<f64>,
    a_r: &RawImage<f64>,
    a_b: &RawImage<f64>,
    a_t: &RawImage<f64>,
    dmax: i32,
) -> Result<RawImage<T>> {
    source.buffer()?;
    if dmax < 0 {
        return Err(Error::KernelExtent { dmax });
    }
    let footprint = i64::from(dmax) * 2 + 1;
    let expected = footprint * footprint;
    let found = a_l.bounds().width();
    if found != expected {
        return Err(Error::KernelLength {
            dmax,
            expected,
            found,
        });
    }
    for (which, kernel) in [("aR", a_r), ("aB", a_b), ("aT", a_t)] {
        let found = kernel.bounds().width();
        if found != expected {
            return Err(Error::KernelLengthMismatch {
                which,
                expected,
                found,
            });
        }
    }

    let bounds = source.bounds();
    trace!("charge diffusion with dmax = {} over {}", dmax, bounds);

    // The weights sit along each kernel's ymin row; a window with a wider
    // parent keeps that row contiguous, so one base index suffices.
    let l_buf = a_l.buffer()?;
    let r_buf = a_r.buffer()?;
    let b_buf = a_b.buffer()?;
    let t_buf = a_t.buffer()?;
    let l_base = a_l.index_of(a_l.bounds().xmin(), a_l.bounds().ymin());
    let r_base = a_r.index_of(a_r.bounds().xmin(), a_r.bounds().ymin());
    let b_base = a_b.index_of(a_b.bounds().xmin(), a_b.bounds().ymin());
    let t_base = a_t.index_of(a_t.bounds().xmin(), a_t.bounds().ymin());

    let output = RawImage::alloc(bounds, T::zeroed())?;
    let out_buf = output.buffer()?;

    for y in bounds.ymin()..=bounds.ymax() {
        for x in bounds.xmin()..=bounds.xmax() {
            let center = source.at(x, y)?.as_f64();
            let index = output.index_of(x, y);

            let near_edge = i64::from(x) < i64::from(bounds.xmin()) + i64::from(dmax)
                || i64::from(x) > i64::from(bounds.xmax()) - i64::from(dmax)
                || i64::from(y) < i64::from(bounds.ymin()) + i64::from(dmax)
                || i64::from(y) > i64::from(bounds.ymax()) - i64::from(dmax);
            if near_edge {
                out_buf.set(index, T::from_f64(center));
                continue;
            }

            let f_top = (center + source.at(x, y + 1)?.as_f64()) / 2.0;
            let f_bottom = (center + source.at(x, y - 1)?.as_f64()) / 2.0;
            let f_right = (center + source.at(x + 1, y)?.as_f64()) / 2.0;
            let f_left = (center + source.at(x - 1, y)?.as_f64()) / 2.0;

            let mut value = center;
            // One running index walks the packed kernels in their own
            // flattening order.
            let mut flat = 0usize;
            for iy in -dmax..=dmax {
                for ix in -dmax..=dmax {
                    let q = source.at(x + ix, y + iy)?.as_f64();
                    value += q * f_top * t_buf.get(t_base + flat);
                    value += q * f_bottom * b_buf.get(b_base + flat);
                    value += q * f_left * l_buf.get(l_base + flat);
                    value += q * f_right * r_buf.get(r_base + flat);
                    flat += 1;
                }
            }
            out_buf.set(index, T::from_f64(value));
        }
    }
    Ok(output)
}
