//! Radial brightness-falloff correction.
//!
//! Formula (12) in Rohlfing, "Single-image vignetting correction", 2012:
//! the falloff divisor is `1 + a*r^2 + b*r^4 + c*r^6` in the radius
//! normalized by the distance from the centre to a corner.

use super::clamp_u16;
use super::types::Devignetting;

pub(crate) fn apply(pixels: &mut [u16], width: usize, height: usize, opts: &Devignetting) {
    let half = (width.max(height) / 2) as f64;
    let corner_distance = (2.0 * half * half).sqrt();
    let half_w = (width / 2) as f64;
    let half_h = (height / 2) as f64;
    let cx_px = half_w + opts.cx * half_w;
    let cy_px = half_h + opts.cy * half_h;
    let offset = f64::from(opts.offset);

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let src = f64::from(pixels[idx]);
            let u = x as f64 - cx_px;
            let v = y as f64 - cy_px;
            let r = (u * u + v * v).sqrt() / corner_distance;
            let r2 = r * r;
            let falloff = 1.0 + opts.a * r2 + opts.b * r2 * r2 + opts.c * r2 * r2 * r2;
            let dst = (src - offset) / falloff * opts.factor;
            pixels[idx] = clamp_u16(dst);
        }
    }
}
