//! White-balance gains over the colour-filter mosaic.
//!
//! Gains are applied per 2x2 tile: green on the diagonal, red top-right,
//! blue bottom-left. A trailing odd row or column is left untouched.

use super::clamp_u16;
use super::types::ColorBalance;

pub(crate) fn apply(pixels: &mut [u16], width: usize, height: usize, opts: &ColorBalance) {
    let mut y = 0;
    while y + 1 < height {
        let mut x = 0;
        while x + 1 < width {
            let top = y * width + x;
            let bottom = top + width;
            pixels[top] = clamp_u16(opts.g * f64::from(pixels[top]));
            pixels[top + 1] = clamp_u16(opts.r * f64::from(pixels[top + 1]));
            pixels[bottom] = clamp_u16(opts.b * f64::from(pixels[bottom]));
            pixels[bottom + 1] = clamp_u16(opts.g * f64::from(pixels[bottom + 1]));
            x += 2;
        }
        y += 2;
    }
}
