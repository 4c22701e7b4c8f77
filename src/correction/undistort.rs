//! Radial lens-distortion removal by backward mapping.
//!
//! For every output pixel the normalized offset from the principal point
//! is scaled by `1 + k1*r^2 + k2*r^4 + k3*r^6` to find the source
//! sampling location, which is then resampled bicubically with a zero
//! border fill.

use super::types::Distortion;

pub(crate) fn apply(
    pixels: &[u16],
    width: usize,
    height: usize,
    channels: usize,
    opts: &Distortion,
) -> Vec<u16> {
    let mut out = vec![0u16; pixels.len()];
    for y in 0..height {
        for x in 0..width {
            let u = x as f64 - opts.cx_px;
            let v = y as f64 - opts.cy_px;
            let r2 = u * u + v * v;
            let r4 = r2 * r2;
            let r6 = r2 * r4;
            let radial = 1.0 + opts.k1 * r2 + opts.k2 * r4 + opts.k3 * r6;
            let src_x = u * radial + opts.cx_px;
            let src_y = v * radial + opts.cy_px;
            for c in 0..channels {
                out[(y * width + x) * channels + c] =
                    sample_bicubic(pixels, width, height, channels, c, src_x, src_y);
            }
        }
    }
    out
}

/// Cubic convolution kernel with A = -0.75.
fn cubic_weight(t: f64) -> f64 {
    const A: f64 = -0.75;
    let t = t.abs();
    if t <= 1.0 {
        ((A + 2.0) * t - (A + 3.0)) * t * t + 1.0
    } else if t < 2.0 {
        ((A * t - 5.0 * A) * t + 8.0 * A) * t - 4.0 * A
    } else {
        0.0
    }
}

/// Bicubic sample over a 4x4 neighbourhood; anything outside the image
/// reads as 0. The kernel overshoots, so the result is clamped.
fn sample_bicubic(
    pixels: &[u16],
    width: usize,
    height: usize,
    channels: usize,
    channel: usize,
    x: f64,
    y: f64,
) -> u16 {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let xi = x0 as i64;
    let yi = y0 as i64;

    let mut acc = 0.0;
    for j in -1i64..=2 {
        let wy = cubic_weight(fy - j as f64);
        if wy == 0.0 {
            continue;
        }
        for i in -1i64..=2 {
            let wx = cubic_weight(fx - i as f64);
            if wx == 0.0 {
                continue;
            }
            let sx = xi + i;
            let sy = yi + j;
            let sample = if sx < 0 || sy < 0 || sx >= width as i64 || sy >= height as i64 {
                0.0
            } else {
                f64::from(pixels[(sy as usize * width + sx as usize) * channels + channel])
            };
            acc += wy * wx * sample;
        }
    }
    acc.round().clamp(0.0, 65535.0) as u16
}
