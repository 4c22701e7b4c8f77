//! Linear window stretch with gamma.

use super::clamp_u16;
use super::types::Stretch;

pub(crate) fn apply(pixels: &mut [u16], opts: &Stretch) {
    let min = opts.min.clamp(0.0, 1.0);
    let max = opts.max.clamp(min, 1.0);
    let src_min = min * 65535.0;
    let src_max = max * 65535.0;
    let range = src_max - src_min;

    for px in pixels.iter_mut() {
        let p = (f64::from(*px) - src_min) / range;
        let p = p.powf(opts.gamma);
        *px = clamp_u16(p * 65535.0);
    }
}
