//! The correction chain: devignetting, stretch, colour balance,
//! demosaic, undistortion, bit-depth conversion, in that fixed order.

use tracing::{debug, info};

use super::error::Result;
use super::timing::{StageTimings, Timer};
use super::types::{CorrectedImage, CorrectionOptions, Samples};
use super::{color_balance, demosaic, devignette, stretch, undistort};
use crate::container::PixelBuffer;

/// Runs the correction chain over a decoded pixel buffer and returns a
/// new image; the stored data is never modified.
///
/// Every stage whose parameters are at their identity defaults is
/// skipped outright. An invalid or unconvertible buffer short-circuits
/// to an empty image instead of producing partially processed data.
pub fn correct(pixel: &PixelBuffer, options: &CorrectionOptions) -> Result<CorrectedImage> {
    if !pixel.is_valid() {
        return Ok(CorrectedImage::empty());
    }
    let mut samples = pixel.canonical();
    if samples.is_empty() {
        return Ok(CorrectedImage::empty());
    }
    let width = pixel.width() as usize;
    let height = pixel.height() as usize;
    let mut channels = 1usize;
    let mut timings = StageTimings::new();

    if !options.devignetting.is_identity() {
        let timer = Timer::start("devignette");
        devignette::apply(&mut samples, width, height, &options.devignetting);
        timings.add_stage(timer.stop());
    }

    if !options.stretch.is_identity() {
        let timer = Timer::start("stretch");
        stretch::apply(&mut samples, &options.stretch);
        timings.add_stage(timer.stop());
    }

    if !options.color_balance.is_identity() {
        let timer = Timer::start("color_balance");
        color_balance::apply(&mut samples, width, height, &options.color_balance);
        timings.add_stage(timer.stop());
    }

    if let Some(cfa) = demosaic::cfa_for(pixel.format()) {
        let timer = Timer::start("demosaic");
        samples = demosaic::apply(&samples, width, height, cfa)?;
        channels = 3;
        timings.add_stage(timer.stop());
    }

    if !options.distortion.is_identity() {
        let timer = Timer::start("undistort");
        samples = undistort::apply(&samples, width, height, channels, &options.distortion);
        timings.add_stage(timer.stop());
    }

    let samples = if options.convert_to_8bit {
        let timer = Timer::start("to_8bit");
        let bytes = samples
            .iter()
            .map(|&v| (f64::from(v) / 255.0).round() as u8)
            .collect();
        timings.add_stage(timer.stop());
        Samples::U8(bytes)
    } else {
        Samples::U16(samples)
    };

    for stage in timings.stages() {
        debug!(
            "{}: {:.3}ms",
            stage.name,
            stage.duration.as_secs_f64() * 1000.0
        );
    }
    info!(
        "Correction complete: {}x{}, {} channel(s) in {:.3}ms",
        width,
        height,
        channels,
        timings.total_duration().as_secs_f64() * 1000.0
    );

    Ok(CorrectedImage {
        width,
        height,
        channels,
        samples,
    })
}
