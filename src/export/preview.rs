//! Embedded-preview rendering: the corrected image, 8 bits per channel,
//! scaled to a fixed width and JPEG-encoded.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use tracing::debug;

use super::error::{ExportError, Result};
use super::raster::to_dynamic_image;
use crate::container::frame::SensorFrame;
use crate::correction::{CorrectionOptions, correct};

const PREVIEW_WIDTH: u32 = 256;
const PREVIEW_JPEG_QUALITY: u8 = 50;

pub fn render_preview(frame: &SensorFrame) -> Result<Vec<u8>> {
    let options = CorrectionOptions::builder().convert_to_8bit(true).build();
    let corrected = correct(&frame.pixel, &options)?;
    if corrected.is_empty() {
        return Err(ExportError::Encode(
            "Cannot render a preview of an empty image".into(),
        ));
    }

    let full = to_dynamic_image(&corrected)?;
    let scaled = full.resize(PREVIEW_WIDTH, u32::MAX, FilterType::Triangle);
    debug!(
        "Rendering preview: {}x{} -> {}x{}",
        corrected.width,
        corrected.height,
        scaled.width(),
        scaled.height()
    );

    let mut out = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut out, PREVIEW_JPEG_QUALITY);
    scaled
        .write_with_encoder(encoder)
        .map_err(|e| ExportError::Encode(e.to_string()))?;
    Ok(out)
}
