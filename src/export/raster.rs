//! Output-file dispatch and conversions into the raster collaborator's
//! image types.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Rgb, RgbImage};
use tracing::info;

use super::error::{ExportError, Result};
use super::tiff_writer::TiffRasterWriter;
use super::writer::RasterWriter;
use crate::correction::{CorrectedImage, Samples};

/// Writes a corrected image to `path`, picking the codec from the file
/// extension: TIFF keeps the full depth, PNG keeps 8 or 16 bits, JPEG
/// requires the 8-bit pipeline output.
pub fn write_to_path(image: &CorrectedImage, path: &Path) -> Result<()> {
    if image.is_empty() {
        return Err(ExportError::Encode("Cannot export an empty image".into()));
    }
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "tif" | "tiff" => {
            let file = File::create(path)
                .map_err(|e| ExportError::FileWrite(format!("{}: {}", path.display(), e)))?;
            let mut output = BufWriter::new(file);
            TiffRasterWriter.write_raster(image, &mut output)?;
        }
        "png" => {
            to_dynamic_image(image)?
                .save(path)
                .map_err(|e| ExportError::Encode(e.to_string()))?;
        }
        "jpg" | "jpeg" => {
            if image.bit_depth() != 8 {
                return Err(ExportError::UnsupportedFormat(
                    "JPEG output requires the 8-bit pipeline output".into(),
                ));
            }
            to_dynamic_image(image)?
                .save(path)
                .map_err(|e| ExportError::Encode(e.to_string()))?;
        }
        other => {
            return Err(ExportError::UnsupportedFormat(format!(
                "No output codec for extension {other:?}"
            )));
        }
    }
    info!("Exported {}", path.display());
    Ok(())
}

pub(crate) fn to_dynamic_image(image: &CorrectedImage) -> Result<DynamicImage> {
    let width = image.width as u32;
    let height = image.height as u32;
    let converted = match (&image.samples, image.channels) {
        (Samples::U8(data), 1) => {
            GrayImage::from_raw(width, height, data.clone()).map(DynamicImage::ImageLuma8)
        }
        (Samples::U8(data), 3) => {
            RgbImage::from_raw(width, height, data.clone()).map(DynamicImage::ImageRgb8)
        }
        (Samples::U16(data), 1) => {
            ImageBuffer::<Luma<u16>, Vec<u16>>::from_raw(width, height, data.clone())
                .map(DynamicImage::ImageLuma16)
        }
        (Samples::U16(data), 3) => {
            ImageBuffer::<Rgb<u16>, Vec<u16>>::from_raw(width, height, data.clone())
                .map(DynamicImage::ImageRgb16)
        }
        _ => None,
    };
    converted.ok_or_else(|| {
        ExportError::Encode(format!(
            "Sample buffer does not match {}x{}x{}",
            image.width, image.height, image.channels
        ))
    })
}
