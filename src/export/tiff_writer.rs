use std::io::{Cursor, Write};

use tiff::encoder::{TiffEncoder, colortype};
use tracing::debug;

use super::error::{ExportError, Result};
use super::writer::RasterWriter;
use crate::correction::{CorrectedImage, Samples};

/// TIFF output for every channel/depth combination the pipeline emits.
pub struct TiffRasterWriter;

impl RasterWriter for TiffRasterWriter {
    fn write_raster(&self, image: &CorrectedImage, output: &mut dyn Write) -> Result<()> {
        debug!(
            "Encoding TIFF image: {}x{}, {} channel(s), {} bit",
            image.width,
            image.height,
            image.channels,
            image.bit_depth()
        );

        let mut buffer = Vec::new();
        let mut encoder = TiffEncoder::new(Cursor::new(&mut buffer))
            .map_err(|e| ExportError::Encode(e.to_string()))?;

        let width = image.width as u32;
        let height = image.height as u32;
        match (&image.samples, image.channels) {
            (Samples::U16(data), 1) => encoder
                .write_image::<colortype::Gray16>(width, height, data)
                .map_err(|e| ExportError::Encode(e.to_string()))?,
            (Samples::U16(data), 3) => encoder
                .write_image::<colortype::RGB16>(width, height, data)
                .map_err(|e| ExportError::Encode(e.to_string()))?,
            (Samples::U8(data), 1) => encoder
                .write_image::<colortype::Gray8>(width, height, data)
                .map_err(|e| ExportError::Encode(e.to_string()))?,
            (Samples::U8(data), 3) => encoder
                .write_image::<colortype::RGB8>(width, height, data)
                .map_err(|e| ExportError::Encode(e.to_string()))?,
            _ => {
                return Err(ExportError::Encode(format!(
                    "Unsupported channel count {}",
                    image.channels
                )));
            }
        }

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete");
        Ok(())
    }
}
