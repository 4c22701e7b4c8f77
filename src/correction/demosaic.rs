//! Colour-filter-array interpolation into interleaved RGB.

use std::io::Cursor;

use bayer::{BayerDepth, CFA, Demosaic, RasterDepth, RasterMut};
use tracing::debug;

use super::error::{CorrectionError, Result};
use crate::container::PixelFormat;

/// The CFA layout for each colour format, named by the first sensor row.
/// Mono formats have none and skip the stage.
pub(crate) fn cfa_for(format: PixelFormat) -> Option<CFA> {
    match format {
        PixelFormat::BayerGR12Packed | PixelFormat::BayerGR16 => Some(CFA::GRBG),
        PixelFormat::BayerBG12Packed | PixelFormat::BayerBG16 => Some(CFA::BGGR),
        PixelFormat::BayerGB12Packed | PixelFormat::BayerGB16 => Some(CFA::GBRG),
        PixelFormat::BayerRG12Packed | PixelFormat::BayerRG16 => Some(CFA::RGGB),
        _ => None,
    }
}

/// Linear demosaic of a 16-bit mosaic into width * height * 3 samples.
pub(crate) fn apply(pixels: &[u16], width: usize, height: usize, cfa: CFA) -> Result<Vec<u16>> {
    debug!("Demosaicing {}x{} mosaic, CFA {:?}", width, height, cfa);

    // The demosaic collaborator works on byte streams.
    let mosaic_bytes: Vec<u8> = pixels.iter().flat_map(|&v| v.to_le_bytes()).collect();
    let mut output_buf = vec![0u8; width * height * 3 * 2];
    let mut raster = RasterMut::new(width, height, RasterDepth::Depth16, &mut output_buf);

    bayer::run_demosaic(
        &mut Cursor::new(&mosaic_bytes[..]),
        BayerDepth::Depth16LE,
        cfa,
        Demosaic::Linear,
        &mut raster,
    )
    .map_err(|e| CorrectionError::Demosaic(format!("{e:?}")))?;

    Ok(output_buf
        .chunks_exact(2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .collect())
}
