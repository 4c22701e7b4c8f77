//! Output raster encoding: the embedded JPEG preview and corrected-image
//! files.

pub mod error;
mod preview;
mod raster;
mod tiff_writer;
mod writer;

#[cfg(test)]
mod tests;

pub use error::{ExportError, Result};
pub use preview::render_preview;
pub use raster::write_to_path;
pub use tiff_writer::TiffRasterWriter;
pub use writer::RasterWriter;
