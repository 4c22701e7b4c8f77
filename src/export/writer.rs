use std::io::Write;

use super::error::Result;
use crate::correction::CorrectedImage;

pub trait RasterWriter {
    fn write_raster(&self, image: &CorrectedImage, output: &mut dyn Write) -> Result<()>;
}
