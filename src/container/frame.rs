//! The in-memory container object.

use std::path::Path;

use tracing::info;

use crate::container::error::{ContainerError, Result};
use crate::container::metadata::Metadata;
use crate::container::pixel::PixelBuffer;
use crate::container::pose::PoseEvent;
use crate::container::reader::decode;
use crate::container::writer::{SaveOptions, encode};
use crate::correction::{CorrectionOptions, correct};
use crate::export;

/// A decoded sensor-image container: the raw pixel payload, acquisition
/// metadata, optional pose telemetry and the embedded preview blob, if
/// the file carried one. The frame exclusively owns all of it.
#[derive(Debug, Clone, Default)]
pub struct SensorFrame {
    pub pixel: PixelBuffer,
    pub metadata: Metadata,
    pub pose: PoseEvent,
    pub preview: Option<Vec<u8>>,
}

impl SensorFrame {
    pub fn is_valid(&self) -> bool {
        !self.pixel.raw_data().is_empty()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<SensorFrame> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| ContainerError::FileRead(format!("{}: {}", path.display(), e)))?;
        let frame = decode(&data)?;
        info!(
            "Loaded {}: {}x{} {}",
            path.display(),
            frame.pixel.width(),
            frame.pixel.height(),
            frame.pixel.format()
        );
        Ok(frame)
    }

    /// Writes the frame to disk. Not transactional: a failure after the
    /// first bytes have been written can leave a truncated file behind.
    pub fn save<P: AsRef<Path>>(&self, path: P, options: &SaveOptions) -> Result<()> {
        let path = path.as_ref();
        let bytes = encode(self, options)?;
        std::fs::write(path, &bytes)
            .map_err(|e| ContainerError::FileWrite(format!("{}: {}", path.display(), e)))?;
        info!("Saved {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    /// Corrects the pixel data and writes the result to `path`, picking
    /// the output codec from the file extension.
    pub fn export<P: AsRef<Path>>(
        &self,
        path: P,
        options: &CorrectionOptions,
    ) -> export::Result<()> {
        let corrected = correct(&self.pixel, options)?;
        export::write_to_path(&corrected, path.as_ref())
    }
}
