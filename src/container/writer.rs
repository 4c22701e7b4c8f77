//! Container encoding. Section offsets are computed from the size of
//! each preceding section in table order; absent sections (invalid pose,
//! no preview) get a zero offset and no frame at all. The written format
//! version is always 2.

use byteorder::{BigEndian, WriteBytesExt};
use tracing::warn;

use crate::container::compress::{PayloadCompressor, ZlibCompressor};
use crate::container::error::Result;
use crate::container::format::{
    CONTAINER_MAGIC, FormatVersion, HEADER_SIZE_V2, METADATA_MAGIC, PIXEL_DATA_MAGIC, POSE_MAGIC,
    PREVIEW_MAGIC, TOC_TAG_METADATA, TOC_TAG_PIXEL_DATA, TOC_TAG_POSE, TOC_TAG_PREVIEW,
};
use crate::container::frame::SensorFrame;
use crate::export::render_preview;

/// What to include alongside the raw pixel payload when saving.
/// Corrections are never baked into the stored container.
#[derive(Debug, Clone, Copy, Default)]
pub struct SaveOptions {
    /// Embed a freshly rendered JPEG preview of the corrected image.
    pub preview: bool,
    /// Compress the pixel payload with the zlib collaborator.
    pub compression: bool,
}

impl SaveOptions {
    pub fn builder() -> SaveOptionsBuilder {
        SaveOptionsBuilder::default()
    }
}

#[derive(Default)]
pub struct SaveOptionsBuilder {
    preview: Option<bool>,
    compression: Option<bool>,
}

impl SaveOptionsBuilder {
    pub fn preview(mut self, enable: bool) -> Self {
        self.preview = Some(enable);
        self
    }

    pub fn compression(mut self, enable: bool) -> Self {
        self.compression = Some(enable);
        self
    }

    pub fn build(self) -> SaveOptions {
        let default = SaveOptions::default();
        SaveOptions {
            preview: self.preview.unwrap_or(default.preview),
            compression: self.compression.unwrap_or(default.compression),
        }
    }
}

/// Encodes a frame with the standard zlib collaborator.
pub fn encode(frame: &SensorFrame, options: &SaveOptions) -> Result<Vec<u8>> {
    encode_with(frame, options, &ZlibCompressor)
}

pub fn encode_with(
    frame: &SensorFrame,
    options: &SaveOptions,
    compressor: &dyn PayloadCompressor,
) -> Result<Vec<u8>> {
    let metadata_payload = frame.metadata.encode()?;
    let pose_payload = if frame.pose.is_valid() {
        Some(frame.pose.encode()?)
    } else {
        None
    };
    // Preview rendering is best effort; a frame that cannot be corrected
    // is still saved, just without a preview.
    let preview_payload = if options.preview {
        match render_preview(frame) {
            Ok(jpeg) => Some(jpeg),
            Err(e) => {
                warn!("Could not render preview: {e}");
                None
            }
        }
    } else {
        None
    };
    let (pixel_payload, compressed) = if options.compression {
        (compressor.compress(frame.pixel.raw_data())?, true)
    } else {
        (frame.pixel.raw_data().to_vec(), false)
    };

    let mut next_offset = HEADER_SIZE_V2;
    let mut place = |payload: Option<&Vec<u8>>| -> u32 {
        match payload {
            Some(p) => {
                let offset = next_offset;
                next_offset += 8 + p.len() as u32;
                offset
            }
            None => 0,
        }
    };
    let offset_metadata = place(Some(&metadata_payload));
    let offset_pose = place(pose_payload.as_ref());
    let offset_preview = place(preview_payload.as_ref());
    let offset_pixel_data = next_offset;

    let info = frame.pixel.info();
    let mut out = Vec::with_capacity(offset_pixel_data as usize + 8 + pixel_payload.len());
    out.write_i32::<BigEndian>(CONTAINER_MAGIC)?;
    out.write_i32::<BigEndian>(FormatVersion::V2 as i32)?;

    // table of contents
    out.write_i32::<BigEndian>(TOC_TAG_METADATA)?;
    out.write_i32::<BigEndian>(offset_metadata as i32)?;
    out.write_i32::<BigEndian>(TOC_TAG_POSE)?;
    out.write_i32::<BigEndian>(offset_pose as i32)?;
    out.write_i32::<BigEndian>(TOC_TAG_PREVIEW)?;
    out.write_i32::<BigEndian>(offset_preview as i32)?;
    out.write_i32::<BigEndian>(TOC_TAG_PIXEL_DATA)?;
    out.write_i32::<BigEndian>(offset_pixel_data as i32)?;

    // pixel payload attributes; size records the uncompressed byte count
    out.write_u32::<BigEndian>(frame.pixel.byte_size() as u32)?;
    out.write_u32::<BigEndian>(info.width)?;
    out.write_u32::<BigEndian>(info.height)?;
    out.write_u32::<BigEndian>(info.pitch)?;
    out.write_u32::<BigEndian>(info.format.to_wire())?;
    out.write_u32::<BigEndian>(u32::from(compressed))?;
    out.write_u32::<BigEndian>(info.endianness.to_wire())?;

    write_section(&mut out, METADATA_MAGIC, &metadata_payload)?;
    if let Some(payload) = &pose_payload {
        write_section(&mut out, POSE_MAGIC, payload)?;
    }
    if let Some(payload) = &preview_payload {
        write_section(&mut out, PREVIEW_MAGIC, payload)?;
    }
    write_section(&mut out, PIXEL_DATA_MAGIC, &pixel_payload)?;
    Ok(out)
}

fn write_section(out: &mut Vec<u8>, magic: i32, payload: &[u8]) -> Result<()> {
    out.write_i32::<BigEndian>(magic)?;
    out.write_u32::<BigEndian>(payload.len() as u32)?;
    std::io::Write::write_all(out, payload)?;
    Ok(())
}
