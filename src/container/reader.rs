//! Container decoding: header and table-of-contents parsing, section
//! framing, and dispatch to the metadata, pose and pixel codecs.
//!
//! Parsing fails closed: a bad magic, a bad table-of-contents entry or a
//! short read aborts the decode with no partial frame. The one exception
//! is the optional preview section, which degrades to "absent" with a
//! warning when malformed.

use std::io::Cursor;

use byteorder::{BigEndian, ReadBytesExt};
use tracing::warn;

use crate::container::compress::{PayloadCompressor, ZlibCompressor};
use crate::container::error::{ContainerError, Result};
use crate::container::format::{
    CONTAINER_MAGIC, FormatVersion, METADATA_MAGIC, PIXEL_DATA_MAGIC, POSE_MAGIC, PREVIEW_MAGIC,
    PixelEndianness, PixelFormat, TOC_TAG_METADATA, TOC_TAG_PIXEL_DATA, TOC_TAG_POSE,
    TOC_TAG_PREVIEW,
};
use crate::container::frame::SensorFrame;
use crate::container::metadata::Metadata;
use crate::container::pixel::{PixelBuffer, PixelInfo};
use crate::container::pose::PoseEvent;

struct Header {
    offset_metadata: u32,
    offset_pose: u32,
    offset_preview: u32,
    offset_pixel_data: u32,
    info: PixelInfo,
}

/// Decodes a container from memory with the standard zlib collaborator.
pub fn decode(data: &[u8]) -> Result<SensorFrame> {
    decode_with(data, &ZlibCompressor)
}

pub fn decode_with(data: &[u8], compressor: &dyn PayloadCompressor) -> Result<SensorFrame> {
    let header = read_header(data)?;

    if header.offset_metadata == 0 {
        return Err(ContainerError::Structural(
            "Metadata section offset is zero".into(),
        ));
    }
    let metadata = Metadata::decode(&read_section(
        data,
        header.offset_metadata,
        METADATA_MAGIC,
        "metadata",
    )?)?;

    let pose = if header.offset_pose != 0 {
        PoseEvent::decode(&read_section(data, header.offset_pose, POSE_MAGIC, "pose")?)?
    } else {
        PoseEvent::default()
    };

    let preview = if header.offset_preview != 0 {
        match read_section(data, header.offset_preview, PREVIEW_MAGIC, "preview") {
            Ok(payload) if !payload.is_empty() => Some(payload),
            Ok(_) => None,
            Err(e) => {
                warn!("Dropping malformed preview section: {e}");
                None
            }
        }
    } else {
        None
    };

    if header.offset_pixel_data == 0 {
        return Err(ContainerError::Structural(
            "Pixel data section offset is zero".into(),
        ));
    }
    let mut payload = read_section(
        data,
        header.offset_pixel_data,
        PIXEL_DATA_MAGIC,
        "pixel data",
    )?;
    let mut info = header.info;
    if info.compressed {
        payload = compressor.decompress(&payload)?;
        info.compressed = false;
    }

    Ok(SensorFrame {
        pixel: PixelBuffer::new(payload, info),
        metadata,
        pose,
        preview,
    })
}

fn read_header(data: &[u8]) -> Result<Header> {
    let mut cursor = Cursor::new(data);

    let magic = read_i32(&mut cursor)?;
    if magic != CONTAINER_MAGIC {
        return Err(ContainerError::Structural(
            "Missing container magic".into(),
        ));
    }
    let version_raw = read_i32(&mut cursor)?;
    let version = FormatVersion::from_wire(version_raw).ok_or_else(|| {
        ContainerError::Structural(format!("Unsupported container format version {version_raw}"))
    })?;

    let offset_metadata = read_toc_entry(&mut cursor, TOC_TAG_METADATA, "metadata")?;
    let offset_pose = read_toc_entry(&mut cursor, TOC_TAG_POSE, "pose")?;
    let offset_preview = read_toc_entry(&mut cursor, TOC_TAG_PREVIEW, "preview")?;
    let offset_pixel_data = read_toc_entry(&mut cursor, TOC_TAG_PIXEL_DATA, "pixel data")?;

    let size = read_u32(&mut cursor)?;
    let width = read_u32(&mut cursor)?;
    let height = read_u32(&mut cursor)?;
    let pitch = read_u32(&mut cursor)?;
    let format = PixelFormat::from_wire(read_u32(&mut cursor)?);
    let compressed = read_u32(&mut cursor)? != 0;
    // Version 1 predates the endianness word and derives byte order from
    // the format code instead.
    let endianness = match version {
        FormatVersion::V1 => format.legacy_endianness(),
        FormatVersion::V2 => PixelEndianness::from_wire(read_u32(&mut cursor)?),
    };

    Ok(Header {
        offset_metadata,
        offset_pose,
        offset_preview,
        offset_pixel_data,
        info: PixelInfo {
            size,
            width,
            height,
            pitch,
            format,
            compressed,
            endianness,
        },
    })
}

fn read_toc_entry(cursor: &mut Cursor<&[u8]>, expected_tag: i32, name: &str) -> Result<u32> {
    let tag = read_i32(cursor)?;
    if tag != expected_tag {
        return Err(ContainerError::Structural(format!(
            "Missing {name} table-of-contents tag"
        )));
    }
    let offset = read_i32(cursor)?;
    u32::try_from(offset).map_err(|_| {
        ContainerError::Structural(format!("Negative {name} section offset {offset}"))
    })
}

/// Reads one section frame `(magic, length, payload)` at `offset`.
fn read_section(data: &[u8], offset: u32, magic: i32, name: &str) -> Result<Vec<u8>> {
    let start = offset as usize;
    if start + 8 > data.len() {
        return Err(ContainerError::Truncated(format!(
            "{name} section header at offset {offset} runs past the end of the container"
        )));
    }
    let mut cursor = Cursor::new(&data[start..]);
    let found = read_i32(&mut cursor)?;
    if found != magic {
        return Err(ContainerError::Structural(format!(
            "Missing {name} section magic"
        )));
    }
    let len = read_u32(&mut cursor)? as usize;
    let payload_start = start + 8;
    if payload_start + len > data.len() {
        return Err(ContainerError::Truncated(format!(
            "{name} section payload of {len} bytes runs past the end of the container"
        )));
    }
    Ok(data[payload_start..payload_start + len].to_vec())
}

fn read_i32(cursor: &mut Cursor<&[u8]>) -> Result<i32> {
    cursor
        .read_i32::<BigEndian>()
        .map_err(|_| ContainerError::Truncated("container header ends prematurely".into()))
}

fn read_u32(cursor: &mut Cursor<&[u8]>) -> Result<u32> {
    cursor
        .read_u32::<BigEndian>()
        .map_err(|_| ContainerError::Truncated("container header ends prematurely".into()))
}
