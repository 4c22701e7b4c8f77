//! Tagged camera/acquisition metadata codec.
//!
//! Serialised layout:
//! ```text
//! [TAG][VALUE][TAG][VALUE]...'EOR#'
//! ```
//! TAG is a 32-bit integer whose upper 16 bits are a field id and whose
//! lower 16 bits are a type code. Variable-length values carry a u32
//! byte-length prefix. All multi-byte data is big-endian.
//!
//! Readers skip records with unrecognised field ids, so newer writers can
//! add fields without breaking older readers. Skipped fields are logged
//! and dropped; they do not survive a read/modify/write cycle.

use std::io::{Cursor, Read};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use tracing::warn;

use crate::container::error::{ContainerError, Result};

const END_OF_RECORD: i32 = i32::from_be_bytes(*b"EOR#");

const TYPE_INT32: u16 = 0x0004;
const TYPE_STRING: u16 = 0x0100;

const fn tag(field: i32, type_code: u16) -> i32 {
    (field << 16) | type_code as i32
}

const TAG_VENDOR: i32 = tag(0x01, TYPE_STRING);
const TAG_MODEL: i32 = tag(0x02, TYPE_STRING);
const TAG_NAME: i32 = tag(0x03, TYPE_STRING);
const TAG_SERIAL: i32 = tag(0x04, TYPE_STRING);
const TAG_MAC: i32 = tag(0x05, TYPE_STRING);
const TAG_IP: i32 = tag(0x06, TYPE_STRING);
const TAG_FIRMWARE: i32 = tag(0x07, TYPE_STRING);
const TAG_IMAGE_ID: i32 = tag(0x11, TYPE_INT32);
const TAG_IMAGE_INDEX: i32 = tag(0x12, TYPE_INT32);
const TAG_TAP_COUNT: i32 = tag(0x13, TYPE_INT32);
const TAG_EXPOSURE_US: i32 = tag(0x14, TYPE_INT32);
const TAG_TIMESTAMP: i32 = tag(0x15, TYPE_INT32);
const TAG_AFFIX: i32 = tag(0x1F, TYPE_STRING);
const TAG_COMMENT: i32 = tag(0x21, TYPE_STRING);

/// Byte cap for every string field except the comment.
const MAX_FIELD_LEN: usize = 32;
const MAX_COMMENT_LEN: usize = 128;

/// Camera identity and acquisition metadata. Absent fields are not
/// written; integer fields additionally require a non-negative value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub vendor: Option<String>,
    pub model: Option<String>,
    pub name: Option<String>,
    pub serial: Option<String>,
    pub mac: Option<String>,
    pub ip: Option<String>,
    pub firmware: Option<String>,

    pub image_id: Option<i32>,
    pub image_index: Option<i32>,
    pub tap_count: Option<i32>,
    pub exposure_us: Option<i32>,
    pub timestamp: Option<i32>,

    pub comment: Option<String>,
    pub affix: Option<String>,
}

impl Metadata {
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        write_string(&mut out, TAG_VENDOR, &self.vendor, MAX_FIELD_LEN)?;
        write_string(&mut out, TAG_MODEL, &self.model, MAX_FIELD_LEN)?;
        write_string(&mut out, TAG_NAME, &self.name, MAX_FIELD_LEN)?;
        write_string(&mut out, TAG_SERIAL, &self.serial, MAX_FIELD_LEN)?;
        write_string(&mut out, TAG_MAC, &self.mac, MAX_FIELD_LEN)?;
        write_string(&mut out, TAG_IP, &self.ip, MAX_FIELD_LEN)?;
        write_string(&mut out, TAG_FIRMWARE, &self.firmware, MAX_FIELD_LEN)?;
        write_int(&mut out, TAG_IMAGE_ID, self.image_id)?;
        write_int(&mut out, TAG_IMAGE_INDEX, self.image_index)?;
        write_int(&mut out, TAG_TAP_COUNT, self.tap_count)?;
        write_int(&mut out, TAG_EXPOSURE_US, self.exposure_us)?;
        write_int(&mut out, TAG_TIMESTAMP, self.timestamp)?;
        write_string(&mut out, TAG_COMMENT, &self.comment, MAX_COMMENT_LEN)?;
        write_string(&mut out, TAG_AFFIX, &self.affix, MAX_FIELD_LEN)?;
        out.write_i32::<BigEndian>(END_OF_RECORD)?;
        Ok(out)
    }

    /// Reads tagged records until the end-of-record tag or stream
    /// exhaustion. Unknown tags are skipped generically; a record running
    /// past the end of the section is a fatal truncation.
    pub fn decode(data: &[u8]) -> Result<Metadata> {
        let mut cursor = Cursor::new(data);
        let mut meta = Metadata::default();
        while remaining(&cursor) >= 4 {
            let key = read_i32(&mut cursor, "metadata tag")?;
            match key {
                END_OF_RECORD => break,
                TAG_VENDOR => meta.vendor = Some(read_string(&mut cursor)?),
                TAG_MODEL => meta.model = Some(read_string(&mut cursor)?),
                TAG_NAME => meta.name = Some(read_string(&mut cursor)?),
                TAG_SERIAL => meta.serial = Some(read_string(&mut cursor)?),
                TAG_MAC => meta.mac = Some(read_string(&mut cursor)?),
                TAG_IP => meta.ip = Some(read_string(&mut cursor)?),
                TAG_FIRMWARE => meta.firmware = Some(read_string(&mut cursor)?),
                TAG_IMAGE_ID => meta.image_id = read_optional_int(&mut cursor)?,
                TAG_IMAGE_INDEX => meta.image_index = read_optional_int(&mut cursor)?,
                TAG_TAP_COUNT => meta.tap_count = read_optional_int(&mut cursor)?,
                TAG_EXPOSURE_US => meta.exposure_us = read_optional_int(&mut cursor)?,
                TAG_TIMESTAMP => meta.timestamp = read_optional_int(&mut cursor)?,
                TAG_COMMENT => meta.comment = Some(read_string(&mut cursor)?),
                TAG_AFFIX => meta.affix = Some(read_string(&mut cursor)?),
                unknown => skip_unknown(&mut cursor, unknown)?,
            }
        }
        Ok(meta)
    }
}

fn write_string(out: &mut Vec<u8>, key: i32, value: &Option<String>, cap: usize) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    let bytes = truncate_utf8(value, cap);
    out.write_i32::<BigEndian>(key)?;
    out.write_u32::<BigEndian>(bytes.len() as u32)?;
    std::io::Write::write_all(out, bytes)?;
    Ok(())
}

fn write_int(out: &mut Vec<u8>, key: i32, value: Option<i32>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if value < 0 {
        return Ok(());
    }
    out.write_i32::<BigEndian>(key)?;
    out.write_i32::<BigEndian>(value)?;
    Ok(())
}

/// Caps a string at `cap` bytes without splitting a UTF-8 sequence.
fn truncate_utf8(value: &str, cap: usize) -> &[u8] {
    if value.len() <= cap {
        return value.as_bytes();
    }
    let mut end = cap;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value.as_bytes()[..end]
}

fn remaining(cursor: &Cursor<&[u8]>) -> usize {
    cursor.get_ref().len().saturating_sub(cursor.position() as usize)
}

fn read_i32(cursor: &mut Cursor<&[u8]>, what: &str) -> Result<i32> {
    cursor
        .read_i32::<BigEndian>()
        .map_err(|_| ContainerError::Truncated(format!("{what} runs past the end of the section")))
}

fn read_optional_int(cursor: &mut Cursor<&[u8]>) -> Result<Option<i32>> {
    let value = read_i32(cursor, "metadata integer value")?;
    Ok((value >= 0).then_some(value))
}

fn read_string(cursor: &mut Cursor<&[u8]>) -> Result<String> {
    let len = cursor.read_u32::<BigEndian>().map_err(|_| {
        ContainerError::Truncated("metadata string length runs past the end of the section".into())
    })? as usize;
    if remaining(cursor) < len {
        return Err(ContainerError::Truncated(format!(
            "metadata string of {len} bytes runs past the end of the section"
        )));
    }
    let mut buf = vec![0u8; len];
    cursor.read_exact(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Generic skip for a record with an unrecognised field id. Records with
/// a known type code consume their value normally; otherwise the low
/// byte of the type code is a fixed value length, 0 meaning the value
/// carries its own u32 length prefix.
fn skip_unknown(cursor: &mut Cursor<&[u8]>, key: i32) -> Result<()> {
    let field = (key >> 16) & 0xFFFF;
    let type_code = (key & 0xFFFF) as u16;
    if type_code == TYPE_INT32 {
        let value = read_i32(cursor, "unknown metadata value")?;
        warn!("Skipping unknown int32 metadata record, field {field:#x} value {value}");
    } else if type_code == TYPE_STRING {
        let value = read_string(cursor)?;
        warn!("Skipping unknown string metadata record, field {field:#x} value {value:?}");
    } else {
        let fixed = (type_code & 0xFF) as usize;
        let len = if fixed != 0 {
            fixed
        } else {
            cursor.read_u32::<BigEndian>().map_err(|_| {
                ContainerError::Truncated(
                    "unknown metadata record length runs past the end of the section".into(),
                )
            })? as usize
        };
        if remaining(cursor) < len {
            return Err(ContainerError::Truncated(format!(
                "unknown metadata record of {len} bytes runs past the end of the section"
            )));
        }
        cursor.set_position(cursor.position() + len as u64);
        warn!(
            "Skipping unknown metadata record, field {field:#x} type {type_code:#x} ({len} bytes)"
        );
    }
    Ok(())
}
