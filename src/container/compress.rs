//! Pixel-payload compression collaborator.
//!
//! Compressed payloads are framed as a big-endian u32 uncompressed byte
//! count followed by a zlib stream.

use std::io::{Read, Write};

use byteorder::{BigEndian, WriteBytesExt};
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use crate::container::error::{ContainerError, Result};

pub trait PayloadCompressor {
    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>>;
    fn decompress(&self, payload: &[u8]) -> Result<Vec<u8>>;
}

pub struct ZlibCompressor;

impl PayloadCompressor for ZlibCompressor {
    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(raw.len() / 2 + 8);
        out.write_u32::<BigEndian>(raw.len() as u32)?;
        let mut encoder = ZlibEncoder::new(&mut out, Compression::default());
        encoder.write_all(raw)?;
        encoder.finish()?;
        Ok(out)
    }

    fn decompress(&self, payload: &[u8]) -> Result<Vec<u8>> {
        if payload.len() < 4 {
            return Err(ContainerError::Truncated(
                "compressed pixel payload shorter than its length prefix".into(),
            ));
        }
        let expected = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]) as usize;
        let mut out = Vec::with_capacity(expected);
        ZlibDecoder::new(&payload[4..])
            .read_to_end(&mut out)
            .map_err(|e| {
                ContainerError::Structural(format!("Pixel payload failed to decompress: {e}"))
            })?;
        if out.len() != expected {
            return Err(ContainerError::Structural(format!(
                "Pixel payload decompressed to {} bytes, {} declared",
                out.len(),
                expected
            )));
        }
        Ok(out)
    }
}
