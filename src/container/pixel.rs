//! Stored pixel payload and its conversion to a canonical 16-bit buffer.

use tracing::error;

use crate::container::format::{PixelEndianness, PixelFormat};

/// Geometry and layout of a stored pixel payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PixelInfo {
    /// Byte size of the uncompressed payload.
    pub size: u32,
    pub width: u32,
    pub height: u32,
    /// Row stride, in pixels.
    pub pitch: u32,
    pub format: PixelFormat,
    pub compressed: bool,
    pub endianness: PixelEndianness,
}

/// Raw sensor bytes as stored in the container, together with their
/// layout. The buffer may be packed and of either endianness; use
/// [`PixelBuffer::canonical`] for a normalized view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<u8>,
    info: PixelInfo,
}

impl PixelBuffer {
    /// Takes ownership of an existing payload buffer.
    pub fn new(data: Vec<u8>, info: PixelInfo) -> PixelBuffer {
        PixelBuffer { data, info }
    }

    /// Copies the payload out of a borrowed slice.
    pub fn from_slice(data: &[u8], info: PixelInfo) -> PixelBuffer {
        PixelBuffer {
            data: data.to_vec(),
            info,
        }
    }

    pub fn empty() -> PixelBuffer {
        PixelBuffer::default()
    }

    /// The payload as stored: possibly packed, in its stored byte order.
    pub fn raw_data(&self) -> &[u8] {
        &self.data
    }

    pub fn info(&self) -> &PixelInfo {
        &self.info
    }

    pub fn width(&self) -> u32 {
        self.info.width
    }

    pub fn height(&self) -> u32 {
        self.info.height
    }

    /// Row stride in pixels.
    pub fn pitch(&self) -> u32 {
        self.info.pitch
    }

    pub fn byte_size(&self) -> usize {
        self.data.len()
    }

    pub fn format(&self) -> PixelFormat {
        self.info.format
    }

    pub fn endianness(&self) -> PixelEndianness {
        self.info.endianness
    }

    pub fn is_valid(&self) -> bool {
        !self.data.is_empty() && self.info.format != PixelFormat::Invalid
    }

    pub fn is_mono(&self) -> bool {
        self.info.format.is_mono()
    }

    pub fn is_color(&self) -> bool {
        self.info.format.is_color()
    }

    pub fn bit_depth(&self) -> u32 {
        self.info.format.bit_depth()
    }

    /// Converts the stored payload into a tightly packed width × height
    /// buffer of little-endian 16-bit samples. 12-bit data is unpacked
    /// and shifted left by 4 so every sample spans the full 16-bit range.
    ///
    /// An invalid format, undefined endianness or undersized payload
    /// yields an empty buffer and an error log; the conversion has
    /// failed but the stored data is left untouched.
    pub fn canonical(&self) -> Vec<u16> {
        if self.data.is_empty() {
            return Vec::new();
        }
        if self.info.format == PixelFormat::Invalid {
            error!("Unknown pixel format, cannot build canonical 16-bit buffer");
            return Vec::new();
        }
        if self.info.endianness == PixelEndianness::Undefined {
            error!("Unknown pixel endianness, cannot build canonical 16-bit buffer");
            return Vec::new();
        }
        if self.info.format.is_packed() {
            self.unpack_12bit()
        } else {
            self.destride_16bit()
        }
    }

    /// Unpacks 12-bit data: every 3 payload bytes hold 2 samples. Packed
    /// rows are stored back to back, so the pitch is not consulted here.
    fn unpack_12bit(&self) -> Vec<u16> {
        let pairs = (self.info.width as usize * self.info.height as usize) / 2;
        let needed = pairs * 3;
        if self.data.len() < needed {
            error!(
                "Packed pixel payload holds {} bytes, {} needed",
                self.data.len(),
                needed
            );
            return Vec::new();
        }
        let big = self.info.endianness == PixelEndianness::Big;
        let mut out = Vec::with_capacity(pairs * 2);
        for triple in self.data[..needed].chunks_exact(3) {
            let (first, second) = if big {
                unpack_pair_big(triple)
            } else {
                unpack_pair_little(triple)
            };
            out.push(first);
            out.push(second);
        }
        out
    }

    /// Copies 16-bit samples row by row at the pitch stride, swapping
    /// bytes when the stored order is big-endian.
    fn destride_16bit(&self) -> Vec<u16> {
        let width = self.info.width as usize;
        let height = self.info.height as usize;
        let pitch = (self.info.pitch as usize).max(width);
        let stride = pitch * 2;
        let needed = if height == 0 {
            0
        } else {
            (height - 1) * stride + width * 2
        };
        if self.data.len() < needed {
            error!(
                "Pixel payload holds {} bytes, {} needed for {}x{} at pitch {}",
                self.data.len(),
                needed,
                width,
                height,
                pitch
            );
            return Vec::new();
        }
        let swap = self.info.endianness == PixelEndianness::Big;
        let mut out = Vec::with_capacity(width * height);
        for y in 0..height {
            let row = &self.data[y * stride..y * stride + width * 2];
            for sample in row.chunks_exact(2) {
                let value = if swap {
                    u16::from_be_bytes([sample[0], sample[1]])
                } else {
                    u16::from_le_bytes([sample[0], sample[1]])
                };
                out.push(value);
            }
        }
        out
    }
}

/// Two 12-bit samples packed little-endian into three bytes. Both results
/// end up with the sample in the high 12 bits of the word: the first is
/// shifted up by 4, the second lands there by construction.
fn unpack_pair_little(triple: &[u8]) -> (u16, u16) {
    let first = (u16::from(triple[0]) | (u16::from(triple[1] & 0x0F) << 8)) << 4;
    let second = u16::from(triple[1] & 0xF0) | (u16::from(triple[2]) << 8);
    (first, second)
}

/// Big-endian variant: the first sample's high byte comes from byte 0.
fn unpack_pair_big(triple: &[u8]) -> (u16, u16) {
    let first = (u16::from(triple[1] & 0x0F) << 4) | (u16::from(triple[0]) << 8);
    let second = u16::from(triple[1] & 0xF0) | (u16::from(triple[2]) << 8);
    (first, second)
}
