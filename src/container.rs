//! Binary image container codec: table-of-contents layout, section
//! framing, versioning, and the pixel, metadata and pose codecs.

pub mod compress;
pub mod error;
pub mod format;
pub mod frame;
pub mod metadata;
pub mod pixel;
pub mod pose;
mod reader;
mod writer;

#[cfg(test)]
mod tests;

pub use compress::{PayloadCompressor, ZlibCompressor};
pub use error::{ContainerError, Result};
pub use format::{FormatVersion, PixelEndianness, PixelFormat};
pub use frame::SensorFrame;
pub use metadata::Metadata;
pub use pixel::{PixelBuffer, PixelInfo};
pub use pose::PoseEvent;
pub use reader::{decode, decode_with};
pub use writer::{SaveOptions, SaveOptionsBuilder, encode, encode_with};
