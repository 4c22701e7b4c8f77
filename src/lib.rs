//! Container codec and correction pipeline for airborne-camera sensor
//! imagery.
//!
//! A container file bundles the raw sensor payload with camera identity
//! metadata, optional geodetic pose telemetry and an optional embedded
//! JPEG preview. The [`correction`] module turns the decoded payload
//! into a viewable image: devignetting, tone stretch, white balance,
//! demosaic and lens undistortion, in that order.

pub mod container;
pub mod correction;
pub mod export;
pub mod logger;

pub use container::{
    ContainerError, FormatVersion, Metadata, PixelBuffer, PixelEndianness, PixelFormat, PixelInfo,
    PoseEvent, SaveOptions, SensorFrame, decode, encode,
};
pub use correction::{CorrectedImage, CorrectionError, CorrectionOptions, Samples, correct};
pub use export::{ExportError, RasterWriter, TiffRasterWriter};
