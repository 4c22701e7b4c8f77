use thiserror::Error;

use crate::correction::CorrectionError;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to correct image: {0}")]
    Correction(#[from] CorrectionError),

    #[error("Failed to encode output image: {0}")]
    Encode(String),

    #[error("Failed to write output file: {0}")]
    FileWrite(String),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;
