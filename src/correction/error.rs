use thiserror::Error;

#[derive(Error, Debug)]
pub enum CorrectionError {
    #[error("Failed to demosaic image: {0}")]
    Demosaic(String),
}

pub type Result<T> = std::result::Result<T, CorrectionError>;
