use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("Failed to read container file: {0}")]
    FileRead(String),

    #[error("Failed to write container file: {0}")]
    FileWrite(String),

    #[error("Structural error: {0}")]
    Structural(String),

    #[error("Truncated data: {0}")]
    Truncated(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ContainerError>;
