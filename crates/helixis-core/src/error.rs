use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HelixisError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Invalid mode. Use 'encrypt' or 'decrypt'.")]
    InvalidMode(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Invalid hashing algorithm specified: {0}")]
    UnknownAlgorithm(String),

    #[error("Unsupported charset: {0}")]
    UnknownCharset(String),

    #[error("Invalid date format. Please use '{0}'.")]
    InvalidDate(String),

    #[error("Invalid UUID version: {0}")]
    InvalidUuidVersion(u8),

    #[error("{0}")]
    InvalidPortRange(String),

    #[error("Decryption failed: {0}")]
    Decrypt(String),

    #[error("Error performing DNS lookup: {0}")]
    Dns(String),

    #[error("{0}")]
    Unsupported(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HelixisError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 3,
            Self::InvalidArgument(_)
            | Self::InvalidMode(_)
            | Self::FileNotFound(_)
            | Self::UnknownAlgorithm(_)
            | Self::UnknownCharset(_)
            | Self::InvalidDate(_)
            | Self::InvalidUuidVersion(_)
            | Self::InvalidPortRange(_)
            | Self::Decrypt(_)
            | Self::Dns(_)
            | Self::Unsupported(_)
            | Self::Io(_)
            | Self::Serialization(_) => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, HelixisError>;
