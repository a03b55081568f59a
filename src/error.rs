/// Error types for the image compressor
///
/// Every error is `Clone` so it can travel inside an iced `Message`
/// back from a background task.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors decoding a data URL
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataUrlError {
    /// Payload is not valid base64
    #[error("Invalid base64 payload: {0}")]
    Base64(String),
}

/// Errors reading a file into the registry
#[derive(Error, Debug, Clone)]
pub enum IntakeError {
    #[error("Failed to read {}: {message}", path.display())]
    Read { path: PathBuf, message: String },
}

impl IntakeError {
    pub fn read(path: impl Into<PathBuf>, err: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// Errors produced while re-encoding an image
#[derive(Error, Debug, Clone)]
pub enum CompressError {
    #[error(transparent)]
    DataUrl(#[from] DataUrlError),

    /// The original bytes are not a decodable image
    #[error("Decode failed: {0}")]
    Decode(String),

    #[error("Encode failed: {0}")]
    Encode(String),

    /// The blocking worker panicked or was cancelled
    #[error("Task join error: {0}")]
    Join(String),
}

impl CompressError {
    pub fn decode<T: Into<String>>(msg: T) -> Self {
        Self::Decode(msg.into())
    }

    pub fn encode<T: Into<String>>(msg: T) -> Self {
        Self::Encode(msg.into())
    }
}

/// Errors saving compressed output to disk
#[derive(Error, Debug, Clone)]
pub enum DownloadError {
    #[error(transparent)]
    DataUrl(#[from] DataUrlError),

    #[error("IO error: {0}")]
    IO(String),
}

impl From<io::Error> for DownloadError {
    fn from(err: io::Error) -> Self {
        Self::IO(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intake_error_mentions_path() {
        let err = IntakeError::read(
            "/tmp/missing.png",
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        let message = err.to_string();
        assert!(message.contains("/tmp/missing.png"));
        assert!(message.contains("no such file"));
    }

    #[test]
    fn test_data_url_error_is_transparent_in_compress_error() {
        let err: CompressError = DataUrlError::Base64("bad padding".into()).into();
        assert_eq!(err.to_string(), "Invalid base64 payload: bad padding");
    }
}
