use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::sync::Arc;

use crate::error::DataUrlError;

/// A `data:<mime>;base64,<payload>` representation of binary image bytes
///
/// The payload is shared behind an `Arc` so handing a data URL to a
/// background task does not copy the (potentially large) text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    mime: String,
    payload: Arc<str>,
}

impl DataUrl {
    /// Base64-encode `bytes` under the given MIME type
    pub fn encode(mime: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime: mime.into(),
            payload: BASE64.encode(bytes).into(),
        }
    }

    #[cfg(test)]
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// The base64 text after the comma
    #[cfg(test)]
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Decode the payload back into raw bytes
    pub fn decode(&self) -> Result<Vec<u8>, DataUrlError> {
        BASE64
            .decode(self.payload.as_bytes())
            .map_err(|e| DataUrlError::Base64(e.to_string()))
    }

    /// Estimated decoded size: `ceil(payload_len * 3 / 4)`
    ///
    /// Padding is not subtracted, so this can overshoot by up to two bytes.
    pub fn estimated_byte_size(&self) -> u64 {
        let len = self.payload.len() as u64;
        (len * 3).div_ceil(4)
    }
}
