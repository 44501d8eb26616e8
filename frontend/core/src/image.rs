//! Active image: an encoded still image held as a `data:` URL.
//!
//! Produced by file intake or live capture, consumed by the review screen.

use base64::{engine::general_purpose::STANDARD, Engine};
use std::fmt;

use crate::error::{Result, VerifierError};

const DATA_URL_IMAGE_PREFIX: &str = "data:image/";
const BASE64_MARKER: &str = ";base64,";

/// A still image encoded as `data:image/<subtype>;base64,<payload>`.
#[derive(Clone, PartialEq, Eq)]
pub struct ActiveImage {
    data_url: String,
    /// Byte offset of the base64 payload inside `data_url`.
    payload_start: usize,
}

impl ActiveImage {
    /// Encode raw image bytes with the given MIME type.
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Result<Self> {
        if !mime_type.starts_with("image/") {
            return Err(VerifierError::UnsupportedMedia(mime_type.to_string()));
        }
        let data_url = format!("data:{}{}{}", mime_type, BASE64_MARKER, STANDARD.encode(bytes));
        let payload_start = 5 + mime_type.len() + BASE64_MARKER.len();
        Ok(Self { data_url, payload_start })
    }

    /// Parse an existing data URL string.
    pub fn parse(data_url: impl Into<String>) -> Result<Self> {
        let data_url = data_url.into();
        if !data_url.starts_with(DATA_URL_IMAGE_PREFIX) {
            return Err(VerifierError::InvalidDataUrl("missing data:image/ prefix".into()));
        }
        let marker = data_url
            .find(BASE64_MARKER)
            .ok_or_else(|| VerifierError::InvalidDataUrl("payload is not base64".into()))?;
        let mime = &data_url[5..marker];
        if mime.len() <= "image/".len() || mime.contains(',') {
            return Err(VerifierError::InvalidDataUrl(format!("bad media type '{mime}'")));
        }
        let payload_start = marker + BASE64_MARKER.len();
        STANDARD
            .decode(&data_url[payload_start..])
            .map_err(|e| VerifierError::InvalidDataUrl(e.to_string()))?;
        Ok(Self { data_url, payload_start })
    }

    pub fn as_str(&self) -> &str {
        &self.data_url
    }

    /// MIME type, e.g. `image/png`.
    pub fn mime_type(&self) -> &str {
        &self.data_url[5..self.payload_start - BASE64_MARKER.len()]
    }

    /// File extension matching the MIME subtype.
    pub fn extension(&self) -> &str {
        match self.mime_type() {
            "image/jpeg" => "jpg",
            "image/svg+xml" => "svg",
            other => other.trim_start_matches("image/"),
        }
    }

    /// Decode the payload back into raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(&self.data_url[self.payload_start..])
            .map_err(|e| VerifierError::InvalidDataUrl(e.to_string()))
    }

    /// Length of the base64 payload in characters.
    pub fn payload_len(&self) -> usize {
        self.data_url.len() - self.payload_start
    }
}

// Data URLs can be megabytes long; keep Debug output readable.
impl fmt::Debug for ActiveImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveImage")
            .field("mime_type", &self.mime_type())
            .field("payload_len", &self.payload_len())
            .finish()
    }
}
