use thiserror::Error;

/// Top-level error type for the verifier.
#[derive(Debug, Error)]
pub enum VerifierError {
    #[error("invalid image data URL: {0}")]
    InvalidDataUrl(String),

    #[error("unsupported file type: {0}")]
    UnsupportedMedia(String),

    #[error("camera error: {0}")]
    Camera(String),

    #[error("image encoding failed: {0}")]
    Encoding(String),

    #[error("extraction service error ({status}): {message}")]
    Extraction { status: u16, message: String },

    #[error("submission rejected ({status}): {message}")]
    Submission { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T, E = VerifierError> = std::result::Result<T, E>;
