use async_trait::async_trait;

use crate::error::Result;
use crate::fields::ExtractedFields;
use crate::image::ActiveImage;
use crate::wire::{ExtractionResponse, SubmissionResponse};

/// The external extraction/submission service.
///
/// The UI only depends on this trait; the HTTP implementation lives in
/// `cardcheck-client`.
#[async_trait]
pub trait CardService: Send + Sync {
    /// Upload an image and return the raw detections.
    async fn extract(&self, image: &ActiveImage) -> Result<ExtractionResponse>;

    /// Send corrected field values.
    async fn submit(&self, fields: &ExtractedFields) -> Result<SubmissionResponse>;
}
