//! HTTP client for the card extraction service.
//!
//! `POST /extract-text` takes a multipart upload with a single `image` part;
//! `POST /submit` takes the corrected fields as JSON.

use std::time::Duration;

use async_trait::async_trait;
use cardcheck_config::ServiceConfig;
use cardcheck_core::error::Result;
use cardcheck_core::{
    ActiveImage, CardService, ExtractedFields, ExtractionResponse, ServiceErrorBody,
    SubmissionResponse, VerifierError,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, info};

/// Multipart field name the service reads the upload from.
const IMAGE_FIELD: &str = "image";

pub struct HttpCardService {
    client: Client,
    extract_url: String,
    submit_url: String,
    health_url: String,
}

fn transport(e: reqwest::Error) -> VerifierError {
    VerifierError::Transport(e.to_string())
}

impl HttpCardService {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            client: builder.build().map_err(transport)?,
            extract_url: config.extract_url(),
            submit_url: config.submit_url(),
            health_url: config.health_url(),
        })
    }

    /// Liveness probe; returns the service's greeting.
    pub async fn ping(&self) -> Result<String> {
        let resp = self.client.get(&self.health_url).send().await.map_err(transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(transport)?;
        if !status.is_success() {
            return Err(VerifierError::Transport(format!("health check returned {status}")));
        }
        Ok(body)
    }
}

/// Pull the `{ error }` message out of a failed response, falling back to the raw body.
async fn error_message(resp: Response) -> (StatusCode, String) {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ServiceErrorBody>(&body) {
        Ok(parsed) => parsed.error,
        Err(_) if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
        Err(_) => body,
    };
    (status, message)
}

#[async_trait]
impl CardService for HttpCardService {
    async fn extract(&self, image: &ActiveImage) -> Result<ExtractionResponse> {
        let bytes = image.decode()?;
        info!(url = %self.extract_url, mime = image.mime_type(), bytes = bytes.len(), "Uploading image for extraction");

        let part = Part::bytes(bytes)
            .file_name(format!("image.{}", image.extension()))
            .mime_str(image.mime_type())
            .map_err(transport)?;
        let form = Form::new().part(IMAGE_FIELD, part);

        let resp = self
            .client
            .post(&self.extract_url)
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;
        if !resp.status().is_success() {
            let (status, message) = error_message(resp).await;
            return Err(VerifierError::Extraction {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ExtractionResponse = resp.json().await.map_err(transport)?;
        debug!(detections = parsed.detections.len(), "Extraction response received");
        Ok(parsed)
    }

    async fn submit(&self, fields: &ExtractedFields) -> Result<SubmissionResponse> {
        info!(url = %self.submit_url, "Submitting corrected fields");
        let resp = self
            .client
            .post(&self.submit_url)
            .json(fields)
            .send()
            .await
            .map_err(transport)?;
        if !resp.status().is_success() {
            let (status, message) = error_message(resp).await;
            return Err(VerifierError::Submission {
                status: status.as_u16(),
                message,
            });
        }
        resp.json().await.map_err(transport)
    }
}
