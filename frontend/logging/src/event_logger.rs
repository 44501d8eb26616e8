//! Verifier Event Logger
//!
//! Structured events (navigation, extraction, submission, failures) written
//! through `tracing` so they land in the NDJSON log.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VerifierEvent {
    Navigated {
        from: String,
        to: String,
    },
    ImageSelected {
        source: String,
        mime_type: String,
        payload_len: usize,
    },
    ExtractionCompleted {
        detections: usize,
        applied: usize,
        summary: String,
    },
    SubmissionCompleted {
        message: String,
    },
    Failure {
        stage: String,
        error_msg: String,
    },
}

impl VerifierEvent {
    pub fn failure(stage: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self::Failure {
            stage: stage.into(),
            error_msg: error.to_string(),
        }
    }

    fn redact(&mut self) {
        match self {
            VerifierEvent::ExtractionCompleted { summary, .. } => {
                *summary = redact_sensitive_data(summary);
            }
            VerifierEvent::SubmissionCompleted { message } => {
                *message = redact_sensitive_data(message);
            }
            VerifierEvent::Failure { error_msg, .. } => {
                *error_msg = redact_sensitive_data(error_msg);
            }
            VerifierEvent::Navigated { .. } | VerifierEvent::ImageSelected { .. } => {}
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub timestamp: DateTime<Utc>,
    pub event: VerifierEvent,
}

impl EventLogEntry {
    pub fn new(mut event: VerifierEvent) -> Self {
        event.redact();
        Self {
            timestamp: Utc::now(),
            event,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

pub struct EventLogger;

impl EventLogger {
    /// Redacts and emits a verifier event.
    pub fn log_event(event: VerifierEvent) -> EventLogEntry {
        let entry = EventLogEntry::new(event);
        let json = entry.to_json();
        match entry.event {
            VerifierEvent::Failure { .. } => warn!(target: "verifier_events", event = %json, "Verifier failure"),
            _ => info!(target: "verifier_events", event = %json, "Verifier event"),
        }
        entry
    }
}
