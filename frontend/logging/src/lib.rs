//! Structured logging for cardcheck.
//!
//! Handles log redaction of card data, JSON file output with rotation, and
//! verifier event logging.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{EventLogEntry, EventLogger, VerifierEvent};
pub use logger::{LogGuard, init_logger};
pub use redact::redact_sensitive_data;
