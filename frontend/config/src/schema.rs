//! cardcheck configuration schema.
//!
//! Typed for serde YAML/JSON deserialization. Every section has defaults so an
//! empty or missing file yields a working client pointed at a local service.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::defaults::{
    DEFAULT_CAMERA_HEIGHT, DEFAULT_CAMERA_WIDTH, DEFAULT_CAPTURE_HEIGHT, DEFAULT_CAPTURE_WIDTH,
    DEFAULT_EXTRACT_PATH, DEFAULT_HEALTH_PATH, DEFAULT_LOG_LEVEL, DEFAULT_SERVICE_URL,
    DEFAULT_SUBMIT_PATH,
};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardcheckConfig {
    /// Extraction/submission service endpoints
    #[serde(default)]
    pub service: ServiceConfig,

    /// Video source used by live capture
    #[serde(default)]
    pub camera: CameraConfig,

    /// Still image produced by live capture
    #[serde(default)]
    pub capture: CaptureConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceConfig {
    pub base_url: String,
    pub extract_path: String,
    pub submit_path: String,
    pub health_path: String,
    /// Per-request timeout. Unset means requests may wait indefinitely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVICE_URL.to_string(),
            extract_path: DEFAULT_EXTRACT_PATH.to_string(),
            submit_path: DEFAULT_SUBMIT_PATH.to_string(),
            health_path: DEFAULT_HEALTH_PATH.to_string(),
            timeout_secs: None,
        }
    }
}

impl ServiceConfig {
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    pub fn extract_url(&self) -> String {
        self.endpoint(&self.extract_path)
    }

    pub fn submit_url(&self) -> String {
        self.endpoint(&self.submit_path)
    }

    pub fn health_url(&self) -> String {
        self.endpoint(&self.health_path)
    }
}

// ---------------------------------------------------------------------------
// Camera / capture
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraSourceKind {
    /// A local camera device.
    #[default]
    Native,
    /// A still image file replayed as a video feed.
    File,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CameraConfig {
    pub source: CameraSourceKind,
    pub device_index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub still_path: Option<PathBuf>,
    /// Requested stream resolution.
    pub width: u32,
    pub height: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            source: CameraSourceKind::Native,
            device_index: 0,
            still_path: None,
            width: DEFAULT_CAMERA_WIDTH,
            height: DEFAULT_CAMERA_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaptureConfig {
    pub output_width: u32,
    pub output_height: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            output_width: DEFAULT_CAPTURE_WIDTH,
            output_height: DEFAULT_CAPTURE_HEIGHT,
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for rolling log files. Filled from the config dir when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            dir: None,
        }
    }
}
