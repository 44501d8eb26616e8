//! Config validation: schema checks with user-friendly error messages.

use crate::schema::{CameraSourceKind, CardcheckConfig};
use thiserror::Error;
use url::Url;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &CardcheckConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_service(config, &mut report);
    validate_camera(config, &mut report);
    validate_capture(config, &mut report);
    report
}

fn validate_service(config: &CardcheckConfig, report: &mut ValidationReport) {
    let service = &config.service;
    match Url::parse(&service.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => report.error(
            "service.baseUrl",
            format!("Unsupported scheme '{}'; expected http or https", url.scheme()),
        ),
        Err(e) => report.error("service.baseUrl", format!("Invalid URL: {e}")),
    }
    for (path, value) in [
        ("service.extractPath", &service.extract_path),
        ("service.submitPath", &service.submit_path),
        ("service.healthPath", &service.health_path),
    ] {
        if !value.starts_with('/') {
            report.error(path, "Endpoint path must start with '/'");
        }
    }
    if service.timeout_secs == Some(0) {
        report.error("service.timeoutSecs", "Timeout must be greater than zero");
    }
}

fn validate_camera(config: &CardcheckConfig, report: &mut ValidationReport) {
    let camera = &config.camera;
    if camera.width == 0 || camera.height == 0 {
        report.error("camera", "Requested resolution must be non-zero");
    }
    match (camera.source, &camera.still_path) {
        (CameraSourceKind::File, None) => {
            report.error("camera.stillPath", "File camera source requires stillPath");
        }
        (CameraSourceKind::File, Some(path)) if !path.exists() => {
            report.warn("camera.stillPath", format!("{} does not exist", path.display()));
        }
        (CameraSourceKind::Native, Some(_)) => {
            report.warn("camera.stillPath", "Ignored for the native camera source");
        }
        _ => {}
    }
}

fn validate_capture(config: &CardcheckConfig, report: &mut ValidationReport) {
    let capture = &config.capture;
    if capture.output_width == 0 || capture.output_height == 0 {
        report.error("capture", "Output size must be non-zero");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn default_config_is_valid() {
        let report = validate(&CardcheckConfig::default());
        assert!(report.is_valid(), "errors: {:?}", report.errors);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn rejects_bad_base_url() {
        let mut cfg = CardcheckConfig::default();
        cfg.service.base_url = "ftp://ocr.local".to_string();
        let report = validate(&cfg);
        assert!(!report.is_valid());
        assert_eq!(report.errors[0].path, "service.baseUrl");

        cfg.service.base_url = "not a url".to_string();
        assert!(!validate(&cfg).is_valid());
    }

    #[test]
    fn file_source_needs_still_path() {
        let mut cfg = CardcheckConfig::default();
        cfg.camera.source = CameraSourceKind::File;
        let report = validate(&cfg);
        assert!(report.errors.iter().any(|e| e.path == "camera.stillPath"));

        cfg.camera.still_path = Some(PathBuf::from("/definitely/missing/card.png"));
        let report = validate(&cfg);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn zero_sizes_are_errors() {
        let mut cfg = CardcheckConfig::default();
        cfg.capture.output_height = 0;
        cfg.service.extract_path = "extract-text".to_string();
        let report = validate(&cfg);
        assert_eq!(report.errors.len(), 2);
    }
}
