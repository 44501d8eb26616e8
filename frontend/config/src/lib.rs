//! `cardcheck-config`: configuration management for the cardcheck client.
//!
//! Provides:
//! - Typed config schema (service endpoints, camera, capture, logging)
//! - YAML read/write with atomic backup rotation
//! - `${ENV_VAR}` substitution and `CARDCHECK_*` overrides
//! - Default value application
//! - Schema validation

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{apply_env_overrides, resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_config, load_raw_config, write_config};
pub use schema::{CameraConfig, CameraSourceKind, CaptureConfig, CardcheckConfig, LoggingConfig, ServiceConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use std::path::Path;

/// Load, apply env substitution, overrides and defaults, then validate.
///
/// This is the main entry point for loading a config at runtime.
pub async fn load_and_prepare(path: &Path) -> Result<CardcheckConfig> {
    let raw = load_raw_config(path).await?;

    let value = resolve_env_vars(&raw).context("Failed to resolve env vars in config")?;

    let config: CardcheckConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let config = apply_env_overrides(config);
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let config = apply_all_defaults(config, base_dir);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    if let Some(first) = report.errors.first() {
        for error in &report.errors {
            tracing::error!(path = %error.path, message = %error.message, "Config error");
        }
        bail!("{} config error(s), first: {}", report.errors.len(), first);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn prepares_config_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());
        tokio::fs::write(&path, "capture:\n  outputWidth: 320\n").await.unwrap();

        let config = load_and_prepare(&path).await.unwrap();
        assert_eq!(config.capture.output_width, 320);
        assert_eq!(config.logging.dir, Some(dir.path().join("logs")));
    }

    #[tokio::test]
    async fn invalid_config_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());
        tokio::fs::write(&path, "camera:\n  width: 0\n").await.unwrap();

        let err = load_and_prepare(&path).await.unwrap_err();
        assert!(err.to_string().contains("camera"));
    }
}
