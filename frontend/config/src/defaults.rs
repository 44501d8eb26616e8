//! Config defaults: applies default values that depend on where the config lives.

use std::path::Path;

use crate::schema::CardcheckConfig;

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:5000";
pub const DEFAULT_EXTRACT_PATH: &str = "/extract-text";
pub const DEFAULT_SUBMIT_PATH: &str = "/submit";
pub const DEFAULT_HEALTH_PATH: &str = "/hello";

/// Resolution requested from the camera.
pub const DEFAULT_CAMERA_WIDTH: u32 = 640;
pub const DEFAULT_CAMERA_HEIGHT: u32 = 480;

/// Size of the still produced by a capture.
pub const DEFAULT_CAPTURE_WIDTH: u32 = 640;
pub const DEFAULT_CAPTURE_HEIGHT: u32 = 480;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: CardcheckConfig, config_dir: &Path) -> CardcheckConfig {
    let config = apply_logging_defaults(config, config_dir);
    apply_camera_defaults(config, config_dir)
}

/// Ensure a log level and log directory are set.
fn apply_logging_defaults(mut config: CardcheckConfig, config_dir: &Path) -> CardcheckConfig {
    if config.logging.level.trim().is_empty() {
        config.logging.level = DEFAULT_LOG_LEVEL.to_string();
    }
    if config.logging.dir.is_none() {
        config.logging.dir = Some(config_dir.join("logs"));
    }
    config
}

/// Resolve a relative still-image path against the config directory.
fn apply_camera_defaults(mut config: CardcheckConfig, config_dir: &Path) -> CardcheckConfig {
    if let Some(path) = &config.camera.still_path {
        if path.is_relative() {
            config.camera.still_path = Some(config_dir.join(path));
        }
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn fills_log_dir_from_config_dir() {
        let config = apply_all_defaults(CardcheckConfig::default(), Path::new("/etc/cardcheck"));
        assert_eq!(config.logging.dir, Some(PathBuf::from("/etc/cardcheck/logs")));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn keeps_absolute_still_path() {
        let mut config = CardcheckConfig::default();
        config.camera.still_path = Some(PathBuf::from("/srv/card.png"));
        let config = apply_all_defaults(config, Path::new("/etc/cardcheck"));
        assert_eq!(config.camera.still_path, Some(PathBuf::from("/srv/card.png")));
    }

    #[test]
    fn resolves_relative_still_path() {
        let mut config = CardcheckConfig::default();
        config.camera.still_path = Some(PathBuf::from("card.png"));
        let config = apply_all_defaults(config, Path::new("/etc/cardcheck"));
        assert_eq!(config.camera.still_path, Some(PathBuf::from("/etc/cardcheck/card.png")));
    }
}
