//! Environment variable substitution and overrides for config values.
//!
//! String values may reference `${NAME}` (uppercase names only); references
//! are resolved when the file is loaded and `$${NAME}` keeps the literal text.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;

use crate::schema::CardcheckConfig;

/// Matches `${VAR}` with an optional leading `$` marking an escape.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\$?)\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// Overrides the service base URL.
pub const SERVICE_URL_ENV: &str = "CARDCHECK_SERVICE_URL";
/// Overrides the log level.
pub const LOG_LEVEL_ENV: &str = "CARDCHECK_LOG";

/// A `${VAR}` reference with no (or an empty) value in the environment.
#[derive(Debug, thiserror::Error)]
#[error("environment variable {var_name} is not set (referenced by {config_path})")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references in every string of a config value tree.
pub fn resolve_env_vars(value: &Value) -> Result<Value> {
    resolve_env_vars_with(value, &std::env::vars().collect())
}

/// Like `resolve_env_vars`, reading variables from `env`.
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    let mut walker = Substitution { env, path: Vec::new() };
    Ok(walker.value(value)?)
}

/// Tree walk that tracks the dotted path of the current node for error messages.
struct Substitution<'a> {
    env: &'a HashMap<String, String>,
    path: Vec<String>,
}

impl Substitution<'_> {
    fn value(&mut self, value: &Value) -> std::result::Result<Value, MissingEnvVarError> {
        Ok(match value {
            Value::String(s) => Value::String(self.string(s)?),
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    self.path.push(format!("[{i}]"));
                    let resolved = self.value(item);
                    self.path.pop();
                    out.push(resolved?);
                }
                Value::Array(out)
            }
            Value::Object(map) => {
                let mut out = serde_json::Map::with_capacity(map.len());
                for (key, item) in map {
                    self.path.push(key.clone());
                    let resolved = self.value(item);
                    self.path.pop();
                    out.insert(key.clone(), resolved?);
                }
                Value::Object(out)
            }
            other => other.clone(),
        })
    }

    fn dotted_path(&self) -> String {
        let mut out = String::new();
        for segment in &self.path {
            if !out.is_empty() && !segment.starts_with('[') {
                out.push('.');
            }
            out.push_str(segment);
        }
        out
    }

    fn string(&self, s: &str) -> std::result::Result<String, MissingEnvVarError> {
        if !s.contains("${") {
            return Ok(s.to_string());
        }
        let mut missing = None;
        let replaced = ENV_VAR_PATTERN.replace_all(s, |caps: &regex::Captures| {
            let name = &caps[2];
            if !caps[1].is_empty() {
                return format!("${{{name}}}");
            }
            match self.env.get(name).filter(|v| !v.is_empty()) {
                Some(v) => v.clone(),
                None => {
                    missing.get_or_insert_with(|| name.to_string());
                    String::new()
                }
            }
        });
        match missing {
            Some(var_name) => Err(MissingEnvVarError {
                var_name,
                config_path: self.dotted_path(),
            }),
            None => Ok(replaced.into_owned()),
        }
    }
}

/// Apply `CARDCHECK_*` overrides from the process environment.
pub fn apply_env_overrides(config: CardcheckConfig) -> CardcheckConfig {
    apply_env_overrides_with(config, &std::env::vars().collect())
}

pub fn apply_env_overrides_with(
    mut config: CardcheckConfig,
    env: &HashMap<String, String>,
) -> CardcheckConfig {
    if let Some(url) = env.get(SERVICE_URL_ENV).filter(|v| !v.is_empty()) {
        config.service.base_url = url.clone();
    }
    if let Some(level) = env.get(LOG_LEVEL_ENV).filter(|v| !v.is_empty()) {
        config.logging.level = level.clone();
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn substitutes_nested_var() {
        let v = json!({"service": {"baseUrl": "http://${OCR_HOST}:5000"}});
        let result = resolve_env_vars_with(&v, &env(&[("OCR_HOST", "10.0.0.7")])).unwrap();
        assert_eq!(result["service"]["baseUrl"], "http://10.0.0.7:5000");
    }

    #[test]
    fn missing_var_names_config_path() {
        let v = json!({"service": {"baseUrl": "${MISSING_VAR}"}});
        let err = resolve_env_vars_with(&v, &HashMap::new()).unwrap_err();
        assert!(err.to_string().contains("MISSING_VAR"));
        assert!(err.to_string().contains("service.baseUrl"));
    }

    #[test]
    fn escaped_reference_is_literal() {
        let v = json!({"note": "keep $${HOME} as is"});
        let result = resolve_env_vars_with(&v, &HashMap::new()).unwrap();
        assert_eq!(result["note"], "keep ${HOME} as is");
    }

    #[test]
    fn array_items_report_indexed_path() {
        let v = json!({"extra": ["ok", "${NOPE}"]});
        let err = resolve_env_vars_with(&v, &HashMap::new()).unwrap_err();
        assert!(err.to_string().contains("extra[1]"));
    }

    #[test]
    fn overrides_service_url_and_level() {
        let config = apply_env_overrides_with(
            CardcheckConfig::default(),
            &env(&[(SERVICE_URL_ENV, "http://ocr:9000"), (LOG_LEVEL_ENV, "debug")]),
        );
        assert_eq!(config.service.base_url, "http://ocr:9000");
        assert_eq!(config.logging.level, "debug");
    }
}
