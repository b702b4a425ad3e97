//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the upstream identity service base URL.
pub const ENV_UPSTREAM_URL: &str = "ZOWE_ZLUX_URL";

/// Environment variable overriding the listener bind address.
pub const ENV_BIND_ADDRESS: &str = "IDENTITY_HELLO_BIND";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn read_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Resolve the process configuration: defaults, then the optional file,
/// then the process environment.
///
/// Called once at startup; request handling never reads the environment.
pub fn resolve_config(path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    let base = match path {
        Some(path) => read_config(path)?,
        None => ServiceConfig::default(),
    };

    let config = apply_env(base, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment values onto `config`.
///
/// A variable that is set, even to the empty string, wins over the file.
pub fn apply_env<F>(mut config: ServiceConfig, lookup: F) -> ServiceConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_UPSTREAM_URL) {
        config.upstream.base_url = url;
    }
    if let Some(bind) = lookup(ENV_BIND_ADDRESS) {
        config.listener.bind_address = bind;
    }
    config
}

/// Log a warning when a non-empty base URL does not parse.
///
/// The value is still used as-is; lookups against it fail per request.
pub fn warn_on_unparseable_url(base_url: &str) {
    if base_url.is_empty() {
        return;
    }
    if let Err(e) = url::Url::parse(base_url) {
        tracing::warn!(
            base_url = %base_url,
            error = %e,
            "Upstream base URL does not parse; lookups will fail at request time"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_sets_upstream_url() {
        let config = apply_env(
            ServiceConfig::default(),
            env(&[(ENV_UPSTREAM_URL, "https://zlux:8544")]),
        );
        assert_eq!(config.upstream.base_url, "https://zlux:8544");
        assert!(!config.upstream.is_disabled());
    }

    #[test]
    fn test_empty_env_disables_file_url() {
        let mut base = ServiceConfig::default();
        base.upstream.base_url = "https://from-file".into();

        let config = apply_env(base, env(&[(ENV_UPSTREAM_URL, "")]));
        assert!(config.upstream.is_disabled());
    }

    #[test]
    fn test_unset_env_keeps_file_values() {
        let mut base = ServiceConfig::default();
        base.upstream.base_url = "https://from-file".into();
        base.listener.bind_address = "127.0.0.1:9000".into();

        let config = apply_env(base, env(&[]));
        assert_eq!(config.upstream.base_url, "https://from-file");
        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
    }

    #[test]
    fn test_resolve_config_reports_parse_error() {
        let dir = std::env::temp_dir().join(format!("identity-hello-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.toml");
        fs::write(&path, "[upstream\nbase_url = 1").unwrap();

        let err = resolve_config(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_resolve_config_missing_file() {
        let err = resolve_config(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
