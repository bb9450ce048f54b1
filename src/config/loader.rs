//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{HubConfig, RapidApiService};
use crate::config::validation::{validate_config, ValidationError};

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

/// Load and validate configuration from a TOML file, then apply the environment overlay.
///
/// A missing file is not an error: defaults plus environment are used instead.
pub fn load_config(path: &Path) -> Result<HubConfig, ConfigError> {
    let mut config = if path.exists() {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)?
    } else {
        tracing::warn!(path = ?path, "Config file not found, using defaults");
        HubConfig::default()
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    finalize(config)
}

fn finalize(mut config: HubConfig) -> Result<HubConfig, ConfigError> {
    config.providers.resolve_base_urls();
    config.rapidapi.resolve_base_urls();
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Overlay secrets and hosts from environment variables.
///
/// `lookup` abstracts `std::env::var` so the overlay can be exercised in tests.
pub fn apply_env_overrides<F>(config: &mut HubConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(bind) = get("MEDIA_HUB_BIND") {
        config.listener.bind_address = bind;
    }
    if let Some(key) = get("MEDIA_HUB_ADMIN_KEY") {
        config.admin.api_key = key;
    }

    let keys = [
        ("UNSPLASH_ACCESS_KEY", &mut config.providers.unsplash.api_key),
        ("PEXELS_API_KEY", &mut config.providers.pexels.api_key),
        ("PIXABAY_API_KEY", &mut config.providers.pixabay.api_key),
        ("ICONFINDER_API_KEY", &mut config.providers.iconfinder.api_key),
        ("FREEPIK_API_KEY", &mut config.providers.freepik.api_key),
        ("TMDB_API_KEY", &mut config.providers.tmdb.api_key),
        ("RAPIDAPI_KEY", &mut config.rapidapi.api_key),
    ];
    for (name, slot) in keys {
        if let Some(value) = get(name) {
            *slot = Some(value);
        }
    }

    if let Some(host) = get("RAPIDAPI_HOST") {
        config.rapidapi.youtube = RapidApiService::for_host(&host);
    }
    if let Some(host) = get("INSTAGRAM_RAPIDAPI_HOST") {
        config.rapidapi.instagram = RapidApiService::for_host(&host);
    }
    if let Some(host) = get("VIDU_RAPIDAPI_HOST") {
        config.rapidapi.vidu = Some(RapidApiService::for_host(&host));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn env_overlay_sets_keys_and_hosts() {
        let env: HashMap<&str, &str> = [
            ("PEXELS_API_KEY", "pexels-key"),
            ("RAPIDAPI_KEY", "rapid"),
            ("RAPIDAPI_HOST", "yt.example.com"),
            ("VIDU_RAPIDAPI_HOST", "vidu.example.com"),
            ("TMDB_API_KEY", "  "),
        ]
        .into_iter()
        .collect();

        let mut config = HubConfig::default();
        apply_env_overrides(&mut config, |name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.providers.pexels.key(), Some("pexels-key"));
        assert_eq!(config.rapidapi.key(), Some("rapid"));
        assert_eq!(config.rapidapi.youtube.base_url, "https://yt.example.com");
        assert_eq!(config.rapidapi.youtube.host, "yt.example.com");
        assert_eq!(config.rapidapi.vidu.as_ref().map(|v| v.host.as_str()), Some("vidu.example.com"));
        assert!(config.providers.tmdb.key().is_none());
    }

    #[test]
    fn load_from_file_trims_trailing_slash() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [providers.openverse]
            base_url = "http://127.0.0.1:4000/"
            "#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.providers.openverse.base_url, "http://127.0.0.1:4000");
    }

    fn file_with(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parse_error_is_reported() {
        let file = file_with("listener = 5");
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("Parse error"));
    }

    #[test]
    fn validation_errors_are_joined() {
        let file = file_with(
            r#"
            [timeouts]
            upstream_secs = 0

            [retries]
            budget_ratio = 2.0
            "#,
        );
        let err = load_config(file.path()).unwrap_err();

        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }
}
