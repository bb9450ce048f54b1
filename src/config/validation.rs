//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, retry ratio within bounds)
//! - Check that addresses and provider base URLs parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: HubConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::{HubConfig, PLACEHOLDER_ADMIN_KEY};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field}: {reason}")]
    OutOfRange { field: &'static str, reason: String },

    #[error("{field}: invalid base URL '{value}'")]
    InvalidUrl { field: &'static str, value: String },

    #[error("admin.api_key must be changed when the admin surface is enabled")]
    PlaceholderAdminKey,
}

pub fn validate_config(config: &HubConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_addr(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_addr(&mut errors, "observability.metrics_address", &config.observability.metrics_address);
    }
    if config.admin.enabled {
        check_addr(&mut errors, "admin.bind_address", &config.admin.bind_address);
        if config.admin.api_key == PLACEHOLDER_ADMIN_KEY || config.admin.api_key.trim().is_empty() {
            errors.push(ValidationError::PlaceholderAdminKey);
        }
    }

    for (field, value) in [
        ("timeouts.connect_secs", config.timeouts.connect_secs),
        ("timeouts.request_secs", config.timeouts.request_secs),
        ("timeouts.upstream_secs", config.timeouts.upstream_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::Zero { field });
        }
    }

    if config.retries.enabled && config.retries.max_attempts == 0 {
        errors.push(ValidationError::Zero { field: "retries.max_attempts" });
    }
    if !(0.0..=1.0).contains(&config.retries.budget_ratio) {
        errors.push(ValidationError::OutOfRange {
            field: "retries.budget_ratio",
            reason: format!("{} is not within 0.0..=1.0", config.retries.budget_ratio),
        });
    }

    if config.rate_limit.enabled && config.rate_limit.requests_per_second == 0 {
        errors.push(ValidationError::Zero { field: "rate_limit.requests_per_second" });
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::Zero { field: "security.max_body_size" });
    }
    if config.security.allowed_image_hosts.is_empty() {
        errors.push(ValidationError::OutOfRange {
            field: "security.allowed_image_hosts",
            reason: "at least one host is required".to_string(),
        });
    }

    let providers = &config.providers;
    for (field, base_url) in [
        ("providers.unsplash.base_url", &providers.unsplash.base_url),
        ("providers.pexels.base_url", &providers.pexels.base_url),
        ("providers.pixabay.base_url", &providers.pixabay.base_url),
        ("providers.openverse.base_url", &providers.openverse.base_url),
        ("providers.iconfinder.base_url", &providers.iconfinder.base_url),
        ("providers.freepik.base_url", &providers.freepik.base_url),
        ("providers.tmdb.base_url", &providers.tmdb.base_url),
        ("rapidapi.youtube.base_url", &config.rapidapi.youtube.base_url),
        ("rapidapi.instagram.base_url", &config.rapidapi.instagram.base_url),
        ("rapidapi.tiktok.base_url", &config.rapidapi.tiktok.base_url),
    ] {
        check_url(&mut errors, field, base_url);
    }
    if let Some(vidu) = &config.rapidapi.vidu {
        check_url(&mut errors, "rapidapi.vidu.base_url", &vidu.base_url);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_addr(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    let valid = Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false);
    if !valid {
        errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        });
    }
}
