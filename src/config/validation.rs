//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Route prefixes are absolute paths
//! - Static headers are legal HTTP header names and values
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Target URLs are not checked here: an unusable target disables its
//!   service at route build time instead of failing startup

use axum::http::{HeaderName, HeaderValue};

use crate::config::schema::GatewayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("service `{service}`: path must not be empty")]
    EmptyPath { service: String },

    #[error("service `{service}`: path `{path}` must start with '/'")]
    RelativePath { service: String, path: String },

    #[error("service `{service}`: invalid header name `{name}`")]
    InvalidHeaderName { service: String, name: String },

    #[error("service `{service}`: invalid value for header `{name}`")]
    InvalidHeaderValue { service: String, name: String },

    #[error("shutdown_grace_secs must be greater than zero")]
    ZeroGracePeriod,
}

/// Check the configuration, collecting every error found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for service in &config.services {
        if service.path.is_empty() {
            errors.push(ValidationError::EmptyPath {
                service: service.name.clone(),
            });
        } else if !service.path.starts_with('/') {
            errors.push(ValidationError::RelativePath {
                service: service.name.clone(),
                path: service.path.clone(),
            });
        }

        for (name, value) in &service.headers {
            if HeaderName::from_bytes(name.as_bytes()).is_err() {
                errors.push(ValidationError::InvalidHeaderName {
                    service: service.name.clone(),
                    name: name.clone(),
                });
            } else if HeaderValue::from_str(value).is_err() {
                errors.push(ValidationError::InvalidHeaderValue {
                    service: service.name.clone(),
                    name: name.clone(),
                });
            }
        }
    }

    if config.shutdown_grace_secs == 0 {
        errors.push(ValidationError::ZeroGracePeriod);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
