use crate::error::{AppError, Result};
use std::time::Duration;

/// Validates a Kubernetes resource name
pub fn validate_resource_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(AppError::Validation("Resource name cannot be empty".to_string()));
    }

    if name.len() > 253 {
        return Err(AppError::Validation("Resource name cannot exceed 253 characters".to_string()));
    }

    // Kubernetes name validation: lowercase alphanumeric and dashes, cannot start/end with dash
    let is_valid = name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !name.starts_with('-')
        && !name.ends_with('-');

    if !is_valid {
        return Err(AppError::Validation(format!(
            "'{}' must be lowercase alphanumeric characters or '-', \
             and cannot start or end with '-'",
            name
        )));
    }

    Ok(())
}

/// Validates a Kubernetes namespace name
pub fn validate_namespace(namespace: &str) -> Result<()> {
    if namespace.len() > 63 {
        return Err(AppError::Validation(format!(
            "Namespace '{}' cannot exceed 63 characters",
            namespace
        )));
    }

    validate_resource_name(namespace)
}

/// Validates a label key: optional DNS prefix, then a name of at most 63 characters.
pub fn validate_label_key(key: &str) -> Result<()> {
    let name = match key.split_once('/') {
        Some((prefix, name)) => {
            if prefix.is_empty() || prefix.len() > 253 {
                return Err(AppError::Validation(format!("Invalid label key prefix in '{}'", key)));
            }
            name
        }
        None => key,
    };

    let is_valid = !name.is_empty()
        && name.len() <= 63
        && name.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && name.starts_with(|c: char| c.is_ascii_alphanumeric())
        && name.ends_with(|c: char| c.is_ascii_alphanumeric());

    if !is_valid {
        return Err(AppError::Validation(format!("Invalid label key '{}'", key)));
    }

    Ok(())
}

/// Parses a human readable duration such as `90m`, `24h` or `7d`.
pub fn parse_age(raw: &str) -> Result<Duration> {
    humantime::parse_duration(raw.trim())
        .map_err(|e| AppError::Validation(format!("Invalid duration '{}': {}", raw, e)))
}
