//! Field checks used by the config layer. Every failure is an
//! `InvalidConfigValue` (or `MissingConfig`) naming the dotted TOML key.

use crate::utils::error::{PopularityError, Result};
use std::fmt::Display;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl Display, reason: impl Into<String>) -> PopularityError {
    PopularityError::InvalidConfigValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// A provider base URL: http(s), with a host, and nothing the client appends to.
///
/// Query strings and userinfo are rejected: request parameters, the video API key
/// among them, are appended per call.
pub fn validate_endpoint(field: &str, raw: &str) -> Result<()> {
    if raw.trim().is_empty() {
        return Err(invalid(field, raw, "Endpoint cannot be empty"));
    }

    let url = Url::parse(raw).map_err(|e| invalid(field, raw, format!("Invalid URL: {}", e)))?;

    if !url.username().is_empty() || url.password().is_some() {
        return Err(invalid(field, "<redacted>", "Endpoint must not embed credentials"));
    }
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            field,
            raw,
            format!("Unsupported URL scheme: {}", url.scheme()),
        ));
    }
    if url.host_str().is_none() {
        return Err(invalid(field, raw, "Endpoint has no host"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid(
            field,
            raw,
            "Endpoint must not carry a query string; parameters are added per request",
        ));
    }
    Ok(())
}

/// Cache directory: non-empty, no NUL.
pub fn validate_dir(field: &str, dir: &str) -> Result<()> {
    if dir.trim().is_empty() {
        return Err(invalid(field, dir, "Directory cannot be empty"));
    }
    if dir.contains('\0') {
        return Err(invalid(field, dir.escape_default(), "Directory contains a NUL byte"));
    }
    Ok(())
}

pub fn validate_at_least<T>(field: &str, value: T, min: T) -> Result<()>
where
    T: PartialOrd + Display + Copy,
{
    if value < min {
        return Err(invalid(field, value, format!("Value must be at least {}", min)));
    }
    Ok(())
}

pub fn validate_range<T>(field: &str, value: T, min: T, max: T) -> Result<()>
where
    T: PartialOrd + Display + Copy,
{
    if value < min || value > max {
        return Err(invalid(
            field,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

pub fn validate_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, value, "Value cannot be empty or whitespace-only"));
    }
    Ok(())
}

/// Credentials are never echoed back in the error.
pub fn validate_required_field<'a, T>(field: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| PopularityError::MissingConfig {
        field: field.to_string(),
    })
}

/// Scoring weights.
pub fn validate_non_negative_finite(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(field, value, "Value must be a finite, non-negative number"));
    }
    Ok(())
}

/// Saturation references: a zero would make every component jump straight to 1.
pub fn validate_positive_finite(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(field, value, "Value must be a finite number greater than zero"));
    }
    Ok(())
}
