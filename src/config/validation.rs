//! Configuration validation.
//!
//! Serde handles the syntactic side; this module checks value ranges and
//! endpoint URLs. Every problem is collected so a single run reports all of
//! them.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::schema::AppConfig;

/// Solana caps a transaction at 1.4M compute units.
pub const MAX_COMPUTE_UNIT_LIMIT: u32 = 1_400_000;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Validate a parsed configuration, returning every error found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_url("rpc.url", &config.rpc.url, &mut errors);
    for (i, url) in config.rpc.failover_urls.iter().enumerate() {
        check_url(&format!("rpc.failover_urls[{}]", i), url, &mut errors);
    }
    if config.rpc.timeout_secs == 0 {
        errors.push(ValidationError::new("rpc.timeout_secs", "must be greater than 0"));
    }
    if config.rpc.confirmation_poll_ms == 0 {
        errors.push(ValidationError::new(
            "rpc.confirmation_poll_ms",
            "must be greater than 0",
        ));
    }

    let transfer = &config.transfer;
    if transfer.max_attempts == 0 {
        errors.push(ValidationError::new(
            "transfer.max_attempts",
            "at least one attempt is required",
        ));
    }
    if transfer.units_per_major == 0 {
        errors.push(ValidationError::new(
            "transfer.units_per_major",
            "must be greater than 0",
        ));
    }
    if transfer.fee_token.trim().is_empty() {
        errors.push(ValidationError::new("transfer.fee_token", "must not be empty"));
    }
    if transfer.compute_unit_limit == 0 || transfer.compute_unit_limit > MAX_COMPUTE_UNIT_LIMIT {
        errors.push(ValidationError::new(
            "transfer.compute_unit_limit",
            format!("must be between 1 and {}", MAX_COMPUTE_UNIT_LIMIT),
        ));
    }
    if transfer.transient_markers.iter().any(|m| m.is_empty()) {
        errors.push(ValidationError::new(
            "transfer.transient_markers",
            "empty marker would match every error",
        ));
    }

    if config.balance.poll_interval_ms == 0 {
        errors.push(ValidationError::new(
            "balance.poll_interval_ms",
            "must be greater than 0",
        ));
    }

    if let Err(e) = EnvFilter::try_new(&config.observability.log_level) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("invalid filter directive: {}", e),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(field: &str, value: &str, errors: &mut Vec<ValidationError>) {
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            field,
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(field, format!("invalid URL: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = AppConfig::default();
        config.rpc.url = "not a url".to_string();
        config.rpc.failover_urls.push("ftp://example.com".to_string());
        config.transfer.max_attempts = 0;
        config.transfer.units_per_major = 0;
        config.transfer.compute_unit_limit = 2_000_000;
        config.transfer.transient_markers.push(String::new());

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "rpc.url",
                "rpc.failover_urls[0]",
                "transfer.max_attempts",
                "transfer.units_per_major",
                "transfer.compute_unit_limit",
                "transfer.transient_markers",
            ]
        );
        assert!(errors[1].to_string().contains("unsupported scheme 'ftp'"));
    }
}
