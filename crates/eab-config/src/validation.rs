//! Configuration validation.
//!
//! Collects every problem in one pass so a bad file is reported in full
//! rather than one error per restart.

use crate::{AppConfig, CacheConfig, DatabaseConfig, ExpirationConfig, MAX_EXPIRATION_SECS};
use std::collections::HashSet;
use std::fmt;

/// Configuration validation error variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// TTL too large to be represented as a duration.
    ExpirationOverflow { name: String, value: i64 },
    /// The same subscription is overridden more than once.
    DuplicateSubscription { sub_id: i32 },
    /// Subscription ids must be non-negative.
    InvalidSubscriptionId { sub_id: i32 },
    /// Pool size configuration is invalid (min must be <= max).
    InvalidPoolSize { min: u32, max: u32 },
    /// Pool must allow at least one connection.
    EmptyPool,
    /// URL format is invalid.
    InvalidUrl { url_type: String, message: String },
    /// Timeout value must be positive.
    NonPositiveTimeout { name: String, value: u64 },
    /// Log filter could not be parsed.
    InvalidLogFilter { value: String },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExpirationOverflow { name, value } => {
                write!(
                    f,
                    "Expiration {} is too large: {} (maximum {})",
                    name, value, MAX_EXPIRATION_SECS
                )
            }
            Self::DuplicateSubscription { sub_id } => {
                write!(f, "Subscription {} is configured more than once", sub_id)
            }
            Self::InvalidSubscriptionId { sub_id } => {
                write!(f, "Invalid subscription id: {}", sub_id)
            }
            Self::InvalidPoolSize { min, max } => {
                write!(
                    f,
                    "Invalid pool size: min_connections ({}) > max_connections ({})",
                    min, max
                )
            }
            Self::EmptyPool => write!(f, "max_connections must be at least 1"),
            Self::InvalidUrl { url_type, message } => {
                write!(f, "Invalid {} URL: {}", url_type, message)
            }
            Self::NonPositiveTimeout { name, value } => {
                write!(f, "Timeout {} must be positive, got {}", name, value)
            }
            Self::InvalidLogFilter { value } => {
                write!(f, "Invalid log filter: '{}'", value)
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<ConfigValidationError>,
}

impl ValidationResult {
    fn add_error(&mut self, error: ConfigValidationError) {
        self.errors.push(error);
    }

    fn into_result(self) -> Result<(), Vec<ConfigValidationError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the entire application configuration.
    ///
    /// Returns Ok(()) if valid, or Err with all validation errors found.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut result = ValidationResult::default();

        Self::validate_cache(&config.cache, &mut result);
        Self::validate_database(&config.database, &mut result);
        Self::validate_telemetry(&config.telemetry.filter, &mut result);

        result.into_result()
    }

    /// Validates one expiration pair. Non-positive values are legal and mean "never".
    pub fn validate_expiration(
        prefix: &str,
        config: &ExpirationConfig,
    ) -> Result<(), Vec<ConfigValidationError>> {
        let mut result = ValidationResult::default();
        Self::check_ttl(
            &format!("{}.rcs_capabilities_cache_expiration_secs", prefix),
            config.rcs_capabilities_cache_expiration_secs,
            &mut result,
        );
        Self::check_ttl(
            &format!("{}.non_rcs_capabilities_cache_expiration_secs", prefix),
            config.non_rcs_capabilities_cache_expiration_secs,
            &mut result,
        );
        result.into_result()
    }

    fn check_ttl(name: &str, value: i64, result: &mut ValidationResult) {
        if value > MAX_EXPIRATION_SECS {
            result.add_error(ConfigValidationError::ExpirationOverflow {
                name: name.to_string(),
                value,
            });
        }
    }

    fn validate_cache(config: &CacheConfig, result: &mut ValidationResult) {
        if let Err(errors) = Self::validate_expiration("cache.expiration", &config.expiration) {
            result.errors.extend(errors);
        }

        let mut seen = HashSet::new();
        for o in &config.subscriptions {
            if o.sub_id < 0 {
                result.add_error(ConfigValidationError::InvalidSubscriptionId { sub_id: o.sub_id });
            }
            if !seen.insert(o.sub_id) {
                result.add_error(ConfigValidationError::DuplicateSubscription { sub_id: o.sub_id });
            }
            let prefix = format!("cache.subscriptions[{}]", o.sub_id);
            if let Some(v) = o.rcs_capabilities_cache_expiration_secs {
                Self::check_ttl(
                    &format!("{}.rcs_capabilities_cache_expiration_secs", prefix),
                    v,
                    result,
                );
            }
            if let Some(v) = o.non_rcs_capabilities_cache_expiration_secs {
                Self::check_ttl(
                    &format!("{}.non_rcs_capabilities_cache_expiration_secs", prefix),
                    v,
                    result,
                );
            }
        }
    }

    fn validate_database(config: &DatabaseConfig, result: &mut ValidationResult) {
        if config.url.is_empty() {
            result.add_error(ConfigValidationError::InvalidUrl {
                url_type: "database".to_string(),
                message: "URL cannot be empty".to_string(),
            });
        } else if !config.url.starts_with("sqlite:") {
            result.add_error(ConfigValidationError::InvalidUrl {
                url_type: "database".to_string(),
                message: "URL must start with sqlite:".to_string(),
            });
        }

        if config.max_connections == 0 {
            result.add_error(ConfigValidationError::EmptyPool);
        }
        if config.min_connections > config.max_connections {
            result.add_error(ConfigValidationError::InvalidPoolSize {
                min: config.min_connections,
                max: config.max_connections,
            });
        }

        if config.connect_timeout_secs == 0 {
            result.add_error(ConfigValidationError::NonPositiveTimeout {
                name: "database.connect_timeout_secs".to_string(),
                value: 0,
            });
        }
        if config.idle_timeout_secs == 0 {
            result.add_error(ConfigValidationError::NonPositiveTimeout {
                name: "database.idle_timeout_secs".to_string(),
                value: 0,
            });
        }
    }

    fn validate_telemetry(filter: &str, result: &mut ValidationResult) {
        if filter.trim().is_empty() {
            result.add_error(ConfigValidationError::InvalidLogFilter {
                value: filter.to_string(),
            });
        }
    }
}

/// Formats validation errors for display.
pub fn format_validation_errors(errors: &[ConfigValidationError]) -> String {
    let mut output = String::from("Configuration validation failed:\n");
    for (i, error) in errors.iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", i + 1, error));
    }
    output
}
