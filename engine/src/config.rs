//! Configuration management for the grain quality engine
//!
//! Supports hierarchical configuration loading:
//! 1. Default thresholds in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with CQM__ prefix
//!    (e.g. `CQM__THRESHOLDS__DEFECTS__CRACK_THRESHOLD=0.25`)

use std::path::Path;

use config::{Environment, File};
use serde::{Deserialize, Serialize};
use shared::ClassificationConfig;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::error::{EngineError, EngineResult};

/// Main engine configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Classification thresholds
    pub thresholds: ClassificationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            thresholds: ClassificationConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from defaults, files and environment variables
    ///
    /// The loaded thresholds are validated before being returned.
    pub fn load() -> EngineResult<Self> {
        Self::load_from("config")
    }

    /// Same as [`Config::load`], reading `{environment}.*` files from `config_dir`
    pub fn load_from(config_dir: impl AsRef<Path>) -> EngineResult<Self> {
        let environment =
            std::env::var("CQM_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let defaults = Config {
            environment: environment.clone(),
            ..Config::default()
        };

        let config = config::Config::builder()
            // Start with default values
            .add_source(config::Config::try_from(&defaults)?)
            // Load environment-specific config file
            .add_source(
                File::with_name(&config_dir.as_ref().join(&environment).to_string_lossy())
                    .required(false),
            )
            // Override with environment variables (CQM__ prefix)
            .add_source(
                Environment::with_prefix("CQM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        validate_thresholds(&config.thresholds)?;

        tracing::debug!(environment = %config.environment, "Configuration loaded");

        Ok(config)
    }
}

/// Check a threshold set before any bean is processed
///
/// Fails with [`EngineError::Configuration`] naming the first rule broken:
/// non-finite values, per-field ranges, then cross-field consistency.
pub fn validate_thresholds(config: &ClassificationConfig) -> EngineResult<()> {
    if let Some((key, _)) = config
        .numeric_fields()
        .into_iter()
        .find(|(_, value)| !value.is_finite())
    {
        return Err(EngineError::configuration(key, "value must be a finite number"));
    }

    config.validate().map_err(|errors| {
        let rule = first_violation(&errors, "").unwrap_or_else(|| "thresholds".to_string());
        EngineError::configuration(rule, errors.to_string())
    })?;

    let size = &config.size;
    if size.small_max > size.large_min {
        return Err(EngineError::configuration(
            "size.small_max",
            format!(
                "small_max ({}) must not exceed large_min ({})",
                size.small_max, size.large_min
            ),
        ));
    }

    let bands = &config.categories;
    if bands.standard > bands.premium {
        return Err(EngineError::configuration(
            "categories.standard",
            format!(
                "standard band ({}) must not exceed premium band ({})",
                bands.standard, bands.premium
            ),
        ));
    }
    if bands.premium > bands.specialty {
        return Err(EngineError::configuration(
            "categories.premium",
            format!(
                "premium band ({}) must not exceed specialty band ({})",
                bands.premium, bands.specialty
            ),
        ));
    }

    let severity = &config.severity;
    if severity.crack_base > severity.crack_max {
        return Err(EngineError::configuration(
            "severity.crack_base",
            format!(
                "crack_base ({}) must not exceed crack_max ({})",
                severity.crack_base, severity.crack_max
            ),
        ));
    }

    Ok(())
}

/// Dotted path of the first failing field, in sorted key order
fn first_violation(errors: &ValidationErrors, prefix: &str) -> Option<String> {
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by_key(|(name, _)| **name);

    for (name, kind) in fields {
        let path = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", prefix, name)
        };
        match kind {
            ValidationErrorsKind::Struct(inner) => {
                if let Some(found) = first_violation(inner, &path) {
                    return Some(found);
                }
            }
            ValidationErrorsKind::List(_) | ValidationErrorsKind::Field(_) => return Some(path),
        }
    }
    None
}
