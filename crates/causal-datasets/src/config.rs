//! Decoding configuration with builder pattern.
//!
//! [`DecodeConfig`] collects the knobs of the decoding pipeline. It uses the
//! `bon` crate for the builder and validates at build time.
//!
//! # Example
//!
//! ```
//! use causal_datasets::config::DecodeConfig;
//! use causal_datasets::variables::{DType, DTypeMap, GroupTypePolicy, VariableType};
//!
//! // All defaults
//! let config = DecodeConfig::builder().build().unwrap();
//!
//! // Continuous data as f64, reject groups with mixed types
//! let config = DecodeConfig::builder()
//!     .dtypes(DTypeMap::default().with(VariableType::Continuous, DType::Float64))
//!     .group_types(GroupTypePolicy::Strict)
//!     .build()
//!     .unwrap();
//! ```

use bon::Builder;

use crate::variables::{DTypeMap, GroupTypePolicy};

// =============================================================================
// ConfigError
// =============================================================================

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A tolerance is negative or not finite.
    InvalidTolerance { field: &'static str, value: f64 },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTolerance { field, value } => {
                write!(f, "{} must be finite and non-negative, got {}", field, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// =============================================================================
// DecodeConfig
// =============================================================================

/// Configuration for decoding tables and experiment files.
#[derive(Debug, Clone, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct DecodeConfig {
    /// Variable type → storage dtype registry. Default: [`DTypeMap::default`].
    #[builder(default)]
    pub dtypes: DTypeMap,

    /// Type resolution for groups whose descriptors disagree. Default: `FirstWins`.
    #[builder(default)]
    pub group_types: GroupTypePolicy,

    /// Absolute tolerance of the constant-intervention check. Default: 1e-8.
    #[builder(default = 1e-8)]
    pub constant_atol: f64,

    /// Relative tolerance of the constant-intervention check. Default: 1e-5.
    #[builder(default = 1e-5)]
    pub constant_rtol: f64,

    /// Threads used to reconstruct environments.
    /// 0 = auto, 1 = sequential (default), n = exactly n.
    #[builder(default = 1)]
    pub n_threads: usize,
}

/// Custom finishing function that validates the config.
impl<S: decode_config_builder::IsComplete> DecodeConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a tolerance is negative, NaN or infinite.
    pub fn build(self) -> Result<DecodeConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl DecodeConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("constant_atol", self.constant_atol),
            ("constant_rtol", self.constant_rtol),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidTolerance { field, value });
            }
        }
        Ok(())
    }
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self::builder().__build_internal()
    }
}
