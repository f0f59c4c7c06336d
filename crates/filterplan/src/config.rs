//! Planner configuration.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `FILTERPLAN_DEFAULT_LIMIT` | 20 | Page size when `limit` is absent |
//! | `FILTERPLAN_MAX_LIMIT` | 1000 | Largest page size a request may ask for |
//!
//! # Example
//!
//! ```rust
//! use filterplan::PlannerConfig;
//!
//! let config = PlannerConfig {
//!     default_limit: 50,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use clap::Parser;

/// Pagination limits applied by the planner.
///
/// Built from environment variables with [`PlannerConfig::from_env`], from
/// command line arguments, or programmatically.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "filterplan")]
pub struct PlannerConfig {
    /// Page size used when the request has no `limit`.
    #[arg(long, env = "FILTERPLAN_DEFAULT_LIMIT", default_value = "20")]
    pub default_limit: u32,

    /// Requested limits above this value are capped to it.
    #[arg(long, env = "FILTERPLAN_MAX_LIMIT", default_value = "1000")]
    pub max_limit: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 1000,
        }
    }
}

impl PlannerConfig {
    /// Creates a configuration from environment variables, falling back to
    /// defaults when they are missing or invalid.
    pub fn from_env() -> Self {
        // no process arguments, environment only
        Self::try_parse_from(["filterplan"]).unwrap_or_default()
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.default_limit == 0 {
            errors.push("Default limit cannot be 0".to_string());
        }

        if self.max_limit == 0 {
            errors.push("Max limit cannot be 0".to_string());
        }

        if self.default_limit > self.max_limit {
            errors.push("Default limit cannot exceed max limit".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration with small limits for tests.
    pub fn for_testing() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}
