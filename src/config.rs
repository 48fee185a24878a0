//! Auto-match configuration

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::types::*;

/// Default maximum amount deviation, in the input's currency units
pub const DEFAULT_AMOUNT_TOLERANCE: &str = "0.01";

/// Default maximum date deviation, in days
pub const DEFAULT_DAY_TOLERANCE: u32 = 3;

/// Tolerances for the auto-match engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Maximum absolute amount difference for an automatic match (inclusive)
    #[serde(default = "default_amount_tolerance")]
    pub amount_tolerance: BigDecimal,
    /// Maximum day distance for an automatic match (inclusive)
    #[serde(default = "default_day_tolerance")]
    pub day_tolerance: u32,
}

fn default_amount_tolerance() -> BigDecimal {
    BigDecimal::from(1) / BigDecimal::from(100)
}

fn default_day_tolerance() -> u32 {
    DEFAULT_DAY_TOLERANCE
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            amount_tolerance: default_amount_tolerance(),
            day_tolerance: default_day_tolerance(),
        }
    }
}

impl MatchConfig {
    /// Create a configuration, rejecting a negative amount tolerance
    pub fn new(amount_tolerance: BigDecimal, day_tolerance: u32) -> ReconciliationResult<Self> {
        if amount_tolerance < BigDecimal::from(0) {
            return Err(ReconciliationError::Config(format!(
                "Amount tolerance cannot be negative: {}",
                amount_tolerance
            )));
        }

        Ok(Self {
            amount_tolerance,
            day_tolerance,
        })
    }

    /// Parse a `[matching]` table from TOML, defaulting missing keys
    ///
    /// ```toml
    /// [matching]
    /// amount_tolerance = "0.05"   # string, float or integer
    /// day_tolerance = 5
    /// ```
    pub fn from_toml_str(content: &str) -> ReconciliationResult<Self> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| ReconciliationError::Config(format!("Invalid config TOML: {}", e)))?;

        let mut config = Self::default();

        if let Some(matching) = raw.matching {
            if let Some(value) = matching.amount_tolerance {
                config.amount_tolerance = parse_tolerance(&value)?;
            }
            if let Some(days) = matching.day_tolerance {
                config.day_tolerance = days;
            }
        }

        Self::new(config.amount_tolerance, config.day_tolerance)
    }
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    matching: Option<RawMatching>,
}

#[derive(Debug, Deserialize)]
struct RawMatching {
    amount_tolerance: Option<toml::Value>,
    day_tolerance: Option<u32>,
}

// Floats go through their shortest decimal rendering so 0.01 stays 0.01
fn parse_tolerance(value: &toml::Value) -> ReconciliationResult<BigDecimal> {
    let text = match value {
        toml::Value::String(s) => s.trim().to_string(),
        toml::Value::Float(f) => f.to_string(),
        toml::Value::Integer(i) => i.to_string(),
        other => {
            return Err(ReconciliationError::Config(format!(
                "amount_tolerance must be a number, got {}",
                other.type_str()
            )))
        }
    };

    BigDecimal::from_str(&text).map_err(|_| {
        ReconciliationError::Config(format!("Invalid amount_tolerance: {}", text))
    })
}
