//! Weight sets for the strength and rotation scores.
//!
//! Weights are arbitrary non-negative finite reals; they are not required to
//! sum to 1. Missing fields deserialize to their defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::factors::FactorKind;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeightError {
    #[error("weight '{name}' must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("weight '{name}' must be non-negative, got {value}")]
    Negative { name: &'static str, value: f64 },
}

fn check(name: &'static str, value: f64) -> Result<(), WeightError> {
    if !value.is_finite() {
        return Err(WeightError::NonFinite { name, value });
    }
    if value < 0.0 {
        return Err(WeightError::Negative { name, value });
    }
    Ok(())
}

/// Per-factor multipliers of the strength score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorWeights {
    pub trend: f64,
    pub hype: f64,
    pub capital: f64,
    pub leader: f64,
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            trend: 0.35,
            hype: 0.25,
            capital: 0.25,
            leader: 0.15,
        }
    }
}

impl FactorWeights {
    /// All four weights set to 1.
    pub fn uniform() -> Self {
        Self {
            trend: 1.0,
            hype: 1.0,
            capital: 1.0,
            leader: 1.0,
        }
    }

    pub fn weight_for(&self, kind: FactorKind) -> f64 {
        match kind {
            FactorKind::Trend => self.trend,
            FactorKind::Hype => self.hype,
            FactorKind::Capital => self.capital,
            FactorKind::Leader => self.leader,
        }
    }

    pub fn validate(&self) -> Result<(), WeightError> {
        check("trend", self.trend)?;
        check("hype", self.hype)?;
        check("capital", self.capital)?;
        check("leader", self.leader)
    }
}

/// Multipliers of the rotation-readiness breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationWeights {
    pub relative_lag: f64,
    pub capital_spillover: f64,
    pub hype_spillover: f64,
    pub technical_readiness: f64,
}

impl Default for RotationWeights {
    fn default() -> Self {
        Self {
            relative_lag: 0.4,
            capital_spillover: 0.3,
            hype_spillover: 0.2,
            technical_readiness: 0.1,
        }
    }
}

impl RotationWeights {
    pub fn validate(&self) -> Result<(), WeightError> {
        check("relative_lag", self.relative_lag)?;
        check("capital_spillover", self.capital_spillover)?;
        check("hype_spillover", self.hype_spillover)?;
        check("technical_readiness", self.technical_readiness)
    }
}
