//! Decision Threshold
//!
//! Maps a default probability onto a binary risk label.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Decision threshold in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold(f64);

impl Threshold {
    /// Build a threshold, rejecting values outside [0, 1] (and NaN)
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// HIGH_RISK iff probability >= threshold
    pub fn decide(&self, probability: f64) -> Decision {
        if probability >= self.0 {
            Decision::HighRisk
        } else {
            Decision::LowRisk
        }
    }
}

/// Binary risk label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    HighRisk,
    LowRisk,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighRisk => "HIGH_RISK",
            Self::LowRisk => "LOW_RISK",
        }
    }

    pub fn is_high_risk(&self) -> bool {
        matches!(self, Self::HighRisk)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
