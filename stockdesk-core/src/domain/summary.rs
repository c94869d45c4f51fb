//! Summary statistics computed on demand from a metric series.

use serde::{Deserialize, Serialize};

/// Fixed-field summary. Absent values are zero, never omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub week_52_high: f64,
    pub week_52_low: f64,
    pub avg_close: f64,
    pub current_price: f64,
    /// Mean daily return over the full series, in percent.
    pub avg_daily_return_percent: f64,
    /// volatility_score of the newest row.
    pub volatility_score: f64,
    pub avg_volume: f64,
    pub total_days: usize,
}

impl Summary {
    pub fn is_empty(&self) -> bool {
        self.total_days == 0
    }

    pub fn volatility_band(&self) -> VolatilityBand {
        VolatilityBand::classify(self.volatility_score)
    }
}

/// Coarse reading of a volatility score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolatilityBand {
    /// Below 20%: stable, predictable moves.
    Low,
    /// 20% to 40%: moderate fluctuation.
    Medium,
    /// Above 40%: large swings.
    High,
}

impl VolatilityBand {
    pub fn classify(score: f64) -> Self {
        if score < 20.0 {
            VolatilityBand::Low
        } else if score <= 40.0 {
            VolatilityBand::Medium
        } else {
            VolatilityBand::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VolatilityBand::Low => "Low",
            VolatilityBand::Medium => "Medium",
            VolatilityBand::High => "High",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            VolatilityBand::Low => "stable stock with predictable price movements",
            VolatilityBand::Medium => "moderate price fluctuations",
            VolatilityBand::High => "significant price swings, higher risk and reward",
        }
    }
}
