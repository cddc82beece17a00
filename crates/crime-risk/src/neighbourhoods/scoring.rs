use serde::{Deserialize, Serialize};
use std::fmt;

use super::dataset::CategoryCounts;

/// Incident total that maps to a full score of 100.
pub const SATURATION_TOTAL: f64 = 400.0;
pub const MAX_TOP_FACTORS: usize = 3;

const MEDIUM_THRESHOLD: u8 = 34;
const HIGH_THRESHOLD: u8 = 67;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const fn from_score(score: u8) -> Self {
        if score < MEDIUM_THRESHOLD {
            Self::Low
        } else if score < HIGH_THRESHOLD {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountFactor {
    pub category: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreCard {
    pub total: u64,
    pub score: u8,
    pub risk_level: RiskLevel,
    pub top_factors: Vec<CountFactor>,
}

/// Turns raw incident counts into a 0..=100 score (higher is worse), a risk
/// level, and the three largest categories.
///
/// The score is `total / 400 * 100` truncated toward zero. Categories with
/// equal counts keep their document order.
pub fn score_counts(counts: &CategoryCounts) -> ScoreCard {
    let total = counts.total();
    let score = score_for_total(total);

    let mut ranked: Vec<CountFactor> = counts
        .iter()
        .map(|entry| CountFactor {
            category: entry.category.clone(),
            count: entry.count,
        })
        .collect();
    // stable: ties stay in input order
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(MAX_TOP_FACTORS);

    ScoreCard {
        total,
        score,
        risk_level: RiskLevel::from_score(score),
        top_factors: ranked,
    }
}

pub fn score_for_total(total: u64) -> u8 {
    let raw = (total as f64 / SATURATION_TOTAL) * 100.0;
    raw.trunc().clamp(0.0, 100.0) as u8
}
