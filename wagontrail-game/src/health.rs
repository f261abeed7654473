//! Party vitality, the discrete health ranks derived from it, and the single
//! sanctioned way to change it.
//!
//! Every system that heals or hurts the party goes through
//! [`Vitality::apply`], which clamps to `0..=100` and reports rank crossings so
//! narration never has to recompute them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{HEALTH_MAX, HEALTH_MIN};

/// Discrete health rank shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthRank {
    Dead,
    Critical,
    VeryPoor,
    Poor,
    Fair,
    Good,
}

/// Rank ladder in descending threshold order; anything below the last entry is `Dead`.
const RANK_LADDER: [(HealthRank, f64); 5] = [
    (HealthRank::Good, 80.0),
    (HealthRank::Fair, 60.0),
    (HealthRank::Poor, 40.0),
    (HealthRank::VeryPoor, 20.0),
    (HealthRank::Critical, 1.0),
];

impl HealthRank {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very Poor",
            Self::Critical => "Critical",
            Self::Dead => "Dead",
        }
    }

    /// Display color as a CSS hex string.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Good => "#51cf66",
            Self::Fair => "#ffd700",
            Self::Poor => "#ffa94d",
            Self::VeryPoor => "#ff6b6b",
            Self::Critical => "#cc3333",
            Self::Dead => "#666666",
        }
    }

    /// Minimum vitality needed to hold this rank.
    #[must_use]
    pub fn min_health(self) -> f64 {
        RANK_LADDER
            .iter()
            .find(|(rank, _)| *rank == self)
            .map_or(HEALTH_MIN, |(_, min)| *min)
    }
}

impl fmt::Display for HealthRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Resolve the rank for a vitality score. First threshold met wins.
#[must_use]
pub fn rank_of(health: f64) -> HealthRank {
    RANK_LADDER
        .iter()
        .find(|(_, min)| health >= *min)
        .map_or(HealthRank::Dead, |(rank, _)| *rank)
}

/// A rank boundary crossed by a single health change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankShift {
    pub from: HealthRank,
    pub to: HealthRank,
    pub declined: bool,
}

impl fmt::Display for RankShift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.declined {
            write!(f, "Your party's health declined to {}.", self.to)
        } else {
            write!(f, "Your party's health improved to {}.", self.to)
        }
    }
}

/// Continuous party vitality, always within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Vitality(f64);

impl Vitality {
    /// Build a vitality score, clamping out-of-range and non-finite input.
    #[must_use]
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(HEALTH_MIN);
        }
        Self(value.clamp(HEALTH_MIN, HEALTH_MAX))
    }

    #[must_use]
    pub const fn full() -> Self {
        Self(HEALTH_MAX)
    }

    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    #[must_use]
    pub fn rank(self) -> HealthRank {
        rank_of(self.0)
    }

    #[must_use]
    pub fn is_depleted(self) -> bool {
        self.0 <= HEALTH_MIN
    }

    /// Apply a signed delta, clamp, and report any rank boundary crossed.
    pub fn apply(&mut self, delta: f64) -> Option<RankShift> {
        let before = self.rank();
        *self = Self::new(self.0 + delta);
        let after = self.rank();
        if before == after {
            return None;
        }
        Some(RankShift {
            from: before,
            to: after,
            declined: delta < 0.0,
        })
    }
}

impl Default for Vitality {
    fn default() -> Self {
        Self::full()
    }
}

impl From<f64> for Vitality {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Vitality> for f64 {
    fn from(value: Vitality) -> Self {
        value.0
    }
}

impl fmt::Display for Vitality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}", self.0)
    }
}

/// Append a rank-shift sentence to narration when one occurred.
pub(crate) fn narrate_shift(text: &mut String, shift: Option<RankShift>) {
    if let Some(shift) = shift {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(&shift.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_follow_descending_thresholds() {
        assert_eq!(rank_of(100.0), HealthRank::Good);
        assert_eq!(rank_of(80.0), HealthRank::Good);
        assert_eq!(rank_of(79.9), HealthRank::Fair);
        assert_eq!(rank_of(40.0), HealthRank::Poor);
        assert_eq!(rank_of(20.0), HealthRank::VeryPoor);
        assert_eq!(rank_of(1.0), HealthRank::Critical);
        assert_eq!(rank_of(0.0), HealthRank::Dead);
        assert_eq!(rank_of(-5.0), HealthRank::Dead);
    }

    #[test]
    fn apply_clamps_any_delta() {
        for delta in [-1_000.0, -100.0, -0.5, 0.0, 3.0, 250.0, f64::MAX] {
            let mut vitality = Vitality::new(50.0);
            let _ = vitality.apply(delta);
            assert!((0.0..=100.0).contains(&vitality.value()), "delta {delta}");
        }
    }

    #[test]
    fn apply_reports_rank_crossings_only() {
        let mut vitality = Vitality::new(85.0);
        assert_eq!(vitality.apply(-3.0), None);

        let shift = vitality.apply(-5.0).expect("crossed into fair");
        assert_eq!(shift.from, HealthRank::Good);
        assert_eq!(shift.to, HealthRank::Fair);
        assert!(shift.declined);
        assert_eq!(shift.to_string(), "Your party's health declined to Fair.");

        let shift = vitality.apply(30.0).expect("back to good");
        assert!(!shift.declined);
        assert_eq!(shift.to_string(), "Your party's health improved to Good.");
    }

    #[test]
    fn vitality_deserializes_with_clamp() {
        let vitality: Vitality = serde_json::from_str("140.0").expect("parse");
        assert!((vitality.value() - 100.0).abs() < f64::EPSILON);
        assert_eq!(HealthRank::VeryPoor.color(), "#ff6b6b");
        assert!((HealthRank::Fair.min_health() - 60.0).abs() < f64::EPSILON);
    }
}
