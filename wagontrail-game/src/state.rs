//! Party state: the single mutable aggregate owned by the travel engine.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::constants::{
    PIONEER_BUDGET, SETTLER_BUDGET, STARTING_BULLETS, STARTING_DAY, STARTING_HEALTH,
    TRAILBLAZER_BUDGET,
};
use crate::health::{HealthRank, RankShift, Vitality};
use crate::resolvers::river::{CurrentStrength, RiverWidth};

/// Difficulty picked before outfitting; sets the starting budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Settler,
    #[default]
    Pioneer,
    Trailblazer,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Settler, Self::Pioneer, Self::Trailblazer];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Settler => "Settler",
            Self::Pioneer => "Pioneer",
            Self::Trailblazer => "Trailblazer",
        }
    }

    /// Outfitting budget in dollars.
    #[must_use]
    pub const fn budget(self) -> i32 {
        match self {
            Self::Settler => SETTLER_BUDGET,
            Self::Pioneer => PIONEER_BUDGET,
            Self::Trailblazer => TRAILBLAZER_BUDGET,
        }
    }

    /// Two-letter prefix used in share codes.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Settler => "ST",
            Self::Pioneer => "PI",
            Self::Trailblazer => "TB",
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.code().eq_ignore_ascii_case(code))
    }

    /// Parse `easy`/`normal`/`hard` or a label such as `pioneer`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" | "settler" => Some(Self::Settler),
            "normal" | "pioneer" => Some(Self::Pioneer),
            "hard" | "trailblazer" => Some(Self::Trailblazer),
            _ => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a journey ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ending {
    Victory,
    Starvation,
    /// Health ran out.
    Attrition,
    OxenLost,
}

impl Ending {
    #[must_use]
    pub const fn is_victory(self) -> bool {
        matches!(self, Self::Victory)
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Victory => "victory",
            Self::Starvation => "starvation",
            Self::Attrition => "attrition",
            Self::OxenLost => "oxen_lost",
        }
    }
}

impl fmt::Display for Ending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Anti-grinding bookkeeping for the river currently being crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RiverLocks {
    pub scout_attempts: u32,
    pub wait_attempts: u32,
    pub width_locked: bool,
    pub current_locked: bool,
}

/// Lifetime crossing statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CrossingStats {
    pub fords_attempted: u32,
    pub perfect_fords: u32,
    pub ferries_taken: u32,
}

/// Everything the simulation knows about the party.
///
/// Counts are signed: `food` and friends may dip below zero for the instant
/// between a deduction and the starvation check that follows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartyState {
    pub difficulty: Difficulty,
    pub distance: i32,
    pub day: u32,
    pub food: i32,
    pub money: i32,
    pub oxen: i32,
    pub sick_oxen: i32,
    pub spare_parts: i32,
    pub medicine: i32,
    pub clothing: i32,
    pub bullets: i32,
    pub health: Vitality,
    pub game_over: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ending: Option<Ending>,
    pub awaiting_choice: bool,
    pub at_fort: bool,
    pub at_river: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_landmark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_river: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_strength: Option<CurrentStrength>,
    pub visited_landmarks: BTreeSet<String>,
    pub river_widths: BTreeMap<String, RiverWidth>,
    pub river_locks: RiverLocks,
    pub crossings: CrossingStats,
}

impl Default for PartyState {
    fn default() -> Self {
        Self::new(Difficulty::default())
    }
}

impl PartyState {
    /// Fresh party at the trailhead with nothing in the wagon but starting ammo.
    #[must_use]
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            distance: 0,
            day: STARTING_DAY,
            food: 0,
            money: difficulty.budget(),
            oxen: 0,
            sick_oxen: 0,
            spare_parts: 0,
            medicine: 0,
            clothing: 0,
            bullets: STARTING_BULLETS,
            health: Vitality::new(STARTING_HEALTH),
            game_over: false,
            ending: None,
            awaiting_choice: false,
            at_fort: false,
            at_river: false,
            current_landmark: None,
            current_river: None,
            current_strength: None,
            visited_landmarks: BTreeSet::new(),
            river_widths: BTreeMap::new(),
            river_locks: RiverLocks::default(),
            crossings: CrossingStats::default(),
        }
    }

    #[must_use]
    pub fn healthy_oxen(&self) -> i32 {
        (self.oxen - self.sick_oxen).max(0)
    }

    #[must_use]
    pub fn health_rank(&self) -> HealthRank {
        self.health.rank()
    }

    /// Route a health delta through the clamped mutator.
    pub fn apply_health(&mut self, delta: f64) -> Option<RankShift> {
        self.health.apply(delta)
    }

    /// Restore `0 <= sick_oxen <= oxen` after the herd shrinks.
    pub fn clamp_herd(&mut self) {
        self.oxen = self.oxen.max(0);
        self.sick_oxen = self.sick_oxen.clamp(0, self.oxen);
    }

    #[must_use]
    pub fn has_visited(&self, landmark: &str) -> bool {
        self.visited_landmarks.contains(landmark)
    }

    /// Clear every "where are we" marker once an interaction resolves.
    pub fn clear_location(&mut self) {
        self.awaiting_choice = false;
        self.at_fort = false;
        self.at_river = false;
        self.current_landmark = None;
        self.current_river = None;
        self.current_strength = None;
        self.river_locks = RiverLocks::default();
    }

    pub(crate) fn spend(&mut self, dollars: i32) {
        self.money -= dollars;
    }

    pub(crate) fn consume_food(&mut self, lbs: i32) {
        self.food -= lbs;
    }

    pub(crate) fn pass_days(&mut self, days: u32) {
        self.day = self.day.saturating_add(days);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_party_starts_on_day_one_at_full_health() {
        let state = PartyState::new(Difficulty::Trailblazer);
        assert_eq!(state.day, 1);
        assert_eq!(state.money, 80);
        assert_eq!(state.bullets, 20);
        assert_eq!(state.health_rank(), HealthRank::Good);
        assert!(!state.game_over);
    }

    #[test]
    fn clamp_herd_keeps_sick_within_herd() {
        let mut state = PartyState {
            oxen: 1,
            sick_oxen: 3,
            ..PartyState::default()
        };
        state.clamp_herd();
        assert_eq!(state.sick_oxen, 1);

        state.oxen = -1;
        state.clamp_herd();
        assert_eq!((state.oxen, state.sick_oxen), (0, 0));
    }

    #[test]
    fn difficulty_parses_aliases_and_codes() {
        assert_eq!(Difficulty::parse("easy"), Some(Difficulty::Settler));
        assert_eq!(Difficulty::parse("Pioneer"), Some(Difficulty::Pioneer));
        assert_eq!(Difficulty::from_code("tb"), Some(Difficulty::Trailblazer));
        assert_eq!(Difficulty::parse("nightmare"), None);
    }

    #[test]
    fn state_snapshot_roundtrips_through_json() {
        let mut state = PartyState::new(Difficulty::Settler);
        state.visited_landmarks.insert("Fort Kearney".to_string());
        state
            .river_widths
            .insert("Kansas River Crossing".to_string(), RiverWidth::Wide);
        let json = serde_json::to_string(&state).expect("serialize");
        let restored: PartyState = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, state);
    }
}
