//! Travel engine primitives: configuration, RNG streams, and scheduler states.
use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::cell::{RefCell, RefMut};
use thiserror::Error;

use crate::constants::{
    BASE_MILES_MAX, BASE_MILES_MIN, DAILY_FOOD_COST, ENCOUNTER_BASE_CHANCE,
    ENCOUNTER_PROGRESS_BONUS, MILES_PER_HEALTHY_OX, OX_BONUS_CAP, OX_DEATH_CHANCE, OX_SICK_CHANCE,
    PASSIVE_EVENT_CHANCE, TICK_INTERVAL_MS, TRAVEL_HEALTH_COST,
};
use crate::events::encounters::EncounterId;
use crate::landmarks::Landmark;
use crate::state::Ending;

pub mod engine;
pub mod event;

pub use engine::{ChoiceOutcome, TravelEngine};
pub use event::{EntryId, LogEntry, LogKind, SelectionTrace, Severity, WeightedCandidate};

/// Why the engine stopped advancing without the journey being over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PauseReason {
    /// Player pressed pause; only the player resumes.
    Manual,
    Landmark,
    Encounter,
    /// A mini-game is in flight.
    Action,
}

impl PauseReason {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Landmark => "landmark",
            Self::Encounter => "encounter",
            Self::Action => "action",
        }
    }

    /// System pauses are released by the resolver that opened them, never by the player.
    #[must_use]
    pub const fn is_system(self) -> bool {
        !matches!(self, Self::Manual)
    }
}

impl std::fmt::Display for PauseReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Scheduler state of the travel engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineStatus {
    Stopped,
    Running,
    Paused(PauseReason),
    /// Terminal stop; nothing transitions out.
    GameOver(Ending),
}

impl EngineStatus {
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    #[must_use]
    pub const fn is_over(self) -> bool {
        matches!(self, Self::GameOver(_))
    }
}

/// Result of a single engine tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Engine was not running (or the journey is over); nothing changed.
    Idle,
    Traveled {
        day: u32,
        miles: i32,
        event: Option<String>,
    },
    Arrived(&'static Landmark),
    Encounter(EncounterId),
    Ended(Ending),
}

/// Odds for the per-animal oxen trials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OxenConfig {
    #[serde(default = "OxenConfig::default_sick_chance")]
    pub sick_chance: f64,
    #[serde(default = "OxenConfig::default_death_chance")]
    pub death_chance: f64,
}

impl OxenConfig {
    const fn default_sick_chance() -> f64 {
        OX_SICK_CHANCE
    }

    const fn default_death_chance() -> f64 {
        OX_DEATH_CHANCE
    }
}

impl Default for OxenConfig {
    fn default() -> Self {
        Self {
            sick_chance: Self::default_sick_chance(),
            death_chance: Self::default_death_chance(),
        }
    }
}

/// Engine pacing and event-roll tuning; every field has a serde default so
/// hosts can overlay a partial JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailConfig {
    #[serde(default = "TrailConfig::default_daily_food")]
    pub daily_food: i32,
    #[serde(default = "TrailConfig::default_base_miles_min")]
    pub base_miles_min: i32,
    #[serde(default = "TrailConfig::default_base_miles_max")]
    pub base_miles_max: i32,
    #[serde(default = "TrailConfig::default_miles_per_healthy_ox")]
    pub miles_per_healthy_ox: i32,
    #[serde(default = "TrailConfig::default_ox_bonus_cap")]
    pub ox_bonus_cap: i32,
    #[serde(default = "TrailConfig::default_travel_health_cost")]
    pub travel_health_cost: f64,
    #[serde(default = "TrailConfig::default_passive_event_chance")]
    pub passive_event_chance: f64,
    #[serde(default = "TrailConfig::default_encounter_base_chance")]
    pub encounter_base_chance: f64,
    #[serde(default = "TrailConfig::default_encounter_progress_bonus")]
    pub encounter_progress_bonus: f64,
    #[serde(default)]
    pub oxen: OxenConfig,
    /// Suggested delay between host ticks; the engine itself never sleeps.
    #[serde(default = "TrailConfig::default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl TrailConfig {
    const fn default_daily_food() -> i32 {
        DAILY_FOOD_COST
    }

    const fn default_base_miles_min() -> i32 {
        BASE_MILES_MIN
    }

    const fn default_base_miles_max() -> i32 {
        BASE_MILES_MAX
    }

    const fn default_miles_per_healthy_ox() -> i32 {
        MILES_PER_HEALTHY_OX
    }

    const fn default_ox_bonus_cap() -> i32 {
        OX_BONUS_CAP
    }

    const fn default_travel_health_cost() -> f64 {
        TRAVEL_HEALTH_COST
    }

    const fn default_passive_event_chance() -> f64 {
        PASSIVE_EVENT_CHANCE
    }

    const fn default_encounter_base_chance() -> f64 {
        ENCOUNTER_BASE_CHANCE
    }

    const fn default_encounter_progress_bonus() -> f64 {
        ENCOUNTER_PROGRESS_BONUS
    }

    const fn default_tick_interval_ms() -> u64 {
        TICK_INTERVAL_MS
    }

    /// Parse a (possibly partial) JSON overlay and validate the result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and the matching
    /// validation error when a value falls outside its allowed range.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate ranges and probabilities.
    ///
    /// # Errors
    ///
    /// Returns an error when a configured value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_miles_min < 0 {
            return Err(ConfigError::MinViolation {
                field: "base_miles_min",
                min: 0.0,
                value: f64::from(self.base_miles_min),
            });
        }
        if self.base_miles_min > self.base_miles_max {
            return Err(ConfigError::MilesMinExceedsMax {
                min: self.base_miles_min,
                max: self.base_miles_max,
            });
        }
        for (field, value) in [
            ("daily_food", f64::from(self.daily_food)),
            ("miles_per_healthy_ox", f64::from(self.miles_per_healthy_ox)),
            ("ox_bonus_cap", f64::from(self.ox_bonus_cap)),
            ("travel_health_cost", self.travel_health_cost),
        ] {
            if value.is_nan() || value < 0.0 {
                return Err(ConfigError::MinViolation {
                    field,
                    min: 0.0,
                    value,
                });
            }
        }
        self.validate_probabilities()
    }

    fn validate_probabilities(&self) -> Result<(), ConfigError> {
        let combined_encounter = self.encounter_base_chance + self.encounter_progress_bonus;
        for (field, value) in [
            ("passive_event_chance", self.passive_event_chance),
            ("encounter_base_chance", self.encounter_base_chance),
            ("encounter_progress_bonus", self.encounter_progress_bonus),
            ("encounter_chance_at_goal", combined_encounter),
            ("oxen.sick_chance", self.oxen.sick_chance),
            ("oxen.death_chance", self.oxen.death_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::RangeViolation {
                    field,
                    min: 0.0,
                    max: 1.0,
                    value,
                });
            }
        }
        Ok(())
    }
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            daily_food: Self::default_daily_food(),
            base_miles_min: Self::default_base_miles_min(),
            base_miles_max: Self::default_base_miles_max(),
            miles_per_healthy_ox: Self::default_miles_per_healthy_ox(),
            ox_bonus_cap: Self::default_ox_bonus_cap(),
            travel_health_cost: Self::default_travel_health_cost(),
            passive_event_chance: Self::default_passive_event_chance(),
            encounter_base_chance: Self::default_encounter_base_chance(),
            encounter_progress_bonus: Self::default_encounter_progress_bonus(),
            oxen: OxenConfig::default(),
            tick_interval_ms: Self::default_tick_interval_ms(),
        }
    }
}

/// Errors raised when trail configuration invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("base miles minimum {min} exceeds maximum {max}")]
    MilesMinExceedsMax { min: i32, max: i32 },
    #[error("{field} must be at least {min:.2} (got {value:.2})")]
    MinViolation {
        field: &'static str,
        min: f64,
        value: f64,
    },
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("invalid trail config JSON: {0}")]
    Parse(String),
}

/// Deterministic bundle of RNG streams segregated by simulation domain.
#[derive(Debug, Clone)]
pub struct RngBundle {
    travel: RefCell<CountingRng<SmallRng>>,
    events: RefCell<CountingRng<SmallRng>>,
    encounters: RefCell<CountingRng<SmallRng>>,
    rivers: RefCell<CountingRng<SmallRng>>,
    oxen: RefCell<CountingRng<SmallRng>>,
    outcomes: RefCell<CountingRng<SmallRng>>,
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        let stream = |tag: &[u8]| RefCell::new(CountingRng::new(derive_stream_seed(seed, tag)));
        Self {
            travel: stream(b"travel"),
            events: stream(b"events"),
            encounters: stream(b"encounters"),
            rivers: stream(b"rivers"),
            oxen: stream(b"oxen"),
            outcomes: stream(b"outcomes"),
        }
    }

    /// Daily mileage draws.
    #[must_use]
    pub fn travel(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.travel.borrow_mut()
    }

    /// Passive event chance, selection, and effects.
    #[must_use]
    pub fn events(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.events.borrow_mut()
    }

    /// Interactive encounter chance, selection, and prompts.
    #[must_use]
    pub fn encounters(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.encounters.borrow_mut()
    }

    /// River widths, currents, and crossing locks.
    #[must_use]
    pub fn rivers(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.rivers.borrow_mut()
    }

    /// Per-animal oxen trials.
    #[must_use]
    pub fn oxen(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.oxen.borrow_mut()
    }

    /// Probabilistic choice effects and mini-game aftermath.
    #[must_use]
    pub fn outcomes(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.outcomes.borrow_mut()
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<SmallRng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: rand::RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: rand::RngCore> rand::RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()).expect("64-bit seed is valid key");
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0_u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}
