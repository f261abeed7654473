//! Weighted, conditioned event tables rolled during autonomous travel.
//!
//! Passive events fire without blocking the engine; interactive encounters
//! suspend travel until the player picks one of the offered choices. Both
//! tables share the cumulative-weight roulette in [`pick_by_roll`].

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::journey::{SelectionTrace, WeightedCandidate};
use crate::state::PartyState;

pub mod encounters;
pub mod passive;

pub use encounters::{Encounter, EncounterChoice, EncounterId, ENCOUNTERS};
pub use passive::{PassiveEvent, PassiveEventId, PASSIVE_EVENTS};

/// Applicability predicate over the current party state.
pub type Condition = fn(&PartyState) -> bool;

/// Thematic grouping shared by both tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Weather,
    Foraging,
    Trail,
    Wagon,
    Oxen,
    People,
    Wildlife,
    Scenic,
    Trade,
    Health,
    Route,
    Danger,
    Discovery,
}

/// A table row that can take part in a weighted draw.
pub trait WeightedEntry {
    fn key(&self) -> &'static str;
    fn weight(&self) -> u32;
    fn condition(&self) -> Option<Condition>;

    fn is_eligible(&self, state: &PartyState) -> bool {
        self.condition().is_none_or(|check| check(state))
    }
}

/// Walk `weights`, subtracting each from `roll` until the remainder drops to
/// zero or below. Rolls past the total land on the last entry.
#[must_use]
pub fn pick_by_roll(weights: &[u32], roll: f64) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }
    let mut remainder = roll;
    for (idx, weight) in weights.iter().enumerate() {
        remainder -= f64::from(*weight);
        if remainder <= 0.0 {
            return Some(idx);
        }
    }
    Some(weights.len() - 1)
}

/// Filter `table` by eligibility and draw one entry, returning the table
/// index plus a trace of the draw.
pub fn pick_weighted<T, R>(
    pool: &str,
    table: &[T],
    state: &PartyState,
    rng: &mut R,
) -> Option<(usize, SelectionTrace)>
where
    T: WeightedEntry,
    R: Rng + ?Sized,
{
    let eligible: Vec<usize> = table
        .iter()
        .enumerate()
        .filter(|(_, entry)| entry.is_eligible(state))
        .map(|(idx, _)| idx)
        .collect();
    let weights: Vec<u32> = eligible.iter().map(|idx| table[*idx].weight()).collect();
    let total: u32 = weights.iter().sum();
    if total == 0 {
        return None;
    }

    let roll = rng.gen_range(0.0..f64::from(total));
    let picked = eligible[pick_by_roll(&weights, roll)?];
    let trace = SelectionTrace {
        pool: pool.to_string(),
        roll,
        candidates: eligible
            .iter()
            .map(|idx| WeightedCandidate {
                id: table[*idx].key().to_string(),
                weight: table[*idx].weight(),
            })
            .collect(),
        chosen: table[picked].key().to_string(),
    };
    Some((picked, trace))
}
