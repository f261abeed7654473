//! Terminal detection and the end-of-journey summary.
use serde::{Deserialize, Serialize};

use crate::constants::GOAL_DISTANCE;
use crate::health::HealthRank;
use crate::state::{Difficulty, Ending, PartyState};

/// Check the post-action terminal conditions in priority order.
///
/// Running out of oxen is only fatal when the wagon tries to move, so the
/// engine checks it separately at the top of a tick.
#[must_use]
pub fn detect_ending(state: &PartyState) -> Option<Ending> {
    if state.food <= 0 {
        return Some(Ending::Starvation);
    }
    if state.health.is_depleted() {
        return Some(Ending::Attrition);
    }
    if state.distance >= GOAL_DISTANCE {
        return Some(Ending::Victory);
    }
    None
}

/// Final narration line for `ending`.
#[must_use]
pub fn ending_message(ending: Ending, state: &PartyState) -> String {
    match ending {
        Ending::Victory => format!(
            "Congratulations! You made it to Oregon City in {} days on {} difficulty! Your party arrived in {} health with {} lbs of food remaining!",
            state.day,
            state.difficulty.label(),
            state.health_rank(),
            state.food.max(0)
        ),
        Ending::Starvation => "Your party has starved to death. Game Over.".to_string(),
        Ending::Attrition => "Your party has died from poor health. Game Over.".to_string(),
        Ending::OxenLost => "You have no oxen! You cannot continue. Game Over.".to_string(),
    }
}

/// Snapshot of a journey for result screens and tester reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneySummary {
    pub ending: Option<Ending>,
    pub headline: String,
    pub difficulty: Difficulty,
    pub day: u32,
    pub distance: i32,
    pub food: i32,
    pub money: i32,
    pub oxen: i32,
    pub sick_oxen: i32,
    pub health: f64,
    pub rank: HealthRank,
    pub landmarks_visited: usize,
    pub fords_attempted: u32,
    pub perfect_fords: u32,
    pub ferries_taken: u32,
}

impl JourneySummary {
    /// Summarize `state`. Counts are clamped at zero for display.
    #[must_use]
    pub fn from_state(state: &PartyState) -> Self {
        let headline = state.ending.map_or_else(
            || format!("Still on the trail: day {}, {} miles.", state.day, state.distance),
            |ending| ending_message(ending, state),
        );
        Self {
            ending: state.ending,
            headline,
            difficulty: state.difficulty,
            day: state.day,
            distance: state.distance.max(0),
            food: state.food.max(0),
            money: state.money.max(0),
            oxen: state.oxen.max(0),
            sick_oxen: state.sick_oxen.max(0),
            health: state.health.value(),
            rank: state.health_rank(),
            landmarks_visited: state.visited_landmarks.len(),
            fords_attempted: state.crossings.fords_attempted,
            perfect_fords: state.crossings.perfect_fords,
            ferries_taken: state.crossings.ferries_taken,
        }
    }

    #[must_use]
    pub fn is_victory(&self) -> bool {
        self.ending.is_some_and(Ending::is_victory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::Vitality;

    #[test]
    fn starvation_outranks_victory() {
        let state = PartyState {
            food: 0,
            distance: 2005,
            ..PartyState::default()
        };
        assert_eq!(detect_ending(&state), Some(Ending::Starvation));
    }

    #[test]
    fn attrition_and_victory_detected() {
        let state = PartyState {
            food: 10,
            health: Vitality::new(0.0),
            ..PartyState::default()
        };
        assert_eq!(detect_ending(&state), Some(Ending::Attrition));

        let state = PartyState {
            food: 10,
            distance: 2000,
            ..PartyState::default()
        };
        assert_eq!(detect_ending(&state), Some(Ending::Victory));
        assert_eq!(detect_ending(&PartyState { food: 1, ..PartyState::default() }), None);
    }

    #[test]
    fn victory_message_reports_day_rank_and_food() {
        let mut state = PartyState::new(Difficulty::Settler);
        state.day = 88;
        state.food = 37;
        state.health = Vitality::new(65.0);
        state.ending = Some(Ending::Victory);
        let summary = JourneySummary::from_state(&state);
        assert!(summary.is_victory());
        assert_eq!(
            summary.headline,
            "Congratulations! You made it to Oregon City in 88 days on Settler difficulty! Your party arrived in Fair health with 37 lbs of food remaining!"
        );
    }
}
