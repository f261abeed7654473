//! River crossings: cached widths, daily currents, and the anti-grinding locks.
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ChoiceList, ChoiceOption, Decision, Resolution};
use crate::constants::{
    FERRY_COST, RIVER_FREE_ATTEMPTS, RIVER_LOCK_STEP, SCOUT_DAYS, SCOUT_FOOD, WAIT_DAYS,
    WAIT_FOOD,
};
use crate::error::ActionError;
use crate::ford::FordRequest;
use crate::numbers::count_to_f64;
use crate::state::PartyState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiverWidth {
    Narrow,
    Wide,
    VeryWide,
}

impl RiverWidth {
    pub const ALL: [Self; 3] = [Self::Narrow, Self::Wide, Self::VeryWide];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Narrow => "Narrow",
            Self::Wide => "Wide",
            Self::VeryWide => "Very Wide",
        }
    }

    /// Contribution to ford difficulty.
    #[must_use]
    pub const fn score(self) -> u8 {
        match self {
            Self::Narrow => 0,
            Self::Wide => 1,
            Self::VeryWide => 2,
        }
    }
}

impl fmt::Display for RiverWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrentStrength {
    Weak,
    Moderate,
    Strong,
}

impl CurrentStrength {
    pub const ALL: [Self; 3] = [Self::Weak, Self::Moderate, Self::Strong];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Weak => "Weak",
            Self::Moderate => "Moderate",
            Self::Strong => "Strong",
        }
    }

    #[must_use]
    pub const fn score(self) -> u8 {
        match self {
            Self::Weak => 0,
            Self::Moderate => 1,
            Self::Strong => 2,
        }
    }
}

impl fmt::Display for CurrentStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiverAction {
    Ford,
    Scout,
    Wait,
    Ferry,
}

impl RiverAction {
    pub const ALL: [Self; 4] = [Self::Ford, Self::Scout, Self::Wait, Self::Ferry];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ford => "Ford the River (Play mini-game)",
            Self::Scout => "Scout for a Narrower Crossing (5 lbs food, 1 day)",
            Self::Wait => "Wait for a Weaker Current (10 lbs food, 2 days)",
            Self::Ferry => "Take the Ferry ($10, safer)",
        }
    }
}

fn roll_width<R: Rng + ?Sized>(rng: &mut R) -> RiverWidth {
    RiverWidth::ALL
        .choose(rng)
        .copied()
        .unwrap_or(RiverWidth::Wide)
}

fn roll_current<R: Rng + ?Sized>(rng: &mut R) -> CurrentStrength {
    CurrentStrength::ALL
        .choose(rng)
        .copied()
        .unwrap_or(CurrentStrength::Moderate)
}

/// Width for `name`, assigned on first lookup and cached for the rest of the game.
pub fn width_for<R: Rng + ?Sized>(state: &mut PartyState, name: &str, rng: &mut R) -> RiverWidth {
    *state
        .river_widths
        .entry(name.to_string())
        .or_insert_with(|| roll_width(rng))
}

/// Chance that attempt number `attempts` locks the river at its worst.
#[must_use]
pub fn lock_chance(attempts: u32) -> f64 {
    let past_free = attempts.saturating_sub(RIVER_FREE_ATTEMPTS);
    (count_to_f64(past_free) * RIVER_LOCK_STEP).min(1.0)
}

fn describe(width: RiverWidth, current: CurrentStrength) -> String {
    format!(
        "The river is {}. The current today is {}.",
        width.label().to_lowercase(),
        current.label().to_lowercase()
    )
}

/// Begin a river stop: resolve the cached width and roll today's current.
pub fn arrive<R: Rng + ?Sized>(state: &mut PartyState, name: &str, rng: &mut R) -> String {
    let width = width_for(state, name, rng);
    let current = roll_current(rng);
    state.at_river = true;
    state.awaiting_choice = true;
    state.current_landmark = Some(name.to_string());
    state.current_river = Some(name.to_string());
    state.current_strength = Some(current);
    state.river_locks = Default::default();
    format!(
        "You have reached the {name}. {} How would you like to cross?",
        describe(width, current)
    )
}

/// Today's crossing conditions, if the party is at a river.
#[must_use]
pub fn conditions(state: &PartyState) -> Option<FordRequest> {
    let name = state.current_river.as_deref()?;
    Some(FordRequest {
        width: *state.river_widths.get(name)?,
        current: state.current_strength?,
    })
}

/// Offered crossing options; locked re-rolls drop out.
#[must_use]
pub fn options(state: &PartyState) -> ChoiceList {
    RiverAction::ALL
        .into_iter()
        .filter(|action| match action {
            RiverAction::Scout => !state.river_locks.width_locked,
            RiverAction::Wait => !state.river_locks.current_locked,
            RiverAction::Ford | RiverAction::Ferry => true,
        })
        .map(|action| ChoiceOption::new(Decision::River(action), action.label()))
        .collect()
}

/// Apply a crossing choice.
///
/// # Errors
///
/// Rejects an unaffordable ferry and re-rolls that are already locked, and
/// reports [`ActionError::NothingPending`] when the party is not at a river.
pub fn resolve<R: Rng + ?Sized>(
    action: RiverAction,
    state: &mut PartyState,
    rng: &mut R,
) -> Result<Resolution, ActionError> {
    let request = conditions(state).ok_or(ActionError::NothingPending)?;
    let name = state.current_river.clone().unwrap_or_default();

    match action {
        RiverAction::Ford => Ok(Resolution::Ford(request)),
        RiverAction::Ferry => {
            if state.money < FERRY_COST {
                return Err(ActionError::FerryUnaffordable);
            }
            state.spend(FERRY_COST);
            state.pass_days(1);
            state.crossings.ferries_taken += 1;
            state.clear_location();
            Ok(Resolution::Done(format!(
                "Day {}: You took the ferry across. ({} river, {} current) Safe but costly. -${FERRY_COST}",
                state.day, request.width, request.current
            )))
        }
        RiverAction::Scout => {
            if state.river_locks.width_locked {
                return Err(ActionError::ScoutingExhausted);
            }
            state.consume_food(SCOUT_FOOD);
            state.pass_days(SCOUT_DAYS);
            state.river_locks.scout_attempts += 1;
            let locked = rng.gen_bool(lock_chance(state.river_locks.scout_attempts));
            let width = if locked {
                state.river_locks.width_locked = true;
                RiverWidth::VeryWide
            } else {
                roll_width(rng)
            };
            state.river_widths.insert(name, width);
            let finding = if locked {
                "There's no better place to cross; the river runs very wide all along this stretch."
            } else if width.score() < request.width.score() {
                "You found a narrower stretch to cross."
            } else {
                "The banks look much the same wherever you go."
            };
            log::debug!(
                "scouted river: {} -> {width} (attempt {}, locked {locked})",
                request.width,
                state.river_locks.scout_attempts
            );
            Ok(Resolution::Stay(format!(
                "Day {}: You scouted along the bank. -{SCOUT_FOOD} lbs food, +{SCOUT_DAYS} day. {finding} {}",
                state.day,
                describe(width, request.current)
            )))
        }
        RiverAction::Wait => {
            if state.river_locks.current_locked {
                return Err(ActionError::WaitingExhausted);
            }
            state.consume_food(WAIT_FOOD);
            state.pass_days(WAIT_DAYS);
            state.river_locks.wait_attempts += 1;
            let locked = rng.gen_bool(lock_chance(state.river_locks.wait_attempts));
            let current = if locked {
                state.river_locks.current_locked = true;
                CurrentStrength::Strong
            } else {
                roll_current(rng)
            };
            state.current_strength = Some(current);
            let outlook = match current {
                CurrentStrength::Weak => "Conditions look calmer now.",
                CurrentStrength::Moderate => "Conditions are a bit better.",
                CurrentStrength::Strong => "Still looks rough out there.",
            };
            Ok(Resolution::Stay(format!(
                "Day {}: You waited for better conditions. -{WAIT_FOOD} lbs food, +{WAIT_DAYS} days. {outlook} {}",
                state.day,
                describe(request.width, current)
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn at_river(rng: &mut ChaCha20Rng) -> PartyState {
        let mut state = PartyState {
            food: 200,
            money: 30,
            ..PartyState::default()
        };
        let _ = arrive(&mut state, "Kansas River Crossing", rng);
        state
    }

    #[test]
    fn width_cached_per_river() {
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let mut state = PartyState::default();
        let first = width_for(&mut state, "Kansas River Crossing", &mut rng);
        for _ in 0..10 {
            assert_eq!(width_for(&mut state, "Kansas River Crossing", &mut rng), first);
        }
        let _ = width_for(&mut state, "Snake River Crossing", &mut rng);
        assert_eq!(state.river_widths.len(), 2);
    }

    #[test]
    fn lock_chance_grows_after_free_attempt() {
        assert!(lock_chance(1).abs() < f64::EPSILON);
        assert!((lock_chance(2) - 0.25).abs() < f64::EPSILON);
        assert!((lock_chance(3) - 0.5).abs() < f64::EPSILON);
        assert!((lock_chance(9) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ferry_rejected_without_fare() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let mut state = at_river(&mut rng);
        state.money = 9;
        let before = state.clone();
        let err = resolve(RiverAction::Ferry, &mut state, &mut rng).expect_err("broke");
        assert_eq!(
            err.to_string(),
            "You don't have enough money for the ferry! You'll have to ford or wait."
        );
        assert_eq!(state, before);
    }

    #[test]
    fn ferry_crosses_and_clears_markers() {
        let mut rng = ChaCha20Rng::seed_from_u64(6);
        let mut state = at_river(&mut rng);
        let resolution = resolve(RiverAction::Ferry, &mut state, &mut rng).expect("fare");
        assert!(matches!(resolution, Resolution::Done(_)));
        assert_eq!((state.money, state.day), (20, 2));
        assert!(!state.at_river && state.current_river.is_none());
        assert_eq!(state.crossings.ferries_taken, 1);
    }

    #[test]
    fn repeated_scouting_locks_and_drops_option() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let mut state = at_river(&mut rng);
        let _ = resolve(RiverAction::Scout, &mut state, &mut rng).expect("first scout");
        assert!(!state.river_locks.width_locked);
        assert_eq!((state.food, state.day), (195, 2));

        while !state.river_locks.width_locked {
            let _ = resolve(RiverAction::Scout, &mut state, &mut rng).expect("scout");
        }
        assert!(state.river_locks.scout_attempts <= 5);
        assert_eq!(
            state.river_widths.get("Kansas River Crossing"),
            Some(&RiverWidth::VeryWide)
        );
        assert!(
            !options(&state)
                .iter()
                .any(|option| option.decision == Decision::River(RiverAction::Scout))
        );
        let before = state.clone();
        assert_eq!(
            resolve(RiverAction::Scout, &mut state, &mut rng),
            Err(ActionError::ScoutingExhausted)
        );
        assert_eq!(state, before);
    }

    #[test]
    fn waiting_rerolls_current_only() {
        let mut rng = ChaCha20Rng::seed_from_u64(8);
        let mut state = at_river(&mut rng);
        let width = conditions(&state).expect("at river").width;
        let resolution = resolve(RiverAction::Wait, &mut state, &mut rng).expect("wait");
        let Resolution::Stay(text) = resolution else {
            panic!("waiting keeps the river open");
        };
        assert!(text.contains("-10 lbs food, +2 days."));
        assert_eq!(conditions(&state).expect("still at river").width, width);
        assert_eq!(state.day, 3);
    }

    #[test]
    fn repeated_waiting_locks_current_and_drops_option() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let mut state = at_river(&mut rng);
        let width = conditions(&state).expect("at river").width;
        let _ = resolve(RiverAction::Wait, &mut state, &mut rng).expect("first wait");
        assert!(!state.river_locks.current_locked);
        assert_eq!((state.food, state.day), (190, 3));

        while !state.river_locks.current_locked {
            let _ = resolve(RiverAction::Wait, &mut state, &mut rng).expect("wait");
        }
        assert!(state.river_locks.wait_attempts <= 5);
        assert_eq!(state.current_strength, Some(CurrentStrength::Strong));
        assert_eq!(conditions(&state).expect("still at river").width, width);
        let offered: Vec<Decision> = options(&state).iter().map(|option| option.decision).collect();
        assert!(!offered.contains(&Decision::River(RiverAction::Wait)));
        assert!(offered.contains(&Decision::River(RiverAction::Scout)));

        let before = state.clone();
        assert_eq!(
            resolve(RiverAction::Wait, &mut state, &mut rng),
            Err(ActionError::WaitingExhausted)
        );
        assert_eq!(state, before);
    }

    #[test]
    fn ford_hands_off_conditions() {
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let mut state = at_river(&mut rng);
        let expected = conditions(&state).expect("at river");
        assert_eq!(
            resolve(RiverAction::Ford, &mut state, &mut rng),
            Ok(Resolution::Ford(expected))
        );
        assert!(state.at_river);
    }
}
