//! River fording adapter seam and crossing aftermath.
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    FORD_FOOD_LOSS_CAP, FORD_FOOD_LOSS_PER_HIT, FORD_HEALTH_LOSS_CAP, FORD_HEALTH_LOSS_PER_HIT,
    FORD_MORALE_DIFFICULTY, FORD_MORALE_MAX, FORD_MORALE_MIN,
};
use crate::health::narrate_shift;
use crate::numbers::floor_f64_to_i32;
use crate::resolvers::river::{CurrentStrength, RiverWidth};
use crate::state::PartyState;

/// Conditions handed to the fording mini-game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FordRequest {
    pub width: RiverWidth,
    pub current: CurrentStrength,
}

impl FordRequest {
    /// Combined difficulty, `0..=4`.
    #[must_use]
    pub const fn difficulty(self) -> u8 {
        self.width.score() + self.current.score()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FordReport {
    /// Rocks and snags the wagon struck on the way across.
    pub hits: i32,
}

/// Anything that can play out a river crossing.
pub trait FordingGame {
    fn ford(&mut self, request: FordRequest) -> FordReport;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FordOutcome {
    Perfect,
    Good,
    Rough,
    Disastrous,
}

impl FordOutcome {
    #[must_use]
    pub const fn from_hits(hits: i32) -> Self {
        match hits {
            i32::MIN..=0 => Self::Perfect,
            1 => Self::Good,
            2 | 3 => Self::Rough,
            _ => Self::Disastrous,
        }
    }
}

/// Seeded stand-in for the interactive crossing.
#[derive(Debug, Clone)]
pub struct SimulatedFord {
    rng: SmallRng,
    base_hit_chance: f64,
}

impl SimulatedFord {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            base_hit_chance: 0.1,
        }
    }

    #[must_use]
    pub fn with_hit_chance(mut self, chance: f64) -> Self {
        self.base_hit_chance = chance.clamp(0.0, 1.0);
        self
    }
}

impl FordingGame for SimulatedFord {
    fn ford(&mut self, request: FordRequest) -> FordReport {
        let difficulty = request.difficulty();
        let obstacles = 3 + u32::from(difficulty) * 2;
        let chance = (self.base_hit_chance + f64::from(difficulty) * 0.05).min(1.0);
        let hits = (0..obstacles)
            .filter(|_| self.rng.gen_bool(chance))
            .count();
        FordReport {
            hits: i32::try_from(hits).unwrap_or(i32::MAX),
        }
    }
}

/// Apply the crossing result and close out the river stop.
pub fn apply_ford<R: Rng + ?Sized>(
    state: &mut PartyState,
    request: FordRequest,
    report: FordReport,
    rng: &mut R,
) -> String {
    let hits = report.hits.max(0);
    let outcome = FordOutcome::from_hits(hits);
    state.pass_days(1);

    let food_share = (f64::from(hits) * FORD_FOOD_LOSS_PER_HIT).min(FORD_FOOD_LOSS_CAP);
    let food_loss = floor_f64_to_i32(f64::from(state.food.max(0)) * food_share);
    if food_loss > 0 {
        state.food = (state.food - food_loss).max(0);
    }
    let health_loss = hits
        .saturating_mul(FORD_HEALTH_LOSS_PER_HIT)
        .min(FORD_HEALTH_LOSS_CAP);

    let conditions = format!("({} river, {} current)", request.width, request.current);
    let mut losses = String::new();
    if health_loss > 0 {
        losses.push_str(&format!(", -{health_loss} health"));
    }
    if food_loss > 0 {
        losses.push_str(&format!(", -{food_loss} lbs food"));
    }

    let mut text = match outcome {
        FordOutcome::Perfect => {
            format!("Flawless! Avoided every rock in the river. {conditions} Everyone is safe!")
        }
        FordOutcome::Good => format!(
            "Made it across with only a glancing blow. {conditions} No serious losses{losses}."
        ),
        FordOutcome::Rough => {
            format!("Hit several rocks crossing. {conditions} Exhausting journey{losses}.")
        }
        FordOutcome::Disastrous => {
            format!("Battered by rocks and churning water! {conditions}{losses}.")
        }
    };
    if health_loss > 0 {
        narrate_shift(&mut text, state.apply_health(-f64::from(health_loss)));
    }

    state.crossings.fords_attempted += 1;
    if outcome == FordOutcome::Perfect {
        state.crossings.perfect_fords += 1;
        if request.difficulty() >= FORD_MORALE_DIFFICULTY {
            let morale = rng.gen_range(FORD_MORALE_MIN..=FORD_MORALE_MAX);
            text.push_str(&format!(
                " Skill in dangerous conditions boosted morale! +{morale} health"
            ));
            narrate_shift(&mut text, state.apply_health(f64::from(morale)));
        }
    }
    state.clear_location();
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::ChaCha20Rng;

    fn at_river() -> PartyState {
        PartyState {
            food: 100,
            at_river: true,
            awaiting_choice: true,
            current_river: Some("Snake River Crossing".to_string()),
            current_strength: Some(CurrentStrength::Strong),
            ..PartyState::default()
        }
    }

    const CALM: FordRequest = FordRequest {
        width: RiverWidth::Narrow,
        current: CurrentStrength::Weak,
    };

    const WILD: FordRequest = FordRequest {
        width: RiverWidth::VeryWide,
        current: CurrentStrength::Moderate,
    };

    #[test]
    fn losses_scale_with_hits_and_cap() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let mut state = at_river();
        let text = apply_ford(&mut state, CALM, FordReport { hits: 3 }, &mut rng);
        assert_eq!(state.food, 85);
        assert!((state.health.value() - 85.0).abs() < f64::EPSILON);
        assert!(text.starts_with("Hit several rocks crossing."));
        assert!(text.contains("-15 health, -15 lbs food"));

        let mut state = at_river();
        let _ = apply_ford(&mut state, CALM, FordReport { hits: 20 }, &mut rng);
        assert_eq!(state.food, 40);
        assert!((state.health.value() - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn crossing_clears_river_markers_and_counts() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let mut state = at_river();
        let _ = apply_ford(&mut state, CALM, FordReport { hits: 1 }, &mut rng);
        assert!(!state.at_river && !state.awaiting_choice);
        assert!(state.current_river.is_none() && state.current_strength.is_none());
        assert_eq!(state.crossings.fords_attempted, 1);
        assert_eq!(state.crossings.perfect_fords, 0);
        assert_eq!(state.day, 2);
    }

    #[test]
    fn perfect_hard_crossing_lifts_morale() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let mut state = at_river();
        state.health = crate::health::Vitality::new(50.0);
        let text = apply_ford(&mut state, WILD, FordReport { hits: 0 }, &mut rng);
        let gained = state.health.value() - 50.0;
        assert!((5.0..=9.0).contains(&gained));
        assert!(text.contains("boosted morale"));
        assert_eq!(state.crossings.perfect_fords, 1);

        let mut state = at_river();
        state.health = crate::health::Vitality::new(50.0);
        let text = apply_ford(&mut state, CALM, FordReport { hits: 0 }, &mut rng);
        assert!((state.health.value() - 50.0).abs() < f64::EPSILON);
        assert!(!text.contains("morale"));
    }

    #[test]
    fn outcome_tiers() {
        assert_eq!(FordOutcome::from_hits(0), FordOutcome::Perfect);
        assert_eq!(FordOutcome::from_hits(1), FordOutcome::Good);
        assert_eq!(FordOutcome::from_hits(3), FordOutcome::Rough);
        assert_eq!(FordOutcome::from_hits(4), FordOutcome::Disastrous);
        assert_eq!(WILD.difficulty(), 3);
    }

    #[test]
    fn simulated_ford_is_seeded() {
        let a = SimulatedFord::new(5).ford(WILD);
        let b = SimulatedFord::new(5).ford(WILD);
        assert_eq!(a, b);
        let clean = SimulatedFord::new(5).with_hit_chance(0.0).ford(CALM);
        assert_eq!(clean.hits, 0);
    }
}
