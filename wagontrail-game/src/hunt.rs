//! Hunting adapter seam and the rules for applying a hunt's yield.
//!
//! The interactive hunt is an external mini-game. The engine hands it a
//! [`HuntRequest`], and whatever implements [`HuntingGrounds`] reports back a
//! [`HuntReport`]; [`apply_hunt`] turns that report into party changes.
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::constants::{
    HUNT_CARRY_LIMIT, HUNT_MISS_GRACE, HUNT_MISS_HEALTH_LOSS, HUNT_MISS_PENALTY_CAP,
    HUNT_MISS_PENALTY_STEP, HUNT_SCAVENGER_SHARE, HUNT_SLIM_THRESHOLD,
};
use crate::health::narrate_shift;
use crate::numbers::{floor_f64_to_i32, non_negative_u32};
use crate::state::PartyState;

/// What the hunting mini-game is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HuntRequest {
    pub bullets: i32,
}

/// What the hunting mini-game reports back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HuntReport {
    /// Total meat killed, before the carry limit.
    pub meat_lbs: i32,
    pub bullets_remaining: i32,
    pub shots_hit: i32,
}

/// Anything that can play out a hunt.
pub trait HuntingGrounds {
    fn hunt(&mut self, request: HuntRequest) -> HuntReport;
}

/// Game animals and the meat each yields.
const QUARRY: [(&str, i32); 4] = [("deer", 20), ("bison", 35), ("rabbit", 4), ("eagle", 8)];

/// Seeded stand-in for the interactive hunt.
#[derive(Debug, Clone)]
pub struct SimulatedHunt {
    rng: SmallRng,
    accuracy: f64,
    max_shots: i32,
}

impl SimulatedHunt {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            accuracy: 0.45,
            max_shots: 12,
        }
    }

    /// Override the per-shot hit chance (clamped to `0..=1`).
    #[must_use]
    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = accuracy.clamp(0.0, 1.0);
        self
    }

    /// Cap on shots per outing, standing in for the mini-game's timer.
    #[must_use]
    pub fn with_max_shots(mut self, max_shots: i32) -> Self {
        self.max_shots = max_shots.max(0);
        self
    }
}

impl HuntingGrounds for SimulatedHunt {
    fn hunt(&mut self, request: HuntRequest) -> HuntReport {
        let mut report = HuntReport {
            bullets_remaining: request.bullets.max(0),
            ..HuntReport::default()
        };
        let mut shots = 0;
        while report.bullets_remaining > 0
            && shots < self.max_shots
            && report.meat_lbs < HUNT_CARRY_LIMIT
        {
            shots += 1;
            report.bullets_remaining -= 1;
            if self.rng.gen_bool(self.accuracy) {
                report.shots_hit += 1;
                report.meat_lbs += QUARRY
                    .choose(&mut self.rng)
                    .map_or(0, |(_, meat)| *meat);
            }
        }
        report
    }
}

/// Apply a finished hunt: ammo, carried meat, the miss penalty, and a day.
pub fn apply_hunt<R: Rng + ?Sized>(
    state: &mut PartyState,
    request: HuntRequest,
    report: HuntReport,
    rng: &mut R,
) -> String {
    let remaining = report.bullets_remaining.clamp(0, request.bullets.max(0));
    let fired = request.bullets.max(0) - remaining;
    let hits = report.shots_hit.clamp(0, fired);
    let misses = fired - hits;
    state.bullets = remaining;
    state.pass_days(1);

    let killed = report.meat_lbs.max(0);
    let carried = killed.min(HUNT_CARRY_LIMIT);
    let mut kept = carried;
    let wasted = killed - carried;

    let mut penalty = None;
    let mut health_hit = None;
    if misses > HUNT_MISS_GRACE {
        let chance = (f64::from(misses - HUNT_MISS_GRACE) * HUNT_MISS_PENALTY_STEP)
            .min(HUNT_MISS_PENALTY_CAP);
        if rng.gen_bool(chance) {
            if carried > 0 {
                let lost = floor_f64_to_i32(f64::from(carried) * HUNT_SCAVENGER_SHARE);
                kept -= lost;
                penalty = Some(format!(
                    " The gunfire drew scavengers; they made off with {lost} lbs before you got back."
                ));
            } else {
                penalty = Some(
                    " All that shooting for nothing left everyone tired and on edge.".to_string(),
                );
                health_hit = Some(-HUNT_MISS_HEALTH_LOSS);
            }
        }
    }
    state.food += kept;

    let mut text = if carried <= 0 {
        "The hunt was unsuccessful. No food brought back.".to_string()
    } else if carried < HUNT_SLIM_THRESHOLD {
        format!("Slim pickings. Brought back {carried} lbs of food.")
    } else if carried < HUNT_CARRY_LIMIT {
        format!("A decent hunt! Brought back {carried} lbs of food.")
    } else {
        format!("An excellent hunt! Brought back {carried} lbs of food!")
    };
    if wasted > 0 {
        text.push_str(&format!(
            " ({wasted} lbs left behind; you can only carry {HUNT_CARRY_LIMIT} lbs.)"
        ));
    }
    if let Some(line) = penalty {
        text.push_str(&line);
    }
    if let Some(delta) = health_hit {
        narrate_shift(&mut text, state.apply_health(delta));
    }
    log::debug!(
        "hunt applied: fired {fired}, hit {hits}, killed {killed}, kept {kept}, {} bullets left",
        non_negative_u32(state.bullets)
    );
    text
}
