//! Oxen health sub-model: per-animal sickness and death trials.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::journey::OxenConfig;
use crate::numbers::non_negative_u32;
use crate::state::PartyState;

/// What the herd went through in one run of the sub-model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OxenReport {
    pub deaths: i32,
    pub newly_sick: i32,
}

impl OxenReport {
    #[must_use]
    pub const fn is_quiet(&self) -> bool {
        self.deaths == 0 && self.newly_sick == 0
    }

    /// Player-facing lines, deaths first.
    #[must_use]
    pub fn narration(&self) -> Vec<String> {
        let mut lines = Vec::new();
        match self.deaths {
            0 => {}
            1 => lines.push("1 sick ox died!".to_string()),
            n => lines.push(format!("{n} sick oxen died!")),
        }
        match self.newly_sick {
            0 => {}
            1 => lines.push("1 ox is sick!".to_string()),
            n => lines.push(format!("{n} oxen are sick!")),
        }
        lines
    }
}

/// Run the death trials for every sick ox, then the sickness trials for
/// every ox still healthy.
pub fn run_health_checks<R: Rng + ?Sized>(
    state: &mut PartyState,
    cfg: &OxenConfig,
    rng: &mut R,
) -> OxenReport {
    state.clamp_herd();
    let mut report = OxenReport::default();

    for _ in 0..non_negative_u32(state.sick_oxen) {
        if rng.gen_bool(cfg.death_chance) {
            report.deaths += 1;
        }
    }
    state.oxen -= report.deaths;
    state.sick_oxen -= report.deaths;

    for _ in 0..non_negative_u32(state.healthy_oxen()) {
        if rng.gen_bool(cfg.sick_chance) {
            report.newly_sick += 1;
        }
    }
    state.sick_oxen += report.newly_sick;
    state.clamp_herd();

    if !report.is_quiet() {
        log::debug!(
            "oxen trials: {} died, {} fell sick ({} of {} sick)",
            report.deaths,
            report.newly_sick,
            state.sick_oxen,
            state.oxen
        );
    }
    report
}

/// Cure one sick ox. Returns `false` when the whole herd is healthy.
pub fn cure_one(state: &mut PartyState) -> bool {
    if state.sick_oxen <= 0 {
        return false;
    }
    state.sick_oxen -= 1;
    true
}
