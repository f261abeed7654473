#![allow(dead_code)]

use wagontrail_game::{Difficulty, OxenConfig, PartyState, TrailConfig, TravelEngine};

/// Tuning with every random interruption switched off.
pub fn calm_config() -> TrailConfig {
    TrailConfig {
        passive_event_chance: 0.0,
        encounter_base_chance: 0.0,
        encounter_progress_bonus: 0.0,
        oxen: OxenConfig {
            sick_chance: 0.0,
            death_chance: 0.0,
        },
        ..TrailConfig::default()
    }
}

pub fn party() -> PartyState {
    PartyState {
        food: 400,
        money: 60,
        oxen: 4,
        medicine: 1,
        ..PartyState::new(Difficulty::Pioneer)
    }
}

/// Party that has already passed (and handled) every landmark before `distance`.
pub fn party_at(distance: i32) -> PartyState {
    let visited = wagontrail_game::LANDMARKS
        .iter()
        .filter(|landmark| landmark.distance < distance)
        .map(|landmark| landmark.name.to_string())
        .collect();
    PartyState {
        distance,
        visited_landmarks: visited,
        ..party()
    }
}

pub fn running(state: PartyState, seed: u64) -> TravelEngine {
    let mut engine = TravelEngine::with_config(state, seed, calm_config()).expect("valid config");
    engine.start().expect("start");
    engine
}
