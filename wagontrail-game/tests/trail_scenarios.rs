mod common;

use common::{calm_config, party, party_at, running};
use wagontrail_game::{
    ActionError, ChoiceOutcome, Decision, EncounterChoice, EncounterId, Ending, EngineStatus,
    FordReport, FortAction, HealthRank, HuntReport, LandmarkAction, LogKind, OxenConfig,
    PartyState, PauseReason, Pending, RiverAction, TickOutcome, TrailConfig, TravelEngine, Vitality,
};

fn arrive(engine: &mut TravelEngine, expected: &str) {
    match engine.tick() {
        TickOutcome::Arrived(stop) => assert_eq!(stop.name, expected),
        other => panic!("expected arrival at {expected}, got {other:?}"),
    }
}

#[test]
fn last_rations_starve_the_party() {
    let state = PartyState {
        food: 5,
        health: Vitality::new(50.0),
        oxen: 1,
        day: 10,
        ..PartyState::default()
    };
    let mut engine = running(state, 1);

    assert_eq!(engine.tick(), TickOutcome::Ended(Ending::Starvation));
    let state = engine.state();
    assert_eq!(state.food, 0);
    assert_eq!(state.day, 11);
    assert!(state.game_over);
    assert_eq!(state.ending, Some(Ending::Starvation));
    assert_eq!(engine.status(), EngineStatus::GameOver(Ending::Starvation));
    let last = engine.log().last().expect("outcome entry");
    assert_eq!(last.kind, LogKind::Outcome);
    assert_eq!(last.text, "Your party has starved to death. Game Over.");
}

#[test]
fn reaching_oregon_city_is_victory() {
    let mut engine = running(party_at(1998), 2);

    assert_eq!(engine.tick(), TickOutcome::Ended(Ending::Victory));
    let state = engine.state();
    assert!(state.distance >= 2000);
    let expected = format!(
        "Congratulations! You made it to Oregon City in {} days on Pioneer difficulty! Your party arrived in Good health with {} lbs of food remaining!",
        state.day, state.food
    );
    assert_eq!(engine.log().last().map(|entry| entry.text.as_str()), Some(expected.as_str()));
    assert!(engine.summary().is_victory());
}

#[test]
fn unaffordable_fort_purchase_changes_nothing() {
    let state = PartyState {
        money: 5,
        ..party_at(300)
    };
    let mut engine = running(state, 3);
    arrive(&mut engine, "Fort Kearney");

    let before = engine.state().clone();
    let err = engine
        .choose(Decision::Fort(FortAction::BuyParts))
        .expect_err("too poor");
    assert_eq!(
        err,
        ActionError::InsufficientFunds {
            needed: 10,
            available: 5
        }
    );
    assert_eq!(engine.state(), &before);
    let last = engine.log().last().expect("rejection entry");
    assert_eq!(last.kind, LogKind::Rejected);
    assert_eq!(last.text, "You don't have enough money! You need $10.");
    assert_eq!(engine.status(), EngineStatus::Paused(PauseReason::Landmark));
}

#[test]
fn broke_party_is_only_offered_the_free_answer() {
    let state = PartyState {
        money: 0,
        distance: 500,
        ..PartyState::default()
    };
    let offered: Vec<EncounterChoice> = EncounterId::StrangerTradeFood
        .encounter()
        .available_choices(&state)
        .map(|spec| spec.choice)
        .collect();
    assert_eq!(offered, vec![EncounterChoice::Decline]);
}

#[test]
fn unoffered_encounter_answer_is_rejected() {
    let cfg = TrailConfig {
        encounter_base_chance: 1.0,
        ..calm_config()
    };
    let state = PartyState {
        money: 0,
        ..party_at(400)
    };
    let mut engine = TravelEngine::with_config(state, 4, cfg).expect("config");
    engine.start().expect("start");
    let TickOutcome::Encounter(id) = engine.tick() else {
        panic!("encounter chance is certain");
    };
    assert_eq!(engine.status(), EngineStatus::Paused(PauseReason::Encounter));
    assert!(engine.state().awaiting_choice);

    let foreign = if id == EncounterId::WildFruitTrees {
        EncounterChoice::AcceptTrade
    } else {
        EncounterChoice::GatherFruit
    };
    let before = engine.state().clone();
    assert_eq!(
        engine.choose(Decision::Encounter(foreign)),
        Err(ActionError::ChoiceUnavailable)
    );
    assert_eq!(engine.state(), &before);

    let first = engine.available_choices()[0].decision;
    assert_eq!(engine.choose(first), Ok(ChoiceOutcome::Resolved));
    assert!(engine.status().is_running());
    assert!(!engine.state().awaiting_choice);
}

#[test]
fn overshot_landmarks_fire_one_per_tick_in_order() {
    let state = PartyState {
        distance: 190,
        oxen: 1,
        ..party()
    };
    let mut engine = running(state, 5);

    arrive(&mut engine, "Kansas River Crossing");
    assert_eq!(
        engine.choose(Decision::River(RiverAction::Ferry)),
        Ok(ChoiceOutcome::Resolved)
    );
    arrive(&mut engine, "Big Blue River Crossing");
    assert_eq!(
        engine.choose(Decision::River(RiverAction::Ferry)),
        Ok(ChoiceOutcome::Resolved)
    );
    assert!(matches!(engine.tick(), TickOutcome::Traveled { .. }));
    assert_eq!(engine.state().visited_landmarks.len(), 2);
    assert_eq!(engine.state().crossings.ferries_taken, 2);
}

#[test]
fn fording_hands_off_and_closes_the_river() {
    let mut engine = running(party_at(1420), 6);
    arrive(&mut engine, "Snake River Crossing");
    let width = engine.state().river_widths["Snake River Crossing"];

    let outcome = engine
        .choose(Decision::River(RiverAction::Ford))
        .expect("ford");
    let ChoiceOutcome::FordStarted(request) = outcome else {
        panic!("expected the mini-game hand-off, got {outcome:?}");
    };
    assert_eq!(request.width, width);
    assert_eq!(engine.status(), EngineStatus::Paused(PauseReason::Action));
    assert!(engine.available_choices().is_empty());
    assert_eq!(engine.resume(), Err(ActionError::PausedBySystem(PauseReason::Action)));

    let day = engine.state().day;
    assert_eq!(
        engine.complete_ford(FordReport { hits: 0 }),
        Ok(ChoiceOutcome::Resolved)
    );
    let state = engine.state();
    assert_eq!(state.day, day + 1);
    assert!(!state.at_river);
    assert!(state.current_river.is_none());
    assert_eq!(state.crossings.fords_attempted, 1);
    assert_eq!(state.crossings.perfect_fords, 1);
    assert!(engine.status().is_running());
    assert_eq!(
        engine.complete_ford(FordReport { hits: 0 }),
        Err(ActionError::NoFordUnderway)
    );
}

#[test]
fn south_pass_rest_leads_to_route_choice() {
    let mut engine = running(party_at(925), 7);
    arrive(&mut engine, "South Pass");
    assert_eq!(engine.available_choices().len(), 3);

    let day = engine.state().day;
    assert_eq!(
        engine.choose(Decision::Landmark(LandmarkAction::RestBeforeClimb)),
        Ok(ChoiceOutcome::Continued)
    );
    assert_eq!(engine.state().day, day + 1);
    assert!(engine.state().awaiting_choice);
    let routes: Vec<Decision> = engine
        .available_choices()
        .iter()
        .map(|option| option.decision)
        .collect();
    assert_eq!(
        routes,
        vec![
            Decision::Landmark(LandmarkAction::Shortcut),
            Decision::Landmark(LandmarkAction::SafeRoute),
        ]
    );
    assert_eq!(
        engine.choose(Decision::Landmark(LandmarkAction::RestBeforeClimb)),
        Err(ActionError::ChoiceUnavailable)
    );
    assert_eq!(
        engine.choose(Decision::Landmark(LandmarkAction::SafeRoute)),
        Ok(ChoiceOutcome::Resolved)
    );
    assert!(engine.state().current_landmark.is_none());
    assert!(engine.pending().is_none());
}

#[test]
fn answers_for_the_wrong_stop_are_rejected() {
    let mut engine = running(party_at(630), 8);
    arrive(&mut engine, "Fort Laramie");
    assert!(matches!(engine.pending(), Some(Pending::Fort { .. })));
    assert_eq!(
        engine.choose(Decision::River(RiverAction::Ferry)),
        Err(ActionError::ChoiceUnavailable)
    );
    assert_eq!(
        engine.choose(Decision::Fort(FortAction::Leave)),
        Ok(ChoiceOutcome::Resolved)
    );
    assert_eq!(
        engine.choose(Decision::Fort(FortAction::Leave)),
        Err(ActionError::NothingPending)
    );
}

#[test]
fn no_oxen_ends_the_journey_at_the_next_tick() {
    let state = PartyState {
        oxen: 0,
        ..party()
    };
    let mut engine = running(state, 9);
    assert_eq!(engine.tick(), TickOutcome::Ended(Ending::OxenLost));
    assert_eq!(engine.state().day, 1);
    assert_eq!(
        engine.log().last().map(|entry| entry.text.as_str()),
        Some("You have no oxen! You cannot continue. Game Over.")
    );
}

#[test]
fn empty_medicine_chest_and_bullet_pouch_are_rejected() {
    let state = PartyState {
        medicine: 0,
        bullets: 0,
        ..party()
    };
    let mut engine = running(state, 10);
    let before = engine.state().clone();
    assert_eq!(engine.use_medicine(), Err(ActionError::NoMedicine));
    assert_eq!(engine.begin_hunt(), Err(ActionError::NoBullets));
    assert_eq!(engine.state(), &before);
    let texts: Vec<&str> = engine.log().iter().map(|entry| entry.text.as_str()).collect();
    assert_eq!(
        texts,
        vec!["You have no medicine left!", "You have no bullets to hunt with!"]
    );
}

#[test]
fn medicine_prefers_a_sick_ox() {
    let state = PartyState {
        sick_oxen: 2,
        health: Vitality::new(50.0),
        ..party()
    };
    let mut engine = running(state, 11);
    assert_eq!(engine.use_medicine(), Ok(ChoiceOutcome::Resolved));
    let state = engine.state();
    assert_eq!(state.sick_oxen, 1);
    assert_eq!(state.medicine, 0);
    assert!((state.health.value() - 50.0).abs() < 1e-9);
    assert_eq!(state.food, 395);
}

#[test]
fn trail_rest_heals_and_narrates_rank_change() {
    let state = PartyState {
        health: Vitality::new(70.0),
        ..party()
    };
    let mut engine = running(state, 12);
    assert_eq!(engine.rest(), Ok(ChoiceOutcome::Resolved));
    assert_eq!(engine.state().health_rank(), HealthRank::Good);
    let text = &engine.log().last().expect("rest entry").text;
    assert!(text.contains("improved to Good"), "{text}");
}

#[test]
fn journey_over_freezes_everything() {
    let state = PartyState {
        food: 3,
        ..party_at(300)
    };
    let mut engine = running(state, 13);
    assert_eq!(engine.tick(), TickOutcome::Ended(Ending::Starvation));

    let frozen = engine.state().clone();
    let entries = engine.log().len();
    assert_eq!(engine.tick(), TickOutcome::Idle);
    assert_eq!(engine.start(), Err(ActionError::GameOver));
    assert_eq!(engine.resume(), Err(ActionError::GameOver));
    assert_eq!(engine.rest(), Err(ActionError::GameOver));
    assert_eq!(engine.use_medicine(), Err(ActionError::GameOver));
    assert_eq!(engine.begin_hunt(), Err(ActionError::GameOver));
    assert_eq!(
        engine.complete_hunt(HuntReport::default()),
        Err(ActionError::GameOver)
    );
    assert_eq!(
        engine.complete_ford(FordReport { hits: 3 }),
        Err(ActionError::GameOver)
    );
    assert_eq!(
        engine.choose(Decision::Fort(FortAction::Trade)),
        Err(ActionError::GameOver)
    );
    assert!(engine.available_choices().is_empty());
    assert_eq!(engine.state(), &frozen);
    assert_eq!(engine.log().len(), entries);
}

#[test]
fn starvation_during_a_fort_rest_ends_the_stop() {
    let state = PartyState {
        food: 50,
        ..party_at(300)
    };
    let mut engine = running(state, 14);
    arrive(&mut engine, "Fort Kearney");
    let food = engine.state().food;
    assert_eq!(food, 45);

    let mut outcome = ChoiceOutcome::Continued;
    for _ in 0..6 {
        outcome = engine
            .choose(Decision::Fort(FortAction::Rest))
            .expect("rest is free");
        if outcome != ChoiceOutcome::Continued {
            break;
        }
    }
    assert_eq!(outcome, ChoiceOutcome::Ended(Ending::Starvation));
    assert!(engine.pending().is_none());
    assert!(!engine.state().at_fort);
}

fn herd_config(sick_chance: f64, death_chance: f64) -> TrailConfig {
    TrailConfig {
        oxen: OxenConfig {
            sick_chance,
            death_chance,
        },
        ..calm_config()
    }
}

fn herd(engine: &TravelEngine) -> (i32, i32) {
    (engine.state().oxen, engine.state().sick_oxen)
}

#[test]
fn fort_days_roll_for_the_herd() {
    let mut engine =
        TravelEngine::with_config(party_at(300), 14, herd_config(1.0, 0.0)).expect("config");
    engine.start().expect("start");
    arrive(&mut engine, "Fort Kearney");
    assert_eq!(herd(&engine), (4, 4));

    assert_eq!(
        engine.choose(Decision::Fort(FortAction::BuyOx)),
        Ok(ChoiceOutcome::Continued)
    );
    assert_eq!(herd(&engine), (5, 5));
    assert_eq!(
        engine.log().last().map(|entry| entry.text.as_str()),
        Some("1 ox is sick!")
    );
    assert_eq!(
        engine.choose(Decision::Fort(FortAction::Rest)),
        Ok(ChoiceOutcome::Continued)
    );
    assert_eq!(herd(&engine), (5, 5));
}

#[test]
fn landmark_answers_roll_for_the_herd() {
    let mut engine =
        TravelEngine::with_config(party_at(545), 15, herd_config(1.0, 1.0)).expect("config");
    engine.start().expect("start");
    arrive(&mut engine, "Chimney Rock");
    assert_eq!(herd(&engine), (4, 4));

    assert_eq!(
        engine.choose(Decision::Landmark(LandmarkAction::Continue)),
        Ok(ChoiceOutcome::Resolved)
    );
    assert_eq!(herd(&engine), (0, 0));
    assert!(engine.log().iter().any(|entry| entry.text == "4 sick oxen died!"));
    assert_eq!(engine.tick(), TickOutcome::Ended(Ending::OxenLost));
}

#[test]
fn finished_hunts_and_fords_roll_for_the_herd() {
    let mut engine = TravelEngine::with_config(party(), 16, herd_config(1.0, 0.0)).expect("config");
    engine.start().expect("start");
    engine.begin_hunt().expect("hunt");
    assert_eq!(herd(&engine), (4, 0));
    engine
        .complete_hunt(HuntReport {
            meat_lbs: 20,
            bullets_remaining: 18,
            shots_hit: 1,
        })
        .expect("complete hunt");
    assert_eq!(herd(&engine), (4, 4));

    let mut engine =
        TravelEngine::with_config(party_at(1420), 17, herd_config(1.0, 1.0)).expect("config");
    engine.start().expect("start");
    arrive(&mut engine, "Snake River Crossing");
    assert_eq!(herd(&engine), (4, 4));
    engine
        .choose(Decision::River(RiverAction::Ford))
        .expect("ford");
    assert_eq!(herd(&engine), (4, 4));
    assert_eq!(
        engine.complete_ford(FordReport { hits: 0 }),
        Ok(ChoiceOutcome::Resolved)
    );
    assert_eq!(herd(&engine), (0, 0));
}
