//! Scripted landmark vignettes.
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{ChoiceList, ChoiceOption, Decision, Resolution};
use crate::error::ActionError;
use crate::health::narrate_shift;
use crate::state::PartyState;

/// Landmarks with their own script; everything else gets the generic one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Site {
    ChimneyRock,
    IndependenceRock,
    SouthPass,
    SodaSprings,
    BlueMountains,
    TheDalles,
    Generic,
}

impl Site {
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "Chimney Rock" => Self::ChimneyRock,
            "Independence Rock" => Self::IndependenceRock,
            "South Pass" => Self::SouthPass,
            "Soda Springs" => Self::SodaSprings,
            "Blue Mountains" => Self::BlueMountains,
            "The Dalles" => Self::TheDalles,
            _ => Self::Generic,
        }
    }
}

/// South Pass asks twice when the party rests first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkPhase {
    #[default]
    Arrived,
    RouteChoice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkAction {
    Climb,
    Carve,
    Search,
    Shortcut,
    SafeRoute,
    RestBeforeClimb,
    Drink,
    FillContainers,
    PushThrough,
    TakeItSlow,
    RiverRoute,
    MountainRoute,
    Explore,
    Rest,
    Continue,
}

const REST_HEAL: f64 = 15.0;
const REST_FOOD: i32 = 8;

/// Actions offered at `site` in `phase`, with their labels.
#[must_use]
pub fn actions(site: Site, phase: LandmarkPhase) -> &'static [(LandmarkAction, &'static str)] {
    use LandmarkAction as A;
    match (site, phase) {
        (Site::ChimneyRock, _) => &[
            (A::Climb, "Climb to get a better view"),
            (A::Rest, "Rest and admire from below"),
            (A::Continue, "Keep moving"),
        ],
        (Site::IndependenceRock, _) => &[
            (A::Carve, "Carve your name (takes time)"),
            (A::Search, "Search for supplies left by others"),
            (A::Continue, "Keep moving"),
        ],
        (Site::SouthPass, LandmarkPhase::Arrived) => &[
            (A::Shortcut, "Take the steep shortcut"),
            (A::SafeRoute, "Take the longer safer route"),
            (A::RestBeforeClimb, "Rest before the climb (then choose a route)"),
        ],
        (Site::SouthPass, LandmarkPhase::RouteChoice) => &[
            (A::Shortcut, "Take the steep shortcut"),
            (A::SafeRoute, "Take the longer safer route"),
        ],
        (Site::SodaSprings, _) => &[
            (A::Drink, "Drink from the springs (health benefit)"),
            (A::FillContainers, "Fill containers with water"),
            (A::Continue, "Keep moving"),
        ],
        (Site::BlueMountains, _) => &[
            (A::PushThrough, "Push through quickly"),
            (A::TakeItSlow, "Take it slow and steady"),
            (A::Rest, "Rest before attempting"),
        ],
        (Site::TheDalles, _) => &[
            (A::RiverRoute, "Take the dangerous river route (faster)"),
            (A::MountainRoute, "Take the mountain route (slower but safer)"),
            (A::Rest, "Rest and decide later"),
        ],
        (Site::Generic, _) => &[
            (A::Explore, "Explore the area"),
            (A::Rest, "Rest here"),
            (A::Continue, "Keep moving"),
        ],
    }
}

#[must_use]
pub fn options(site: Site, phase: LandmarkPhase) -> ChoiceList {
    actions(site, phase)
        .iter()
        .map(|(action, label)| ChoiceOption::new(Decision::Landmark(*action), *label))
        .collect()
}

/// Open a landmark stop and return the greeting.
pub fn arrive(state: &mut PartyState, name: &str) -> (Site, String) {
    state.awaiting_choice = true;
    state.current_landmark = Some(name.to_string());
    let site = Site::from_name(name);
    let text = match site {
        Site::ChimneyRock => "You've reached Chimney Rock, a towering natural monument!".to_string(),
        Site::IndependenceRock => {
            "Independence Rock, where travelers carve their names into the granite!".to_string()
        }
        Site::SouthPass => {
            "South Pass, the gateway through the Rocky Mountains! You must choose a route through."
                .to_string()
        }
        Site::SodaSprings => "Soda Springs, where natural carbonated water bubbles up!".to_string(),
        Site::BlueMountains => "The Blue Mountains. A challenging climb lies ahead!".to_string(),
        Site::TheDalles => "The Dalles, the decision point for the final stretch!".to_string(),
        Site::Generic => format!("You've reached {name}!"),
    };
    (site, text)
}

/// Apply a landmark choice. Every accepted choice costs at least one day.
///
/// # Errors
///
/// Returns [`ActionError::ChoiceUnavailable`] when `action` is not offered at
/// this site and phase.
pub fn resolve<R: Rng + ?Sized>(
    site: Site,
    phase: LandmarkPhase,
    action: LandmarkAction,
    state: &mut PartyState,
    rng: &mut R,
) -> Result<Resolution, ActionError> {
    if !actions(site, phase).iter().any(|(offered, _)| *offered == action) {
        return Err(ActionError::ChoiceUnavailable);
    }
    state.pass_days(1);

    let mut health_delta = None;
    let body = match action {
        LandmarkAction::Climb => {
            if rng.gen_bool(0.4) {
                health_delta = Some(-5.0);
                "The climb was tiring but the view was spectacular!".to_string()
            } else {
                health_delta = Some(-10.0);
                "You slipped while climbing! Minor injuries.".to_string()
            }
        }
        LandmarkAction::Carve => {
            state.consume_food(5);
            state.pass_days(1);
            "You carved your name for posterity! Other travelers will see your mark. -5 lbs food, +1 day"
                .to_string()
        }
        LandmarkAction::Search => {
            if rng.gen_bool(0.5) {
                state.food += 10;
                state.money += 5;
                "You found supplies left by earlier travelers! +10 lbs food, +$5".to_string()
            } else {
                "You searched but found nothing of value.".to_string()
            }
        }
        LandmarkAction::Shortcut => {
            if rng.gen_bool(0.5) {
                state.distance += 40;
                health_delta = Some(-15.0);
                "The shortcut worked! You saved distance but it was exhausting. +40 miles"
                    .to_string()
            } else {
                state.consume_food(10);
                health_delta = Some(-25.0);
                "The shortcut was a disaster! Very difficult terrain. -10 lbs food".to_string()
            }
        }
        LandmarkAction::SafeRoute => {
            state.consume_food(8);
            state.pass_days(1);
            "You took the safer route. It took longer but everyone is okay. -8 lbs food, +1 day"
                .to_string()
        }
        LandmarkAction::RestBeforeClimb => {
            state.consume_food(REST_FOOD);
            let mut text = format!("Day {}: You rested at South Pass. -{REST_FOOD} lbs food", state.day);
            narrate_shift(&mut text, state.apply_health(REST_HEAL));
            text.push_str(" Now you must choose your route through the mountains.");
            return Ok(Resolution::Stay(text));
        }
        LandmarkAction::Drink => {
            health_delta = Some(15.0);
            "The mineral water was refreshing!".to_string()
        }
        LandmarkAction::FillContainers => {
            state.food += 5;
            "You filled containers with water. This will help on the trail. +5 lbs food equivalent"
                .to_string()
        }
        LandmarkAction::PushThrough => {
            if rng.gen_bool(0.5) {
                state.distance += 30;
                state.consume_food(10);
                health_delta = Some(-15.0);
                "You pushed through! Made good time but it was grueling. +30 miles, -10 lbs food"
                    .to_string()
            } else {
                state.oxen -= 1;
                state.clamp_herd();
                health_delta = Some(-25.0);
                "Pushing too hard was a mistake! An ox died from exhaustion. -1 ox".to_string()
            }
        }
        LandmarkAction::TakeItSlow => {
            state.consume_food(12);
            state.pass_days(2);
            health_delta = Some(-5.0);
            "Slow and steady. Everyone made it through safely. -12 lbs food, +2 days".to_string()
        }
        LandmarkAction::RiverRoute => {
            if rng.gen_bool(0.4) {
                state.distance += 50;
                "The river route was fast! Great choice. +50 miles".to_string()
            } else {
                state.consume_food(15);
                health_delta = Some(-20.0);
                "The river was treacherous! You made it but at great cost. -15 lbs food"
                    .to_string()
            }
        }
        LandmarkAction::MountainRoute => {
            state.consume_food(15);
            state.pass_days(3);
            health_delta = Some(-10.0);
            "The mountain route was long but safe. -15 lbs food, +3 days".to_string()
        }
        LandmarkAction::Explore => {
            if rng.gen_bool(0.4) {
                state.food += 8;
                "You found some useful plants and berries! +8 lbs food".to_string()
            } else {
                state.consume_food(5);
                "You explored but didn't find much. -5 lbs food".to_string()
            }
        }
        LandmarkAction::Rest => {
            state.consume_food(REST_FOOD);
            health_delta = Some(REST_HEAL);
            format!("You rested. -{REST_FOOD} lbs food")
        }
        LandmarkAction::Continue => "You continue on the trail without delay.".to_string(),
    };

    let mut text = format!("Day {}: {body}", state.day);
    if let Some(delta) = health_delta {
        narrate_shift(&mut text, state.apply_health(delta));
    }
    state.clear_location();
    Ok(Resolution::Done(text))
}
