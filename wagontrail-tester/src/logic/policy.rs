use std::fmt;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;
use wagontrail_game::{
    ChoiceOption, Decision, EncounterChoice, FortAction, LandmarkAction, Outfit, OutfitItem,
    PartyState, RiverAction,
};

/// Decision returned by a [`PlayerPolicy`]
#[derive(Debug, Clone)]
pub struct PolicyDecision {
    pub choice_index: usize,
    pub rationale: Option<String>,
}

impl PolicyDecision {
    #[must_use]
    pub fn new(choice_index: usize, rationale: Option<String>) -> Self {
        Self {
            choice_index,
            rationale,
        }
    }
}

/// Policy interface for automated play strategies.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Spend the outfitting budget before departure.
    fn outfit(&mut self, outfit: &mut Outfit);

    /// Select one of the offered answers to the pending decision.
    fn pick_choice(&mut self, state: &PartyState, choices: &[ChoiceOption]) -> PolicyDecision;

    /// Whether to stop and hunt before the next day of travel.
    fn wants_hunt(&mut self, state: &PartyState) -> bool {
        state.food < 60 && state.bullets > 0
    }

    /// Whether to dose the party (or a sick ox) before the next day of travel.
    fn wants_medicine(&mut self, _state: &PartyState) -> bool {
        false
    }
}

/// Built-in strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Cautious,
    Bold,
    Thrifty,
    Random,
}

impl Strategy {
    pub const ALL: [Self; 4] = [Self::Cautious, Self::Bold, Self::Thrifty, Self::Random];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Strategy::Cautious => "Cautious",
            Strategy::Bold => "Bold",
            Strategy::Thrifty => "Thrifty",
            Strategy::Random => "Random",
        }
    }

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Strategy::Cautious => "cautious",
            Strategy::Bold => "bold",
            Strategy::Thrifty => "thrifty",
            Strategy::Random => "random",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Strategy::Cautious => "Stocks up, ferries when it can, rests and doctors early",
            Strategy::Bold => "Big team of oxen, fords everything, takes every shortcut",
            Strategy::Thrifty => "Buys the minimum and hoards cash; fords to save the fare",
            Strategy::Random => "Random outfitting and answers from a seeded generator",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.key().eq_ignore_ascii_case(value))
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy + Send> {
        match self {
            Strategy::Cautious => Box::new(CautiousPolicy),
            Strategy::Bold => Box::new(BoldPolicy),
            Strategy::Thrifty => Box::new(ThriftyPolicy),
            Strategy::Random => Box::new(RandomPolicy::new(seed)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct CautiousPolicy;
struct BoldPolicy;
struct ThriftyPolicy;

struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

/// Highest-scoring choice; ties go to the earliest offer.
fn best_by(choices: &[ChoiceOption], mut score: impl FnMut(Decision) -> i32) -> PolicyDecision {
    let mut best: Option<(usize, i32)> = None;
    for (idx, option) in choices.iter().enumerate() {
        let value = score(option.decision);
        if best.is_none_or(|(_, top)| value > top) {
            best = Some((idx, value));
        }
    }
    let (idx, value) = best.unwrap_or((0, 0));
    PolicyDecision::new(idx, Some(format!("score {value}")))
}

fn affordable(action: FortAction, state: &PartyState) -> bool {
    action.price().is_none_or(|price| state.money >= price)
}

impl PlayerPolicy for CautiousPolicy {
    fn name(&self) -> &'static str {
        "Cautious"
    }

    fn outfit(&mut self, outfit: &mut Outfit) {
        outfit.buy_up_to(OutfitItem::Oxen, 4);
        outfit.buy_up_to(OutfitItem::Medicine, 2);
        outfit.buy_up_to(OutfitItem::SpareParts, 1);
        outfit.buy_up_to(OutfitItem::Clothing, 1);
        outfit.buy_up_to(OutfitItem::Food, 24);
    }

    fn pick_choice(&mut self, state: &PartyState, choices: &[ChoiceOption]) -> PolicyDecision {
        best_by(choices, |decision| cautious_score(decision, state))
    }

    fn wants_hunt(&mut self, state: &PartyState) -> bool {
        state.food < 80 && state.bullets > 0
    }

    fn wants_medicine(&mut self, state: &PartyState) -> bool {
        state.medicine > 0 && (state.sick_oxen > 0 || state.health.value() < 40.0)
    }
}

fn cautious_score(decision: Decision, state: &PartyState) -> i32 {
    match decision {
        Decision::Fort(action) if !affordable(action, state) => -100,
        Decision::Fort(FortAction::Trade) if state.food < 200 => 50,
        Decision::Fort(FortAction::BuyMedicine) if state.medicine == 0 => 40,
        Decision::Fort(FortAction::BuyOx) if state.healthy_oxen() < 2 => 45,
        Decision::Fort(FortAction::Rest) if state.health.value() < 50.0 => 30,
        Decision::Fort(FortAction::Leave) => 10,
        Decision::River(RiverAction::Ferry) if state.money >= 10 => 40,
        Decision::River(RiverAction::Scout) if state.food > 100 => 20,
        Decision::River(RiverAction::Ford) => 5,
        Decision::Landmark(
            LandmarkAction::SafeRoute | LandmarkAction::RestBeforeClimb | LandmarkAction::TakeItSlow,
        ) => 30,
        Decision::Landmark(LandmarkAction::Rest) if state.health.value() < 60.0 => 25,
        Decision::Landmark(LandmarkAction::Continue | LandmarkAction::RiverRoute) => 10,
        Decision::Encounter(
            EncounterChoice::TreatWithMedicine
            | EncounterChoice::StayOnTrail
            | EncounterChoice::ShoutForHelp
            | EncounterChoice::GatherFruit
            | EncounterChoice::PayForGuidance,
        ) => 30,
        Decision::Encounter(EncounterChoice::AcceptTrade) if state.food < 150 => 25,
        Decision::Encounter(EncounterChoice::Decline | EncounterChoice::LeaveWagon) => 15,
        _ => 0,
    }
}

impl PlayerPolicy for BoldPolicy {
    fn name(&self) -> &'static str {
        "Bold"
    }

    fn outfit(&mut self, outfit: &mut Outfit) {
        outfit.buy_up_to(OutfitItem::Oxen, 6);
        outfit.buy_up_to(OutfitItem::Medicine, 1);
        outfit.buy_up_to(OutfitItem::Food, 14);
    }

    fn pick_choice(&mut self, state: &PartyState, choices: &[ChoiceOption]) -> PolicyDecision {
        best_by(choices, |decision| bold_score(decision, state))
    }
}

fn bold_score(decision: Decision, state: &PartyState) -> i32 {
    match decision {
        Decision::Fort(action) if !affordable(action, state) => -100,
        Decision::Fort(FortAction::Trade) if state.food < 100 => 40,
        Decision::Fort(FortAction::BuyBullets) if state.bullets < 10 => 30,
        Decision::Fort(FortAction::Leave) => 20,
        Decision::River(RiverAction::Ford) => 40,
        Decision::Landmark(
            LandmarkAction::Shortcut
            | LandmarkAction::Climb
            | LandmarkAction::PushThrough
            | LandmarkAction::MountainRoute
            | LandmarkAction::Explore
            | LandmarkAction::Search,
        ) => 30,
        Decision::Landmark(LandmarkAction::Continue) => 10,
        Decision::Encounter(
            EncounterChoice::TakeShortcut
            | EncounterChoice::PushOn
            | EncounterChoice::Confront
            | EncounterChoice::SearchWagon
            | EncounterChoice::GrabHandfuls
            | EncounterChoice::Haggle,
        ) => 30,
        Decision::Encounter(EncounterChoice::MoveOn | EncounterChoice::KeepMoving) => 15,
        _ => 0,
    }
}

impl PlayerPolicy for ThriftyPolicy {
    fn name(&self) -> &'static str {
        "Thrifty"
    }

    fn outfit(&mut self, outfit: &mut Outfit) {
        outfit.buy_up_to(OutfitItem::Oxen, 3);
        outfit.buy_up_to(OutfitItem::Medicine, 1);
        outfit.buy_up_to(OutfitItem::Food, 12);
    }

    fn pick_choice(&mut self, state: &PartyState, choices: &[ChoiceOption]) -> PolicyDecision {
        best_by(choices, |decision| thrifty_score(decision, state))
    }

    fn wants_hunt(&mut self, state: &PartyState) -> bool {
        state.food < 100 && state.bullets > 0
    }

    fn wants_medicine(&mut self, state: &PartyState) -> bool {
        state.medicine > 0 && state.health.value() < 25.0
    }
}

fn thrifty_score(decision: Decision, state: &PartyState) -> i32 {
    match decision {
        Decision::Fort(action) if !affordable(action, state) => -100,
        Decision::Fort(FortAction::Trade) if state.food < 60 => 30,
        Decision::Fort(FortAction::Leave) => 20,
        Decision::River(RiverAction::Ford) => 30,
        Decision::River(RiverAction::Scout) if state.food > 150 => 10,
        Decision::Landmark(
            LandmarkAction::Search | LandmarkAction::FillContainers | LandmarkAction::Explore,
        ) => 30,
        Decision::Landmark(LandmarkAction::SafeRoute | LandmarkAction::Continue) => 15,
        Decision::Encounter(
            EncounterChoice::Decline
            | EncounterChoice::GatherFruit
            | EncounterChoice::SearchWagon
            | EncounterChoice::TradeClothing
            | EncounterChoice::StayOnTrail,
        ) => 25,
        Decision::Encounter(EncounterChoice::PayForGuidance | EncounterChoice::BuyParts) => -20,
        _ => 0,
    }
}

impl PlayerPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn outfit(&mut self, outfit: &mut Outfit) {
        let oxen = self.rng.gen_range(1..=6);
        outfit.buy_up_to(OutfitItem::Oxen, oxen);
        for item in [OutfitItem::Medicine, OutfitItem::SpareParts, OutfitItem::Clothing] {
            let units = self.rng.gen_range(0..=2);
            outfit.buy_up_to(item, units);
        }
        let crates = self.rng.gen_range(8..=24);
        outfit.buy_up_to(OutfitItem::Food, crates);
    }

    fn pick_choice(&mut self, _state: &PartyState, choices: &[ChoiceOption]) -> PolicyDecision {
        let indices: Vec<usize> = (0..choices.len()).collect();
        let idx = indices.choose(&mut self.rng).copied().unwrap_or(0);
        PolicyDecision::new(idx, Some("random pick".to_string()))
    }

    fn wants_hunt(&mut self, state: &PartyState) -> bool {
        state.food < 80 && state.bullets > 0 && self.rng.gen_bool(0.5)
    }

    fn wants_medicine(&mut self, state: &PartyState) -> bool {
        state.medicine > 0 && state.sick_oxen > 0 && self.rng.gen_bool(0.5)
    }
}
