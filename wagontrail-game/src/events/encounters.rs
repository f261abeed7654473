//! Interactive encounters that halt the wagon until the player answers.
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Condition, EventCategory, WeightedEntry, pick_weighted};
use crate::constants::GOAL_DISTANCE;
use crate::health::narrate_shift;
use crate::journey::SelectionTrace;
use crate::state::PartyState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterId {
    StrangerTradeFood,
    StrangerTradeParts,
    SickChild,
    TrailShortcut,
    ThiefInNight,
    WildFruitTrees,
    AbandonedWagon,
    PlainsTraders,
}

impl EncounterId {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::StrangerTradeFood => "stranger_trade_food",
            Self::StrangerTradeParts => "stranger_trade_parts",
            Self::SickChild => "sick_child",
            Self::TrailShortcut => "trail_shortcut",
            Self::ThiefInNight => "thief_in_night",
            Self::WildFruitTrees => "wild_fruit_trees",
            Self::AbandonedWagon => "abandoned_wagon",
            Self::PlainsTraders => "plains_traders",
        }
    }

    /// Table row for this encounter.
    #[must_use]
    pub fn encounter(self) -> &'static Encounter {
        match self {
            Self::StrangerTradeFood => &ENCOUNTERS[0],
            Self::StrangerTradeParts => &ENCOUNTERS[1],
            Self::SickChild => &ENCOUNTERS[2],
            Self::TrailShortcut => &ENCOUNTERS[3],
            Self::ThiefInNight => &ENCOUNTERS[4],
            Self::WildFruitTrees => &ENCOUNTERS[5],
            Self::AbandonedWagon => &ENCOUNTERS[6],
            Self::PlainsTraders => &ENCOUNTERS[7],
        }
    }
}

impl fmt::Display for EncounterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Every answer any encounter can offer. Each belongs to exactly one encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterChoice {
    AcceptTrade,
    Decline,
    Haggle,
    BuyParts,
    OfferRide,
    MoveOn,
    TreatWithMedicine,
    RestAndHope,
    PushOn,
    TakeShortcut,
    StayOnTrail,
    Confront,
    ShoutForHelp,
    OfferFood,
    GatherFruit,
    GrabHandfuls,
    KeepMoving,
    SearchWagon,
    GlanceWagon,
    LeaveWagon,
    TradeClothing,
    PayForGuidance,
    Wave,
}

#[derive(Debug, Clone, Copy)]
pub struct ChoiceSpec {
    pub choice: EncounterChoice,
    pub label: &'static str,
    pub condition: Option<Condition>,
}

impl ChoiceSpec {
    const fn always(choice: EncounterChoice, label: &'static str) -> Self {
        Self {
            choice,
            label,
            condition: None,
        }
    }

    const fn when(choice: EncounterChoice, label: &'static str, condition: Condition) -> Self {
        Self {
            choice,
            label,
            condition: Some(condition),
        }
    }

    #[must_use]
    pub fn is_available(&self, state: &PartyState) -> bool {
        self.condition.is_none_or(|check| check(state))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Encounter {
    pub id: EncounterId,
    pub category: EventCategory,
    pub weight: u32,
    pub condition: Option<Condition>,
    pub choices: &'static [ChoiceSpec],
}

impl Encounter {
    /// Choices whose own predicates pass right now.
    pub fn available_choices<'a>(
        &'a self,
        state: &'a PartyState,
    ) -> impl Iterator<Item = &'a ChoiceSpec> + 'a {
        self.choices
            .iter()
            .filter(move |spec| spec.is_available(state))
    }

    #[must_use]
    pub fn offers(&self, choice: EncounterChoice, state: &PartyState) -> bool {
        self.available_choices(state)
            .any(|spec| spec.choice == choice)
    }
}

impl WeightedEntry for Encounter {
    fn key(&self) -> &'static str {
        self.id.key()
    }

    fn weight(&self) -> u32 {
        self.weight
    }

    fn condition(&self) -> Option<Condition> {
        self.condition
    }
}

fn money_at_least_15(state: &PartyState) -> bool {
    state.money >= 15
}

fn money_at_least_10(state: &PartyState) -> bool {
    state.money >= 10
}

fn money_at_least_5(state: &PartyState) -> bool {
    state.money >= 5
}

fn food_to_spare(state: &PartyState) -> bool {
    state.food > 30
}

fn has_medicine(state: &PartyState) -> bool {
    state.medicine > 0
}

fn has_clothing(state: &PartyState) -> bool {
    state.clothing > 0
}

const FOOD_TRADER_CHOICES: [ChoiceSpec; 3] = [
    ChoiceSpec::when(
        EncounterChoice::AcceptTrade,
        "Accept the trade ($15 for 30 lbs food)",
        money_at_least_15,
    ),
    ChoiceSpec::always(EncounterChoice::Decline, "Decline politely"),
    ChoiceSpec::when(
        EncounterChoice::Haggle,
        "Try to haggle ($10 instead)",
        money_at_least_10,
    ),
];

const BROKEN_WAGON_CHOICES: [ChoiceSpec; 3] = [
    ChoiceSpec::when(
        EncounterChoice::BuyParts,
        "Buy the spare parts ($5)",
        money_at_least_5,
    ),
    ChoiceSpec::when(
        EncounterChoice::OfferRide,
        "Offer them a ride instead",
        food_to_spare,
    ),
    ChoiceSpec::always(EncounterChoice::MoveOn, "Wish them well and move on"),
];

const SICK_CHILD_CHOICES: [ChoiceSpec; 3] = [
    ChoiceSpec::when(
        EncounterChoice::TreatWithMedicine,
        "Use medicine to treat them",
        has_medicine,
    ),
    ChoiceSpec::always(
        EncounterChoice::RestAndHope,
        "Rest for a day and hope they recover",
    ),
    ChoiceSpec::always(EncounterChoice::PushOn, "Push on, we can't afford to stop"),
];

const SHORTCUT_CHOICES: [ChoiceSpec; 2] = [
    ChoiceSpec::always(EncounterChoice::TakeShortcut, "Take the shortcut"),
    ChoiceSpec::always(EncounterChoice::StayOnTrail, "Stick to the main trail"),
];

const THIEF_CHOICES: [ChoiceSpec; 3] = [
    ChoiceSpec::always(EncounterChoice::Confront, "Confront them"),
    ChoiceSpec::always(EncounterChoice::ShoutForHelp, "Shout for help"),
    ChoiceSpec::when(
        EncounterChoice::OfferFood,
        "Offer them some food",
        food_to_spare,
    ),
];

const FRUIT_CHOICES: [ChoiceSpec; 3] = [
    ChoiceSpec::always(EncounterChoice::GatherFruit, "Spend time gathering fruit"),
    ChoiceSpec::always(
        EncounterChoice::GrabHandfuls,
        "Grab a few handfuls and keep moving",
    ),
    ChoiceSpec::always(EncounterChoice::KeepMoving, "Keep moving, no time to stop"),
];

const ABANDONED_WAGON_CHOICES: [ChoiceSpec; 3] = [
    ChoiceSpec::always(EncounterChoice::SearchWagon, "Search thoroughly"),
    ChoiceSpec::always(EncounterChoice::GlanceWagon, "Quick glance and move on"),
    ChoiceSpec::always(EncounterChoice::LeaveWagon, "Leave it alone, could be trouble"),
];

const TRADERS_CHOICES: [ChoiceSpec; 3] = [
    ChoiceSpec::when(
        EncounterChoice::TradeClothing,
        "Trade clothing for food (1 set for 25 lbs)",
        has_clothing,
    ),
    ChoiceSpec::when(
        EncounterChoice::PayForGuidance,
        "Pay for guidance ($10)",
        money_at_least_10,
    ),
    ChoiceSpec::always(EncounterChoice::Wave, "Wave and continue on"),
];

fn past_mile_100(state: &PartyState) -> bool {
    state.distance > 100
}

fn past_mile_150(state: &PartyState) -> bool {
    state.distance > 150
}

fn child_can_fall_ill(state: &PartyState) -> bool {
    state.distance > 50 && state.health.value() > 30.0
}

fn shortcut_country(state: &PartyState) -> bool {
    state.distance > 200 && state.distance < 1500
}

fn past_mile_80(state: &PartyState) -> bool {
    state.distance > 80
}

fn traders_country(state: &PartyState) -> bool {
    state.distance > 150 && state.distance < 1600
}

/// Encounter table; order must match [`EncounterId::encounter`].
pub const ENCOUNTERS: [Encounter; 8] = [
    Encounter {
        id: EncounterId::StrangerTradeFood,
        category: EventCategory::Trade,
        weight: 2,
        condition: Some(past_mile_100),
        choices: &FOOD_TRADER_CHOICES,
    },
    Encounter {
        id: EncounterId::StrangerTradeParts,
        category: EventCategory::Trade,
        weight: 1,
        condition: Some(past_mile_150),
        choices: &BROKEN_WAGON_CHOICES,
    },
    Encounter {
        id: EncounterId::SickChild,
        category: EventCategory::Health,
        weight: 1,
        condition: Some(child_can_fall_ill),
        choices: &SICK_CHILD_CHOICES,
    },
    Encounter {
        id: EncounterId::TrailShortcut,
        category: EventCategory::Route,
        weight: 1,
        condition: Some(shortcut_country),
        choices: &SHORTCUT_CHOICES,
    },
    Encounter {
        id: EncounterId::ThiefInNight,
        category: EventCategory::Danger,
        weight: 1,
        condition: Some(past_mile_100),
        choices: &THIEF_CHOICES,
    },
    Encounter {
        id: EncounterId::WildFruitTrees,
        category: EventCategory::Foraging,
        weight: 2,
        condition: None,
        choices: &FRUIT_CHOICES,
    },
    Encounter {
        id: EncounterId::AbandonedWagon,
        category: EventCategory::Discovery,
        weight: 1,
        condition: Some(past_mile_80),
        choices: &ABANDONED_WAGON_CHOICES,
    },
    Encounter {
        id: EncounterId::PlainsTraders,
        category: EventCategory::People,
        weight: 1,
        condition: Some(traders_country),
        choices: &TRADERS_CHOICES,
    },
];

/// Per-tick firing chance: the base plus a share of the bonus proportional to progress.
#[must_use]
pub fn encounter_chance(distance: i32, base: f64, progress_bonus: f64) -> f64 {
    let progress = f64::from(distance.max(0)) / f64::from(GOAL_DISTANCE);
    (base + progress * progress_bonus).clamp(0.0, 1.0)
}

/// Roll whether an encounter fires today and, if so, which one.
pub fn roll_encounter<R: Rng + ?Sized>(
    state: &PartyState,
    base: f64,
    progress_bonus: f64,
    rng: &mut R,
) -> Option<(EncounterId, SelectionTrace)> {
    if !rng.gen_bool(encounter_chance(state.distance, base, progress_bonus)) {
        return None;
    }
    let (idx, trace) = pick_weighted("encounters", &ENCOUNTERS, state, rng)?;
    Some((ENCOUNTERS[idx].id, trace))
}

/// Prompt shown when the encounter fires.
pub fn prompt<R: Rng + ?Sized>(id: EncounterId, rng: &mut R) -> String {
    let text = match id {
        EncounterId::StrangerTradeFood => [
            "A lone traveler approaches your wagon and offers 30 lbs of food for $15.",
            "A grizzled trapper flags you down. \"Got meat to sell. 30 lbs for $15.\"",
            "A woman pushing a handcart offers dried provisions, 30 lbs for $15.",
        ]
        .choose(rng)
        .copied()
        .unwrap_or_default(),
        EncounterId::StrangerTradeParts => {
            "A wagon ahead has broken down for good. The family offers their spare parts for $5; they won't be needing them now."
        }
        EncounterId::SickChild => {
            "One of the children has come down with a fever. They're shivering and can barely walk."
        }
        EncounterId::TrailShortcut => {
            "The trail forks. A hand-painted sign points to a shortcut that saves two days, but the path looks rough."
        }
        EncounterId::ThiefInNight => {
            "You wake to find someone rummaging through your supplies! They freeze when they see you."
        }
        EncounterId::WildFruitTrees => {
            "A grove of wild fruit trees stands just off the trail. Gathering would take some time."
        }
        EncounterId::AbandonedWagon => {
            "An abandoned wagon sits off the trail, weathered by many seasons. Worth searching?"
        }
        EncounterId::PlainsTraders => {
            "A band of traders camped near the trail signals that they wish to trade."
        }
    };
    text.to_string()
}

/// Apply a chosen answer and return its narration.
///
/// Callers must first confirm the choice is offered; this never re-checks
/// predicates.
pub fn resolve_choice<R: Rng + ?Sized>(
    choice: EncounterChoice,
    state: &mut PartyState,
    rng: &mut R,
) -> String {
    let mut health_delta = None;
    let mut text = match choice {
        EncounterChoice::AcceptTrade => {
            state.spend(15);
            state.food += 30;
            "You complete the trade. +30 lbs food, -$15.".to_string()
        }
        EncounterChoice::Decline => [
            "You politely decline. The traveler nods and moves on.",
            "\"No thank you.\" The stranger tips their hat and walks on.",
            "You pass on the offer. Can't spend what you might need later.",
        ]
        .choose(rng)
        .copied()
        .unwrap_or_default()
        .to_string(),
        EncounterChoice::Haggle => {
            if rng.gen_bool(0.5) {
                state.spend(10);
                state.food += 30;
                "They accept your counter-offer! +30 lbs food, -$10.".to_string()
            } else {
                [
                    "They scoff and walk away. \"That's my price, take it or leave it.\"",
                    "\"I don't haggle.\" They leave without another word.",
                ]
                .choose(rng)
                .copied()
                .unwrap_or_default()
                .to_string()
            }
        }
        EncounterChoice::BuyParts => {
            state.spend(5);
            state.spare_parts += 1;
            "A sad transaction, but a practical one. +1 spare part, -$5.".to_string()
        }
        EncounterChoice::OfferRide => {
            state.consume_food(10);
            health_delta = Some(5.0);
            "You carry them to the next fort. It costs food but feels right. -10 lbs food."
                .to_string()
        }
        EncounterChoice::MoveOn => {
            "You tip your hat and roll on, hoping they'll be alright.".to_string()
        }
        EncounterChoice::TreatWithMedicine => {
            state.medicine -= 1;
            health_delta = Some(15.0);
            "The medicine works. The fever breaks by morning.".to_string()
        }
        EncounterChoice::RestAndHope => {
            state.consume_food(8);
            state.pass_days(1);
            if rng.gen_bool(0.6) {
                health_delta = Some(5.0);
                "A day of rest helps. The child is feeling better. -8 lbs food, +1 day.".to_string()
            } else {
                health_delta = Some(-15.0);
                "The fever worsens before it breaks. A frightening night. -8 lbs food, +1 day."
                    .to_string()
            }
        }
        EncounterChoice::PushOn => {
            health_delta = Some(-20.0);
            "You press forward. The child suffers through the journey.".to_string()
        }
        EncounterChoice::TakeShortcut => {
            if rng.gen_bool(0.6) {
                state.distance += 35;
                health_delta = Some(-8.0);
                "The shortcut pays off! Rough but passable. +35 miles.".to_string()
            } else {
                state.consume_food(10);
                health_delta = Some(-18.0);
                "Terrible idea. The path was nearly impassable. -10 lbs food.".to_string()
            }
        }
        EncounterChoice::StayOnTrail => "You stick to the proven path. Slow and steady.".to_string(),
        EncounterChoice::Confront => {
            if rng.gen_bool(0.7) {
                "They drop everything and run. Nothing was taken.".to_string()
            } else {
                let lost = rng.gen_range(5..=15);
                state.consume_food(lost);
                health_delta = Some(-5.0);
                format!("A scuffle! They got away with {lost} lbs of food.")
            }
        }
        EncounterChoice::ShoutForHelp => {
            let lost = rng.gen_range(5..=10);
            state.consume_food(lost);
            format!("They flee into the darkness, taking {lost} lbs of food with them.")
        }
        EncounterChoice::OfferFood => {
            state.consume_food(10);
            health_delta = Some(3.0);
            "You hand over 10 lbs of food. They thank you quietly and disappear. -10 lbs food."
                .to_string()
        }
        EncounterChoice::GatherFruit => {
            let amount = rng.gen_range(15..=30);
            state.food += amount;
            state.pass_days(1);
            format!("A productive stop! You gathered {amount} lbs of fruit. +1 day.")
        }
        EncounterChoice::GrabHandfuls => {
            let amount = rng.gen_range(3..=8);
            state.food += amount;
            format!("You grab what fruit you can reach. +{amount} lbs food.")
        }
        EncounterChoice::KeepMoving => "You press on. Every mile counts.".to_string(),
        EncounterChoice::SearchWagon => {
            let roll: f64 = rng.r#gen();
            if roll > 0.6 {
                let food = rng.gen_range(10..=25);
                let money = rng.gen_range(5..=15);
                state.food += food;
                state.money += money;
                format!(
                    "Jackpot! You found {food} lbs of preserved food and ${money} hidden in the floorboards."
                )
            } else if roll > 0.3 {
                state.spare_parts += 1;
                "You salvaged a usable set of spare parts. +1 spare part.".to_string()
            } else {
                health_delta = Some(-5.0);
                "The wagon was a wreck. You cut your hand on a rusty nail.".to_string()
            }
        }
        EncounterChoice::GlanceWagon => {
            if rng.gen_bool(0.5) {
                let food = rng.gen_range(3..=8);
                state.food += food;
                format!("A quick look turns up {food} lbs of food. Not bad.")
            } else {
                "Nothing obvious. You move on.".to_string()
            }
        }
        EncounterChoice::LeaveWagon => "You steer well clear. Better safe than sorry.".to_string(),
        EncounterChoice::TradeClothing => {
            state.clothing -= 1;
            state.food += 25;
            "A fair trade: clothing for dried buffalo meat. +25 lbs food, -1 clothing.".to_string()
        }
        EncounterChoice::PayForGuidance => {
            state.spend(10);
            state.distance += 20;
            health_delta = Some(5.0);
            "They show you a better path through the area. +20 miles, -$10.".to_string()
        }
        EncounterChoice::Wave => {
            "You exchange friendly waves and continue on the trail.".to_string()
        }
    };

    if let Some(delta) = health_delta {
        narrate_shift(&mut text, state.apply_health(delta));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn table_order_matches_ids() {
        for encounter in &ENCOUNTERS {
            assert_eq!(encounter.id.encounter().id, encounter.id);
        }
    }

    #[test]
    fn broke_party_only_sees_free_answers() {
        let state = PartyState {
            money: 0,
            distance: 400,
            ..PartyState::default()
        };
        let offered: Vec<_> = EncounterId::StrangerTradeFood
            .encounter()
            .available_choices(&state)
            .map(|spec| spec.choice)
            .collect();
        assert_eq!(offered, vec![EncounterChoice::Decline]);
        assert!(
            !EncounterId::StrangerTradeFood
                .encounter()
                .offers(EncounterChoice::AcceptTrade, &state)
        );
    }

    #[test]
    fn chance_grows_with_progress() {
        assert!((encounter_chance(0, 0.08, 0.04) - 0.08).abs() < 1e-12);
        assert!((encounter_chance(1000, 0.08, 0.04) - 0.10).abs() < 1e-12);
        assert!((encounter_chance(2000, 0.08, 0.04) - 0.12).abs() < 1e-12);
    }

    #[test]
    fn only_fruit_trees_fire_at_trailhead() {
        let state = PartyState::default();
        let mut rng = ChaCha20Rng::seed_from_u64(21);
        for _ in 0..16 {
            let (id, trace) = roll_encounter(&state, 1.0, 0.0, &mut rng).expect("fires");
            assert_eq!(id, EncounterId::WildFruitTrees);
            assert_eq!(trace.pool, "encounters");
        }
        assert!(roll_encounter(&state, 0.0, 0.0, &mut rng).is_none());
    }

    #[test]
    fn accepting_trade_moves_money_and_food() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let mut state = PartyState {
            money: 20,
            food: 10,
            ..PartyState::default()
        };
        let text = resolve_choice(EncounterChoice::AcceptTrade, &mut state, &mut rng);
        assert_eq!((state.money, state.food), (5, 40));
        assert!(text.contains("+30 lbs food"));
    }

    #[test]
    fn fruit_gathering_costs_a_day() {
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let mut state = PartyState::default();
        let _ = resolve_choice(EncounterChoice::GatherFruit, &mut state, &mut rng);
        assert_eq!(state.day, 2);
        assert!((15..=30).contains(&state.food));
    }

    #[test]
    fn push_on_narrates_rank_drop() {
        let mut rng = ChaCha20Rng::seed_from_u64(8);
        let mut state = PartyState::default();
        let text = resolve_choice(EncounterChoice::PushOn, &mut state, &mut rng);
        assert!((state.health.value() - 80.0).abs() < f64::EPSILON);
        assert!(!text.contains("declined"));
        let text = resolve_choice(EncounterChoice::PushOn, &mut state, &mut rng);
        assert!(text.ends_with("Your party's health declined to Fair."));
    }

    #[test]
    fn failed_haggling_has_both_refusals() {
        let mut refusals = std::collections::BTreeSet::new();
        for seed in 0..64 {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let mut state = PartyState {
                money: 20,
                food: 10,
                ..PartyState::default()
            };
            let text = resolve_choice(EncounterChoice::Haggle, &mut state, &mut rng);
            if state.money == 20 {
                assert_eq!(state.food, 10);
                refusals.insert(text);
            } else {
                assert_eq!((state.money, state.food), (10, 40));
            }
        }
        assert_eq!(refusals.len(), 2, "{refusals:?}");
    }
}
