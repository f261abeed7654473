//! Fort menu: purchases and rest keep the menu open, leaving resumes travel.
use serde::{Deserialize, Serialize};

use super::{ChoiceList, ChoiceOption, Decision, Resolution};
use crate::constants::{
    FORT_BULLETS_BOX, FORT_BULLETS_COST, FORT_MEDICINE_COST, FORT_OX_COST, FORT_PARTS_COST,
    FORT_REST_FOOD, FORT_REST_HEAL, FORT_TRADE_COST, FORT_TRADE_FOOD,
};
use crate::error::ActionError;
use crate::health::narrate_shift;
use crate::state::PartyState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FortAction {
    Trade,
    BuyMedicine,
    BuyOx,
    BuyParts,
    BuyBullets,
    Rest,
    Leave,
}

impl FortAction {
    pub const ALL: [Self; 7] = [
        Self::Trade,
        Self::BuyMedicine,
        Self::BuyOx,
        Self::BuyParts,
        Self::BuyBullets,
        Self::Rest,
        Self::Leave,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Trade => "Trade for Supplies ($20 for 40 lbs food)",
            Self::BuyMedicine => "Buy Medicine ($15, +1 dose)",
            Self::BuyOx => "Buy an Ox ($25)",
            Self::BuyParts => "Buy Spare Parts ($10)",
            Self::BuyBullets => "Buy a Box of Bullets ($10 for 20)",
            Self::Rest => "Rest at the Fort (Free, recover health)",
            Self::Leave => "Leave and Continue Journey",
        }
    }

    /// Dollar cost, if the action is a purchase.
    #[must_use]
    pub const fn price(self) -> Option<i32> {
        match self {
            Self::Trade => Some(FORT_TRADE_COST),
            Self::BuyMedicine => Some(FORT_MEDICINE_COST),
            Self::BuyOx => Some(FORT_OX_COST),
            Self::BuyParts => Some(FORT_PARTS_COST),
            Self::BuyBullets => Some(FORT_BULLETS_COST),
            Self::Rest | Self::Leave => None,
        }
    }
}

/// Open the fort menu.
pub fn arrive(state: &mut PartyState, name: &str) -> String {
    state.at_fort = true;
    state.awaiting_choice = true;
    state.current_landmark = Some(name.to_string());
    format!("You have arrived at {name}! What would you like to do?")
}

/// Every fort action is always offered; unaffordable purchases are rejected when chosen.
#[must_use]
pub fn options() -> ChoiceList {
    FortAction::ALL
        .into_iter()
        .map(|action| ChoiceOption::new(Decision::Fort(action), action.label()))
        .collect()
}

/// Apply a fort action.
///
/// # Errors
///
/// Returns [`ActionError::InsufficientFunds`] when a purchase costs more than
/// the party carries. Nothing is changed in that case.
pub fn resolve(action: FortAction, state: &mut PartyState) -> Result<Resolution, ActionError> {
    if let Some(price) = action.price()
        && state.money < price
    {
        return Err(ActionError::InsufficientFunds {
            needed: price,
            available: state.money,
        });
    }
    if let Some(price) = action.price() {
        state.spend(price);
    }
    state.pass_days(1);
    let day = state.day;

    let resolution = match action {
        FortAction::Trade => {
            state.food += FORT_TRADE_FOOD;
            Resolution::Stay(format!(
                "Day {day}: You traded for {FORT_TRADE_FOOD} lbs of food. -${FORT_TRADE_COST}"
            ))
        }
        FortAction::BuyMedicine => {
            state.medicine += 1;
            Resolution::Stay(format!(
                "Day {day}: You bought a dose of medicine. -${FORT_MEDICINE_COST} ({} total)",
                state.medicine
            ))
        }
        FortAction::BuyOx => {
            state.oxen += 1;
            Resolution::Stay(format!(
                "Day {day}: You purchased a strong ox! -${FORT_OX_COST}"
            ))
        }
        FortAction::BuyParts => {
            state.spare_parts += 1;
            Resolution::Stay(format!(
                "Day {day}: You bought a set of spare parts. -${FORT_PARTS_COST} ({} total)",
                state.spare_parts
            ))
        }
        FortAction::BuyBullets => {
            state.bullets += FORT_BULLETS_BOX;
            Resolution::Stay(format!(
                "Day {day}: You bought a box of {FORT_BULLETS_BOX} bullets. -${FORT_BULLETS_COST} ({} total)",
                state.bullets
            ))
        }
        FortAction::Rest => {
            state.consume_food(FORT_REST_FOOD);
            let mut text = format!(
                "Day {day}: You rested at the fort. Your party consumed {FORT_REST_FOOD} lbs of food."
            );
            narrate_shift(&mut text, state.apply_health(FORT_REST_HEAL));
            Resolution::Stay(text)
        }
        FortAction::Leave => {
            state.clear_location();
            Resolution::Done(format!(
                "Day {day}: You leave the fort and continue on the trail."
            ))
        }
    };
    Ok(resolution)
}
