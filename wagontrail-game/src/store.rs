//! Outfitting store: spend the difficulty budget before departure.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::constants::{
    OUTFIT_CLOTHING_PRICE, OUTFIT_FOOD_CRATE_LBS, OUTFIT_FOOD_PRICE, OUTFIT_MEDICINE_PRICE,
    OUTFIT_OX_PRICE, OUTFIT_PARTS_PRICE,
};
use crate::state::{Difficulty, PartyState};

/// Something sold at the outfitting store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutfitItem {
    Oxen,
    /// Crates of 25 lbs.
    Food,
    SpareParts,
    Medicine,
    Clothing,
}

impl OutfitItem {
    pub const ALL: [Self; 5] = [
        Self::Oxen,
        Self::Food,
        Self::SpareParts,
        Self::Medicine,
        Self::Clothing,
    ];

    #[must_use]
    pub const fn price(self) -> i32 {
        match self {
            Self::Oxen => OUTFIT_OX_PRICE,
            Self::Food => OUTFIT_FOOD_PRICE,
            Self::SpareParts => OUTFIT_PARTS_PRICE,
            Self::Medicine => OUTFIT_MEDICINE_PRICE,
            Self::Clothing => OUTFIT_CLOTHING_PRICE,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Oxen => "Oxen",
            Self::Food => "Food (25 lbs)",
            Self::SpareParts => "Spare Parts",
            Self::Medicine => "Medicine",
            Self::Clothing => "Clothing",
        }
    }
}

impl fmt::Display for OutfitItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OutfitError {
    #[error("Not enough money! That costs ${cost} and you have ${available} left.")]
    OverBudget { cost: i32, available: i32 },
    #[error("You can't sell back more {item} than you bought.")]
    NegativeQuantity { item: OutfitItem },
    #[error("You need at least one ox to pull the wagon!")]
    NoOxen,
}

/// Cart of supplies bought against a difficulty budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outfit {
    pub difficulty: Difficulty,
    quantities: BTreeMap<OutfitItem, i32>,
}

impl Outfit {
    #[must_use]
    pub const fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            quantities: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn quantity(&self, item: OutfitItem) -> i32 {
        self.quantities.get(&item).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn spent(&self) -> i32 {
        self.quantities
            .iter()
            .map(|(item, qty)| item.price() * qty)
            .sum()
    }

    #[must_use]
    pub fn remaining(&self) -> i32 {
        self.difficulty.budget() - self.spent()
    }

    /// Buy (positive `delta`) or return (negative `delta`) units of `item`.
    /// Returns the new quantity.
    ///
    /// # Errors
    ///
    /// Rejects purchases beyond the remaining budget and returns that would
    /// take the quantity below zero; the cart is unchanged on error.
    pub fn adjust(&mut self, item: OutfitItem, delta: i32) -> Result<i32, OutfitError> {
        let next = self.quantity(item) + delta;
        if next < 0 {
            return Err(OutfitError::NegativeQuantity { item });
        }
        let cost = item.price() * delta;
        if cost > self.remaining() {
            return Err(OutfitError::OverBudget {
                cost,
                available: self.remaining(),
            });
        }
        if next == 0 {
            self.quantities.remove(&item);
        } else {
            self.quantities.insert(item, next);
        }
        Ok(next)
    }

    /// Buy as many units of `item` as the budget allows, up to `limit`.
    pub fn buy_up_to(&mut self, item: OutfitItem, limit: i32) -> i32 {
        let affordable = self.remaining() / item.price();
        let units = affordable.min(limit).max(0);
        if units > 0 {
            self.quantities
                .entry(item)
                .and_modify(|qty| *qty += units)
                .or_insert(units);
        }
        units
    }

    /// Leave the store and build the starting party.
    ///
    /// # Errors
    ///
    /// Returns [`OutfitError::NoOxen`] when no ox was bought.
    pub fn depart(&self) -> Result<PartyState, OutfitError> {
        if self.quantity(OutfitItem::Oxen) < 1 {
            return Err(OutfitError::NoOxen);
        }
        let mut state = PartyState::new(self.difficulty);
        state.oxen = self.quantity(OutfitItem::Oxen);
        state.food = self.quantity(OutfitItem::Food) * OUTFIT_FOOD_CRATE_LBS;
        state.spare_parts = self.quantity(OutfitItem::SpareParts);
        state.medicine = self.quantity(OutfitItem::Medicine);
        state.clothing = self.quantity(OutfitItem::Clothing);
        state.money = self.remaining();
        log::info!(
            "outfitted {} party: {} oxen, {} lbs food, ${} left",
            self.difficulty,
            state.oxen,
            state.food,
            state.money
        );
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_tracks_purchases_and_returns() {
        let mut outfit = Outfit::new(Difficulty::Trailblazer);
        assert_eq!(outfit.adjust(OutfitItem::Oxen, 2), Ok(2));
        assert_eq!(outfit.remaining(), 30);
        assert_eq!(
            outfit.adjust(OutfitItem::Medicine, 3),
            Err(OutfitError::OverBudget {
                cost: 45,
                available: 30
            })
        );
        assert_eq!(outfit.adjust(OutfitItem::Oxen, -1), Ok(1));
        assert_eq!(outfit.remaining(), 55);
        assert_eq!(
            outfit.adjust(OutfitItem::Clothing, -1),
            Err(OutfitError::NegativeQuantity {
                item: OutfitItem::Clothing
            })
        );
    }

    #[test]
    fn depart_requires_an_ox() {
        let mut outfit = Outfit::new(Difficulty::Settler);
        let _ = outfit.adjust(OutfitItem::Food, 4).expect("affordable");
        assert_eq!(outfit.depart(), Err(OutfitError::NoOxen));

        let _ = outfit.adjust(OutfitItem::Oxen, 3).expect("affordable");
        let state = outfit.depart().expect("ready");
        assert_eq!(state.food, 100);
        assert_eq!(state.oxen, 3);
        assert_eq!(state.money, 200 - 20 - 75);
        assert_eq!(state.bullets, 20);
        assert_eq!(state.day, 1);
    }

    #[test]
    fn buy_up_to_stops_at_budget() {
        let mut outfit = Outfit::new(Difficulty::Trailblazer);
        assert_eq!(outfit.buy_up_to(OutfitItem::Oxen, 10), 3);
        assert_eq!(outfit.remaining(), 5);
        assert_eq!(outfit.buy_up_to(OutfitItem::Food, 10), 1);
        assert_eq!(outfit.remaining(), 0);
    }
}
