//! Trail actions taken between ticks: resting and doctoring.
use crate::constants::{MEDICINE_FOOD, MEDICINE_HEAL, TRAIL_REST_FOOD, TRAIL_REST_HEAL};
use crate::error::ActionError;
use crate::health::narrate_shift;
use crate::oxen::cure_one;
use crate::state::PartyState;

/// Rest a day on the trail.
pub fn rest(state: &mut PartyState) -> String {
    state.consume_food(TRAIL_REST_FOOD);
    state.pass_days(1);
    let mut text = format!(
        "Day {}: You rested on the trail. Your party consumed {TRAIL_REST_FOOD} lbs of food.",
        state.day
    );
    narrate_shift(&mut text, state.apply_health(TRAIL_REST_HEAL));
    text
}

/// Spend a dose of medicine, on a sick ox first, otherwise on the party.
///
/// # Errors
///
/// Returns [`ActionError::NoMedicine`] when the medicine chest is empty.
pub fn use_medicine(state: &mut PartyState) -> Result<String, ActionError> {
    if state.medicine <= 0 {
        return Err(ActionError::NoMedicine);
    }
    state.medicine -= 1;
    state.pass_days(1);

    let text = if cure_one(state) {
        format!(
            "Day {}: You used medicine to treat a sick ox. It's back on its feet! ({} healthy, {} sick, {} doses remaining)",
            state.day,
            state.healthy_oxen(),
            state.sick_oxen,
            state.medicine
        )
    } else {
        let mut text = format!(
            "Day {}: You used medicine and feel much better. ({} doses remaining)",
            state.day, state.medicine
        );
        narrate_shift(&mut text, state.apply_health(MEDICINE_HEAL));
        text
    };
    state.consume_food(MEDICINE_FOOD);
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::Vitality;

    #[test]
    fn trail_rest_heals_twenty() {
        let mut state = PartyState {
            food: 20,
            health: Vitality::new(55.0),
            ..PartyState::default()
        };
        let text = rest(&mut state);
        assert_eq!((state.food, state.day), (12, 2));
        assert!((state.health.value() - 75.0).abs() < f64::EPSILON);
        assert!(text.ends_with("Your party's health improved to Fair."));
    }

    #[test]
    fn medicine_cures_ox_before_party() {
        let mut state = PartyState {
            food: 20,
            oxen: 3,
            sick_oxen: 1,
            medicine: 2,
            health: Vitality::new(50.0),
            ..PartyState::default()
        };
        let text = use_medicine(&mut state).expect("has medicine");
        assert_eq!(state.sick_oxen, 0);
        assert!((state.health.value() - 50.0).abs() < f64::EPSILON);
        assert!(text.contains("3 healthy, 0 sick"));

        let _ = use_medicine(&mut state).expect("one dose left");
        assert!((state.health.value() - 70.0).abs() < f64::EPSILON);
        assert_eq!((state.medicine, state.food, state.day), (0, 10, 3));
    }

    #[test]
    fn empty_chest_is_rejected_untouched() {
        let mut state = PartyState::default();
        let before = state.clone();
        assert_eq!(use_medicine(&mut state), Err(ActionError::NoMedicine));
        assert_eq!(state, before);
    }
}
