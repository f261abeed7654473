//! Player-facing rejections returned by engine mutators.
//!
//! A rejection never mutates state. Its `Display` is the exact line the
//! engine appends to the narration log.
use thiserror::Error;

use crate::journey::PauseReason;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("You don't have enough money! You need ${needed}.")]
    InsufficientFunds { needed: i32, available: i32 },
    #[error("You don't have enough money for the ferry! You'll have to ford or wait.")]
    FerryUnaffordable,
    #[error("You have no medicine left!")]
    NoMedicine,
    #[error("You have no bullets to hunt with!")]
    NoBullets,
    #[error("There is no decision waiting for an answer.")]
    NothingPending,
    #[error("That choice isn't available right now.")]
    ChoiceUnavailable,
    #[error("Finish the decision in front of you first.")]
    AwaitingDecision,
    #[error("The wagon is stopped for a {0}; it moves again once that is settled.")]
    PausedBySystem(PauseReason),
    #[error("The wagon is already moving.")]
    NotPaused,
    #[error("You've scouted every bank. There is no narrower crossing to be found.")]
    ScoutingExhausted,
    #[error("The current isn't going to settle. You'll have to cross as it is.")]
    WaitingExhausted,
    #[error("No hunt is underway.")]
    NoHuntUnderway,
    #[error("No river crossing is underway.")]
    NoFordUnderway,
    #[error("The journey is over.")]
    GameOver,
}

impl ActionError {
    /// Resource shortfalls, as opposed to sequencing mistakes by the host.
    #[must_use]
    pub const fn is_shortfall(self) -> bool {
        matches!(
            self,
            Self::InsufficientFunds { .. } | Self::FerryUnaffordable | Self::NoMedicine | Self::NoBullets
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortfall_message_names_price() {
        let err = ActionError::InsufficientFunds {
            needed: 10,
            available: 5,
        };
        assert_eq!(err.to_string(), "You don't have enough money! You need $10.");
        assert!(err.is_shortfall());
        assert!(!ActionError::GameOver.is_shortfall());
    }

    #[test]
    fn system_pause_names_reason() {
        let err = ActionError::PausedBySystem(PauseReason::Encounter);
        assert!(err.to_string().contains("encounter"));
    }
}
