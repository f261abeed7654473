//! Decision resolvers for landmark stops and encounters.
//!
//! Each resolver validates before it mutates: a rejected action leaves the
//! party untouched and the day unchanged. Resolvers never touch engine
//! status; the engine decides whether to resume based on what they return.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::events::encounters::{EncounterChoice, EncounterId};
use crate::ford::FordRequest;
use crate::hunt::HuntRequest;
use crate::journey::EngineStatus;

pub mod fort;
pub mod landmark;
pub mod river;

pub use fort::FortAction;
pub use landmark::{LandmarkAction, LandmarkPhase, Site};
pub use river::{CurrentStrength, RiverAction, RiverWidth};

/// The interaction currently blocking autonomous travel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Pending {
    Fort {
        name: String,
    },
    River {
        name: String,
    },
    /// Fording mini-game in flight.
    Ford(FordRequest),
    Landmark {
        site: Site,
        phase: LandmarkPhase,
    },
    Encounter {
        id: EncounterId,
        prompt: String,
    },
    /// Hunting mini-game in flight; `resume_to` is the status before the hunt.
    Hunt {
        request: HuntRequest,
        resume_to: EngineStatus,
    },
}

impl Pending {
    /// Mini-games are answered through their own completion calls, not `choose`.
    #[must_use]
    pub const fn is_mini_game(&self) -> bool {
        matches!(self, Self::Ford(_) | Self::Hunt { .. })
    }
}

/// A player's answer to the pending decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "action", rename_all = "snake_case")]
pub enum Decision {
    Fort(FortAction),
    River(RiverAction),
    Landmark(LandmarkAction),
    Encounter(EncounterChoice),
}

/// One offered answer with its button label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChoiceOption {
    pub decision: Decision,
    pub label: &'static str,
}

impl ChoiceOption {
    #[must_use]
    pub const fn new(decision: Decision, label: &'static str) -> Self {
        Self { decision, label }
    }
}

pub type ChoiceList = SmallVec<[ChoiceOption; 4]>;

/// What a resolver did with an accepted decision.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Interaction finished; travel may resume.
    Done(String),
    /// Action applied but the stop stays open (fort purchases, scouting, South Pass rest).
    Stay(String),
    /// Hand the crossing to the fording mini-game.
    Ford(FordRequest),
}
