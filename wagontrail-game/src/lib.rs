//! Wagon Trail Game Engine
//!
//! Platform-agnostic core for the Wagon Trail journey to Oregon City: the day
//! by day travel engine, weighted event tables, landmark resolvers and the
//! adapter seams for the hunting and fording mini-games. Rendering, audio and
//! the mini-games themselves live with the host.

pub mod camp;
pub mod constants;
pub mod error;
pub mod events;
pub mod ford;
pub mod health;
pub mod hunt;
pub mod journey;
pub mod landmarks;
pub mod numbers;
pub mod oxen;
pub mod resolvers;
pub mod result;
pub mod seed;
pub mod state;
pub mod store;

// Re-export commonly used types
pub use constants::GOAL_DISTANCE;
pub use error::ActionError;
pub use events::{EncounterChoice, EncounterId, EventCategory, PassiveEventId};
pub use ford::{FordOutcome, FordReport, FordRequest, FordingGame, SimulatedFord};
pub use health::{HealthRank, RankShift, Vitality, rank_of};
pub use hunt::{HuntReport, HuntRequest, HuntingGrounds, SimulatedHunt};
pub use journey::{
    ChoiceOutcome, ConfigError, EngineStatus, EntryId, LogEntry, LogKind, OxenConfig, PauseReason,
    RngBundle, SelectionTrace, Severity, TickOutcome, TrailConfig, TravelEngine,
};
pub use landmarks::{LANDMARKS, Landmark, LandmarkKind};
pub use oxen::OxenReport;
pub use resolvers::{
    ChoiceList, ChoiceOption, CurrentStrength, Decision, FortAction, LandmarkAction,
    LandmarkPhase, Pending, RiverAction, RiverWidth, Site,
};
pub use result::{JourneySummary, detect_ending, ending_message};
pub use seed::{code_from_entropy, decode, encode};
pub use state::{CrossingStats, Difficulty, Ending, PartyState, RiverLocks};
pub use store::{Outfit, OutfitError, OutfitItem};

/// Trait for abstracting where trail tuning comes from.
/// Platform-specific implementations should provide this
pub trait ConfigLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Raw JSON overlay for [`TrailConfig`], or `None` to use the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the overlay exists but cannot be read.
    fn load_config_json(&self) -> Result<Option<String>, Self::Error>;
}

/// Loader that always yields the built-in tuning.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultConfig;

impl ConfigLoader for DefaultConfig {
    type Error = std::convert::Infallible;

    fn load_config_json(&self) -> Result<Option<String>, Self::Error> {
        Ok(None)
    }
}

/// Builds travel engines from an outfitted wagon and a seed.
pub struct JourneyFactory<L>
where
    L: ConfigLoader,
{
    loader: L,
}

impl<L> JourneyFactory<L>
where
    L: ConfigLoader,
{
    /// Create a factory backed by the provided config loader
    pub const fn new(loader: L) -> Self {
        Self { loader }
    }

    /// Load and validate the trail tuning.
    ///
    /// # Errors
    ///
    /// Returns an error if the overlay cannot be read, parsed, or validated.
    pub fn trail_config(&self) -> Result<TrailConfig, anyhow::Error>
    where
        L::Error: Into<anyhow::Error>,
    {
        match self.loader.load_config_json().map_err(Into::into)? {
            Some(json) => Ok(TrailConfig::from_json_str(&json)?),
            None => Ok(TrailConfig::default()),
        }
    }

    /// Send an outfitted wagon down the trail.
    ///
    /// # Errors
    ///
    /// Returns an error if the outfit cannot depart (no oxen, over budget) or
    /// the trail tuning is invalid.
    pub fn depart(&self, outfit: &Outfit, seed: u64) -> Result<TravelEngine, anyhow::Error>
    where
        L::Error: Into<anyhow::Error>,
    {
        let cfg = self.trail_config()?;
        let state = outfit.depart()?;
        log::debug!("seeding {} journey with {seed:#x}", state.difficulty);
        Ok(TravelEngine::with_config(state, seed, cfg)?)
    }

    /// Replay a shared journey: the code fixes both difficulty and seed.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is malformed, its difficulty disagrees
    /// with the outfit, or the outfit cannot depart.
    pub fn depart_with_code(&self, outfit: &Outfit, code: &str) -> Result<TravelEngine, anyhow::Error>
    where
        L::Error: Into<anyhow::Error>,
    {
        let (difficulty, seed) =
            seed::decode(code).ok_or_else(|| anyhow::anyhow!("invalid share code: {code}"))?;
        if difficulty != outfit.difficulty {
            anyhow::bail!(
                "share code {code} is for {difficulty} difficulty, outfit is {}",
                outfit.difficulty
            );
        }
        self.depart(outfit, seed)
    }
}
