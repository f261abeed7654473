use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use wagontrail_game::{
    ChoiceOption, ConfigLoader, Decision, Difficulty, Ending, FortAction, FordingGame,
    HuntingGrounds, JourneyFactory, Outfit, Pending, RiverAction, SimulatedFord, SimulatedHunt,
    TickOutcome, TravelEngine,
};

use crate::logic::policy::{PlayerPolicy, Strategy};

/// Decisions a policy may make at one stop before the runner walks it out.
const MAX_STOP_DECISIONS: u32 = 6;
/// Hard cap on runner steps so a wedged engine reports as stalled.
const MAX_STEPS: u32 = 50_000;

/// Configuration for a single simulated journey.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub seed: u64,
    pub code: Option<String>,
    pub difficulty: Difficulty,
    pub strategy: Strategy,
    pub max_days: u32,
    pub tick_delay: Duration,
}

impl SimulationConfig {
    #[must_use]
    pub fn new(difficulty: Difficulty, strategy: Strategy, seed: u64) -> Self {
        Self {
            seed,
            code: None,
            difficulty,
            strategy,
            max_days: 365,
            tick_delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn with_code(mut self, code: Option<String>) -> Self {
        self.code = code;
        self
    }

    #[must_use]
    pub fn with_max_days(mut self, max_days: u32) -> Self {
        self.max_days = max_days;
        self
    }

    #[must_use]
    pub fn with_tick_delay(mut self, delay: Duration) -> Self {
        self.tick_delay = delay;
        self
    }
}

/// Everything the reports need from one finished (or abandoned) journey.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub seed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub strategy: Strategy,
    pub difficulty: Difficulty,
    /// `None` when the day limit ran out first.
    pub ending: Option<Ending>,
    pub headline: String,
    pub days: u32,
    pub distance: i32,
    pub health: f64,
    pub food: i32,
    pub money: i32,
    pub oxen: i32,
    pub landmarks_visited: usize,
    pub fords_attempted: u32,
    pub ferries_taken: u32,
    pub hunts: u32,
    pub decisions: u32,
    pub rejected: u32,
}

impl RunRecord {
    #[must_use]
    pub fn is_victory(&self) -> bool {
        self.ending.is_some_and(Ending::is_victory)
    }

    /// Ending key for distribution tables; unfinished runs are `stalled`.
    #[must_use]
    pub fn ending_key(&self) -> &'static str {
        self.ending.map_or("stalled", Ending::key)
    }
}

#[derive(Debug, Default)]
struct Tally {
    hunts: u32,
    decisions: u32,
    rejected: u32,
}

/// Drives a travel engine to its end with a policy answering every prompt.
pub struct SimulationSession {
    engine: TravelEngine,
    policy: Box<dyn PlayerPolicy + Send>,
    hunt: SimulatedHunt,
    ford: SimulatedFord,
    config: SimulationConfig,
    stop_decisions: u32,
    tally: Tally,
}

impl SimulationSession {
    /// Outfit a wagon for the strategy and depart.
    ///
    /// # Errors
    ///
    /// Fails when the trail config is invalid or the outfit cannot depart.
    pub fn new<L>(factory: &JourneyFactory<L>, config: SimulationConfig) -> Result<Self>
    where
        L: ConfigLoader,
        L::Error: Into<anyhow::Error>,
    {
        let mut policy = config.strategy.create_policy(config.seed ^ 0x504F_4C49);
        let mut outfit = Outfit::new(config.difficulty);
        policy.outfit(&mut outfit);
        let engine = factory
            .depart(&outfit, config.seed)
            .with_context(|| format!("{} could not depart", policy.name()))?;
        Ok(Self {
            engine,
            policy,
            hunt: SimulatedHunt::new(config.seed ^ 0x4855_4E54),
            ford: SimulatedFord::new(config.seed ^ 0x464F_5244),
            config,
            stop_decisions: 0,
            tally: Tally::default(),
        })
    }

    /// Play until the journey ends or the day limit passes.
    ///
    /// # Errors
    ///
    /// Fails when the engine refuses to start or a stop offers no acceptable answer.
    pub fn run(mut self) -> Result<RunRecord> {
        self.engine.start().context("engine refused to start")?;
        for _ in 0..MAX_STEPS {
            let state = self.engine.state();
            if state.game_over || state.day > self.config.max_days {
                break;
            }
            self.step()?;
        }
        Ok(self.finish())
    }

    fn step(&mut self) -> Result<()> {
        match self.engine.pending().cloned() {
            Some(Pending::Ford(request)) => {
                let report = self.ford.ford(request);
                self.engine.complete_ford(report)?;
            }
            Some(Pending::Hunt { request, .. }) => {
                let report = self.hunt.hunt(request);
                self.engine.complete_hunt(report)?;
                self.tally.hunts += 1;
            }
            Some(_) => self.answer()?,
            None => {
                self.stop_decisions = 0;
                self.travel()?;
            }
        }
        Ok(())
    }

    fn answer(&mut self) -> Result<()> {
        let choices = self.engine.available_choices();
        if choices.is_empty() {
            bail!("day {}: decision pending with nothing offered", self.engine.state().day);
        }

        let preferred = if self.stop_decisions >= MAX_STOP_DECISIONS {
            walk_out(&choices)
        } else {
            let pick = self.policy.pick_choice(self.engine.state(), &choices);
            if let Some(rationale) = &pick.rationale {
                log::trace!("{} picked #{} ({rationale})", self.policy.name(), pick.choice_index);
            }
            pick.choice_index.min(choices.len() - 1)
        };
        self.stop_decisions += 1;
        self.tally.decisions += 1;

        let order = std::iter::once(preferred).chain(fallback_order(&choices));
        for idx in order {
            let option = choices[idx];
            match self.engine.choose(option.decision) {
                Ok(outcome) => {
                    log::debug!("day {}: {} -> {outcome:?}", self.engine.state().day, option.label);
                    return Ok(());
                }
                Err(err) => {
                    self.tally.rejected += 1;
                    log::debug!("{} rejected: {err}", option.label);
                }
            }
        }
        bail!("day {}: every offered answer was rejected", self.engine.state().day)
    }

    fn travel(&mut self) -> Result<()> {
        if self.policy.wants_medicine(self.engine.state()) && self.engine.use_medicine().is_ok() {
            return Ok(());
        }
        if self.policy.wants_hunt(self.engine.state()) && self.engine.begin_hunt().is_ok() {
            return Ok(());
        }
        match self.engine.tick() {
            TickOutcome::Idle => {
                self.engine.start().context("engine idle and refused to resume")?;
            }
            outcome => log::trace!("{outcome:?}"),
        }
        if !self.config.tick_delay.is_zero() {
            thread::sleep(self.config.tick_delay);
        }
        Ok(())
    }

    fn finish(self) -> RunRecord {
        let summary = self.engine.summary();
        RunRecord {
            seed: self.config.seed,
            code: self.config.code,
            strategy: self.config.strategy,
            difficulty: summary.difficulty,
            ending: summary.ending,
            headline: summary.headline,
            days: summary.day,
            distance: summary.distance,
            health: summary.health,
            food: summary.food,
            money: summary.money,
            oxen: summary.oxen,
            landmarks_visited: summary.landmarks_visited,
            fords_attempted: summary.fords_attempted,
            ferries_taken: summary.ferries_taken,
            hunts: self.tally.hunts,
            decisions: self.tally.decisions,
            rejected: self.tally.rejected,
        }
    }
}

/// The answer that closes a stop: leave the fort, ford the river, else the first offer.
fn walk_out(choices: &[ChoiceOption]) -> usize {
    choices
        .iter()
        .position(|option| {
            matches!(
                option.decision,
                Decision::Fort(FortAction::Leave) | Decision::River(RiverAction::Ford)
            )
        })
        .unwrap_or(0)
}

fn fallback_order(choices: &[ChoiceOption]) -> impl Iterator<Item = usize> + '_ {
    std::iter::once(walk_out(choices)).chain(0..choices.len())
}

/// Play one journey end to end.
///
/// # Errors
///
/// Propagates departure and stuck-engine failures.
pub fn simulate<L>(factory: &JourneyFactory<L>, config: SimulationConfig) -> Result<RunRecord>
where
    L: ConfigLoader,
    L::Error: Into<anyhow::Error>,
{
    SimulationSession::new(factory, config)?.run()
}
