//! The travel engine: the one owner of [`PartyState`] and the scheduler that
//! moves the wagon day by day.
//!
//! Hosts drive it with [`TravelEngine::tick`] on their own timer and answer
//! whatever [`TravelEngine::pending`] reports between ticks. Every mutator
//! takes `&mut self`, so a tick and a resolver can never interleave.
use rand::Rng;

use super::{
    EngineStatus, LogEntry, LogKind, PauseReason, RngBundle, SelectionTrace, Severity,
    TickOutcome, TrailConfig,
};
use super::{ConfigError, EntryId};
use crate::camp;
use crate::error::ActionError;
use crate::events::encounters::{self, EncounterChoice, EncounterId};
use crate::events::passive::apply_passive_event;
use crate::events::{PASSIVE_EVENTS, pick_weighted};
use crate::ford::{FordReport, FordRequest, apply_ford};
use crate::health::narrate_shift;
use crate::hunt::{HuntReport, HuntRequest, apply_hunt};
use crate::landmarks::{self, Landmark, LandmarkKind};
use crate::oxen::{self, OxenReport};
use crate::resolvers::{
    ChoiceList, ChoiceOption, Decision, LandmarkPhase, Pending, Resolution, fort, landmark, river,
};
use crate::result::{JourneySummary, detect_ending, ending_message};
use crate::state::{Ending, PartyState};

/// What happened to an accepted decision, mini-game report, or trail action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceOutcome {
    /// The interaction closed and the engine went back to its prior status.
    Resolved,
    /// Applied, but the stop is still open and waiting for another answer.
    Continued,
    /// The crossing was handed to the fording mini-game.
    FordStarted(FordRequest),
    /// The action ended the journey.
    Ended(Ending),
}

#[derive(Debug, Clone)]
pub struct TravelEngine {
    state: PartyState,
    cfg: TrailConfig,
    seed: u64,
    rng: RngBundle,
    status: EngineStatus,
    pending: Option<Pending>,
    log: Vec<LogEntry>,
    log_day: u32,
    log_seq: u16,
    last_trace: Option<SelectionTrace>,
}

impl TravelEngine {
    /// Engine with the default trail tuning.
    #[must_use]
    pub fn new(state: PartyState, seed: u64) -> Self {
        let status = state
            .ending
            .filter(|_| state.game_over)
            .map_or(EngineStatus::Stopped, EngineStatus::GameOver);
        Self {
            log_day: state.day,
            state,
            cfg: TrailConfig::default(),
            seed,
            rng: RngBundle::from_user_seed(seed),
            status,
            pending: None,
            log: Vec::new(),
            log_seq: 0,
            last_trace: None,
        }
    }

    /// Engine with host-supplied tuning.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found in `cfg`.
    pub fn with_config(
        state: PartyState,
        seed: u64,
        cfg: TrailConfig,
    ) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let mut engine = Self::new(state, seed);
        engine.cfg = cfg;
        Ok(engine)
    }

    #[must_use]
    pub const fn state(&self) -> &PartyState {
        &self.state
    }

    #[must_use]
    pub fn into_state(self) -> PartyState {
        self.state
    }

    /// Narration written so far, oldest first.
    #[must_use]
    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    #[must_use]
    pub const fn status(&self) -> EngineStatus {
        self.status
    }

    #[must_use]
    pub const fn config(&self) -> &TrailConfig {
        &self.cfg
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// The interaction blocking travel, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<&Pending> {
        self.pending.as_ref()
    }

    /// Trace of the most recent weighted draw (passive event or encounter).
    #[must_use]
    pub const fn last_trace(&self) -> Option<&SelectionTrace> {
        self.last_trace.as_ref()
    }

    #[must_use]
    pub fn summary(&self) -> JourneySummary {
        JourneySummary::from_state(&self.state)
    }

    /// Answers currently on offer. Empty when nothing is pending, while a
    /// mini-game is in flight, or after the journey ends.
    #[must_use]
    pub fn available_choices(&self) -> ChoiceList {
        if self.state.game_over {
            return ChoiceList::new();
        }
        match &self.pending {
            None | Some(Pending::Ford(_) | Pending::Hunt { .. }) => ChoiceList::new(),
            Some(Pending::Fort { .. }) => fort::options(),
            Some(Pending::River { .. }) => river::options(&self.state),
            Some(Pending::Landmark { site, phase }) => landmark::options(*site, *phase),
            Some(Pending::Encounter { id, .. }) => id
                .encounter()
                .available_choices(&self.state)
                .map(|spec| ChoiceOption::new(Decision::Encounter(spec.choice), spec.label))
                .collect(),
        }
    }

    // Scheduler -----------------------------------------------------------

    /// Begin (or continue) autonomous travel from `Stopped` or a manual pause.
    ///
    /// # Errors
    ///
    /// Fails when the journey is over, a decision is pending, or the engine
    /// is held by a system pause.
    pub fn start(&mut self) -> Result<(), ActionError> {
        match self.status {
            EngineStatus::GameOver(_) => Err(ActionError::GameOver),
            EngineStatus::Running => Ok(()),
            EngineStatus::Paused(reason) if reason.is_system() => {
                self.reject(ActionError::PausedBySystem(reason))
            }
            EngineStatus::Stopped | EngineStatus::Paused(_) => {
                if self.pending.is_some() {
                    return self.reject(ActionError::AwaitingDecision);
                }
                self.set_status(EngineStatus::Running);
                Ok(())
            }
        }
    }

    /// Player pause. Pausing an engine that is not running is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::GameOver`] once the journey has ended.
    pub fn pause(&mut self) -> Result<(), ActionError> {
        match self.status {
            EngineStatus::GameOver(_) => Err(ActionError::GameOver),
            EngineStatus::Running => {
                self.set_status(EngineStatus::Paused(PauseReason::Manual));
                Ok(())
            }
            EngineStatus::Stopped | EngineStatus::Paused(_) => Ok(()),
        }
    }

    /// Player resume. Only a manual pause can be lifted this way; landmark,
    /// encounter and mini-game pauses end when their interaction resolves.
    ///
    /// # Errors
    ///
    /// Rejects system pauses and engines that are not paused at all.
    pub fn resume(&mut self) -> Result<(), ActionError> {
        match self.status {
            EngineStatus::GameOver(_) => Err(ActionError::GameOver),
            EngineStatus::Paused(PauseReason::Manual) => {
                self.set_status(EngineStatus::Running);
                Ok(())
            }
            EngineStatus::Paused(reason) => self.reject(ActionError::PausedBySystem(reason)),
            EngineStatus::Running | EngineStatus::Stopped => self.reject(ActionError::NotPaused),
        }
    }

    /// Cancel the host timer. Effects are applied synchronously, so nothing is
    /// left half-done; an open stop must be answered first.
    ///
    /// # Errors
    ///
    /// Fails when the journey is over or an interaction is still pending.
    pub fn stop(&mut self) -> Result<(), ActionError> {
        if self.state.game_over {
            return Err(ActionError::GameOver);
        }
        if self.pending.is_some() {
            return self.reject(ActionError::AwaitingDecision);
        }
        self.set_status(EngineStatus::Stopped);
        Ok(())
    }

    /// Advance one day of travel. Does nothing unless the engine is running.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.status.is_running() || self.state.game_over {
            return TickOutcome::Idle;
        }
        if self.state.oxen <= 0 {
            return TickOutcome::Ended(self.conclude(Ending::OxenLost));
        }

        let miles = self.roll_miles();
        self.state.pass_days(1);
        self.state.distance += miles;
        self.state.consume_food(self.cfg.daily_food);
        let shift = self.state.apply_health(-self.cfg.travel_health_cost);
        let day = self.state.day;
        let mut text = format!("Day {day}: You traveled {miles} miles.");
        narrate_shift(&mut text, shift);
        self.push(LogKind::Travel, Severity::Info, text);
        log::debug!(
            "tick day {day}: +{miles} mi -> {} mi, food {}",
            self.state.distance,
            self.state.food
        );

        self.run_oxen();
        if let Some(ending) = self.check_terminal() {
            return TickOutcome::Ended(ending);
        }

        if let Some(stop) = landmarks::next_arrival(self.state.distance, &self.state.visited_landmarks) {
            return self.arrive(stop);
        }

        let rolled = encounters::roll_encounter(
            &self.state,
            self.cfg.encounter_base_chance,
            self.cfg.encounter_progress_bonus,
            &mut *self.rng.encounters(),
        );
        if let Some((id, trace)) = rolled {
            return self.open_encounter(id, trace);
        }

        let event = self.roll_passive();
        if let Some(ending) = self.check_terminal() {
            return TickOutcome::Ended(ending);
        }
        TickOutcome::Traveled { day, miles, event }
    }

    fn roll_miles(&self) -> i32 {
        let base = self
            .rng
            .travel()
            .gen_range(self.cfg.base_miles_min..=self.cfg.base_miles_max);
        let bonus = self
            .state
            .healthy_oxen()
            .saturating_mul(self.cfg.miles_per_healthy_ox)
            .min(self.cfg.ox_bonus_cap);
        base + bonus
    }

    fn arrive(&mut self, stop: &'static Landmark) -> TickOutcome {
        self.state.visited_landmarks.insert(stop.name.to_string());
        log::info!("arrived at {} (mile {})", stop.name, stop.distance);
        let name = stop.name;
        let (pending, kind, text) = match stop.kind {
            LandmarkKind::Fort => {
                let text = fort::arrive(&mut self.state, name);
                (Pending::Fort { name: name.to_string() }, LogKind::Fort, text)
            }
            LandmarkKind::River => {
                let text = river::arrive(&mut self.state, name, &mut *self.rng.rivers());
                (Pending::River { name: name.to_string() }, LogKind::River, text)
            }
            LandmarkKind::Landmark => {
                let (site, text) = landmark::arrive(&mut self.state, name);
                let phase = LandmarkPhase::default();
                (Pending::Landmark { site, phase }, LogKind::Landmark, text)
            }
            LandmarkKind::Destination => {
                return TickOutcome::Ended(self.conclude(Ending::Victory));
            }
        };
        self.push(kind, Severity::Info, text);
        self.pending = Some(pending);
        self.set_status(EngineStatus::Paused(PauseReason::Landmark));
        TickOutcome::Arrived(stop)
    }

    fn open_encounter(&mut self, id: EncounterId, trace: SelectionTrace) -> TickOutcome {
        let prompt = encounters::prompt(id, &mut *self.rng.encounters());
        log::debug!("encounter {id} fired (roll {:.2})", trace.roll);
        self.last_trace = Some(trace);
        self.state.awaiting_choice = true;
        self.push(LogKind::Encounter, Severity::Warning, prompt.clone());
        self.pending = Some(Pending::Encounter { id, prompt });
        self.set_status(EngineStatus::Paused(PauseReason::Encounter));
        TickOutcome::Encounter(id)
    }

    fn roll_passive(&mut self) -> Option<String> {
        let before = self.state.health.value();
        let (text, trace) = {
            let mut rng = self.rng.events();
            if !rng.gen_bool(self.cfg.passive_event_chance) {
                return None;
            }
            let (idx, trace) =
                pick_weighted("passive_events", &PASSIVE_EVENTS, &self.state, &mut *rng)?;
            let text = apply_passive_event(PASSIVE_EVENTS[idx].id, &mut self.state, &mut *rng);
            (text, trace)
        };
        log::debug!("passive event {}", trace.chosen);
        self.last_trace = Some(trace);
        let severity = if self.state.health.value() < before {
            Severity::Warning
        } else {
            Severity::Info
        };
        self.push(LogKind::Event, severity, text.clone());
        Some(text)
    }

    // Decisions -----------------------------------------------------------

    /// Answer the pending fort, river, landmark or encounter prompt.
    ///
    /// # Errors
    ///
    /// Rejects answers when nothing is pending, when the answer belongs to a
    /// different kind of stop or is not on offer, and when the resolver
    /// refuses it (for example an unaffordable purchase). A rejected answer
    /// changes nothing but the log.
    pub fn choose(&mut self, decision: Decision) -> Result<ChoiceOutcome, ActionError> {
        if self.state.game_over {
            return Err(ActionError::GameOver);
        }
        let Some(pending) = self.pending.clone() else {
            return self.reject(ActionError::NothingPending);
        };
        let day_before = self.state.day;

        let resolved = match (pending, decision) {
            (Pending::Fort { .. }, Decision::Fort(action)) => {
                fort::resolve(action, &mut self.state).map(|res| (res, LogKind::Fort))
            }
            (Pending::River { .. }, Decision::River(action)) => {
                river::resolve(action, &mut self.state, &mut *self.rng.rivers())
                    .map(|res| (res, LogKind::River))
            }
            (Pending::Landmark { site, phase }, Decision::Landmark(action)) => landmark::resolve(
                site,
                phase,
                action,
                &mut self.state,
                &mut *self.rng.outcomes(),
            )
            .map(|res| (res, LogKind::Landmark)),
            (Pending::Encounter { id, .. }, Decision::Encounter(choice)) => self
                .resolve_encounter(id, choice)
                .map(|res| (res, LogKind::Encounter)),
            (pending, _) if pending.is_mini_game() => Err(ActionError::AwaitingDecision),
            _ => Err(ActionError::ChoiceUnavailable),
        };

        match resolved {
            Ok((resolution, kind)) => Ok(self.settle(resolution, kind, day_before)),
            Err(err) => self.reject(err),
        }
    }

    fn resolve_encounter(
        &mut self,
        id: EncounterId,
        choice: EncounterChoice,
    ) -> Result<Resolution, ActionError> {
        if !id.encounter().offers(choice, &self.state) {
            return Err(ActionError::ChoiceUnavailable);
        }
        let text = encounters::resolve_choice(choice, &mut self.state, &mut *self.rng.outcomes());
        self.state.awaiting_choice = false;
        Ok(Resolution::Done(text))
    }

    fn settle(&mut self, resolution: Resolution, kind: LogKind, day_before: u32) -> ChoiceOutcome {
        match resolution {
            Resolution::Done(text) => {
                self.push(kind, Severity::Info, text);
                self.pending = None;
                if self.state.day > day_before {
                    self.run_oxen();
                }
                if let Some(ending) = self.check_terminal() {
                    return ChoiceOutcome::Ended(ending);
                }
                self.set_status(EngineStatus::Running);
                ChoiceOutcome::Resolved
            }
            Resolution::Stay(text) => {
                self.push(kind, Severity::Info, text);
                if self.state.day > day_before {
                    self.run_oxen();
                }
                if let Some(ending) = self.check_terminal() {
                    return ChoiceOutcome::Ended(ending);
                }
                if let Some(Pending::Landmark { phase, .. }) = &mut self.pending {
                    *phase = LandmarkPhase::RouteChoice;
                }
                ChoiceOutcome::Continued
            }
            Resolution::Ford(request) => {
                self.push(
                    LogKind::River,
                    Severity::Info,
                    format!(
                        "You drive the wagon into the water. ({} river, {} current)",
                        request.width, request.current
                    ),
                );
                self.pending = Some(Pending::Ford(request));
                self.set_status(EngineStatus::Paused(PauseReason::Action));
                ChoiceOutcome::FordStarted(request)
            }
        }
    }

    // Mini-games ----------------------------------------------------------

    /// Apply the fording mini-game's report and close the river stop.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::NoFordUnderway`] unless a ford was started.
    pub fn complete_ford(&mut self, report: FordReport) -> Result<ChoiceOutcome, ActionError> {
        if self.state.game_over {
            return Err(ActionError::GameOver);
        }
        let Some(Pending::Ford(request)) = self.pending else {
            return self.reject(ActionError::NoFordUnderway);
        };
        let text = apply_ford(&mut self.state, request, report, &mut *self.rng.outcomes());
        let severity = if report.hits > 1 {
            Severity::Warning
        } else {
            Severity::Info
        };
        self.push(LogKind::River, severity, text);
        self.pending = None;
        self.run_oxen();
        if let Some(ending) = self.check_terminal() {
            return Ok(ChoiceOutcome::Ended(ending));
        }
        self.set_status(EngineStatus::Running);
        Ok(ChoiceOutcome::Resolved)
    }

    /// Head out hunting. The engine pauses until the hunt is completed or
    /// abandoned, then returns to whatever it was doing before.
    ///
    /// # Errors
    ///
    /// Rejects when another interaction is pending or the party has no bullets.
    pub fn begin_hunt(&mut self) -> Result<HuntRequest, ActionError> {
        self.ensure_trail_action()?;
        if self.state.bullets <= 0 {
            return self.reject(ActionError::NoBullets);
        }
        let request = HuntRequest {
            bullets: self.state.bullets,
        };
        self.push(
            LogKind::Hunt,
            Severity::Info,
            format!("You head out to hunt with {} bullets.", request.bullets),
        );
        self.pending = Some(Pending::Hunt {
            request,
            resume_to: self.status,
        });
        self.set_status(EngineStatus::Paused(PauseReason::Action));
        Ok(request)
    }

    /// Apply the hunting mini-game's report.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::NoHuntUnderway`] unless a hunt was started.
    pub fn complete_hunt(&mut self, report: HuntReport) -> Result<ChoiceOutcome, ActionError> {
        if self.state.game_over {
            return Err(ActionError::GameOver);
        }
        let Some(Pending::Hunt { request, resume_to }) = self.pending else {
            return self.reject(ActionError::NoHuntUnderway);
        };
        let text = apply_hunt(&mut self.state, request, report, &mut *self.rng.outcomes());
        self.push(LogKind::Hunt, Severity::Info, text);
        self.pending = None;
        self.run_oxen();
        if let Some(ending) = self.check_terminal() {
            return Ok(ChoiceOutcome::Ended(ending));
        }
        self.set_status(resume_to);
        Ok(ChoiceOutcome::Resolved)
    }

    /// Call off a hunt before any shot is reported; nothing is spent.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::NoHuntUnderway`] unless a hunt was started.
    pub fn abort_hunt(&mut self) -> Result<(), ActionError> {
        if self.state.game_over {
            return Err(ActionError::GameOver);
        }
        let Some(Pending::Hunt { resume_to, .. }) = self.pending else {
            return self.reject(ActionError::NoHuntUnderway);
        };
        self.pending = None;
        self.set_status(resume_to);
        Ok(())
    }

    // Trail actions -------------------------------------------------------

    /// Rest a day on the trail.
    ///
    /// # Errors
    ///
    /// Rejects while an interaction is pending or after the journey ends.
    pub fn rest(&mut self) -> Result<ChoiceOutcome, ActionError> {
        self.ensure_trail_action()?;
        let text = camp::rest(&mut self.state);
        self.push(LogKind::Camp, Severity::Info, text);
        Ok(self.after_trail_action())
    }

    /// Dose a sick ox, or the party when the herd is healthy.
    ///
    /// # Errors
    ///
    /// Rejects with [`ActionError::NoMedicine`] when the chest is empty, and
    /// while an interaction is pending or after the journey ends.
    pub fn use_medicine(&mut self) -> Result<ChoiceOutcome, ActionError> {
        self.ensure_trail_action()?;
        match camp::use_medicine(&mut self.state) {
            Ok(text) => {
                self.push(LogKind::Camp, Severity::Info, text);
                Ok(self.after_trail_action())
            }
            Err(err) => self.reject(err),
        }
    }

    fn ensure_trail_action(&mut self) -> Result<(), ActionError> {
        if self.state.game_over {
            return Err(ActionError::GameOver);
        }
        if self.pending.is_some() {
            return self.reject(ActionError::AwaitingDecision);
        }
        Ok(())
    }

    fn after_trail_action(&mut self) -> ChoiceOutcome {
        self.run_oxen();
        self.check_terminal()
            .map_or(ChoiceOutcome::Resolved, ChoiceOutcome::Ended)
    }

    // Bookkeeping ---------------------------------------------------------

    fn run_oxen(&mut self) {
        let report: OxenReport =
            oxen::run_health_checks(&mut self.state, &self.cfg.oxen, &mut *self.rng.oxen());
        let severity = if report.deaths > 0 {
            Severity::Danger
        } else {
            Severity::Warning
        };
        for line in report.narration() {
            self.push(LogKind::Oxen, severity, line);
        }
    }

    fn check_terminal(&mut self) -> Option<Ending> {
        let ending = detect_ending(&self.state)?;
        Some(self.conclude(ending))
    }

    fn conclude(&mut self, ending: Ending) -> Ending {
        self.state.game_over = true;
        self.state.ending = Some(ending);
        self.state.clear_location();
        self.pending = None;
        self.set_status(EngineStatus::GameOver(ending));
        let severity = if ending.is_victory() {
            Severity::Info
        } else {
            Severity::Danger
        };
        let text = ending_message(ending, &self.state);
        self.push(LogKind::Outcome, severity, text);
        log::info!(
            "journey ended: {ending} on day {} at mile {}",
            self.state.day,
            self.state.distance
        );
        ending
    }

    fn reject<T>(&mut self, err: ActionError) -> Result<T, ActionError> {
        log::debug!("rejected: {err:?}");
        self.push(LogKind::Rejected, Severity::Warning, err.to_string());
        Err(err)
    }

    fn set_status(&mut self, status: EngineStatus) {
        if self.status != status {
            log::debug!("engine {:?} -> {status:?}", self.status);
            self.status = status;
        }
    }

    fn push(&mut self, kind: LogKind, severity: Severity, text: String) {
        let day = self.state.day;
        if day != self.log_day {
            self.log_day = day;
            self.log_seq = 0;
        }
        let id = EntryId::new(day, self.log_seq);
        self.log_seq = self.log_seq.saturating_add(1);
        self.log.push(LogEntry {
            id,
            kind,
            severity,
            text,
        });
    }
}
