//! Narration entries emitted by the travel engine.
//!
//! The log is the display layer's only input besides the state snapshot:
//! successes, rejections, rank shifts, and terminal outcomes all land here.

use serde::{Deserialize, Serialize};

/// Stable, deterministic identifier for a single entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId {
    /// Day counter when the entry was written.
    pub day: u32,
    /// Per-day sequence number (0-based).
    pub seq: u16,
}

impl EntryId {
    #[must_use]
    pub const fn new(day: u32, seq: u16) -> Self {
        Self { day, seq }
    }
}

/// What produced a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    Travel,
    Event,
    Encounter,
    Landmark,
    Fort,
    River,
    Hunt,
    Camp,
    Oxen,
    Rejected,
    Outcome,
}

/// Severity tier used by hosts to style the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: EntryId,
    pub kind: LogKind,
    pub severity: Severity,
    pub text: String,
}

impl LogEntry {
    #[must_use]
    pub const fn day(&self) -> u32 {
        self.id.day
    }
}

/// Explainability telemetry for a weighted table draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionTrace {
    /// Table the draw came from (e.g. `passive_events`).
    pub pool: String,
    pub roll: f64,
    pub candidates: Vec<WeightedCandidate>,
    pub chosen: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedCandidate {
    pub id: String,
    pub weight: u32,
}
