//! Seams between the engine and the outside world.
//!
//! `ProgressStore` is the only persistence boundary, `RandomSource` the only
//! source of randomness, and `SessionReporter` the only outbound event hook.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::StoreError;
use crate::experiment::ExperimentResult;
use crate::model::{TopicKey, UserProgress};
use crate::quiz::Submission;

// ---------------------------------------------------------------------------
// Progress storage
// ---------------------------------------------------------------------------

/// Durable storage for the single progress record.
///
/// Implementors only move an opaque string in and out; decoding, validation
/// and first-run initialisation live in the provided `load`/`save`.
pub trait ProgressStore {
    /// Human-readable location of the record (e.g. a file path).
    fn location(&self) -> String;

    /// Read the stored record, or `None` if nothing has been stored yet.
    fn read_record(&self) -> Result<Option<String>, StoreError>;

    /// Overwrite the stored record. Last write wins.
    fn write_record(&mut self, contents: &str) -> Result<(), StoreError>;

    /// Load the record, creating and persisting a fresh one named `name`
    /// when none exists or the stored one is unreadable.
    fn load(&mut self, name: &str) -> Result<UserProgress, StoreError> {
        if let Some(raw) = self.read_record()? {
            match decode_record(&raw) {
                Some(progress) => return Ok(progress),
                None => tracing::warn!(
                    "progress record at {} is corrupt, starting fresh",
                    self.location()
                ),
            }
        }

        let progress = UserProgress::new(name);
        self.save(&progress)?;
        tracing::info!("initialized progress record at {}", self.location());
        Ok(progress)
    }

    /// Serialize and overwrite the stored record.
    fn save(&mut self, progress: &UserProgress) -> Result<(), StoreError> {
        let json = serde_json::to_string(progress)?;
        self.write_record(&json)
    }
}

/// Decode a stored record, rejecting anything unparseable or out of range.
pub fn decode_record(raw: &str) -> Option<UserProgress> {
    serde_json::from_str::<UserProgress>(raw)
        .ok()
        .filter(UserProgress::is_valid)
}

// ---------------------------------------------------------------------------
// Randomness
// ---------------------------------------------------------------------------

/// Source of uniform draws for the probability lab.
pub trait RandomSource {
    /// A uniform sample in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

/// Adapts any `rand` generator into a `RandomSource`.
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl RngSource<StdRng> {
    /// Reproducible source for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    /// Source seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self(StdRng::from_os_rng())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.0.random::<f64>()
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
///
/// Values are clamped into `[0, 1)` so a script can never produce an
/// out-of-range draw.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    draws: Vec<f64>,
    next: usize,
}

impl ScriptedSource {
    pub fn new(draws: Vec<f64>) -> Self {
        Self { draws, next: 0 }
    }

    /// A source that returns `value` forever.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        if self.draws.is_empty() {
            return 0.0;
        }
        let value = self.draws[self.next % self.draws.len()];
        self.next += 1;
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

// ---------------------------------------------------------------------------
// Session events
// ---------------------------------------------------------------------------

/// Receives structured events as sessions progress.
pub trait SessionReporter {
    fn on_answer(&self, submission: &Submission, progress: &UserProgress);
    fn on_topic_complete(&self, key: &TopicKey, progress: &UserProgress);
    fn on_trial(&self, result: &ExperimentResult, coins_awarded: u32);
}

/// Reporter that ignores every event.
pub struct NoopReporter;

impl SessionReporter for NoopReporter {
    fn on_answer(&self, _: &Submission, _: &UserProgress) {}
    fn on_topic_complete(&self, _: &TopicKey, _: &UserProgress) {}
    fn on_trial(&self, _: &ExperimentResult, _: u32) {}
}
