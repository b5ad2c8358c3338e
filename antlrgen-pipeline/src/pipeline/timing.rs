//! Stage timing plugin.
//!
//! Records how long each stage took and whether it finished, so the
//! `generate` report can show where a run spent its time or where it
//! stopped.

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};

use super::{Plugin, RunContext};
use crate::{Error, Result};

/// How a stage ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    Completed,
    Failed,
}

/// Timing of one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageRecord {
    pub name: String,
    pub status: StageStatus,
    pub elapsed: Duration,
}

#[derive(Debug, Default)]
struct State {
    started: Option<(String, Instant)>,
    records: Vec<StageRecord>,
}

/// A plugin that times every stage.
///
/// Clones share their records, so keep one clone and hand the other to the
/// pipeline.
///
/// # Example
///
/// ```ignore
/// let timing = TimingPlugin::new();
/// let result = Pipeline::new().plugin(timing.clone()).run(&config, &runner, &fetcher);
///
/// for record in timing.records() {
///     println!("{} {:?}", record.name, record.elapsed);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct TimingPlugin {
    state: Arc<Mutex<State>>,
}

impl TimingPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records of the stages that have ended, in execution order.
    pub fn records(&self) -> Vec<StageRecord> {
        self.lock().records.clone()
    }

    /// Total time spent in recorded stages.
    pub fn total(&self) -> Duration {
        self.lock().records.iter().map(|r| r.elapsed).sum()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // A panicking hook leaves the records usable.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn finish(&self, stage: &str, status: StageStatus) {
        let mut state = self.lock();
        let elapsed = match state.started.take() {
            Some((name, start)) if name == stage => start.elapsed(),
            _ => Duration::ZERO,
        };
        state.records.push(StageRecord {
            name: stage.to_string(),
            status,
            elapsed,
        });
    }
}

impl Plugin for TimingPlugin {
    fn name(&self) -> &'static str {
        "timing"
    }

    fn on_before_stage(&self, stage: &str, _ctx: &mut RunContext<'_>) -> Result<()> {
        self.lock().started = Some((stage.to_string(), Instant::now()));
        Ok(())
    }

    fn on_after_stage(&self, stage: &str, _ctx: &mut RunContext<'_>) -> Result<()> {
        self.finish(stage, StageStatus::Completed);
        Ok(())
    }

    fn on_stage_failed(&self, stage: &str, _error: &Error) {
        self.finish(stage, StageStatus::Failed);
    }
}
