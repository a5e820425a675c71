//! Step-by-step record of a single run.
//!
//! A trace is only collected by [`StateMachine::run_traced`]; plain
//! [`StateMachine::run`] records nothing, so unbounded runs stay flat in
//! memory.
//!
//! [`StateMachine::run_traced`]: crate::engine::StateMachine::run_traced
//! [`StateMachine::run`]: crate::engine::StateMachine::run

use super::name::StateName;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// One handler invocation.
///
/// `from` is the state whose handler ran, `to` is the name it returned.
/// When `to` is an end state it is the last step of the run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Zero-based position within the run
    pub index: u64,
    /// State whose handler was invoked
    pub from: StateName,
    /// Next state returned by the handler
    pub to: StateName,
    /// When the handler returned
    pub timestamp: DateTime<Utc>,
}

impl Step {
    /// Whether the handler moved the machine to a different state.
    pub fn is_transition(&self) -> bool {
        self.from != self.to
    }
}

/// Ordered steps of a run.
///
/// # Example
///
/// ```rust
/// use cargofsm::core::{RunTrace, StateName};
///
/// let mut trace = RunTrace::new();
/// trace.record(StateName::new("a"), StateName::new("a"));
/// trace.record(StateName::new("a"), StateName::new("b"));
///
/// assert_eq!(trace.steps().len(), 2);
/// assert_eq!(trace.transitions().count(), 1);
/// assert_eq!(trace.visits(&StateName::new("A")), 2);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunTrace {
    run_id: Uuid,
    started_at: DateTime<Utc>,
    steps: Vec<Step>,
}

impl Default for RunTrace {
    fn default() -> Self {
        Self::new()
    }
}

impl RunTrace {
    /// Start an empty trace with a fresh run id.
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            steps: Vec::new(),
        }
    }

    /// Append a step.
    pub fn record(&mut self, from: StateName, to: StateName) {
        let index = self.steps.len() as u64;
        self.steps.push(Step {
            index,
            from,
            to,
            timestamp: Utc::now(),
        });
    }

    /// Identifier shared with the run's tracing span.
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// When the trace was created, just before the first handler ran.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// All recorded steps in order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Steps that changed state.
    pub fn transitions(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter().filter(|step| step.is_transition())
    }

    /// States in visiting order: the start state, then each returned name.
    ///
    /// The final element is the end state that stopped the run.
    pub fn path(&self) -> Vec<&StateName> {
        let mut path = Vec::with_capacity(self.steps.len() + 1);
        if let Some(first) = self.steps.first() {
            path.push(&first.from);
        }
        path.extend(self.steps.iter().map(|step| &step.to));
        path
    }

    /// Number of times the handler for `state` was invoked.
    pub fn visits(&self, state: &StateName) -> usize {
        self.steps.iter().filter(|step| &step.from == state).count()
    }

    /// Name returned by the final step; the end state for a finished run.
    pub fn last_state(&self) -> Option<&StateName> {
        self.steps.last().map(|step| &step.to)
    }

    /// Time from the start of the run to the last recorded step.
    pub fn duration(&self) -> Option<Duration> {
        let last = self.steps.last()?;
        last.timestamp
            .signed_duration_since(self.started_at)
            .to_std()
            .ok()
    }
}
