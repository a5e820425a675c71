//! The state registry and its run loop.

use crate::core::{RunTrace, StateName};
use crate::engine::error::{ConfigurationError, RunError};
use std::collections::{HashMap, HashSet};
use std::convert::Infallible;
use std::fmt;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use uuid::Uuid;

/// Boxed handler stored in the registry.
///
/// Takes the cargo by value and hands it back together with the name of the
/// next state.
pub type Handler<C, E> = Box<dyn FnMut(C) -> Result<(StateName, C), E> + Send>;

/// Result of [`StateMachine::run_traced`].
#[derive(Debug)]
pub struct Traced<C> {
    /// Cargo as returned by the handler that reached an end state
    pub cargo: C,
    /// Every handler invocation of the run
    pub trace: RunTrace,
}

/// A registry of named states driven by a synchronous run loop.
///
/// `C` is the cargo threaded through every handler. `E` is the error type of
/// fallible handlers and defaults to [`Infallible`].
///
/// # Example
///
/// ```rust
/// use cargofsm::StateMachine;
///
/// let mut machine = StateMachine::<u32>::new();
/// machine.register_state("counting", |n: u32| {
///     let next = if n >= 3 { "done" } else { "counting" };
///     (next, n + 1)
/// }, false);
/// machine.add_end_state("done");
/// machine.set_start("Counting");
///
/// assert_eq!(machine.run(0).unwrap(), 4);
/// ```
pub struct StateMachine<C, E = Infallible> {
    handlers: HashMap<StateName, Handler<C, E>>,
    start: Option<StateName>,
    end_states: HashSet<StateName>,
}

impl<C, E> StateMachine<C, E> {
    /// Create an empty machine.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            start: None,
            end_states: HashSet::new(),
        }
    }

    /// Register an infallible handler under `name`.
    ///
    /// Registering the same name twice replaces the earlier handler. When
    /// `is_end_state` is true the name also joins the end-state set; that
    /// handler is kept but never invoked by [`run`](Self::run).
    pub fn register_state<F, N>(
        &mut self,
        name: impl Into<StateName>,
        mut handler: F,
        is_end_state: bool,
    )
    where
        F: FnMut(C) -> (N, C) + Send + 'static,
        N: Into<StateName>,
    {
        self.insert(
            name.into(),
            Box::new(move |cargo| {
                let (next, cargo) = handler(cargo);
                Ok((next.into(), cargo))
            }),
            is_end_state,
        );
    }

    /// Register a handler that may fail with the domain error `E`.
    ///
    /// An `Err` from the handler aborts the run and is returned as
    /// [`RunError::Handler`] without modification.
    pub fn try_register_state<F, N>(
        &mut self,
        name: impl Into<StateName>,
        mut handler: F,
        is_end_state: bool,
    )
    where
        F: FnMut(C) -> Result<(N, C), E> + Send + 'static,
        N: Into<StateName>,
    {
        self.insert(
            name.into(),
            Box::new(move |cargo| handler(cargo).map(|(next, cargo)| (next.into(), cargo))),
            is_end_state,
        );
    }

    fn insert(&mut self, name: StateName, handler: Handler<C, E>, is_end_state: bool) {
        tracing::debug!(state = %name, "adding state");
        if self.handlers.insert(name.clone(), handler).is_some() {
            tracing::debug!(state = %name, "replaced previously registered handler");
        }
        if is_end_state {
            self.add_end_state(name);
        }
    }

    /// Mark `name` as an end state without binding a handler.
    pub fn add_end_state(&mut self, name: impl Into<StateName>) {
        let name = name.into();
        tracing::debug!(state = %name, "marking end state");
        self.end_states.insert(name);
    }

    /// Choose the state a run begins in. It may be registered later.
    pub fn set_start(&mut self, name: impl Into<StateName>) {
        let name = name.into();
        tracing::debug!(state = %name, "setting start state");
        self.start = Some(name);
    }

    /// The configured start state, if any.
    pub fn start_state(&self) -> Option<&StateName> {
        self.start.as_ref()
    }

    /// Every name that ends a run.
    pub fn end_states(&self) -> &HashSet<StateName> {
        &self.end_states
    }

    /// Whether returning `name` from a handler ends the run.
    pub fn is_end_state(&self, name: impl Into<StateName>) -> bool {
        self.end_states.contains(&name.into())
    }

    /// Whether a handler is bound to `name`.
    pub fn is_registered(&self, name: impl Into<StateName>) -> bool {
        self.handlers.contains_key(&name.into())
    }

    /// Number of states with a handler.
    pub fn state_count(&self) -> usize {
        self.handlers.len()
    }

    /// Check the definition, accumulating every problem found.
    ///
    /// Unlike [`run`](Self::run), which stops at the first precondition that
    /// fails, this reports all of them, including a start state without a
    /// handler, which `run` would only discover on its first lookup.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigurationError>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<ConfigurationError>>> = Vec::new();

        checks.push(match &self.start {
            None => Validation::fail(ConfigurationError::MissingStartState),
            Some(start) if !self.handlers.contains_key(start) => {
                Validation::fail(ConfigurationError::UnregisteredState {
                    name: start.clone(),
                })
            }
            Some(_) => Validation::success(()),
        });

        checks.push(if self.end_states.is_empty() {
            Validation::fail(ConfigurationError::NoEndStates)
        } else {
            Validation::success(())
        });

        Validation::all_vec(checks).map(|_| ())
    }

    /// Drive the machine from the start state until a handler names an end
    /// state, then return the cargo that handler produced.
    ///
    /// There is no step limit: a handler that never returns an end-state name
    /// keeps the run going forever.
    pub fn run(&mut self, cargo: C) -> Result<C, RunError<E>> {
        self.drive(cargo, Uuid::new_v4(), |_, _| {})
    }

    /// Like [`run`](Self::run), also recording every step.
    pub fn run_traced(&mut self, cargo: C) -> Result<Traced<C>, RunError<E>> {
        let mut trace = RunTrace::new();
        let run_id = trace.run_id();
        let cargo = self.drive(cargo, run_id, |from, to| {
            trace.record(from.clone(), to.clone())
        })?;
        Ok(Traced { cargo, trace })
    }

    fn drive<F>(&mut self, mut cargo: C, run_id: Uuid, mut on_step: F) -> Result<C, RunError<E>>
    where
        F: FnMut(&StateName, &StateName),
    {
        let span = tracing::debug_span!("fsm_run", %run_id, states = self.handlers.len());
        let _enter = span.enter();

        let mut current = self
            .start
            .clone()
            .ok_or(ConfigurationError::MissingStartState)?;
        if self.end_states.is_empty() {
            return Err(ConfigurationError::NoEndStates.into());
        }

        tracing::debug!(start = %current, "running state machine");

        loop {
            let handler = self
                .handlers
                .get_mut(&current)
                .ok_or_else(|| ConfigurationError::UnregisteredState {
                    name: current.clone(),
                })?;

            tracing::trace!(state = %current, "current state");
            let (next, updated) = handler(cargo).map_err(RunError::Handler)?;
            cargo = updated;
            on_step(&current, &next);

            if next != current {
                tracing::debug!(from = %current, to = %next, "switching state");
            }

            if self.end_states.contains(&next) {
                tracing::debug!(state = %next, "reached end state");
                return Ok(cargo);
            }

            current = next;
        }
    }
}

impl<C, E> Default for StateMachine<C, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, E> fmt::Debug for StateMachine<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut states: Vec<&StateName> = self.handlers.keys().collect();
        states.sort();
        f.debug_struct("StateMachine")
            .field("states", &states)
            .field("start", &self.start)
            .field("end_states", &self.end_states)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counter() -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let c = Arc::new(AtomicUsize::new(0));
        (c.clone(), c)
    }

    #[test]
    fn run_without_start_fails() {
        let mut machine = StateMachine::<()>::new();
        machine.register_state("a", |c| ("b", c), false);
        machine.register_state("b", |c| ("b", c), true);

        let err = machine.run(()).unwrap_err().into_configuration();
        assert_eq!(err, ConfigurationError::MissingStartState);
        assert_eq!(err.to_string(), "missing start state");
    }

    #[test]
    fn run_without_end_states_fails() {
        let mut machine = StateMachine::<()>::new();
        machine.register_state("a", |c| ("a", c), false);
        machine.set_start("a");

        let err = machine.run(()).unwrap_err().into_configuration();
        assert_eq!(err, ConfigurationError::NoEndStates);
        assert_eq!(err.to_string(), "no end states registered");
    }

    #[test]
    fn start_is_checked_before_end_states() {
        let mut machine = StateMachine::<()>::new();
        let err = machine.run(()).unwrap_err().into_configuration();
        assert_eq!(err, ConfigurationError::MissingStartState);
    }

    #[test]
    fn unregistered_start_fails_on_lookup() {
        let mut machine = StateMachine::<()>::new();
        machine.add_end_state("done");
        machine.set_start("nowhere");

        let err = machine.run(()).unwrap_err().into_configuration();
        assert_eq!(err.to_string(), "unregistered state: NOWHERE");
    }

    #[test]
    fn unregistered_next_state_fails() {
        let (calls, seen) = counter();
        let mut machine = StateMachine::<u32>::new();
        machine.register_state(
            "a",
            move |n| {
                calls.fetch_add(1, Ordering::SeqCst);
                ("missing", n)
            },
            false,
        );
        machine.add_end_state("done");
        machine.set_start("a");

        let err = machine.run(0).unwrap_err().into_configuration();
        assert_eq!(
            err,
            ConfigurationError::UnregisteredState {
                name: StateName::new("missing")
            }
        );
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn end_state_handler_is_never_invoked() {
        let (calls, seen) = counter();
        let mut machine = StateMachine::<u32>::new();
        machine.register_state("work", |n| ("finish", n + 1), false);
        machine.register_state(
            "finish",
            move |n| {
                calls.fetch_add(1, Ordering::SeqCst);
                ("finish", n)
            },
            true,
        );
        machine.set_start("work");

        assert_eq!(machine.run(0).unwrap(), 1);
        assert_eq!(seen.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn lookups_ignore_case() {
        let mut machine = StateMachine::<Vec<&'static str>>::new();
        machine.register_state(
            "Eating",
            |mut log: Vec<&'static str>| {
                log.push("eating");
                let next = if log.len() >= 3 { "DEAD" } else { "eating" };
                (next, log)
            },
            false,
        );
        machine.register_state("resting", |log| ("EATING", log), false);
        machine.add_end_state("Dead");
        machine.set_start("RESTING");

        let log = machine.run(Vec::new()).unwrap();
        assert_eq!(log, vec!["eating", "eating", "eating"]);
        assert!(machine.is_registered("EATING"));
        assert!(machine.is_end_state("dead"));
    }

    #[test]
    fn reregistering_replaces_handler() {
        let mut machine = StateMachine::<&'static str>::new();
        machine.register_state("a", |_| ("done", "first"), false);
        machine.register_state("A", |_| ("done", "second"), false);
        machine.add_end_state("done");
        machine.set_start("a");

        assert_eq!(machine.state_count(), 1);
        assert_eq!(machine.run("").unwrap(), "second");
    }

    #[test]
    fn end_state_registration_is_idempotent() {
        let mut machine = StateMachine::<()>::new();
        machine.register_state("done", |c| ("done", c), true);
        machine.register_state("done", |c| ("done", c), true);
        machine.add_end_state("DONE");

        assert_eq!(machine.end_states().len(), 1);
    }

    #[test]
    fn start_state_handler_runs_even_if_it_is_an_end_state() {
        let mut machine = StateMachine::<u32>::new();
        machine.register_state("only", |n| ("only", n + 1), true);
        machine.set_start("only");

        assert_eq!(machine.run(0).unwrap(), 1);
    }

    #[test]
    fn handler_errors_propagate_unmodified() {
        #[derive(Debug, PartialEq)]
        struct Starved {
            energy: i32,
        }

        let mut machine = StateMachine::<i32, Starved>::new();
        machine.try_register_state(
            "flying",
            |energy: i32| {
                if energy <= 0 {
                    Err(Starved { energy })
                } else {
                    Ok(("flying", energy - 10))
                }
            },
            false,
        );
        machine.add_end_state("dead");
        machine.set_start("flying");

        let err = machine.run(25).unwrap_err();
        assert_eq!(err.into_handler_error().unwrap(), Starved { energy: -5 });
    }

    #[test]
    fn machine_can_be_run_again() {
        let mut machine = StateMachine::<u32>::new();
        machine.register_state("inc", |n| ("stop", n + 1), false);
        machine.add_end_state("stop");
        machine.set_start("inc");

        assert_eq!(machine.run(0).unwrap(), 1);
        assert_eq!(machine.run(10).unwrap(), 11);
    }

    #[test]
    fn run_traced_records_every_step() {
        let mut machine = StateMachine::<u32>::new();
        machine.register_state(
            "count",
            |n| {
                let next = if n >= 2 { "done" } else { "count" };
                (next, n + 1)
            },
            false,
        );
        machine.add_end_state("done");
        machine.set_start("count");

        let traced = machine.run_traced(0).unwrap();
        assert_eq!(traced.cargo, 3);
        assert_eq!(traced.trace.steps().len(), 3);
        assert_eq!(traced.trace.visits(&StateName::new("count")), 3);
        assert_eq!(traced.trace.transitions().count(), 1);
        assert_eq!(traced.trace.last_state(), Some(&StateName::new("done")));
    }

    #[test]
    fn validate_accumulates_all_problems() {
        let machine = StateMachine::<()>::new();

        match machine.validate() {
            Validation::Failure(errors) => {
                assert_eq!(errors.len(), 2);
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, ConfigurationError::MissingStartState)));
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, ConfigurationError::NoEndStates)));
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn validate_flags_unregistered_start() {
        let mut machine = StateMachine::<()>::new();
        machine.add_end_state("done");
        machine.set_start("ghost");

        match machine.validate() {
            Validation::Failure(errors) => {
                assert_eq!(errors.len(), 1);
                assert!(errors.iter().any(|e| matches!(
                    e,
                    ConfigurationError::UnregisteredState { name } if name == "ghost"
                )));
            }
            Validation::Success(_) => panic!("Expected failure, got success"),
        }
    }

    #[test]
    fn accessors_reflect_registration() {
        let mut machine = StateMachine::<()>::new();
        assert!(machine.start_state().is_none());
        assert!(machine.end_states().is_empty());

        machine.register_state("walking", |c| ("stopped", c), false);
        machine.add_end_state("Stopped");
        machine.set_start("Walking");

        assert_eq!(machine.start_state(), Some(&StateName::new("walking")));
        assert_eq!(machine.end_states().len(), 1);
        assert!(machine.is_end_state("STOPPED"));
        assert!(!machine.is_end_state("walking"));
    }

    #[test]
    fn traced_run_id_and_start_time_precede_steps() {
        let mut machine = StateMachine::<()>::new();
        machine.register_state("a", |c| ("done", c), false);
        machine.add_end_state("done");
        machine.set_start("a");

        let first = machine.run_traced(()).unwrap().trace;
        let second = machine.run_traced(()).unwrap().trace;

        assert_ne!(first.run_id(), second.run_id());
        assert!(first.started_at() <= first.steps()[0].timestamp);
    }

    #[test]
    fn validate_accepts_complete_definition() {
        let mut machine = StateMachine::<()>::new();
        machine.register_state("a", |c| ("done", c), false);
        machine.add_end_state("done");
        machine.set_start("a");

        assert!(matches!(machine.validate(), Validation::Success(())));
    }

    #[test]
    fn debug_lists_sorted_states() {
        let mut machine = StateMachine::<()>::new();
        machine.register_state("b", |c| ("a", c), false);
        machine.register_state("a", |c| ("b", c), false);

        let rendered = format!("{machine:?}");
        assert!(rendered.contains("StateName(\"A\"), StateName(\"B\")"));
    }
}
