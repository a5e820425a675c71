//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::core::StateName;
use crate::engine::StateMachine;
use stillwater::validation::Validation;

/// Builder for constructing state machines with a fluent API.
///
/// Unlike registering on a [`StateMachine`] directly, `build` checks the
/// definition up front and reports every problem at once.
pub struct StateMachineBuilder<C, E = std::convert::Infallible> {
    machine: StateMachine<C, E>,
}

impl<C, E> StateMachineBuilder<C, E> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            machine: StateMachine::new(),
        }
    }

    /// Set the start state (required).
    pub fn start(mut self, name: impl Into<StateName>) -> Self {
        self.machine.set_start(name);
        self
    }

    /// Add a state with an infallible handler.
    pub fn state<F, N>(mut self, name: impl Into<StateName>, handler: F) -> Self
    where
        F: FnMut(C) -> (N, C) + Send + 'static,
        N: Into<StateName>,
    {
        self.machine.register_state(name, handler, false);
        self
    }

    /// Add a state whose handler may fail.
    pub fn fallible_state<F, N>(mut self, name: impl Into<StateName>, handler: F) -> Self
    where
        F: FnMut(C) -> Result<(N, C), E> + Send + 'static,
        N: Into<StateName>,
    {
        self.machine.try_register_state(name, handler, false);
        self
    }

    /// Add an end state. At least one is required.
    pub fn end_state(mut self, name: impl Into<StateName>) -> Self {
        self.machine.add_end_state(name);
        self
    }

    /// Build the state machine.
    /// Returns an error listing every configuration problem.
    pub fn build(self) -> Result<StateMachine<C, E>, BuildError> {
        match self.machine.validate() {
            Validation::Success(()) => Ok(self.machine),
            Validation::Failure(errors) => {
                Err(BuildError::Invalid(errors.iter().cloned().collect()))
            }
        }
    }
}

impl<C, E> Default for StateMachineBuilder<C, E> {
    fn default() -> Self {
        Self::new()
    }
}
