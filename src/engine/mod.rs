//! The FSM engine.
//!
//! A [`StateMachine`] binds handlers to state names, remembers a start state
//! and a set of end states, and runs handlers one at a time on the calling
//! thread until one of them names an end state.
//!
//! # Run loop
//!
//! 1. Fail if no start state was set, then if no end state was registered.
//! 2. Look up the handler for the current state; fail if there is none.
//! 3. Move the cargo into the handler and take back `(next, cargo)`.
//! 4. Stop and return the cargo if `next` is an end state, otherwise continue
//!    from `next`.
//!
//! End-state handlers are never called. Errors returned by fallible handlers
//! abort the run and reach the caller unchanged.

mod error;
mod machine;

pub use error::{ConfigurationError, RunError};
pub use machine::{Handler, StateMachine, Traced};
