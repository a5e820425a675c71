//! Cargofsm: a minimal handler-driven finite state machine runtime
//!
//! A machine is a registry of named states, each bound to a handler. A run
//! starts at the start state and repeatedly hands the *cargo* (an opaque,
//! caller-owned context) to the current handler, which returns the name of
//! the next state together with the updated cargo. The run ends as soon as a
//! handler names an end state.
//!
//! # Core Concepts
//!
//! - **StateName**: case-insensitive state identifiers
//! - **Handler**: `FnMut(C) -> (next, C)`, optionally fallible
//! - **End states**: reaching one stops the run; its handler is never called
//! - **RunTrace**: optional record of every step of a run
//!
//! # Example
//!
//! ```rust
//! use cargofsm::StateMachine;
//!
//! struct Fly {
//!     energy: i32,
//! }
//!
//! let mut machine = StateMachine::<Fly>::new();
//! machine.register_state("resting", |mut fly: Fly| {
//!     fly.energy -= 1;
//!     let next = if fly.energy < 70 { "dead" } else { "resting" };
//!     (next, fly)
//! }, false);
//! machine.register_state("dead", |fly| ("dead", fly), true);
//! machine.set_start("Resting");
//!
//! let fly = machine.run(Fly { energy: 75 }).unwrap();
//! assert_eq!(fly.energy, 69);
//! ```

pub mod builder;
pub mod core;
pub mod engine;

// Re-export commonly used types
pub use builder::{BuildError, StateMachineBuilder};
pub use crate::core::{RunTrace, State, StateName, Step};
pub use engine::{ConfigurationError, RunError, StateMachine, Traced};
