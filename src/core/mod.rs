//! Core value types shared by the engine and its consumers.
//!
//! - `StateName`: canonical, case-insensitive state identifiers
//! - `State`: optional compile-time state enumerations
//! - `RunTrace`: step-by-step record of a traced run

mod name;
mod state;
mod trace;

pub use name::StateName;
pub use state::State;
pub use trace::{RunTrace, Step};
