//! Typed state sets.
//!
//! When the set of states is known at compile time, an enum implementing
//! [`State`] can be used wherever a state name is expected. The engine still
//! keys its registry by [`StateName`], so typed and textual names mix freely.

use super::name::StateName;
use std::fmt::Debug;

/// Trait for compile-time state enumerations.
///
/// # Example
///
/// ```rust
/// use cargofsm::core::{State, StateName};
///
/// #[derive(Clone, Copy, PartialEq, Debug)]
/// enum Fly {
///     Resting,
///     Eating,
///     Dead,
/// }
///
/// impl State for Fly {
///     fn name(&self) -> &str {
///         match self {
///             Self::Resting => "Resting",
///             Self::Eating => "Eating",
///             Self::Dead => "Dead",
///         }
///     }
///
///     fn is_end(&self) -> bool {
///         matches!(self, Self::Dead)
///     }
/// }
///
/// assert_eq!(Fly::Eating.state_name(), StateName::new("EATING"));
/// assert!(Fly::Dead.is_end());
/// ```
pub trait State: Clone + PartialEq + Debug + Send + Sync {
    /// Display name of the state. Case does not matter.
    fn name(&self) -> &str;

    /// Whether reaching this state ends a run.
    ///
    /// Default implementation returns `false`.
    fn is_end(&self) -> bool {
        false
    }

    /// Canonical registry key for this state.
    fn state_name(&self) -> StateName {
        StateName::new(self.name())
    }
}
