//! Build errors for the state machine builder.

use crate::engine::ConfigurationError;
use thiserror::Error;

/// Errors that can occur when building a state machine.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Every configuration problem found, in check order.
    #[error("Invalid state machine definition: {}", render(.0))]
    Invalid(Vec<ConfigurationError>),
}

impl BuildError {
    /// The configuration problems, in check order.
    pub fn errors(&self) -> &[ConfigurationError] {
        match self {
            BuildError::Invalid(errors) => errors,
        }
    }
}

fn render(errors: &[ConfigurationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
