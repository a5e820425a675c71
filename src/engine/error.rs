//! Engine error types.

use crate::core::StateName;
use std::convert::Infallible;
use thiserror::Error;

/// Problems with a machine definition, detected at or before `run`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("missing start state")]
    MissingStartState,

    #[error("no end states registered")]
    NoEndStates,

    #[error("unregistered state: {name}")]
    UnregisteredState { name: StateName },
}

/// Failure of a run.
///
/// Handler errors are carried unmodified so the caller sees exactly what the
/// domain code produced.
#[derive(Debug, Error)]
pub enum RunError<E> {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("handler failed: {0}")]
    Handler(E),
}

impl<E> RunError<E> {
    /// The configuration error, if this is one.
    pub fn configuration(&self) -> Option<&ConfigurationError> {
        match self {
            RunError::Configuration(err) => Some(err),
            RunError::Handler(_) => None,
        }
    }

    /// Unwrap the handler's own error.
    pub fn into_handler_error(self) -> Result<E, ConfigurationError> {
        match self {
            RunError::Handler(err) => Ok(err),
            RunError::Configuration(err) => Err(err),
        }
    }
}

impl RunError<Infallible> {
    /// Infallible handlers can only fail through configuration.
    pub fn into_configuration(self) -> ConfigurationError {
        match self {
            RunError::Configuration(err) => err,
            RunError::Handler(never) => match never {},
        }
    }
}
