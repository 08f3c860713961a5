//! Crate-level error type
//!
//! [`Error`] wraps the component errors so the session layer can use `?`
//! across containers, expressions and scheduling. Component errors keep
//! their own message; the wrapper adds nothing.

use crate::expression::ExpressionError;
use crate::scheduler::SchedulerError;
use crate::structures::StructureError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error(transparent)]
    Expression(#[from] ExpressionError),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    /// A request missing a field its operation needs
    #[error("Missing field '{field}' for {operation}")]
    MissingField {
        field: &'static str,
        operation: &'static str,
    },

    /// A script line that is not a valid request
    #[error("Invalid request on line {line}: {message}")]
    InvalidRequest { line: usize, message: String },

    /// Snapshot history budget exhausted
    #[error("Snapshot memory limit exceeded: {current} + {requested} > {limit}")]
    SnapshotLimitExceeded {
        current: usize,
        requested: usize,
        limit: usize,
    },

    /// A payload that could not be turned into JSON
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Stepping past either end of the history
    #[error("{0}")]
    History(String),
}
