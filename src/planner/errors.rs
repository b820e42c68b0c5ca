use thiserror::Error;

use super::SplitError;
use crate::dataset::ParseError;

/// Errors returned by [`Planner`](super::Planner) operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlannerError {
    /// The selected file could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Split fractions or preset name were rejected.
    #[error(transparent)]
    Split(#[from] SplitError),
    /// The column is not part of the confirmed dataset.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),
    /// The operation needs a confirmed dataset.
    #[error("No dataset has been confirmed")]
    NoSession,
    /// Confirmation was requested without a selected file.
    #[error("No file is selected")]
    NoSelection,
    /// A dataset is active; it must be removed before selecting another file.
    #[error("A dataset is already active; remove it before selecting another file")]
    SessionActive,
    /// A parse is still running for this planner.
    #[error("A file is already being parsed")]
    ParseInFlight,
    /// The background parse thread is no longer running.
    #[error("The parse worker is not running")]
    WorkerUnavailable,
}
