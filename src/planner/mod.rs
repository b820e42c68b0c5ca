//! Dataset ingestion and split planning.
//!
//! [`Planner`] owns the upload state machine, keeps column roles and the split
//! plan consistent while the operator edits them, and mirrors every change to
//! a [`SessionStore`](crate::storage::SessionStore) and to subscribers.

mod controller;
mod errors;
mod parse_worker;
mod roles;
mod session;
mod snapshot;
mod split;


pub use controller::{PendingParse, Planner, UploadState};
pub use errors::PlannerError;
pub use parse_worker::{ParseOutcome, ParseWorker};
pub use roles::{ColumnRole, ColumnRoles};
pub use session::{FileUpload, SessionConfiguration};
pub use snapshot::{PlanEvent, PlanSnapshot};
pub use split::{Partition, SplitBoundary, SplitError, SplitFractions, SplitPlan, SplitPreset};
