//! Dataset ingestion and train/validation/test split planning for the
//! time-series workbench.
//!
//! The UI shell hands a [`planner::FileUpload`] to a [`planner::Planner`],
//! renders the [`planner::PlanSnapshot`]s it publishes and reads model
//! settings through [`settings`].

/// Application directory resolution.
pub mod app_dirs;
/// Tabular file decoding (CSV, XLSX, XLS).
pub mod dataset;
/// Log file setup.
pub mod logging;
/// Column roles, split plans and the upload state machine.
pub mod planner;
/// Workbench settings stored as TOML.
pub mod settings;
/// Session snapshot persistence.
pub mod storage;

mod atomic_file;
