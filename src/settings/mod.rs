//! Persisted workbench settings: the default split preset and the model
//! hyperparameters edited on the model-configuration screen.

mod config_defaults;
pub mod config_io;
mod config_types;

pub use config_io::{CONFIG_FILE_NAME, config_path, load_or_default, save, save_to_path};
pub use config_types::{ConfigError, ModelKind, ModelSettings, WorkbenchSettings};
