use crate::app_dirs;

use super::config_types::ConfigError;

mod load;
mod save;


/// Default filename used to store the workbench settings.
pub const CONFIG_FILE_NAME: &str = "config.toml";

pub use load::{config_path, load_or_default};
pub use save::{save, save_to_path};

fn map_app_dir_error(error: app_dirs::AppDirError) -> ConfigError {
    match error {
        app_dirs::AppDirError::NoBaseDir => ConfigError::NoConfigDir,
        app_dirs::AppDirError::CreateDir { path, source } => {
            ConfigError::CreateDir { path, source }
        }
    }
}
