use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::config_defaults::{
    clamp_count, clamp_dropout_rate, default_batch_size, default_dropout_rate, default_epochs,
    default_hidden_layers, default_learning_rate, default_neurons_per_layer, default_window_size,
    sanitize_learning_rate,
};
use crate::planner::SplitPreset;

/// Settings stored in `config.toml`.
///
/// Config keys (TOML): `default_split`, `model`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkbenchSettings {
    /// Preset applied to newly confirmed datasets.
    #[serde(default)]
    pub default_split: SplitPreset,
    #[serde(default)]
    pub model: ModelSettings,
}

impl WorkbenchSettings {
    pub fn normalized(mut self) -> Self {
        self.model = self.model.normalized();
        self
    }
}

/// Network family offered by the training backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    #[default]
    Lstm,
    Gru,
    Transformer,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [Self::Lstm, Self::Gru, Self::Transformer];

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Lstm => "LSTM",
            Self::Gru => "GRU",
            Self::Transformer => "Transformer",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Lstm => "Long Short-Term Memory network, suited to long-range dependencies",
            Self::Gru => "Gated Recurrent Unit, a lighter recurrent alternative to LSTM",
            Self::Transformer => "Attention-based model for long sequences",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Hyperparameters handed to the training backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    #[serde(default)]
    pub kind: ModelKind,
    #[serde(default = "default_epochs")]
    pub epochs: u32,
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    #[serde(default = "default_hidden_layers")]
    pub hidden_layers: u32,
    #[serde(default = "default_neurons_per_layer")]
    pub neurons_per_layer: u32,
    #[serde(default = "default_dropout_rate")]
    pub dropout_rate: f64,
    /// Input window in hours.
    #[serde(default = "default_window_size")]
    pub window_size: u32,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            kind: ModelKind::default(),
            epochs: default_epochs(),
            batch_size: default_batch_size(),
            learning_rate: default_learning_rate(),
            hidden_layers: default_hidden_layers(),
            neurons_per_layer: default_neurons_per_layer(),
            dropout_rate: default_dropout_rate(),
            window_size: default_window_size(),
        }
    }
}

impl ModelSettings {
    pub fn normalized(mut self) -> Self {
        self.epochs = clamp_count(self.epochs);
        self.batch_size = clamp_count(self.batch_size);
        self.hidden_layers = clamp_count(self.hidden_layers);
        self.neurons_per_layer = clamp_count(self.neurons_per_layer);
        self.window_size = clamp_count(self.window_size);
        self.dropout_rate = clamp_dropout_rate(self.dropout_rate);
        self.learning_rate = sanitize_learning_rate(self.learning_rate);
        self
    }
}

/// Errors that may occur while loading or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to create the config directory.
    #[error("Unable to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to read the config file.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to write the config file.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse TOML config.
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Failed to serialize config to TOML.
    #[error("Failed to serialize config to TOML at {path}: {source}")]
    SerializeToml {
        path: PathBuf,
        source: toml::ser::Error,
    },
    /// No suitable config directory available.
    #[error("No suitable config directory available")]
    NoConfigDir,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_out_of_range_values() {
        let model = ModelSettings {
            epochs: 0,
            batch_size: 0,
            learning_rate: f64::NAN,
            hidden_layers: 0,
            neurons_per_layer: 0,
            dropout_rate: 1.5,
            window_size: 0,
            ..ModelSettings::default()
        }
        .normalized();
        assert_eq!(model.epochs, 1);
        assert_eq!(model.batch_size, 1);
        assert_eq!(model.hidden_layers, 1);
        assert_eq!(model.neurons_per_layer, 1);
        assert_eq!(model.window_size, 1);
        assert_eq!(model.dropout_rate, 1.0);
        assert_eq!(model.learning_rate, 0.001);
    }

    #[test]
    fn negative_learning_rate_falls_back() {
        let model = ModelSettings {
            learning_rate: -0.1,
            dropout_rate: -0.3,
            ..ModelSettings::default()
        }
        .normalized();
        assert_eq!(model.learning_rate, 0.001);
        assert_eq!(model.dropout_rate, 0.0);
    }

    #[test]
    fn kinds_serialize_lowercase() {
        let value = toml::Value::try_from(ModelSettings {
            kind: ModelKind::Transformer,
            ..ModelSettings::default()
        })
        .unwrap();
        assert_eq!(value["kind"].as_str(), Some("transformer"));
    }
}
