pub(super) const DEFAULT_EPOCHS: u32 = 100;
pub(super) const DEFAULT_BATCH_SIZE: u32 = 32;
pub(super) const DEFAULT_LEARNING_RATE: f64 = 0.001;
pub(super) const DEFAULT_HIDDEN_LAYERS: u32 = 2;
pub(super) const DEFAULT_NEURONS_PER_LAYER: u32 = 64;
pub(super) const DEFAULT_DROPOUT_RATE: f64 = 0.2;
/// Hours of history fed to the model per prediction.
pub(super) const DEFAULT_WINDOW_SIZE: u32 = 24;

pub(super) fn default_epochs() -> u32 {
    DEFAULT_EPOCHS
}

pub(super) fn default_batch_size() -> u32 {
    DEFAULT_BATCH_SIZE
}

pub(super) fn default_learning_rate() -> f64 {
    DEFAULT_LEARNING_RATE
}

pub(super) fn default_hidden_layers() -> u32 {
    DEFAULT_HIDDEN_LAYERS
}

pub(super) fn default_neurons_per_layer() -> u32 {
    DEFAULT_NEURONS_PER_LAYER
}

pub(super) fn default_dropout_rate() -> f64 {
    DEFAULT_DROPOUT_RATE
}

pub(super) fn default_window_size() -> u32 {
    DEFAULT_WINDOW_SIZE
}

pub(super) fn clamp_count(value: u32) -> u32 {
    value.max(1)
}

pub(super) fn clamp_dropout_rate(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        DEFAULT_DROPOUT_RATE
    }
}

pub(super) fn sanitize_learning_rate(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        DEFAULT_LEARNING_RATE
    }
}
