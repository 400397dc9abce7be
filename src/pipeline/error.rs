use crate::anomaly::NoPeaksError;
use crate::config::ConfigError;
use crate::series::InputShapeError;

/// Errors that abort a pipeline run
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    /// Input series is malformed
    #[error("Input error: {0}")]
    InputShape(#[from] InputShapeError),

    /// Configuration rejected before processing
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No droplet was detected
    #[error(transparent)]
    NoPeaks(#[from] NoPeaksError),

    /// Heatmap requested for a channel the series does not carry
    #[error("Unknown heatmap channel: {0}")]
    UnknownChannel(String),
}
