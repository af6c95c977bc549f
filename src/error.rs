//! Error taxonomy for the digital twin

use thiserror::Error;

/// Errors raised between loading the artifacts and rendering a prediction.
#[derive(Debug, Error)]
pub enum FurnaceError {
    /// Model or scaler could not be fetched or loaded. Fatal at startup.
    #[error("artifact `{artifact}` unavailable: {reason}")]
    ArtifactUnavailable { artifact: String, reason: String },

    /// Scaler transform or model predict failed for one input.
    #[error("{0}")]
    Prediction(String),

    /// The loaded model does not expose per-feature importances.
    #[error("Feature importance not available for this model type.")]
    ImportanceUnavailable,

    /// An operator input fell outside its slider range.
    #[error("{field} = {value} is outside the allowed range [{min}, {max}]")]
    InvalidInput {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl FurnaceError {
    pub fn artifact(artifact: impl Into<String>, reason: impl ToString) -> Self {
        Self::ArtifactUnavailable {
            artifact: artifact.into(),
            reason: reason.to_string(),
        }
    }

    pub fn prediction(reason: impl ToString) -> Self {
        Self::Prediction(reason.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FurnaceError>;
