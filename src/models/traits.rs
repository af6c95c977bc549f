//! Capabilities the dashboard needs from the trained artifacts

use crate::error::Result;
use crate::types::features::FeatureRecord;

/// A fitted regressor producing one temperature per row.
pub trait Regressor: Send + Sync {
    /// Predict from an already-scaled row.
    fn predict(&self, features: &[f32]) -> Result<f64>;

    /// Per-feature weights in training column order, if the model type has them.
    fn feature_importances(&self) -> Option<Vec<f64>> {
        None
    }

    /// Human-readable name for logs.
    fn name(&self) -> &str;
}

/// A fitted feature scaler.
pub trait Scaler: Send + Sync {
    /// Transform one raw record into the scaled row the regressor expects.
    fn transform(&self, record: &FeatureRecord) -> Result<Vec<f32>>;

    fn name(&self) -> &str;
}
