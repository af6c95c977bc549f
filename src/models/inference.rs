//! Prediction engine: scaler transform, regressor predict, post-processing

use crate::artifacts::Artifacts;
use crate::error::{FurnaceError, Result};
use crate::models::traits::{Regressor, Scaler};
use crate::types::features::{feature_names, FeatureRecord};
use crate::types::prediction::{FeatureImportance, PredictionResult};
use std::cmp::Ordering;
use tracing::{debug, error};

/// Scale the record and predict one temperature (°C).
pub fn predict(record: &FeatureRecord, model: &dyn Regressor, scaler: &dyn Scaler) -> Result<f64> {
    let scaled = scaler.transform(record).map_err(|e| {
        error!(scaler = %scaler.name(), error = %e, "Scaler transform failed");
        as_prediction_error(e)
    })?;

    model.predict(&scaled).map_err(|e| {
        error!(model = %model.name(), error = %e, "Model inference failed");
        as_prediction_error(e)
    })
}

fn as_prediction_error(e: FurnaceError) -> FurnaceError {
    match e {
        FurnaceError::Prediction(_) => e,
        other => FurnaceError::prediction(other),
    }
}

/// Rank the model's feature importances, highest first.
pub fn importances(model: &dyn Regressor, names: &[&'static str]) -> Result<Vec<FeatureImportance>> {
    let weights = model
        .feature_importances()
        .ok_or(FurnaceError::ImportanceUnavailable)?;

    if weights.len() != names.len() || weights.iter().any(|w| !w.is_finite()) {
        debug!(
            model = %model.name(),
            weights = weights.len(),
            features = names.len(),
            "Feature importances do not match the schema"
        );
        return Err(FurnaceError::ImportanceUnavailable);
    }

    let mut ranking: Vec<FeatureImportance> = names
        .iter()
        .zip(weights)
        .map(|(&feature, importance)| FeatureImportance { feature, importance })
        .collect();
    ranking.sort_by(|a, b| {
        b.importance
            .partial_cmp(&a.importance)
            .unwrap_or(Ordering::Equal)
    });
    Ok(ranking)
}

/// Runs evaluations against one set of loaded artifacts
#[derive(Clone)]
pub struct PredictionEngine {
    artifacts: Artifacts,
}

impl PredictionEngine {
    pub fn new(artifacts: Artifacts) -> Self {
        Self { artifacts }
    }

    /// Predicted temperature for one record
    pub fn predict(&self, record: &FeatureRecord) -> Result<f64> {
        predict(
            record,
            self.artifacts.model.as_ref(),
            self.artifacts.scaler.as_ref(),
        )
    }

    /// Predict, then derive efficiency score and risk level
    pub fn evaluate(&self, record: &FeatureRecord) -> Result<PredictionResult> {
        let temperature = self.predict(record)?;
        let result = PredictionResult::from_temperature(temperature);

        debug!(
            predicted_temperature = result.predicted_temperature,
            efficiency_score = result.efficiency_score,
            risk_level = %result.risk_level,
            "Evaluation complete"
        );
        Ok(result)
    }

    /// Importance ranking over the training schema
    pub fn importances(&self) -> Result<Vec<FeatureImportance>> {
        importances(self.artifacts.model.as_ref(), &feature_names())
    }
}
