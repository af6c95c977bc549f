//! Presentation layer: evaluation view model and HTTP dashboard

pub mod page;
pub mod server;

use crate::error::{FurnaceError, Result};
use crate::feature_assembler::FeatureAssembler;
use crate::metrics::DashboardMetrics;
use crate::models::inference::PredictionEngine;
use crate::types::features::{FeatureRecord, OperatorInputs};
use crate::types::prediction::{FeatureImportance, RiskLevel};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Instant;
use tracing::{error, info, warn};

pub use server::router;

/// Everything the dashboard renders for one evaluation
#[derive(Debug, Clone, Serialize)]
pub struct PredictionView {
    /// Correlates the response with log lines
    pub evaluation_id: String,
    pub evaluated_at: DateTime<Utc>,
    /// Submitted record, in training column order
    pub inputs: FeatureRecord,
    /// Hot metal temperature (°C), two decimals
    pub predicted_temperature: f64,
    /// Efficiency score, two decimals
    pub efficiency_score: f64,
    /// Efficiency bar fill (0 - 100)
    pub efficiency_progress: u8,
    pub risk_level: RiskLevel,
    pub risk_label: &'static str,
    /// Importance ranking, highest first
    pub importances: Option<Vec<FeatureImportance>>,
    /// Set when the model has no importances
    pub importance_message: Option<String>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Shared state behind the HTTP handlers
pub struct Dashboard {
    engine: PredictionEngine,
    assembler: FeatureAssembler,
    metrics: DashboardMetrics,
}

impl Dashboard {
    pub fn new(engine: PredictionEngine) -> Self {
        Self {
            engine,
            assembler: FeatureAssembler::new(),
            metrics: DashboardMetrics::new(),
        }
    }

    pub fn metrics(&self) -> &DashboardMetrics {
        &self.metrics
    }

    /// Validate, assemble, predict and post-process one slider submission
    pub fn evaluate(&self, inputs: &OperatorInputs) -> Result<PredictionView> {
        if let Err(e) = inputs.validate() {
            warn!(error = %e, "Rejected operator inputs");
            self.metrics.record_rejected_input();
            return Err(e);
        }

        let evaluation_id = uuid::Uuid::new_v4().to_string();
        let record = self.assembler.assemble_inputs(inputs);
        let start = Instant::now();

        let result = match self.engine.evaluate(&record) {
            Ok(result) => result,
            Err(e) => {
                error!(evaluation_id = %evaluation_id, error = %e, "Prediction failed");
                self.metrics.record_prediction_error();
                return Err(e);
            }
        };
        let elapsed = start.elapsed();
        self.metrics.record_evaluation(elapsed, &result);

        let (importances, importance_message) = match self.engine.importances() {
            Ok(ranking) => (Some(ranking), None),
            Err(e) => (None, Some(e.to_string())),
        };

        info!(
            evaluation_id = %evaluation_id,
            predicted_temperature = result.predicted_temperature,
            efficiency_score = result.efficiency_score,
            risk_level = %result.risk_level,
            processing_time_us = elapsed.as_micros(),
            "Furnace condition evaluated"
        );

        Ok(PredictionView {
            evaluation_id,
            evaluated_at: Utc::now(),
            inputs: record,
            predicted_temperature: round2(result.predicted_temperature),
            efficiency_score: round2(result.efficiency_score),
            efficiency_progress: result.efficiency_score.trunc() as u8,
            risk_level: result.risk_level,
            risk_label: result.risk_level.display_label(),
            importances,
            importance_message,
        })
    }

    /// Importance ranking, or `ImportanceUnavailable`
    pub fn importances(&self) -> Result<Vec<FeatureImportance>> {
        self.engine.importances()
    }
}

/// User-facing prefix for recoverable prediction failures
pub fn user_message(err: &FurnaceError) -> String {
    match err {
        FurnaceError::Prediction(reason) => format!("Prediction Error: {reason}"),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::inference::tests::stub_artifacts;

    #[test]
    fn test_evaluate_default_inputs() {
        let dashboard = Dashboard::new(PredictionEngine::new(stub_artifacts(1480.0, None)));
        let view = dashboard.evaluate(&OperatorInputs::default()).unwrap();

        assert_eq!(view.predicted_temperature, 1480.0);
        assert_eq!(view.efficiency_score, 99.0);
        assert_eq!(view.efficiency_progress, 99);
        assert_eq!(view.risk_level, RiskLevel::Stable);
        assert_eq!(view.risk_label, "🟢 Stable");
        assert!(view.importances.is_none());
        assert_eq!(
            view.importance_message.as_deref(),
            Some("Feature importance not available for this model type.")
        );
        assert_eq!(view.inputs.get("Hot_blast_temp"), Some(1050.0));
    }

    #[test]
    fn test_evaluate_rounds_display_values() {
        let dashboard = Dashboard::new(PredictionEngine::new(stub_artifacts(1462.3456, None)));
        let view = dashboard.evaluate(&OperatorInputs::default()).unwrap();

        assert_eq!(view.predicted_temperature, 1462.35);
        // 100 - 12.6544 * 0.2 = 97.46912
        assert_eq!(view.efficiency_score, 97.47);
        assert_eq!(view.efficiency_progress, 97);
    }

    #[test]
    fn test_evaluate_rounds_ties_to_even() {
        let dashboard = Dashboard::new(PredictionEngine::new(stub_artifacts(1462.125, None)));
        let view = dashboard.evaluate(&OperatorInputs::default()).unwrap();

        assert_eq!(view.predicted_temperature, 1462.12);
        assert_eq!(round2(0.375), 0.38);
    }

    #[test]
    fn test_evaluate_rejects_out_of_range() {
        let dashboard = Dashboard::new(PredictionEngine::new(stub_artifacts(1480.0, None)));
        let inputs = OperatorInputs {
            hot_blast_temp: 1300.0,
            ..OperatorInputs::default()
        };

        let err = dashboard.evaluate(&inputs).unwrap_err();
        assert!(matches!(err, FurnaceError::InvalidInput { field: "Hot_blast_temp", .. }));
        assert_eq!(dashboard.metrics().snapshot().rejected_inputs, 1);
        assert_eq!(dashboard.metrics().snapshot().evaluations, 0);
    }

    #[test]
    fn test_user_message() {
        let err = FurnaceError::prediction("shape mismatch");
        assert_eq!(user_message(&err), "Prediction Error: shape mismatch");
    }
}
