//! Prediction outputs shown on the dashboard

use crate::models::postprocess;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualitative furnace condition derived from the predicted temperature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Stable,
    Warning,
    Critical,
}

impl RiskLevel {
    /// Classify a predicted hot metal temperature (°C)
    pub fn from_temperature(temperature: f64) -> Self {
        postprocess::risk_level(temperature)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Stable => "Stable",
            RiskLevel::Warning => "Warning",
            RiskLevel::Critical => "Critical",
        }
    }

    /// Label with the traffic-light marker used on the dashboard
    pub fn display_label(&self) -> &'static str {
        match self {
            RiskLevel::Stable => "🟢 Stable",
            RiskLevel::Warning => "🟡 Warning",
            RiskLevel::Critical => "🔴 Critical",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one operator-triggered evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    /// Predicted hot metal temperature (°C)
    pub predicted_temperature: f64,
    /// Efficiency score (0 - 100)
    pub efficiency_score: f64,
    /// Risk classification
    pub risk_level: RiskLevel,
}

impl PredictionResult {
    /// Derive score and risk level from a predicted temperature
    pub fn from_temperature(predicted_temperature: f64) -> Self {
        Self {
            predicted_temperature,
            efficiency_score: postprocess::efficiency_score(predicted_temperature),
            risk_level: RiskLevel::from_temperature(predicted_temperature),
        }
    }
}

/// Weight of one input column in the model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureImportance {
    pub feature: &'static str,
    pub importance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_from_temperature() {
        let result = PredictionResult::from_temperature(1480.0);
        assert_eq!(result.predicted_temperature, 1480.0);
        assert_eq!(result.efficiency_score, 99.0);
        assert_eq!(result.risk_level, RiskLevel::Stable);

        let result = PredictionResult::from_temperature(1530.0);
        assert_eq!(result.risk_level, RiskLevel::Critical);
    }

    #[test]
    fn test_risk_level_labels() {
        assert_eq!(RiskLevel::Warning.to_string(), "Warning");
        assert_eq!(RiskLevel::Critical.display_label(), "🔴 Critical");
        assert_eq!(
            serde_json::to_string(&RiskLevel::Stable).unwrap(),
            "\"stable\""
        );
    }
}
