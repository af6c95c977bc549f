//! Efficiency score and risk classification of a predicted temperature.
//!
//! Both are uncalibrated plant heuristics and must stay exactly as written,
//! boundary inclusivity included.

use crate::types::prediction::RiskLevel;

/// Temperature (°C) at which efficiency peaks.
pub const TARGET_TEMPERATURE: f64 = 1475.0;

/// Points lost per degree of deviation from the target.
pub const EFFICIENCY_FALLOFF: f64 = 0.2;

/// `clamp(100 - |t - 1475| * 0.2, 0, 100)`
pub fn efficiency_score(temperature: f64) -> f64 {
    let score = 100.0 - (temperature - TARGET_TEMPERATURE).abs() * EFFICIENCY_FALLOFF;
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 100.0)
}

/// Stable in [1450, 1500]; Warning in [1420, 1450) or (1500, 1520];
/// Critical otherwise.
pub fn risk_level(temperature: f64) -> RiskLevel {
    if (1450.0..=1500.0).contains(&temperature) {
        RiskLevel::Stable
    } else if (1420.0..1450.0).contains(&temperature)
        || (temperature > 1500.0 && temperature <= 1520.0)
    {
        RiskLevel::Warning
    } else {
        RiskLevel::Critical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_efficiency_peak() {
        assert_eq!(efficiency_score(1475.0), 100.0);
    }

    #[test]
    fn test_efficiency_clamped_floor() {
        assert_eq!(efficiency_score(1475.0 + 500.0), 0.0);
        assert_eq!(efficiency_score(1475.0 - 500.0), 0.0);
        assert_eq!(efficiency_score(0.0), 0.0);
    }

    #[test]
    fn test_efficiency_linear_falloff() {
        assert_eq!(efficiency_score(1480.0), 99.0);
        assert_eq!(efficiency_score(1425.0), 90.0);
        assert_eq!(efficiency_score(1975.0), 0.0);
    }

    #[test]
    fn test_efficiency_symmetric() {
        for d in [0.0, 0.5, 1.0, 12.25, 100.0, 499.0, 500.0, 1_000.0] {
            assert_eq!(
                efficiency_score(TARGET_TEMPERATURE + d),
                efficiency_score(TARGET_TEMPERATURE - d),
                "asymmetric at d = {d}"
            );
        }
    }

    #[test]
    fn test_efficiency_non_finite() {
        assert_eq!(efficiency_score(f64::NAN), 0.0);
        assert_eq!(efficiency_score(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_risk_boundaries() {
        assert_eq!(risk_level(1450.0), RiskLevel::Stable);
        assert_eq!(risk_level(1500.0), RiskLevel::Stable);
        assert_eq!(risk_level(1475.0), RiskLevel::Stable);
        assert_eq!(risk_level(1449.9), RiskLevel::Warning);
        assert_eq!(risk_level(1420.0), RiskLevel::Warning);
        assert_eq!(risk_level(1500.1), RiskLevel::Warning);
        assert_eq!(risk_level(1520.0), RiskLevel::Warning);
        assert_eq!(risk_level(1520.1), RiskLevel::Critical);
        assert_eq!(risk_level(1419.9), RiskLevel::Critical);
    }

    #[test]
    fn test_risk_non_finite() {
        assert_eq!(risk_level(f64::NAN), RiskLevel::Critical);
        assert_eq!(risk_level(f64::NEG_INFINITY), RiskLevel::Critical);
    }
}
