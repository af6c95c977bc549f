//! Type definitions for the digital twin

pub mod features;
pub mod prediction;

pub use features::{FeatureRecord, FeatureSpec, OperatorInputs, FEATURE_COUNT, FEATURE_SCHEMA};
pub use prediction::{FeatureImportance, PredictionResult, RiskLevel};
