//! FurnaceAI Blast Furnace Digital Twin
//!
//! Predicts hot metal temperature from ten furnace operating parameters with
//! a pre-trained ONNX regressor, derives an efficiency score and a risk
//! level, and serves the result through a single-page dashboard.

pub mod artifacts;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod feature_assembler;
pub mod metrics;
pub mod models;
pub mod types;

pub use artifacts::{ArtifactProvider, Artifacts};
pub use config::AppConfig;
pub use dashboard::Dashboard;
pub use error::FurnaceError;
pub use feature_assembler::FeatureAssembler;
pub use models::inference::PredictionEngine;
pub use types::{features::OperatorInputs, prediction::PredictionResult, prediction::RiskLevel};
