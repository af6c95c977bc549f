//! Model capabilities, artifact loaders and inference

pub mod inference;
pub mod loader;
pub mod postprocess;
pub mod traits;

pub use inference::PredictionEngine;
pub use loader::{ModelLoader, StandardScaler};
pub use traits::{Regressor, Scaler};
