//! Artifact loaders: ONNX regressor, ONNX scaler and JSON standard scaler

use crate::error::{FurnaceError, Result};
use crate::models::traits::{Regressor, Scaler};
use crate::types::features::{feature_names, FeatureRecord, FEATURE_COUNT};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use serde::Deserialize;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// ONNX custom metadata key holding a JSON array of feature importances.
pub const IMPORTANCES_METADATA_KEY: &str = "feature_importances";

/// Loaded ONNX regression model
pub struct OnnxRegressor {
    /// Model name (file stem)
    name: String,
    /// `Session::run` needs `&mut self`
    session: Mutex<Session>,
    /// Importances read from model metadata
    importances: Option<Vec<f64>>,
}

impl Regressor for OnnxRegressor {
    fn predict(&self, features: &[f32]) -> Result<f64> {
        let row = run_single_row(&self.session, features)?;
        let temperature = row
            .first()
            .copied()
            .ok_or_else(|| FurnaceError::prediction("model produced no output"))?;

        if !temperature.is_finite() {
            return Err(FurnaceError::prediction(format!(
                "model produced a non-finite temperature: {temperature}"
            )));
        }

        debug!(model = %self.name, temperature, "ONNX regressor inference complete");
        Ok(temperature)
    }

    fn feature_importances(&self) -> Option<Vec<f64>> {
        self.importances.clone()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Loaded ONNX scaler graph (e.g. an exported `StandardScaler`)
pub struct OnnxScaler {
    name: String,
    session: Mutex<Session>,
}

impl Scaler for OnnxScaler {
    fn transform(&self, record: &FeatureRecord) -> Result<Vec<f32>> {
        let scaled = run_single_row(&self.session, &record.to_f32_row())?;
        if scaled.len() != FEATURE_COUNT {
            return Err(FurnaceError::prediction(format!(
                "scaler produced {} columns, expected {}",
                scaled.len(),
                FEATURE_COUNT
            )));
        }
        Ok(scaled.into_iter().map(|v| v as f32).collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Standard scaler parameters stored as JSON: `(x - mean) / scale`
#[derive(Debug, Clone, Deserialize)]
pub struct StandardScaler {
    #[serde(skip)]
    name: String,
    /// Per-column means
    pub mean: Vec<f64>,
    /// Per-column standard deviations
    pub scale: Vec<f64>,
    /// Column names the scaler was fitted on, checked against the schema
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

impl StandardScaler {
    /// Build a scaler from explicit parameters.
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        let scaler = Self {
            name: "standard_scaler".to_string(),
            mean,
            scale,
            feature_names: None,
        };
        scaler.check_shape()?;
        Ok(scaler)
    }

    /// Parse scaler parameters from JSON text.
    pub fn from_json(name: &str, json: &str) -> Result<Self> {
        let mut scaler: StandardScaler =
            serde_json::from_str(json).map_err(|e| FurnaceError::artifact(name, e))?;
        scaler.name = name.to_string();
        scaler.check_shape()?;
        Ok(scaler)
    }

    fn check_shape(&self) -> Result<()> {
        if self.mean.len() != FEATURE_COUNT || self.scale.len() != FEATURE_COUNT {
            return Err(FurnaceError::artifact(
                &self.name,
                format!(
                    "expected {FEATURE_COUNT} means and scales, got {} and {}",
                    self.mean.len(),
                    self.scale.len()
                ),
            ));
        }

        if let Some(names) = &self.feature_names {
            let expected = feature_names();
            if names.len() != FEATURE_COUNT || names.iter().zip(expected).any(|(a, b)| a != b) {
                return Err(FurnaceError::artifact(
                    &self.name,
                    format!("fitted on columns {names:?}, expected {expected:?}"),
                ));
            }
        }
        Ok(())
    }
}

impl Scaler for StandardScaler {
    fn transform(&self, record: &FeatureRecord) -> Result<Vec<f32>> {
        if record.len() != self.mean.len() {
            return Err(FurnaceError::prediction(format!(
                "expected {} features, got {}",
                self.mean.len(),
                record.len()
            )));
        }

        Ok(record
            .values()
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(&x, (&mean, &scale))| {
                // Zero-variance columns are left unscaled
                let scale = if scale == 0.0 { 1.0 } else { scale };
                ((x - mean) / scale) as f32
            })
            .collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Run a `[1, n]` float row through a session and return the first output row.
fn run_single_row(session: &Mutex<Session>, features: &[f32]) -> Result<Vec<f64>> {
    let shape = vec![1_i64, features.len() as i64];
    let input = Tensor::from_array((shape, features.to_vec()))
        .map_err(|e| FurnaceError::prediction(format!("failed to create input tensor: {e}")))?;

    let mut session = session
        .lock()
        .map_err(|e| FurnaceError::prediction(format!("session lock poisoned: {e}")))?;

    let outputs = session
        .run(ort::inputs![input])
        .map_err(|e| FurnaceError::prediction(e.to_string()))?;

    let (_name, output) = outputs
        .iter()
        .next()
        .ok_or_else(|| FurnaceError::prediction("no output tensor"))?;

    if let Ok((_shape, data)) = output.try_extract_tensor::<f32>() {
        return Ok(data.iter().map(|&v| v as f64).collect());
    }

    let (_shape, data) = output
        .try_extract_tensor::<f64>()
        .map_err(|e| FurnaceError::prediction(format!("tensor extraction failed: {e}")))?;
    Ok(data.to_vec())
}

fn artifact_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("artifact")
        .to_string()
}

/// Loader for model and scaler artifacts
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with default settings (1 thread)
    pub fn new() -> Result<Self> {
        Self::with_threads(1)
    }

    /// Create a new model loader with specified number of threads
    pub fn with_threads(onnx_threads: usize) -> Result<Self> {
        ort::init()
            .commit()
            .map_err(|e| FurnaceError::artifact("onnxruntime", e))?;
        info!(onnx_threads, "ONNX Runtime initialized");
        Ok(Self { onnx_threads })
    }

    fn open_session(&self, path: &Path) -> Result<Session> {
        let name = artifact_name(path);
        let fail = |e: &dyn std::fmt::Display| FurnaceError::artifact(&name, e);

        Session::builder()
            .map_err(|e| fail(&e))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| fail(&e))?
            .with_intra_threads(self.onnx_threads)
            .map_err(|e| fail(&e))?
            .commit_from_file(path)
            .map_err(|e| fail(&e))
    }

    /// Load the ONNX regressor
    pub fn load_model<P: AsRef<Path>>(&self, path: P) -> Result<OnnxRegressor> {
        let path = path.as_ref();
        let name = artifact_name(path);

        info!(model = %name, path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");
        let session = self.open_session(path)?;

        let importances = session
            .metadata()
            .ok()
            .and_then(|meta| meta.custom(IMPORTANCES_METADATA_KEY).ok().flatten())
            .and_then(|raw| match serde_json::from_str::<Vec<f64>>(&raw) {
                Ok(weights) => Some(weights),
                Err(e) => {
                    warn!(model = %name, error = %e, "Ignoring malformed feature importances");
                    None
                }
            });

        info!(
            model = %name,
            has_importances = importances.is_some(),
            "Model loaded successfully"
        );

        Ok(OnnxRegressor {
            name,
            session: Mutex::new(session),
            importances,
        })
    }

    /// Load the scaler: `.json` files hold standard scaler parameters,
    /// anything else is treated as an ONNX graph.
    pub fn load_scaler<P: AsRef<Path>>(&self, path: P) -> Result<Arc<dyn Scaler>> {
        let path = path.as_ref();
        let name = artifact_name(path);

        info!(scaler = %name, path = %path.display(), "Loading scaler");

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            let raw = std::fs::read_to_string(path).map_err(|e| FurnaceError::artifact(&name, e))?;
            return Ok(Arc::new(StandardScaler::from_json(&name, &raw)?));
        }

        let session = self.open_session(path)?;
        Ok(Arc::new(OnnxScaler {
            name,
            session: Mutex::new(session),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature_assembler::FeatureAssembler;
    use crate::types::features::OperatorInputs;

    fn default_record() -> FeatureRecord {
        FeatureAssembler::new().assemble_inputs(&OperatorInputs::default())
    }

    #[test]
    fn test_standard_scaler_transform() {
        let mean = vec![60.0, 450.0, 180.0, 1050.0, 3.0, 4.0, 1.2, 23.0, 22.0, 21.0];
        let mut scale = vec![1.0; FEATURE_COUNT];
        scale[0] = 2.0;
        scale[1] = 0.0;
        let scaler = StandardScaler::new(mean, scale).unwrap();

        let record = FeatureAssembler::new().assemble(
            64.0, 460.0, 180.0, 1050.0, 3.0, 4.0, 1.2, 23.0, 22.0, 21.0,
        );
        let scaled = scaler.transform(&record).unwrap();

        assert_eq!(scaled.len(), FEATURE_COUNT);
        assert_eq!(scaled[0], 2.0);
        // zero scale keeps the centered value
        assert_eq!(scaled[1], 10.0);
        assert!(scaled[2..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_standard_scaler_rejects_wrong_shape() {
        let err = StandardScaler::new(vec![0.0; 9], vec![1.0; 10]).unwrap_err();
        assert!(matches!(err, FurnaceError::ArtifactUnavailable { .. }));
    }

    #[test]
    fn test_standard_scaler_from_json() {
        let json = r#"{
            "mean": [0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            "scale": [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
            "feature_names": ["Fe_percent", "Coke_rate", "PCI_rate", "Hot_blast_temp",
                "Blast_pressure", "Moisture_percent", "Basicity", "Oxygen_percent",
                "CO_percent", "CO2_percent"]
        }"#;
        let scaler = StandardScaler::from_json("scaler.json", json).unwrap();
        assert_eq!(scaler.name(), "scaler.json");

        let scaled = scaler.transform(&default_record()).unwrap();
        assert_eq!(scaled[0], 60.0);
    }

    #[test]
    fn test_standard_scaler_rejects_reordered_columns() {
        let json = r#"{
            "mean": [0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            "scale": [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
            "feature_names": ["Coke_rate", "Fe_percent", "PCI_rate", "Hot_blast_temp",
                "Blast_pressure", "Moisture_percent", "Basicity", "Oxygen_percent",
                "CO_percent", "CO2_percent"]
        }"#;
        let err = StandardScaler::from_json("scaler.json", json).unwrap_err();
        assert!(err.to_string().contains("fitted on columns"));
    }

    #[test]
    fn test_standard_scaler_corrupt_json() {
        let err = StandardScaler::from_json("scaler.json", "not json").unwrap_err();
        assert!(matches!(err, FurnaceError::ArtifactUnavailable { .. }));
    }
}
