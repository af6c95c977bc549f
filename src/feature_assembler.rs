//! Feature assembly for hot metal temperature inference.
//!
//! Builds the single-row record in the column order the regressor was
//! trained on.

use crate::types::features::{feature_names, FeatureRecord, OperatorInputs, FEATURE_COUNT};

/// Assembles operator inputs into model input records.
///
/// No validation happens here: the slider ranges are enforced by whatever
/// collects the inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureAssembler;

impl FeatureAssembler {
    /// Create a new feature assembler.
    pub fn new() -> Self {
        Self
    }

    /// Build a record from the ten operating parameters.
    #[allow(clippy::too_many_arguments)]
    pub fn assemble(
        &self,
        fe: f64,
        coke: f64,
        pci: f64,
        hot_blast_temp: f64,
        blast_pressure: f64,
        moisture: f64,
        basicity: f64,
        oxygen: f64,
        co: f64,
        co2: f64,
    ) -> FeatureRecord {
        FeatureRecord::from_values([
            fe,
            coke,
            pci,
            hot_blast_temp,
            blast_pressure,
            moisture,
            basicity,
            oxygen,
            co,
            co2,
        ])
    }

    /// Build a record from a submitted slider form.
    pub fn assemble_inputs(&self, inputs: &OperatorInputs) -> FeatureRecord {
        FeatureRecord::from_values(inputs.values())
    }

    /// Get the number of features produced.
    pub fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }

    /// Get feature names (training order).
    pub fn feature_names(&self) -> [&'static str; FEATURE_COUNT] {
        feature_names()
    }
}
