//! Furnace operating parameters and the ordered feature record fed to the model

use crate::error::{FurnaceError, Result};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Number of model input columns.
pub const FEATURE_COUNT: usize = 10;

/// One model input column with its operator-facing slider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureSpec {
    /// Column name used at training time
    pub name: &'static str,
    /// Slider label shown to the operator
    pub label: &'static str,
    /// Inclusive lower slider bound
    pub min: f64,
    /// Inclusive upper slider bound
    pub max: f64,
    /// Initial slider position
    pub default: f64,
}

impl FeatureSpec {
    const fn new(name: &'static str, label: &'static str, min: f64, max: f64, default: f64) -> Self {
        Self {
            name,
            label,
            min,
            max,
            default,
        }
    }

    /// Check that a value is finite and within the slider range.
    pub fn check(&self, value: f64) -> Result<()> {
        if value.is_finite() && value >= self.min && value <= self.max {
            Ok(())
        } else {
            Err(FurnaceError::InvalidInput {
                field: self.name,
                value,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// Model input schema in training column order.
///
/// The model was fitted on exactly this order. Reordering produces wrong
/// temperatures without any error.
pub const FEATURE_SCHEMA: [FeatureSpec; FEATURE_COUNT] = [
    FeatureSpec::new("Fe_percent", "Iron Ore Fe %", 55.0, 68.0, 60.0),
    FeatureSpec::new("Coke_rate", "Coke Rate (kg/tHM)", 300.0, 600.0, 450.0),
    FeatureSpec::new("PCI_rate", "PCI Rate (kg/tHM)", 100.0, 250.0, 180.0),
    FeatureSpec::new("Hot_blast_temp", "Hot Blast Temperature (°C)", 900.0, 1200.0, 1050.0),
    FeatureSpec::new("Blast_pressure", "Blast Pressure (bar)", 2.0, 4.0, 3.0),
    FeatureSpec::new("Moisture_percent", "Moisture %", 2.0, 8.0, 4.0),
    FeatureSpec::new("Basicity", "Slag Basicity (CaO/SiO₂)", 1.0, 1.4, 1.2),
    FeatureSpec::new("Oxygen_percent", "Oxygen Enrichment %", 21.0, 28.0, 23.0),
    FeatureSpec::new("CO_percent", "CO %", 18.0, 28.0, 22.0),
    FeatureSpec::new("CO2_percent", "CO₂ %", 18.0, 25.0, 21.0),
];

/// Column names in training order.
pub fn feature_names() -> [&'static str; FEATURE_COUNT] {
    FEATURE_SCHEMA.map(|spec| spec.name)
}

/// Slider values submitted by the operator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorInputs {
    /// Iron ore Fe content (%)
    #[serde(alias = "Fe_percent")]
    pub fe_percent: f64,

    /// Coke rate (kg/tHM)
    #[serde(alias = "Coke_rate")]
    pub coke_rate: f64,

    /// Pulverized coal injection rate (kg/tHM)
    #[serde(alias = "PCI_rate")]
    pub pci_rate: f64,

    /// Hot blast temperature (°C)
    #[serde(alias = "Hot_blast_temp")]
    pub hot_blast_temp: f64,

    /// Blast pressure (bar)
    #[serde(alias = "Blast_pressure")]
    pub blast_pressure: f64,

    /// Moisture (%)
    #[serde(alias = "Moisture_percent")]
    pub moisture_percent: f64,

    /// Slag basicity (CaO/SiO₂)
    #[serde(alias = "Basicity")]
    pub basicity: f64,

    /// Oxygen enrichment (%)
    #[serde(alias = "Oxygen_percent")]
    pub oxygen_percent: f64,

    /// Top gas CO (%)
    #[serde(alias = "CO_percent")]
    pub co_percent: f64,

    /// Top gas CO₂ (%)
    #[serde(alias = "CO2_percent")]
    pub co2_percent: f64,
}

impl OperatorInputs {
    /// Values in training column order.
    pub fn values(&self) -> [f64; FEATURE_COUNT] {
        [
            self.fe_percent,
            self.coke_rate,
            self.pci_rate,
            self.hot_blast_temp,
            self.blast_pressure,
            self.moisture_percent,
            self.basicity,
            self.oxygen_percent,
            self.co_percent,
            self.co2_percent,
        ]
    }

    /// Reject values a slider could not have produced.
    pub fn validate(&self) -> Result<()> {
        FEATURE_SCHEMA
            .iter()
            .zip(self.values())
            .try_for_each(|(spec, value)| spec.check(value))
    }
}

impl Default for OperatorInputs {
    fn default() -> Self {
        let [
            fe_percent,
            coke_rate,
            pci_rate,
            hot_blast_temp,
            blast_pressure,
            moisture_percent,
            basicity,
            oxygen_percent,
            co_percent,
            co2_percent,
        ] = FEATURE_SCHEMA.map(|spec| spec.default);

        Self {
            fe_percent,
            coke_rate,
            pci_rate,
            hot_blast_temp,
            blast_pressure,
            moisture_percent,
            basicity,
            oxygen_percent,
            co_percent,
            co2_percent,
        }
    }
}

/// Single-row model input: all ten columns, in training order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRecord {
    values: [f64; FEATURE_COUNT],
}

impl FeatureRecord {
    pub(crate) fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Look up a column by its training name.
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_SCHEMA
            .iter()
            .position(|spec| spec.name == name)
            .map(|idx| self.values[idx])
    }

    /// `(column, value)` pairs in training order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_SCHEMA
            .iter()
            .map(|spec| spec.name)
            .zip(self.values.iter().copied())
    }

    /// Row as `f32`, the element type ONNX graphs exported from sklearn expect.
    pub fn to_f32_row(&self) -> Vec<f32> {
        self.values.iter().map(|&v| v as f32).collect()
    }
}

impl Serialize for FeatureRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}
