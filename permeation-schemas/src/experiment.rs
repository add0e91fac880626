use crate::{model::SolverSettings, property::MaterialProperty};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_POINTS_PER_LAYER: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub material: String,
    pub thickness: f64,
    /// Inline values take precedence over the property database.
    pub diffusivity: Option<MaterialProperty>,
    pub solubility: Option<MaterialProperty>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainmentGeometry {
    pub diameter: f64,
    pub volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverCommand {
    pub program: PathBuf,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub name: String,
    pub barrier: LayerSpec,
    pub substrate: LayerSpec,
    pub temperature: f64,
    pub upstream_pressure: f64,
    #[serde(default = "default_points_per_layer")]
    pub points_per_layer: usize,
    pub containment: ContainmentGeometry,
    pub containment_temperature: Option<f64>,
    #[serde(default)]
    pub settings: SolverSettings,
    pub solver: SolverCommand,
}

fn default_points_per_layer() -> usize {
    DEFAULT_POINTS_PER_LAYER
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Spacing {
    Linear,
    Geometric,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub spacing: Spacing,
    pub start: f64,
    pub end: f64,
    pub points: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeDefaults {
    pub pressure: f64,
    pub thickness: f64,
    pub temperature: f64,
}

impl Default for RegimeDefaults {
    fn default() -> Self {
        Self {
            pressure: 1.0e4,
            thickness: 974.0e-6,
            temperature: 300.0 + 273.15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeStudyConfig {
    pub material: String,
    pub dissociation: Option<MaterialProperty>,
    pub diffusivity: Option<MaterialProperty>,
    pub solubility: Option<MaterialProperty>,
    #[serde(default)]
    pub defaults: RegimeDefaults,
    #[serde(default = "default_pressure_range")]
    pub pressure_range: AxisRange,
    #[serde(default = "default_thickness_range")]
    pub thickness_range: AxisRange,
    #[serde(default = "default_temperature_range")]
    pub temperature_range: AxisRange,
}

fn default_pressure_range() -> AxisRange {
    AxisRange { spacing: Spacing::Geometric, start: 1.0e2, end: 1.0e5, points: 100 }
}

fn default_thickness_range() -> AxisRange {
    AxisRange { spacing: Spacing::Geometric, start: 945.0e-6, end: 1.0e-3, points: 100 }
}

fn default_temperature_range() -> AxisRange {
    AxisRange { spacing: Spacing::Linear, start: 200.0 + 273.15, end: 400.0 + 273.15, points: 100 }
}
