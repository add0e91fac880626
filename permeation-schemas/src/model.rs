use crate::{boundary::BoundaryCondition, material::MaterialRegion, mesh::Mesh};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Temperature {
    Uniform { kelvin: f64 },
    /// One value per mesh vertex.
    Profile { kelvin: Vec<f64> },
}

impl Temperature {
    pub fn uniform(kelvin: f64) -> Self {
        Temperature::Uniform { kelvin }
    }

    /// Temperature at mesh vertex `index`. `None` when a profile is shorter than the mesh.
    pub fn at_vertex(&self, index: usize) -> Option<f64> {
        match self {
            Temperature::Uniform { kelvin } => Some(*kelvin),
            Temperature::Profile { kelvin } => kelvin.get(index).copied(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverSettings {
    pub final_time: f64,
    pub initial_stepsize: f64,
    pub stepsize_growth: f64,
    pub stepsize_cutback: f64,
    pub absolute_tolerance: f64,
    pub relative_tolerance: f64,
    pub maximum_iterations: u32,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            final_time: 1.0e4,
            initial_stepsize: 1.0,
            stepsize_growth: 1.1,
            stepsize_cutback: 0.9,
            absolute_tolerance: 1.0e10,
            relative_tolerance: 1.0e-10,
            maximum_iterations: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DerivedQuantityKind {
    HydrogenFlux { surface: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExportRequest {
    DerivedQuantities {
        quantities: Vec<DerivedQuantityKind>,
        filename: PathBuf,
        show_units: bool,
    },
    FieldText {
        field: String,
        filename: PathBuf,
    },
    FieldVisualization {
        field: String,
        folder: PathBuf,
        checkpoint: bool,
    },
}

/// A complete, solver-ready description of one permeation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfiguration {
    pub materials: Vec<MaterialRegion>,
    pub mesh: Mesh,
    pub boundary_conditions: Vec<BoundaryCondition>,
    pub temperature: Temperature,
    pub settings: SolverSettings,
    pub exports: Vec<ExportRequest>,
}

impl ModelConfiguration {
    pub fn derived_quantities(&self) -> Vec<DerivedQuantityKind> {
        self.exports
            .iter()
            .filter_map(|export| match export {
                ExportRequest::DerivedQuantities { quantities, .. } => Some(quantities.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }
}
