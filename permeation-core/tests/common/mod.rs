//! Shared fixtures for integration tests

pub mod mock_engines;

use permeation_core::{
    model::{
        boundary::build_boundary_conditions,
        builder::ModelBuilder,
        materials::{assemble_materials, LayerProperties},
        mesh::MeshBuilder,
    },
    properties::PropertyTable,
    solver::standard_exports,
};
use permeation_schemas::{
    model::{ModelConfiguration, SolverSettings, Temperature},
    property::{MaterialProperty, PropertyKind},
};
use std::path::Path;

pub const BARRIER: &str = "Al2O3";
pub const SUBSTRATE: &str = "316L";

pub fn prop(pre_exponential_factor: f64, activation_energy: f64) -> MaterialProperty {
    MaterialProperty { pre_exponential_factor, activation_energy }
}

pub fn property_table() -> PropertyTable {
    let mut table = PropertyTable::new();
    table.insert(BARRIER, PropertyKind::Diffusivity, prop(1.0e-10, 1.2));
    table.insert(BARRIER, PropertyKind::Solubility, prop(1.0e21, 0.3));
    table.insert(SUBSTRATE, PropertyKind::Diffusivity, prop(2.0e-7, 0.5));
    table.insert(SUBSTRATE, PropertyKind::Solubility, prop(2.95e23, 0.06));
    table.insert(SUBSTRATE, PropertyKind::Dissociation, prop(7.2e17, 0.35));
    table
}

/// Barrier 1 um over 974 um of substrate at `temperature`, 1e5 Pa upstream.
pub fn build_model(table: &PropertyTable, temperature: Temperature, folder: &Path) -> ModelConfiguration {
    let barrier = LayerProperties::resolve(table, BARRIER).unwrap();
    let substrate = LayerProperties::resolve(table, SUBSTRATE).unwrap();

    ModelBuilder::new()
        .with_materials(assemble_materials(&barrier, &substrate).unwrap())
        .with_mesh(MeshBuilder::new().build(1.0e-6, 974.0e-6).unwrap())
        .with_boundary_conditions(build_boundary_conditions(1.0e5, barrier.solubility.as_ref()).unwrap())
        .with_temperature(temperature)
        .with_settings(SolverSettings { final_time: 2.0e4, ..SolverSettings::default() })
        .with_exports(standard_exports(folder))
        .build()
        .unwrap()
}
