use crate::error::{PermeationError, Stage};
use permeation_schemas::{
    boundary::{BoundaryCondition, INLET_SURFACE, OUTLET_SURFACE},
    material::MaterialRegion,
    mesh::Mesh,
    model::{DerivedQuantityKind, ExportRequest, ModelConfiguration, SolverSettings, Temperature},
};
use std::collections::HashSet;

/// A fluent builder for constructing a `ModelConfiguration`.
///
/// Each pipeline stage hands its output to the builder; nothing reaches the
/// transport engine until `build` has checked that the parts agree with each
/// other.
#[derive(Default)]
pub struct ModelBuilder {
    materials: Vec<MaterialRegion>,
    mesh: Option<Mesh>,
    boundary_conditions: Vec<BoundaryCondition>,
    temperature: Option<Temperature>,
    settings: SolverSettings,
    exports: Vec<ExportRequest>,
}

impl ModelBuilder {
    /// Creates a new, empty `ModelBuilder` with default solver settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the material regions, typically from `assemble_materials`.
    pub fn with_materials(mut self, materials: Vec<MaterialRegion>) -> Self {
        self.materials = materials;
        self
    }

    pub fn with_mesh(mut self, mesh: Mesh) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_boundary_conditions(mut self, conditions: Vec<BoundaryCondition>) -> Self {
        self.boundary_conditions = conditions;
        self
    }

    pub fn with_temperature(mut self, temperature: Temperature) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_settings(mut self, settings: SolverSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the exports the engine must produce. See `solver::standard_exports`.
    pub fn with_exports(mut self, exports: Vec<ExportRequest>) -> Self {
        self.exports = exports;
        self
    }

    /// Consumes the builder and returns a validated `ModelConfiguration`.
    ///
    /// # Errors
    ///
    /// Returns a `PermeationError::Configuration` naming the offending stage when a
    /// part is missing or the parts reference each other inconsistently.
    pub fn build(self) -> Result<ModelConfiguration, PermeationError> {
        let mesh = self
            .mesh
            .ok_or_else(|| PermeationError::config(Stage::Meshing, "mesh is missing"))?;
        let temperature = self
            .temperature
            .ok_or_else(|| PermeationError::config(Stage::BoundaryConditions, "temperature is missing"))?;

        validate_materials(&self.materials, &mesh)?;
        validate_boundary_conditions(&self.boundary_conditions)?;
        validate_temperature(&temperature, &mesh)?;
        validate_exports(&self.exports)?;

        Ok(ModelConfiguration {
            materials: self.materials,
            mesh,
            boundary_conditions: self.boundary_conditions,
            temperature,
            settings: self.settings,
            exports: self.exports,
        })
    }
}

fn validate_materials(materials: &[MaterialRegion], mesh: &Mesh) -> Result<(), PermeationError> {
    if materials.len() != 2 {
        return Err(PermeationError::config(
            Stage::Assembly,
            format!("expected a barrier and a substrate region, got {} regions", materials.len()),
        ));
    }
    let mut ids = HashSet::new();
    for material in materials {
        if !ids.insert(material.id) {
            return Err(PermeationError::config(
                Stage::Assembly,
                format!("material id {} is used more than once", material.id),
            ));
        }
    }
    for region in &mesh.regions {
        if !ids.contains(&region.material_id) {
            return Err(PermeationError::config(
                Stage::Meshing,
                format!("mesh region references unknown material id {}", region.material_id),
            ));
        }
        if !(region.end > region.start) {
            return Err(PermeationError::config(
                Stage::Meshing,
                format!("mesh region for material {} has non-positive width", region.material_id),
            ));
        }
    }
    for material in materials {
        if !mesh.regions.iter().any(|region| region.material_id == material.id) {
            return Err(PermeationError::config(
                Stage::Meshing,
                format!("material {} has no mesh region", material.id),
            ));
        }
    }
    if mesh.vertices.windows(2).any(|w| w[1] < w[0]) {
        return Err(PermeationError::config(Stage::Meshing, "mesh vertices must be non-decreasing"));
    }
    Ok(())
}

fn validate_boundary_conditions(conditions: &[BoundaryCondition]) -> Result<(), PermeationError> {
    let mut surfaces = HashSet::new();
    for condition in conditions {
        if ![INLET_SURFACE, OUTLET_SURFACE].contains(&condition.surface()) {
            return Err(PermeationError::config(
                Stage::BoundaryConditions,
                format!("surface {} is neither the inlet nor the outlet", condition.surface()),
            ));
        }
        if !surfaces.insert(condition.surface()) {
            return Err(PermeationError::config(
                Stage::BoundaryConditions,
                format!("surface {} has more than one boundary condition", condition.surface()),
            ));
        }
    }
    for surface in [INLET_SURFACE, OUTLET_SURFACE] {
        if !surfaces.contains(&surface) {
            return Err(PermeationError::config(
                Stage::BoundaryConditions,
                format!("surface {} has no boundary condition", surface),
            ));
        }
    }
    Ok(())
}

fn validate_temperature(temperature: &Temperature, mesh: &Mesh) -> Result<(), PermeationError> {
    let values: &[f64] = match temperature {
        Temperature::Uniform { kelvin } => std::slice::from_ref(kelvin),
        Temperature::Profile { kelvin } => {
            if kelvin.len() != mesh.len() {
                return Err(PermeationError::config(
                    Stage::BoundaryConditions,
                    format!(
                        "temperature profile has {} values but the mesh has {} vertices",
                        kelvin.len(),
                        mesh.len()
                    ),
                ));
            }
            kelvin
        }
    };
    if values.iter().any(|t| !(t.is_finite() && *t > 0.0)) {
        return Err(PermeationError::config(
            Stage::BoundaryConditions,
            "temperatures must be positive and finite",
        ));
    }
    Ok(())
}

fn validate_exports(exports: &[ExportRequest]) -> Result<(), PermeationError> {
    let requests_outlet_flux = exports.iter().any(|export| match export {
        ExportRequest::DerivedQuantities { quantities, .. } => quantities
            .iter()
            .any(|q| *q == DerivedQuantityKind::HydrogenFlux { surface: OUTLET_SURFACE }),
        _ => false,
    });
    if !requests_outlet_flux {
        return Err(PermeationError::config(
            Stage::Model,
            "exports must request the hydrogen flux at the outlet surface",
        ));
    }
    Ok(())
}
