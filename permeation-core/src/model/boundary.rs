use crate::{
    error::{PermeationError, Stage},
    physics::sieverts_concentration,
};
use permeation_schemas::{
    boundary::{BoundaryCondition, INLET_SURFACE, OUTLET_SURFACE},
    mesh::Mesh,
    model::Temperature,
    property::MaterialProperty,
};

pub const SOLUTE_FIELD: &str = "solute";

/// Sieverts' law on the inlet and a zero-concentration sink on the outlet.
pub fn build_boundary_conditions(
    upstream_pressure: f64,
    barrier_solubility: Option<&MaterialProperty>,
) -> Result<Vec<BoundaryCondition>, PermeationError> {
    let solubility = barrier_solubility.copied().ok_or_else(|| {
        PermeationError::config(Stage::BoundaryConditions, "barrier solubility is required for the upstream condition")
    })?;
    if !(upstream_pressure.is_finite() && upstream_pressure >= 0.0) {
        return Err(PermeationError::config(
            Stage::BoundaryConditions,
            format!("upstream pressure must be non-negative, got {}", upstream_pressure),
        ));
    }

    Ok(vec![
        BoundaryCondition::Sieverts {
            surface: INLET_SURFACE,
            solubility,
            pressure: upstream_pressure,
        },
        BoundaryCondition::FixedValue {
            surface: OUTLET_SURFACE,
            field: SOLUTE_FIELD.to_string(),
            value: 0.0,
        },
    ])
}

/// Index of the mesh vertex a surface id sits on.
pub fn surface_vertex(surface: u32, mesh: &Mesh) -> Option<usize> {
    match surface {
        INLET_SURFACE if !mesh.is_empty() => Some(0),
        OUTLET_SURFACE if !mesh.is_empty() => Some(mesh.len() - 1),
        _ => None,
    }
}

/// Concentration imposed by `condition`, evaluated with the temperature the
/// model carries at that surface when the solve runs.
pub fn surface_concentration(
    condition: &BoundaryCondition,
    temperature: &Temperature,
    mesh: &Mesh,
) -> Result<f64, PermeationError> {
    match condition {
        BoundaryCondition::FixedValue { value, .. } => Ok(*value),
        BoundaryCondition::Sieverts { surface, solubility, pressure } => {
            let t = surface_vertex(*surface, mesh)
                .and_then(|index| temperature.at_vertex(index))
                .ok_or_else(|| {
                    PermeationError::config(
                        Stage::BoundaryConditions,
                        format!("no temperature available at surface {}", surface),
                    )
                })?;
            Ok(sieverts_concentration(solubility, *pressure, t))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::mesh::MeshBuilder, physics::ArrheniusLaw};
    use approx::assert_relative_eq;

    fn solubility() -> MaterialProperty {
        MaterialProperty { pre_exponential_factor: 1.0e-2, activation_energy: 0.3 }
    }

    #[test]
    fn test_builds_inlet_and_outlet_conditions() {
        let bcs = build_boundary_conditions(1.0e5, Some(&solubility())).unwrap();
        assert_eq!(bcs.len(), 2);
        assert_eq!(bcs[0].surface(), INLET_SURFACE);
        assert_eq!(bcs[1].surface(), OUTLET_SURFACE);
        assert!(matches!(&bcs[1], BoundaryCondition::FixedValue { value, .. } if *value == 0.0));
    }

    #[test]
    fn test_missing_solubility_fails() {
        let err = build_boundary_conditions(1.0e5, None).unwrap_err();
        assert!(matches!(err, PermeationError::Configuration { stage: Stage::BoundaryConditions, .. }));
    }

    #[test]
    fn test_sieverts_uses_inlet_temperature_of_profile() {
        let mesh = MeshBuilder::new().with_points_per_layer(3).build(1.0e-6, 1.0e-3).unwrap();
        let bcs = build_boundary_conditions(4.0e4, Some(&solubility())).unwrap();
        let profile = Temperature::Profile { kelvin: vec![700.0, 690.0, 680.0, 680.0, 650.0, 600.0] };

        let c = surface_concentration(&bcs[0], &profile, &mesh).unwrap();
        assert_relative_eq!(c, solubility().value_at(700.0) * 200.0, max_relative = 1e-12);

        let uniform = surface_concentration(&bcs[0], &Temperature::uniform(600.0), &mesh).unwrap();
        assert!(uniform < c);
        assert_eq!(surface_concentration(&bcs[1], &profile, &mesh).unwrap(), 0.0);
    }
}
