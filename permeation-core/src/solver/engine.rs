use crate::{
    error::{PermeationError, Stage},
    model::boundary::SOLUTE_FIELD,
};
use permeation_schemas::{
    boundary::OUTLET_SURFACE,
    model::{DerivedQuantityKind, ExportRequest, ModelConfiguration},
    series::{DerivedQuantities, FluxTimeSeries},
};
use std::path::Path;
use tracing::{info, warn};

pub const DERIVED_QUANTITIES_FILE: &str = "derived_quantities.csv";
pub const SOLUTE_TEXT_FILE: &str = "mobile.txt";

/// The external finite-element transport engine.
///
/// Implementations own discretization and time stepping. `run` either returns
/// the complete derived quantities or fails; there is no partial result.
pub trait TransportEngine {
    fn name(&self) -> &str;
    fn initialise(&mut self, model: &ModelConfiguration) -> Result<(), PermeationError>;
    fn run(&mut self) -> Result<DerivedQuantities, PermeationError>;
}

/// Outlet flux, a text dump of the solute field and a checkpoint-free field
/// export, all under `folder`.
pub fn standard_exports(folder: &Path) -> Vec<ExportRequest> {
    vec![
        ExportRequest::DerivedQuantities {
            quantities: vec![DerivedQuantityKind::HydrogenFlux { surface: OUTLET_SURFACE }],
            filename: folder.join(DERIVED_QUANTITIES_FILE),
            show_units: true,
        },
        ExportRequest::FieldText {
            field: SOLUTE_FIELD.to_string(),
            filename: folder.join(SOLUTE_TEXT_FILE),
        },
        ExportRequest::FieldVisualization {
            field: SOLUTE_FIELD.to_string(),
            folder: folder.to_path_buf(),
            checkpoint: false,
        },
    ]
}

/// Pulls the flux series for `surface` out of a solve result.
pub fn flux_at(derived: &DerivedQuantities, surface: u32) -> Result<FluxTimeSeries, PermeationError> {
    let series = derived
        .series
        .iter()
        .find(|s| s.quantity == DerivedQuantityKind::HydrogenFlux { surface })
        .ok_or_else(|| {
            PermeationError::numeric(Stage::PostProcess, format!("solver output has no flux for surface {}", surface))
        })?;
    if series.values.len() != derived.times.len() {
        return Err(PermeationError::numeric(
            Stage::PostProcess,
            format!(
                "flux for surface {} has {} values but {} time samples",
                surface,
                series.values.len(),
                derived.times.len()
            ),
        ));
    }
    Ok(FluxTimeSeries {
        times: derived.times.clone(),
        flux: series.values.clone(),
    })
}

pub struct SolverInvoker<E: TransportEngine> {
    engine: E,
}

impl<E: TransportEngine> SolverInvoker<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Initialises the engine with `model` and runs the transient solve.
    ///
    /// Every engine failure is reported as `PermeationError::Solve`.
    pub fn invoke(&mut self, model: &ModelConfiguration) -> Result<DerivedQuantities, PermeationError> {
        let name = self.engine.name().to_string();
        info!(engine = %name, vertices = model.mesh.len(), "initialising transport engine");
        self.engine.initialise(model).map_err(|e| as_solve_error(&name, e))?;

        info!(engine = %name, final_time = model.settings.final_time, "running transient solve");
        let derived = self.engine.run().map_err(|e| as_solve_error(&name, e))?;
        info!(engine = %name, samples = derived.times.len(), "solve complete");
        Ok(derived)
    }

    /// Runs the solve and returns the downstream flux history.
    pub fn outlet_flux(&mut self, model: &ModelConfiguration) -> Result<FluxTimeSeries, PermeationError> {
        let derived = self.invoke(model)?;
        flux_at(&derived, OUTLET_SURFACE)
    }
}

fn as_solve_error(engine: &str, error: PermeationError) -> PermeationError {
    warn!(engine = %engine, error = %error, "transport engine failed");
    match error {
        PermeationError::Solve(_) => error,
        other => PermeationError::Solve(format!("{}: {}", engine, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use permeation_schemas::series::DerivedSeries;

    fn derived(values: Vec<f64>) -> DerivedQuantities {
        DerivedQuantities {
            times: vec![0.0, 1.0, 2.0],
            series: vec![DerivedSeries {
                quantity: DerivedQuantityKind::HydrogenFlux { surface: OUTLET_SURFACE },
                values,
            }],
        }
    }

    #[test]
    fn test_standard_exports_cover_flux_text_and_field() {
        let exports = standard_exports(Path::new("runs/a"));
        assert!(matches!(
            &exports[0],
            ExportRequest::DerivedQuantities { filename, .. } if filename == Path::new("runs/a/derived_quantities.csv")
        ));
        assert!(matches!(
            &exports[1],
            ExportRequest::FieldText { filename, field } if filename == Path::new("runs/a/mobile.txt") && field == "solute"
        ));
        assert!(matches!(&exports[2], ExportRequest::FieldVisualization { checkpoint: false, .. }));
    }

    #[test]
    fn test_flux_at_extracts_outlet_series() {
        let flux = flux_at(&derived(vec![0.0, 1.0e15, 2.0e15]), OUTLET_SURFACE).unwrap();
        assert_eq!(flux.times, vec![0.0, 1.0, 2.0]);
        assert_eq!(flux.flux[2], 2.0e15);
        assert!(flux_at(&derived(vec![0.0, 1.0, 2.0]), 1).is_err());
    }

    #[test]
    fn test_flux_at_rejects_length_mismatch() {
        let err = flux_at(&derived(vec![0.0]), OUTLET_SURFACE).unwrap_err();
        assert!(matches!(err, PermeationError::Numeric { stage: Stage::PostProcess, .. }));
    }
}
