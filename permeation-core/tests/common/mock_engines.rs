//! Stand-ins for the external transport engine

use permeation_core::{
    error::{PermeationError, Stage},
    grid::linspace,
    model::boundary::surface_concentration,
    physics::ArrheniusLaw,
    solver::TransportEngine,
};
use permeation_schemas::{
    boundary::{BoundaryCondition, INLET_SURFACE},
    material::SUBSTRATE_ID,
    model::{DerivedQuantityKind, ModelConfiguration},
    series::{DerivedQuantities, DerivedSeries},
};
use std::f64::consts::PI;

/// Time-lag solution of a single slab carrying the substrate diffusivity, with
/// the inlet concentration taken from the model's Sieverts condition.
pub struct TimeLagEngine {
    pub samples: usize,
    pub initialised: Option<ModelConfiguration>,
    pub inlet_concentration: Option<f64>,
}

impl TimeLagEngine {
    pub fn new(samples: usize) -> Self {
        Self { samples, initialised: None, inlet_concentration: None }
    }
}

impl TransportEngine for TimeLagEngine {
    fn name(&self) -> &str {
        "time-lag"
    }

    fn initialise(&mut self, model: &ModelConfiguration) -> Result<(), PermeationError> {
        let inlet = model
            .boundary_conditions
            .iter()
            .find(|bc| bc.surface() == INLET_SURFACE)
            .ok_or_else(|| PermeationError::Solve("no inlet condition".to_string()))?;
        self.inlet_concentration = Some(surface_concentration(inlet, &model.temperature, &model.mesh)?);
        self.initialised = Some(model.clone());
        Ok(())
    }

    fn run(&mut self) -> Result<DerivedQuantities, PermeationError> {
        let model = self
            .initialised
            .as_ref()
            .ok_or_else(|| PermeationError::Solve("not initialised".to_string()))?;
        let c0 = self.inlet_concentration.unwrap_or(0.0);
        let substrate = model
            .materials
            .iter()
            .find(|m| m.id == SUBSTRATE_ID)
            .ok_or_else(|| PermeationError::Solve("no substrate".to_string()))?;
        let outlet_t = model.temperature.at_vertex(model.mesh.len() - 1).unwrap_or(300.0);
        let d = substrate.diffusivity.value_at(outlet_t);
        let l = model.mesh.total_thickness();

        let times = linspace(0.0, model.settings.final_time, self.samples);
        let flux: Vec<f64> = times.iter().map(|t| time_lag_flux(d, c0, l, *t)).collect();

        Ok(DerivedQuantities {
            times,
            series: model
                .derived_quantities()
                .into_iter()
                .map(|quantity| DerivedSeries { quantity, values: flux.clone() })
                .collect(),
        })
    }
}

/// Outlet flux of a slab of thickness `l` whose inlet is held at `c0` from
/// `t = 0`, with the outlet at zero concentration.
///
/// Early times use the image series of complementary-error-function terms,
/// which are all positive. Later times use the Fourier series, which converges
/// within a few terms once `D t / l^2` is past a quarter.
pub fn time_lag_flux(d: f64, c0: f64, l: f64, t: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    let tau = d * t / (l * l);
    if tau < 0.25 {
        let images: f64 = (0..20)
            .map(|m| {
                let k = (2 * m + 1) as f64;
                (-k * k / (4.0 * tau)).exp()
            })
            .sum();
        2.0 * c0 * (d / (PI * t)).sqrt() * images
    } else {
        let series: f64 = (1..=50)
            .map(|n| {
                let n = n as f64;
                (-1f64).powi(n as i32) * (-n * n * PI * PI * tau).exp()
            })
            .sum();
        d * c0 / l * (1.0 + 2.0 * series)
    }
}

/// Fails in `run`, the way a non-converging engine would.
pub struct DivergingEngine {
    pub runs: usize,
}

impl TransportEngine for DivergingEngine {
    fn name(&self) -> &str {
        "diverging"
    }

    fn initialise(&mut self, _model: &ModelConfiguration) -> Result<(), PermeationError> {
        Ok(())
    }

    fn run(&mut self) -> Result<DerivedQuantities, PermeationError> {
        self.runs += 1;
        Err(PermeationError::Solve("Newton solver did not converge".to_string()))
    }
}

/// Rejects the model during initialisation with a non-solve error.
pub struct PickyEngine;

impl TransportEngine for PickyEngine {
    fn name(&self) -> &str {
        "picky"
    }

    fn initialise(&mut self, model: &ModelConfiguration) -> Result<(), PermeationError> {
        let has_sieverts = model
            .boundary_conditions
            .iter()
            .any(|bc| matches!(bc, BoundaryCondition::Sieverts { .. }));
        if has_sieverts {
            return Err(PermeationError::numeric(Stage::Solve, "unsupported boundary condition"));
        }
        Ok(())
    }

    fn run(&mut self) -> Result<DerivedQuantities, PermeationError> {
        Ok(DerivedQuantities {
            times: vec![0.0],
            series: vec![DerivedSeries {
                quantity: DerivedQuantityKind::HydrogenFlux { surface: 2 },
                values: vec![0.0],
            }],
        })
    }
}
