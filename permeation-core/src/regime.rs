//! Dimensionless permeation number `W = K_d * sqrt(P) * e / (D * S)`.
//!
//! Large `W` means transport is limited by diffusion through the bulk; small
//! `W` means it is limited by surface kinetics. Every coefficient follows an
//! Arrhenius law and is re-evaluated at the temperature of each sample.
//!
//! Inputs are not range-checked. A negative pressure yields `NaN` (the square
//! root of a negative `f64`), a negative thickness flips the sign. Use
//! [`RegimeEvaluator::evaluate_checked`] or [`RegimeGrid::ensure_finite`] when
//! a finite value is required.

use crate::{
    error::{PermeationError, Stage},
    grid::{geomspace, linspace},
    physics::ArrheniusLaw,
    properties::PropertyResolver,
};
use ndarray::{Array1, Array2};
use permeation_schemas::{
    experiment::{AxisRange, RegimeDefaults, RegimeStudyConfig, Spacing},
    property::{MaterialProperty, PropertyKind},
};
use rayon::prelude::*;
use std::fmt;
use tracing::debug;

pub fn regime_number(dissociation: f64, thickness: f64, pressure: f64, diffusivity: f64, solubility: f64) -> f64 {
    (dissociation * pressure.sqrt() * thickness) / (diffusivity * solubility)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepVariable {
    Pressure,
    Thickness,
    Temperature,
}

impl SweepVariable {
    pub fn axis_label(&self) -> &'static str {
        match self {
            SweepVariable::Pressure => "Upstream pressure (Pa)",
            SweepVariable::Thickness => "Sample thickness (m)",
            SweepVariable::Temperature => "Temperature (K)",
        }
    }

    fn default_in(&self, defaults: &RegimeDefaults) -> f64 {
        match self {
            SweepVariable::Pressure => defaults.pressure,
            SweepVariable::Thickness => defaults.thickness,
            SweepVariable::Temperature => defaults.temperature,
        }
    }
}

impl fmt::Display for SweepVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SweepVariable::Pressure => "pressure",
            SweepVariable::Thickness => "thickness",
            SweepVariable::Temperature => "temperature",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Sweep {
    Default,
    Fixed(f64),
    Range(Vec<f64>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegimeGrid {
    Point {
        value: f64,
    },
    Line {
        variable: SweepVariable,
        coordinates: Vec<f64>,
        values: Array1<f64>,
    },
    /// `values[[row, column]]` is evaluated at `(x_coordinates[column], y_coordinates[row])`.
    Plane {
        x: SweepVariable,
        x_coordinates: Vec<f64>,
        y: SweepVariable,
        y_coordinates: Vec<f64>,
        values: Array2<f64>,
    },
}

impl RegimeGrid {
    pub fn values(&self) -> Vec<f64> {
        match self {
            RegimeGrid::Point { value } => vec![*value],
            RegimeGrid::Line { values, .. } => values.to_vec(),
            RegimeGrid::Plane { values, .. } => values.iter().copied().collect(),
        }
    }

    /// Smallest and largest values, or `None` if the grid holds a `NaN`.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let values = self.values();
        if values.is_empty() || values.iter().any(|v| v.is_nan()) {
            return None;
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }

    pub fn ensure_finite(&self) -> Result<(), PermeationError> {
        match self.values().iter().position(|v| !v.is_finite()) {
            Some(index) => Err(PermeationError::numeric(
                Stage::Sweep,
                format!("regime number at grid index {} is not finite", index),
            )),
            None => Ok(()),
        }
    }
}

/// Regime number of one material with the three Arrhenius laws it depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegimeEvaluator {
    dissociation: MaterialProperty,
    diffusivity: MaterialProperty,
    solubility: MaterialProperty,
    defaults: RegimeDefaults,
}

impl RegimeEvaluator {
    pub fn new(dissociation: MaterialProperty, diffusivity: MaterialProperty, solubility: MaterialProperty) -> Self {
        Self {
            dissociation,
            diffusivity,
            solubility,
            defaults: RegimeDefaults::default(),
        }
    }

    pub fn resolve<R: PropertyResolver + ?Sized>(resolver: &R, material: &str) -> Result<Self, PermeationError> {
        Ok(Self::new(
            resolver.lookup(material, PropertyKind::Dissociation)?,
            resolver.lookup(material, PropertyKind::Diffusivity)?,
            resolver.lookup(material, PropertyKind::Solubility)?,
        ))
    }

    pub fn with_defaults(mut self, defaults: RegimeDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn defaults(&self) -> &RegimeDefaults {
        &self.defaults
    }

    pub fn evaluate(&self, pressure: f64, thickness: f64, temperature: f64) -> f64 {
        regime_number(
            self.dissociation.value_at(temperature),
            thickness,
            pressure,
            self.diffusivity.value_at(temperature),
            self.solubility.value_at(temperature),
        )
    }

    pub fn evaluate_checked(&self, pressure: f64, thickness: f64, temperature: f64) -> Result<f64, PermeationError> {
        let w = self.evaluate(pressure, thickness, temperature);
        if w.is_finite() {
            Ok(w)
        } else {
            Err(PermeationError::numeric(
                Stage::Sweep,
                format!(
                    "regime number is {} at P = {} Pa, e = {} m, T = {} K",
                    w, pressure, thickness, temperature
                ),
            ))
        }
    }

    /// Evaluates over the outer product of the swept variables.
    ///
    /// Unswept variables take their fixed value or the evaluator defaults. At
    /// most two variables may be ranges; the first in (pressure, thickness,
    /// temperature) order becomes the column axis of a plane.
    pub fn sweep(&self, pressure: Sweep, thickness: Sweep, temperature: Sweep) -> Result<RegimeGrid, PermeationError> {
        let axes = [
            (SweepVariable::Pressure, pressure),
            (SweepVariable::Thickness, thickness),
            (SweepVariable::Temperature, temperature),
        ];

        let mut point = [0.0; 3];
        let mut ranges: Vec<(usize, SweepVariable, Vec<f64>)> = Vec::new();
        for (index, (variable, sweep)) in axes.into_iter().enumerate() {
            match sweep {
                Sweep::Default => point[index] = variable.default_in(&self.defaults),
                Sweep::Fixed(value) => point[index] = value,
                Sweep::Range(values) => {
                    if values.is_empty() {
                        return Err(PermeationError::config(Stage::Sweep, format!("{} range is empty", variable)));
                    }
                    ranges.push((index, variable, values));
                }
            }
        }

        let eval = |p: [f64; 3]| self.evaluate(p[0], p[1], p[2]);
        debug!(
            swept = ranges.len(),
            cells = ranges.iter().map(|(_, _, v)| v.len()).product::<usize>(),
            "evaluating regime grid"
        );

        match ranges.len() {
            0 => Ok(RegimeGrid::Point { value: eval(point) }),
            1 => {
                let (index, variable, coordinates) = ranges.remove(0);
                let values: Vec<f64> = coordinates
                    .par_iter()
                    .map(|c| {
                        let mut p = point;
                        p[index] = *c;
                        eval(p)
                    })
                    .collect();
                Ok(RegimeGrid::Line {
                    variable,
                    coordinates,
                    values: Array1::from(values),
                })
            }
            2 => {
                let (yi, y, y_coordinates) = ranges.remove(1);
                let (xi, x, x_coordinates) = ranges.remove(0);
                let rows = y_coordinates.len();
                let cols = x_coordinates.len();
                let values: Vec<f64> = (0..rows * cols)
                    .into_par_iter()
                    .map(|k| {
                        let mut p = point;
                        p[yi] = y_coordinates[k / cols];
                        p[xi] = x_coordinates[k % cols];
                        eval(p)
                    })
                    .collect();
                let values = Array2::from_shape_vec((rows, cols), values)
                    .map_err(|e| PermeationError::numeric(Stage::Sweep, e.to_string()))?;
                Ok(RegimeGrid::Plane {
                    x,
                    x_coordinates,
                    y,
                    y_coordinates,
                    values,
                })
            }
            _ => Err(PermeationError::config(
                Stage::Sweep,
                "at most two of pressure, thickness and temperature can be swept at once",
            )),
        }
    }
}

pub fn sample_axis(range: &AxisRange) -> Result<Vec<f64>, PermeationError> {
    if range.points == 0 {
        return Err(PermeationError::config(Stage::Sweep, "axis range needs at least one point"));
    }
    match range.spacing {
        Spacing::Linear => Ok(linspace(range.start, range.end, range.points)),
        Spacing::Geometric => {
            if !(range.start > 0.0 && range.end > 0.0) {
                return Err(PermeationError::config(
                    Stage::Sweep,
                    format!("geometric range needs positive bounds, got {}..{}", range.start, range.end),
                ));
            }
            Ok(geomspace(range.start, range.end, range.points))
        }
    }
}

/// The three one-variable sweeps and the pressure/thickness map of a study.
#[derive(Debug, Clone)]
pub struct RegimeStudy {
    pub defaults: RegimeDefaults,
    pub versus_pressure: RegimeGrid,
    pub versus_thickness: RegimeGrid,
    pub versus_temperature: RegimeGrid,
    pub pressure_thickness_map: RegimeGrid,
}

pub fn run_regime_study(evaluator: &RegimeEvaluator, config: &RegimeStudyConfig) -> Result<RegimeStudy, PermeationError> {
    let evaluator = evaluator.with_defaults(config.defaults);
    let pressures = sample_axis(&config.pressure_range)?;
    let thicknesses = sample_axis(&config.thickness_range)?;
    let temperatures = sample_axis(&config.temperature_range)?;

    Ok(RegimeStudy {
        defaults: config.defaults,
        versus_pressure: evaluator.sweep(Sweep::Range(pressures.clone()), Sweep::Default, Sweep::Default)?,
        versus_thickness: evaluator.sweep(Sweep::Default, Sweep::Range(thicknesses.clone()), Sweep::Default)?,
        versus_temperature: evaluator.sweep(Sweep::Default, Sweep::Default, Sweep::Range(temperatures))?,
        pressure_thickness_map: evaluator.sweep(Sweep::Range(pressures), Sweep::Range(thicknesses), Sweep::Default)?,
    })
}
