use crate::{
    constants::{AVOGADRO, GAS_CONSTANT},
    error::{PermeationError, Stage},
};
use permeation_schemas::{
    experiment::ContainmentGeometry,
    series::{FluxTimeSeries, PressureTimeSeries},
};
use std::f64::consts::PI;

/// Running trapezoidal integral of `y` over `x`, zero at the first sample.
pub fn cumulative_trapezoid(y: &[f64], x: &[f64]) -> Result<Vec<f64>, PermeationError> {
    validate_time_base(y, x)?;

    let mut integral = Vec::with_capacity(y.len());
    let mut total = 0.0;
    integral.push(total);
    for i in 1..y.len() {
        total += 0.5 * (y[i] + y[i - 1]) * (x[i] - x[i - 1]);
        integral.push(total);
    }
    Ok(integral)
}

fn validate_time_base(values: &[f64], times: &[f64]) -> Result<(), PermeationError> {
    if values.len() != times.len() {
        return Err(PermeationError::numeric(
            Stage::PostProcess,
            format!("{} flux values for {} time samples", values.len(), times.len()),
        ));
    }
    if times.is_empty() {
        return Err(PermeationError::numeric(Stage::PostProcess, "flux series is empty"));
    }
    if let Some(i) = times.windows(2).position(|w| !(w[1] > w[0])) {
        return Err(PermeationError::numeric(
            Stage::PostProcess,
            format!("times must be strictly increasing (samples {} and {})", i, i + 1),
        ));
    }
    Ok(())
}

fn require_positive(label: &str, value: f64) -> Result<(), PermeationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PermeationError::config(
            Stage::PostProcess,
            format!("{} must be positive, got {}", label, value),
        ))
    }
}

/// Pressure built up in a closed volume `volume` (m^3) at `temperature` (K)
/// by the hydrogen crossing a disc of `diameter` (m).
///
/// Flux is integrated over time, scaled by the exposed area, converted from
/// atoms to moles and fed through the ideal gas law. Flux values are not
/// checked for sign or monotonicity.
pub fn pressure_from_flux(
    flux: &[f64],
    times: &[f64],
    diameter: f64,
    volume: f64,
    temperature: f64,
) -> Result<Vec<f64>, PermeationError> {
    require_positive("sample diameter", diameter)?;
    require_positive("containment volume", volume)?;
    require_positive("containment temperature", temperature)?;

    let integrated_flux = cumulative_trapezoid(flux, times)?;
    let area = PI * (diameter / 2.0).powi(2);

    let pressure: Vec<f64> = integrated_flux
        .iter()
        .map(|quantity| {
            let moles = quantity * area / AVOGADRO;
            moles * GAS_CONSTANT * temperature / volume
        })
        .collect();

    if let Some(i) = pressure.iter().position(|p| !p.is_finite()) {
        return Err(PermeationError::numeric(
            Stage::PostProcess,
            format!("pressure at t = {} is not finite", times[i]),
        ));
    }
    Ok(pressure)
}

pub fn pressure_series(
    flux: &FluxTimeSeries,
    containment: &ContainmentGeometry,
    temperature: f64,
) -> Result<PressureTimeSeries, PermeationError> {
    let pressure = pressure_from_flux(&flux.flux, &flux.times, containment.diameter, containment.volume, temperature)?;
    Ok(PressureTimeSeries {
        times: flux.times.clone(),
        pressure,
    })
}
