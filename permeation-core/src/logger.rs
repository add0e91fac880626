use crate::{
    error::{PermeationError, Stage},
    regime::RegimeGrid,
};
use csv::Writer;
use permeation_schemas::series::{FluxTimeSeries, PressureTimeSeries};
use serde::Serialize;
use std::{fs, path::Path};

#[derive(Debug, Serialize)]
struct LogEntry {
    time_s: f64,
    flux: f64,
    pressure_pa: f64,
}

/// CSV log of the downstream signal, one row per time sample.
pub struct TimeSeriesLogger {
    writer: Writer<fs::File>,
    path: String,
}

impl TimeSeriesLogger {
    pub fn new(path: &Path) -> Result<Self, PermeationError> {
        let path_str = path.display().to_string();
        let writer = Writer::from_path(path).map_err(|e| PermeationError::CsvError(path_str.clone(), e))?;
        Ok(Self { writer, path: path_str })
    }

    pub fn log_sample(&mut self, time_s: f64, flux: f64, pressure_pa: f64) -> Result<(), PermeationError> {
        self.writer
            .serialize(LogEntry { time_s, flux, pressure_pa })
            .map_err(|e| PermeationError::CsvError(self.path.clone(), e))
    }

    /// Writes every sample of `flux` alongside the matching pressure and flushes.
    pub fn log_series(&mut self, flux: &FluxTimeSeries, pressure: &PressureTimeSeries) -> Result<(), PermeationError> {
        if flux.times != pressure.times {
            return Err(PermeationError::numeric(
                Stage::PostProcess,
                "flux and pressure series do not share a time base",
            ));
        }
        for ((t, j), p) in flux.times.iter().zip(&flux.flux).zip(&pressure.pressure) {
            self.log_sample(*t, *j, *p)?;
        }
        self.writer
            .flush()
            .map_err(|e| PermeationError::FileIO(self.path.clone(), e))
    }
}

#[derive(Debug, Serialize)]
struct LineRow {
    x: f64,
    w: f64,
}

#[derive(Debug, Serialize)]
struct PlaneRow {
    x: f64,
    y: f64,
    w: f64,
}

/// Long-format CSV of a regime grid: `x,w` for lines, `x,y,w` for planes.
pub fn export_regime_grid(path: &Path, grid: &RegimeGrid) -> Result<(), PermeationError> {
    let path_str = path.display().to_string();
    let csv_err = |e| PermeationError::CsvError(path_str.clone(), e);
    let mut writer = Writer::from_path(path).map_err(csv_err)?;

    match grid {
        RegimeGrid::Point { value } => writer.serialize(LineRow { x: 0.0, w: *value }).map_err(csv_err)?,
        RegimeGrid::Line { coordinates, values, .. } => {
            for (x, w) in coordinates.iter().zip(values.iter()) {
                writer.serialize(LineRow { x: *x, w: *w }).map_err(csv_err)?;
            }
        }
        RegimeGrid::Plane { x_coordinates, y_coordinates, values, .. } => {
            for ((row, col), w) in values.indexed_iter() {
                writer
                    .serialize(PlaneRow { x: x_coordinates[col], y: y_coordinates[row], w: *w })
                    .map_err(csv_err)?;
            }
        }
    }
    writer.flush().map_err(|e| PermeationError::FileIO(path_str.clone(), e))
}
