//! Bitmap charts of the downstream pressure and the regime sweeps.

use anyhow::{bail, Result};
use permeation_core::regime::{RegimeGrid, SweepVariable};
use permeation_schemas::series::PressureTimeSeries;
use plotters::prelude::*;
use std::path::Path;
use tracing::info;

const SIZE: (u32, u32) = (1024, 768);

/// Line chart of downstream pressure against time.
pub fn plot_pressure_history(path: &Path, series: &PressureTimeSeries) -> Result<()> {
    if series.times.is_empty() {
        bail!("no pressure samples to plot");
    }
    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let t_max = series.times.last().copied().unwrap_or(1.0).max(f64::MIN_POSITIVE);
    let p_min = series.pressure.iter().copied().fold(0.0, f64::min);
    let p_max = series.pressure.iter().copied().fold(0.0, f64::max);
    let p_max = if p_max > p_min { p_max } else { p_min + 1.0 };

    let mut chart = ChartBuilder::on(&root)
        .caption("Downstream Pressure", ("sans-serif", 40).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(0f64..t_max, p_min..p_max * 1.05)?;

    chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_desc("Pressure (Pa)")
        .draw()?;

    chart.draw_series(LineSeries::new(
        series.times.iter().copied().zip(series.pressure.iter().copied()),
        BLUE.stroke_width(2),
    ))?;

    root.present()?;
    info!(path = %path.display(), "pressure chart saved");
    Ok(())
}

/// W against one swept variable. Pressure and thickness sweeps use log-log
/// axes; temperature sweeps are linear.
pub fn plot_regime_line(path: &Path, grid: &RegimeGrid) -> Result<()> {
    let (variable, coordinates, values) = match grid {
        RegimeGrid::Line { variable, coordinates, values } => (*variable, coordinates, values.to_vec()),
        _ => bail!("expected a one-variable sweep"),
    };
    let (x_min, x_max) = bounds(coordinates)?;
    let (w_min, w_max) = bounds(&values)?;
    let points: Vec<(f64, f64)> = coordinates.iter().copied().zip(values.iter().copied()).collect();
    let caption = format!("Permeation number vs {}", variable);

    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    if variable == SweepVariable::Temperature {
        let mut chart = ChartBuilder::on(&root)
            .caption(&caption, ("sans-serif", 40).into_font())
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(80)
            .build_cartesian_2d(x_min..x_max, w_min..w_max)?;
        chart
            .configure_mesh()
            .x_desc(variable.axis_label())
            .y_desc("W")
            .draw()?;
        chart.draw_series(LineSeries::new(points, RED.stroke_width(2)))?;
    } else {
        if w_min <= 0.0 || x_min <= 0.0 {
            bail!("log axes need positive values for the {} sweep", variable);
        }
        let mut chart = ChartBuilder::on(&root)
            .caption(&caption, ("sans-serif", 40).into_font())
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(80)
            .build_cartesian_2d((x_min..x_max).log_scale(), (w_min..w_max).log_scale())?;
        chart
            .configure_mesh()
            .x_desc(variable.axis_label())
            .y_desc("W")
            .draw()?;
        chart.draw_series(LineSeries::new(points, RED.stroke_width(2)))?;
    }

    root.present()?;
    info!(path = %path.display(), "regime chart saved");
    Ok(())
}

/// Colour map of a two-variable sweep on log-log axes. Cells are coloured on a
/// logarithmic scale spanning the smallest to the largest W of the grid.
pub fn plot_regime_map(path: &Path, grid: &RegimeGrid) -> Result<()> {
    let (x, x_coordinates, y, y_coordinates, values) = match grid {
        RegimeGrid::Plane { x, x_coordinates, y, y_coordinates, values } => {
            (*x, x_coordinates, *y, y_coordinates, values)
        }
        _ => bail!("expected a two-variable sweep"),
    };
    if x_coordinates.len() < 2 || y_coordinates.len() < 2 {
        bail!("a regime map needs at least two samples per axis");
    }
    let (x_min, x_max) = bounds(x_coordinates)?;
    let (y_min, y_max) = bounds(y_coordinates)?;
    let (w_min, w_max) = match grid.value_range() {
        Some((lo, hi)) if lo > 0.0 => (lo, hi),
        _ => bail!("log colour scale needs positive, finite W"),
    };
    if x_min <= 0.0 || y_min <= 0.0 {
        bail!("log axes need positive {} and {} values", x, y);
    }

    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("W over {} and {} ({:.2e} to {:.2e})", x, y, w_min, w_max),
            ("sans-serif", 30).into_font(),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d((x_min..x_max).log_scale(), (y_min..y_max).log_scale())?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(x.axis_label())
        .y_desc(y.axis_label())
        .draw()?;

    let log_span = (w_max / w_min).ln();
    let cells = (0..y_coordinates.len() - 1).flat_map(|row| {
        (0..x_coordinates.len() - 1).map(move |col| {
            let w = values[[row, col]];
            let t = if log_span > 0.0 { (w / w_min).ln() / log_span } else { 0.5 };
            Rectangle::new(
                [
                    (x_coordinates[col], y_coordinates[row]),
                    (x_coordinates[col + 1], y_coordinates[row + 1]),
                ],
                colour_for(t).filled(),
            )
        })
    });
    chart.draw_series(cells)?;

    root.present()?;
    info!(path = %path.display(), "regime map saved");
    Ok(())
}

/// Blue at 0, red at 1.
fn colour_for(t: f64) -> HSLColor {
    HSLColor(0.66 * (1.0 - t.clamp(0.0, 1.0)), 0.85, 0.5)
}

fn bounds(values: &[f64]) -> Result<(f64, f64)> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !(min.is_finite() && max.is_finite()) {
        bail!("cannot plot non-finite or empty data");
    }
    // a flat series still needs a non-empty axis
    if max > min {
        Ok((min, max))
    } else {
        let pad = if min == 0.0 { 1.0 } else { min.abs() * 0.1 };
        Ok((min - pad, max + pad))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use tempfile::tempdir;

    fn plane(y_coordinates: Vec<f64>) -> RegimeGrid {
        RegimeGrid::Plane {
            x: SweepVariable::Pressure,
            x_coordinates: vec![1.0e2, 1.0e3, 1.0e4],
            y: SweepVariable::Thickness,
            values: Array2::from_elem((y_coordinates.len(), 3), 2.0),
            y_coordinates,
        }
    }

    #[test]
    fn test_map_needs_positive_thickness_for_log_axis() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("map.png");
        let err = plot_regime_map(&path, &plane(vec![0.0, 5.0e-4, 1.0e-3])).unwrap_err();
        assert!(err.to_string().contains("log axes"));
        assert!(!path.exists());
    }

    #[test]
    fn test_map_rejects_non_plane_grid() {
        let dir = tempdir().unwrap();
        let point = RegimeGrid::Point { value: 1.0 };
        assert!(plot_regime_map(&dir.path().join("map.png"), &point).is_err());
    }
}
