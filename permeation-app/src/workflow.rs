use crate::plotting;
use anyhow::{Context, Result};
use chrono::Utc;
use permeation_core::{
    analysis::pressure_series,
    logger::{export_regime_grid, TimeSeriesLogger},
    model::{
        boundary::build_boundary_conditions,
        builder::ModelBuilder,
        materials::{assemble_materials, LayerProperties},
        mesh::MeshBuilder,
    },
    properties::{PropertyResolver, PropertyTable},
    regime::{run_regime_study, RegimeEvaluator, RegimeGrid, RegimeStudy},
    solver::{standard_exports, CommandEngine, SolverInvoker},
};
use permeation_schemas::{
    experiment::{ExperimentConfig, LayerSpec, RegimeStudyConfig},
    model::Temperature,
    property::{MaterialProperty, PropertyKind},
    series::{FluxTimeSeries, PressureTimeSeries},
};
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

pub const LOG_FILE: &str = "permeation_log.csv";
pub const SUMMARY_FILE: &str = "run_summary.json";

/// Machine-readable record of a completed experiment run.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub experiment: String,
    pub started_at: String,
    pub barrier: String,
    pub substrate: String,
    pub temperature_k: f64,
    pub upstream_pressure_pa: f64,
    pub mesh_vertices: usize,
    pub samples: usize,
    pub final_time_s: f64,
    pub final_flux: f64,
    pub final_pressure_pa: f64,
}

/// Creates `<root>/<name>_<timestamp>` for the outputs of one run.
pub fn create_run_folder(root: &Path, name: &str) -> Result<PathBuf> {
    let folder = root.join(format!("{}_{}", name, Utc::now().format("%Y%m%d_%H%M%S")));
    fs::create_dir_all(&folder).with_context(|| format!("Failed to create output directory: {:?}", folder))?;
    Ok(folder)
}

/// Copies the input file next to the outputs for traceability.
pub fn archive_input(input: &Path, run_folder: &Path) -> Result<()> {
    let name = input.file_name().context("input path has no file name")?;
    fs::copy(input, run_folder.join(name)).with_context(|| format!("Failed to copy {:?}", input))?;
    Ok(())
}

fn resolve_property(
    table: &PropertyTable,
    material: &str,
    kind: PropertyKind,
    inline: Option<MaterialProperty>,
) -> Result<MaterialProperty> {
    match inline {
        Some(property) => Ok(property),
        None => table
            .lookup(material, kind)
            .with_context(|| format!("Resolving {} of '{}'", kind, material)),
    }
}

/// Inline values in the layer spec take precedence over the property database.
fn layer_properties(layer: &LayerSpec, table: &PropertyTable) -> Result<LayerProperties> {
    Ok(LayerProperties::new(
        resolve_property(table, &layer.material, PropertyKind::Diffusivity, layer.diffusivity)?,
        resolve_property(table, &layer.material, PropertyKind::Solubility, layer.solubility)?,
    ))
}

/// Runs one permeation experiment end to end, writing every output into
/// `run_folder`.
pub fn run_permeation_experiment(
    experiment: &ExperimentConfig,
    table: &PropertyTable,
    run_folder: &Path,
) -> Result<RunSummary> {
    info!(experiment = %experiment.name, "--- [Workflow] Starting permeation experiment ---");
    let started_at = Utc::now().to_rfc3339();

    let barrier = layer_properties(&experiment.barrier, table)?;
    let substrate = layer_properties(&experiment.substrate, table)?;
    let materials = assemble_materials(&barrier, &substrate)?;

    let mesh = MeshBuilder::new()
        .with_points_per_layer(experiment.points_per_layer)
        .build(experiment.barrier.thickness, experiment.substrate.thickness)?;
    info!(vertices = mesh.len(), thickness = mesh.total_thickness(), "mesh built");

    let boundary_conditions = build_boundary_conditions(experiment.upstream_pressure, barrier.solubility.as_ref())?;

    let model = ModelBuilder::new()
        .with_materials(materials)
        .with_mesh(mesh)
        .with_boundary_conditions(boundary_conditions)
        .with_temperature(Temperature::uniform(experiment.temperature))
        .with_settings(experiment.settings.clone())
        .with_exports(standard_exports(run_folder))
        .build()?;

    let engine = CommandEngine::new(&experiment.solver.program, run_folder).with_args(experiment.solver.args.clone());
    let flux = SolverInvoker::new(engine).outlet_flux(&model)?;

    let containment_temperature = experiment.containment_temperature.unwrap_or(experiment.temperature);
    let pressure = pressure_series(&flux, &experiment.containment, containment_temperature)?;

    let log_path = run_folder.join(LOG_FILE);
    let mut logger = TimeSeriesLogger::new(&log_path)?;
    logger.log_series(&flux, &pressure)?;
    info!(path = %log_path.display(), samples = flux.times.len(), "time series written");

    if let Err(e) = plotting::plot_pressure_history(&run_folder.join("pressure_history.png"), &pressure) {
        warn!(error = %e, "could not draw the pressure chart");
    }

    let summary = summarise(experiment, started_at, model.mesh.len(), &flux, &pressure);
    let summary_path = run_folder.join(SUMMARY_FILE);
    let file = fs::File::create(&summary_path).with_context(|| format!("Failed to create {:?}", summary_path))?;
    serde_json::to_writer_pretty(file, &summary)?;

    print_summary_report(&summary);
    Ok(summary)
}

fn summarise(
    experiment: &ExperimentConfig,
    started_at: String,
    mesh_vertices: usize,
    flux: &FluxTimeSeries,
    pressure: &PressureTimeSeries,
) -> RunSummary {
    RunSummary {
        experiment: experiment.name.clone(),
        started_at,
        barrier: experiment.barrier.material.clone(),
        substrate: experiment.substrate.material.clone(),
        temperature_k: experiment.temperature,
        upstream_pressure_pa: experiment.upstream_pressure,
        mesh_vertices,
        samples: flux.times.len(),
        final_time_s: flux.times.last().copied().unwrap_or(0.0),
        final_flux: flux.flux.last().copied().unwrap_or(0.0),
        final_pressure_pa: pressure.pressure.last().copied().unwrap_or(0.0),
    }
}

fn print_summary_report(summary: &RunSummary) {
    println!("\n--- [Final Summary Report] ---");
    println!("========================================");
    println!("Experiment: {}", summary.experiment);
    println!("  - Barrier / substrate:  {} / {}", summary.barrier, summary.substrate);
    println!("  - Temperature:          {:.2} K", summary.temperature_k);
    println!("  - Upstream pressure:    {:.3e} Pa", summary.upstream_pressure_pa);
    println!("  - Mesh vertices:        {}", summary.mesh_vertices);
    println!("----------------------------------------");
    println!("  - Samples:              {}", summary.samples);
    println!("  - Final time:           {:.1} s", summary.final_time_s);
    println!("  - Final outlet flux:    {:.4e} H/m^2/s", summary.final_flux);
    println!("  - Downstream pressure:  {:.4e} Pa", summary.final_pressure_pa);
    println!("========================================");
}

/// Evaluator for the study material. Inline correlations take precedence over
/// the property database.
pub fn study_evaluator(config: &RegimeStudyConfig, table: &PropertyTable) -> Result<RegimeEvaluator> {
    Ok(RegimeEvaluator::new(
        resolve_property(table, &config.material, PropertyKind::Dissociation, config.dissociation)?,
        resolve_property(table, &config.material, PropertyKind::Diffusivity, config.diffusivity)?,
        resolve_property(table, &config.material, PropertyKind::Solubility, config.solubility)?,
    ))
}

/// Runs the regime study, exporting each sweep as CSV and as a chart.
pub fn run_regime_workflow(config: &RegimeStudyConfig, table: &PropertyTable, run_folder: &Path) -> Result<RegimeStudy> {
    info!(material = %config.material, "--- [Workflow] Starting regime study ---");

    let evaluator = study_evaluator(config, table)?;
    let study = run_regime_study(&evaluator, config)?;

    let outputs: [(&str, &RegimeGrid); 4] = [
        ("w_vs_pressure", &study.versus_pressure),
        ("w_vs_thickness", &study.versus_thickness),
        ("w_vs_temperature", &study.versus_temperature),
        ("w_pressure_thickness_map", &study.pressure_thickness_map),
    ];
    for (stem, grid) in outputs {
        export_regime_grid(&run_folder.join(format!("{}.csv", stem)), grid)?;

        // NaN or infinite W would break the log scales
        if let Err(e) = grid.ensure_finite() {
            warn!(output = stem, error = %e, "skipping chart");
            continue;
        }
        let chart = run_folder.join(format!("{}.png", stem));
        let drawn = match grid {
            RegimeGrid::Plane { .. } => plotting::plot_regime_map(&chart, grid),
            _ => plotting::plot_regime_line(&chart, grid),
        };
        if let Err(e) = drawn {
            warn!(output = stem, error = %e, "could not draw chart");
        }
    }

    let at_defaults = evaluator.with_defaults(study.defaults);
    let defaults = at_defaults.defaults();
    let w = at_defaults.evaluate(defaults.pressure, defaults.thickness, defaults.temperature);
    print_regime_report(config, &study, w);
    Ok(study)
}

fn regime_label(w: f64) -> &'static str {
    if w > 10.0 {
        "diffusion limited"
    } else if w < 0.1 {
        "surface limited"
    } else {
        "mixed"
    }
}

fn print_regime_report(config: &RegimeStudyConfig, study: &RegimeStudy, w_default: f64) {
    println!("\n--- [Regime Study Report] ---");
    println!("========================================");
    println!("Material: {}", config.material);
    println!(
        "  - Defaults: P = {:.3e} Pa, e = {:.3e} m, T = {:.2} K",
        study.defaults.pressure, study.defaults.thickness, study.defaults.temperature
    );
    println!("  - W at defaults: {:.4e} ({})", w_default, regime_label(w_default));
    match study.pressure_thickness_map.value_range() {
        Some((lo, hi)) => println!("  - W over the P x e map: {:.4e} to {:.4e}", lo, hi),
        None => println!("  - W over the P x e map: contains NaN"),
    }
    println!("========================================");
}
