use super::engine::TransportEngine;
use crate::error::PermeationError;
use permeation_schemas::{
    model::{DerivedQuantityKind, ExportRequest, ModelConfiguration},
    series::{DerivedQuantities, DerivedSeries},
};
use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};
use tracing::debug;

pub const MODEL_FILE: &str = "model.json";

struct PreparedRun {
    model_path: PathBuf,
    derived_path: PathBuf,
    quantities: Vec<DerivedQuantityKind>,
}

/// Drives an external solver program.
///
/// `initialise` writes the model as JSON into the working folder; `run` calls
/// `program args... <folder>/model.json` and reads back the derived-quantities
/// CSV the program wrote (time column first, then one column per requested
/// quantity in request order).
pub struct CommandEngine {
    program: PathBuf,
    args: Vec<String>,
    folder: PathBuf,
    prepared: Option<PreparedRun>,
}

impl CommandEngine {
    pub fn new(program: impl Into<PathBuf>, folder: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            folder: folder.into(),
            prepared: None,
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }
}

impl TransportEngine for CommandEngine {
    fn name(&self) -> &str {
        self.program.to_str().unwrap_or("external solver")
    }

    fn initialise(&mut self, model: &ModelConfiguration) -> Result<(), PermeationError> {
        fs::create_dir_all(&self.folder)
            .map_err(|e| PermeationError::FileIO(self.folder.display().to_string(), e))?;

        let derived_path = model
            .exports
            .iter()
            .find_map(|export| match export {
                ExportRequest::DerivedQuantities { filename, .. } => Some(filename.clone()),
                _ => None,
            })
            .ok_or_else(|| PermeationError::Solve("model requests no derived quantities".to_string()))?;

        let model_path = self.folder.join(MODEL_FILE);
        let file = fs::File::create(&model_path)
            .map_err(|e| PermeationError::FileIO(model_path.display().to_string(), e))?;
        serde_json::to_writer_pretty(file, model)?;
        debug!(path = %model_path.display(), "wrote model configuration");

        self.prepared = Some(PreparedRun {
            model_path,
            derived_path,
            quantities: model.derived_quantities(),
        });
        Ok(())
    }

    fn run(&mut self) -> Result<DerivedQuantities, PermeationError> {
        let prepared = self
            .prepared
            .as_ref()
            .ok_or_else(|| PermeationError::Solve("engine was not initialised".to_string()))?;

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(&prepared.model_path)
            .output()
            .map_err(|e| PermeationError::Solve(format!("failed to launch '{}': {}", self.program.display(), e)))?;

        if !output.status.success() {
            return Err(PermeationError::Solve(format!(
                "'{}' exited with {}: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        read_derived_quantities(&prepared.derived_path, &prepared.quantities)
    }
}

/// Reads a derived-quantities CSV with a header row.
pub fn read_derived_quantities(
    path: &Path,
    quantities: &[DerivedQuantityKind],
) -> Result<DerivedQuantities, PermeationError> {
    let path_str = path.display().to_string();
    let mut reader = csv::Reader::from_path(path).map_err(|e| PermeationError::CsvError(path_str.clone(), e))?;

    let mut times = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); quantities.len()];

    for (row, result) in reader.records().enumerate() {
        let record = result.map_err(|e| PermeationError::CsvError(path_str.clone(), e))?;
        if record.len() != quantities.len() + 1 {
            return Err(PermeationError::Solve(format!(
                "row {} of '{}' has {} columns, expected {}",
                row + 1,
                path_str,
                record.len(),
                quantities.len() + 1
            )));
        }
        let values = record
            .iter()
            .map(|field| field.trim().parse::<f64>())
            .collect::<Result<Vec<f64>, _>>()
            .map_err(|e| PermeationError::Solve(format!("row {} of '{}': {}", row + 1, path_str, e)))?;

        times.push(values[0]);
        for (column, value) in columns.iter_mut().zip(&values[1..]) {
            column.push(*value);
        }
    }

    Ok(DerivedQuantities {
        times,
        series: quantities
            .iter()
            .cloned()
            .zip(columns)
            .map(|(quantity, values)| DerivedSeries { quantity, values })
            .collect(),
    })
}
