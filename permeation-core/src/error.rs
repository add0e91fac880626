use permeation_schemas::property::PropertyKind;
use std::fmt;
use thiserror::Error;

/// Pipeline stage a failure originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Assembly,
    Meshing,
    BoundaryConditions,
    Model,
    Solve,
    PostProcess,
    Sweep,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Assembly => "material assembly",
            Stage::Meshing => "meshing",
            Stage::BoundaryConditions => "boundary conditions",
            Stage::Model => "model assembly",
            Stage::Solve => "solve",
            Stage::PostProcess => "post-processing",
            Stage::Sweep => "regime sweep",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum PermeationError {
    #[error("Property '{kind}' for material '{material}' not found")]
    PropertyNotFound { material: String, kind: PropertyKind },

    #[error("Configuration error during {stage}: {message}")]
    Configuration { stage: Stage, message: String },

    #[error("Solver failed: {0}")]
    Solve(String),

    #[error("Numeric error during {stage}: {message}")]
    Numeric { stage: Stage, message: String },

    #[error("I/O error for file '{0}': {1}")]
    FileIO(String, #[source] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Failed to process CSV file '{0}': {1}")]
    CsvError(String, #[source] csv::Error),
}

impl PermeationError {
    pub fn config(stage: Stage, message: impl Into<String>) -> Self {
        PermeationError::Configuration { stage, message: message.into() }
    }

    pub fn numeric(stage: Stage, message: impl Into<String>) -> Self {
        PermeationError::Numeric { stage, message: message.into() }
    }
}
