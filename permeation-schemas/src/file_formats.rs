use crate::{
    experiment::{ExperimentConfig, RegimeStudyConfig},
    material::MaterialEntry,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct MaterialFile {
    pub schema_version: String,
    pub materials: Vec<MaterialEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ExperimentFile {
    pub schema_version: String,
    pub experiment: ExperimentConfig,
}

#[derive(Debug, Deserialize)]
pub struct RegimeStudyFile {
    pub schema_version: String,
    pub study: RegimeStudyConfig,
}
