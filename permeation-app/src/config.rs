use anyhow::{bail, Context, Result};
use permeation_core::properties::PropertyTable;
use permeation_schemas::{
    experiment::{ExperimentConfig, RegimeStudyConfig},
    file_formats::{ExperimentFile, MaterialFile, RegimeStudyFile},
};
use serde::de::DeserializeOwned;
use std::{fs, path::Path};
use tracing::{debug, info};

pub const SUPPORTED_SCHEMA_VERSION: &str = "1.0";

/// Loads every material file in `dir` into one property table.
///
/// Files are merged in file-name order, so a later file overrides an earlier
/// one for the same material and property.
pub fn load_property_table(dir: &Path) -> Result<PropertyTable> {
    info!(path = %dir.display(), "loading property database");

    let mut table = PropertyTable::new();
    let entries = load_yaml_files(dir, |file: MaterialFile| {
        check_schema_version(&file.schema_version)?;
        Ok(file.materials)
    })?;
    table.extend_from_entries(entries);

    if table.is_empty() {
        bail!("no material properties found in {:?}", dir);
    }
    info!(materials = table.materials().len(), records = table.len(), "property database loaded");
    Ok(table)
}

pub fn load_experiment(path: &Path) -> Result<ExperimentConfig> {
    let file: ExperimentFile = read_yaml(path)?;
    check_schema_version(&file.schema_version).with_context(|| format!("In {:?}", path))?;
    Ok(file.experiment)
}

pub fn load_regime_study(path: &Path) -> Result<RegimeStudyConfig> {
    let file: RegimeStudyFile = read_yaml(path)?;
    check_schema_version(&file.schema_version).with_context(|| format!("In {:?}", path))?;
    Ok(file.study)
}

fn check_schema_version(version: &str) -> Result<()> {
    if version != SUPPORTED_SCHEMA_VERSION {
        bail!(
            "unsupported schema_version '{}' (expected '{}')",
            version,
            SUPPORTED_SCHEMA_VERSION
        );
    }
    Ok(())
}

fn read_yaml<F: DeserializeOwned>(path: &Path) -> Result<F> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    serde_yaml::from_str(&content).with_context(|| format!("Failed to parse YAML from {:?}", path))
}

/// Generic helper to load all YAML files in a directory and flatten their items.
fn load_yaml_files<P, F, E, T>(dir_path: P, extract_vec: E) -> Result<Vec<T>>
where
    P: AsRef<Path>,
    F: DeserializeOwned, // The file wrapper struct (e.g., MaterialFile)
    E: Fn(F) -> Result<Vec<T>>,
{
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir_path.as_ref())
        .with_context(|| format!("Failed to read directory: {:?}", dir_path.as_ref()))?
    {
        let path = entry?.path();
        if path.is_file() && path.extension().map_or(false, |s| s == "yaml" || s == "yml") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut items = Vec::new();
    for path in paths {
        debug!(path = %path.display(), "reading property file");
        let file_wrapper: F = read_yaml(&path)?;
        items.extend(extract_vec(file_wrapper).with_context(|| format!("In {:?}", path))?);
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use permeation_core::properties::PropertyResolver;
    use permeation_schemas::{experiment::Spacing, property::PropertyKind};
    use tempfile::tempdir;

    const STEEL: &str = r#"
schema_version: "1.0"
materials:
  - material_name: "316L"
    properties:
      - kind: diffusivity
        pre_exponential_factor: 2.0e-7
        activation_energy: 0.5
      - kind: solubility
        pre_exponential_factor: 2.95e23
        activation_energy: 0.06
"#;

    const STEEL_OVERRIDE: &str = r#"
schema_version: "1.0"
materials:
  - material_name: "316L"
    notes: "later measurement"
    properties:
      - kind: diffusivity
        pre_exponential_factor: 3.0e-7
        activation_energy: 0.52
        source: "test"
"#;

    #[test]
    fn test_directory_is_merged_in_name_order() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a_steel.yaml"), STEEL).unwrap();
        fs::write(dir.path().join("b_steel.yml"), STEEL_OVERRIDE).unwrap();
        fs::write(dir.path().join("README.txt"), "not a material file").unwrap();

        let table = load_property_table(dir.path()).unwrap();
        assert_eq!(table.len(), 2);
        let d = table.lookup("316L", PropertyKind::Diffusivity).unwrap();
        assert_eq!(d.pre_exponential_factor, 3.0e-7);
    }

    #[test]
    fn test_unknown_schema_version_is_rejected() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("steel.yaml"), STEEL.replace("\"1.0\"", "\"0.3\"")).unwrap();

        let err = load_property_table(dir.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("schema_version"));
    }

    #[test]
    fn test_regime_study_defaults_fill_in() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("study.yaml");
        fs::write(&path, "schema_version: \"1.0\"\nstudy:\n  material: \"316L\"\n").unwrap();

        let study = load_regime_study(&path).unwrap();
        assert_eq!(study.material, "316L");
        assert_eq!(study.pressure_range.points, 100);
        assert!(study.dissociation.is_none());
    }

    #[test]
    fn test_sample_study_sweeps_thickness_geometrically() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../data/regime_study.yaml");
        let study = load_regime_study(&path).unwrap();
        let defaults = load_regime_study_defaults();
        assert_eq!(study.thickness_range.spacing, Spacing::Geometric);
        assert_eq!(study.thickness_range, defaults.thickness_range);
        assert_eq!(study.pressure_range, defaults.pressure_range);
    }

    fn load_regime_study_defaults() -> RegimeStudyConfig {
        serde_yaml::from_str("material: \"316L\"").unwrap()
    }
}
