use crate::error::PermeationError;
use permeation_schemas::{
    material::MaterialEntry,
    property::{MaterialProperty, PropertyKind},
};
use std::collections::HashMap;

/// Looks up Arrhenius correlations by material name and property kind.
pub trait PropertyResolver {
    fn lookup(&self, material: &str, kind: PropertyKind) -> Result<MaterialProperty, PermeationError>;
}

/// In-memory property database.
#[derive(Debug, Default, Clone)]
pub struct PropertyTable {
    entries: HashMap<(String, PropertyKind), MaterialProperty>,
}

impl PropertyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, material: &str, kind: PropertyKind, property: MaterialProperty) {
        self.entries.insert((material.to_string(), kind), property);
    }

    /// Adds every record of each entry. A later entry for the same material and
    /// kind replaces an earlier one.
    pub fn extend_from_entries(&mut self, entries: impl IntoIterator<Item = MaterialEntry>) {
        for entry in entries {
            for record in &entry.properties {
                self.insert(&entry.material_name, record.kind, record.property());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn materials(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(|(name, _)| name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

impl PropertyResolver for PropertyTable {
    fn lookup(&self, material: &str, kind: PropertyKind) -> Result<MaterialProperty, PermeationError> {
        self.entries
            .get(&(material.to_string(), kind))
            .copied()
            .ok_or_else(|| PermeationError::PropertyNotFound {
                material: material.to_string(),
                kind,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use permeation_schemas::material::PropertyRecord;

    fn steel_entry() -> MaterialEntry {
        MaterialEntry {
            material_name: "316L".to_string(),
            notes: None,
            properties: vec![
                PropertyRecord {
                    kind: PropertyKind::Diffusivity,
                    pre_exponential_factor: 2.0e-7,
                    activation_energy: 0.5,
                    source: Some("Reiter 1996".to_string()),
                },
                PropertyRecord {
                    kind: PropertyKind::Solubility,
                    pre_exponential_factor: 0.49,
                    activation_energy: 0.06,
                    source: None,
                },
            ],
        }
    }

    #[test]
    fn test_lookup_returns_inserted_records() {
        let mut table = PropertyTable::new();
        table.extend_from_entries(vec![steel_entry()]);

        let d = table.lookup("316L", PropertyKind::Diffusivity).unwrap();
        assert_eq!(d.pre_exponential_factor, 2.0e-7);
        assert_eq!(table.len(), 2);
        assert_eq!(table.materials(), vec!["316L"]);
    }

    #[test]
    fn test_missing_pair_is_not_found() {
        let mut table = PropertyTable::new();
        table.extend_from_entries(vec![steel_entry()]);

        let err = table.lookup("316L", PropertyKind::Dissociation).unwrap_err();
        assert!(matches!(
            err,
            PermeationError::PropertyNotFound { ref material, kind: PropertyKind::Dissociation } if material == "316L"
        ));
        assert!(table.lookup("tungsten", PropertyKind::Diffusivity).is_err());
    }
}
