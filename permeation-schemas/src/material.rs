use crate::property::{MaterialProperty, PropertyKind};
use serde::{Deserialize, Serialize};

pub const BARRIER_ID: u32 = 1;
pub const SUBSTRATE_ID: u32 = 2;

/// A homogeneous region of the model with its transport properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRegion {
    pub id: u32,
    pub diffusivity: MaterialProperty,
    pub solubility: MaterialProperty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub kind: PropertyKind,
    pub pre_exponential_factor: f64,
    pub activation_energy: f64,
    pub source: Option<String>,
}

impl PropertyRecord {
    pub fn property(&self) -> MaterialProperty {
        MaterialProperty {
            pre_exponential_factor: self.pre_exponential_factor,
            activation_energy: self.activation_energy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialEntry {
    pub material_name: String,
    pub notes: Option<String>,
    pub properties: Vec<PropertyRecord>,
}
