use crate::property::MaterialProperty;
use serde::{Deserialize, Serialize};

/// Upstream, high-pressure face at x = 0.
pub const INLET_SURFACE: u32 = 1;
/// Downstream face at x = barrier + substrate.
pub const OUTLET_SURFACE: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoundaryCondition {
    Sieverts {
        surface: u32,
        solubility: MaterialProperty,
        pressure: f64,
    },
    FixedValue {
        surface: u32,
        field: String,
        value: f64,
    },
}

impl BoundaryCondition {
    pub fn surface(&self) -> u32 {
        match self {
            BoundaryCondition::Sieverts { surface, .. } => *surface,
            BoundaryCondition::FixedValue { surface, .. } => *surface,
        }
    }
}
