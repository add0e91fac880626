use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    Diffusivity,
    Solubility,
    Permeability,
    Dissociation,
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropertyKind::Diffusivity => "diffusivity",
            PropertyKind::Solubility => "solubility",
            PropertyKind::Permeability => "permeability",
            PropertyKind::Dissociation => "dissociation",
        };
        f.write_str(name)
    }
}

/// An Arrhenius pair: `value(T) = pre_exponential_factor * exp(-activation_energy / (k_B * T))`.
///
/// Units of the pre-exponential factor depend on the property kind
/// (m^2/s for diffusivity, mol/m^3/Pa^0.5 for solubility). The activation
/// energy is in eV.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialProperty {
    pub pre_exponential_factor: f64,
    pub activation_energy: f64,
}
