use crate::{
    error::{PermeationError, Stage},
    properties::PropertyResolver,
};
use permeation_schemas::{
    material::{MaterialRegion, BARRIER_ID, SUBSTRATE_ID},
    property::{MaterialProperty, PropertyKind},
};

/// Diffusivity and solubility of one layer, as resolved for assembly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerProperties {
    pub diffusivity: Option<MaterialProperty>,
    pub solubility: Option<MaterialProperty>,
}

impl LayerProperties {
    pub fn new(diffusivity: MaterialProperty, solubility: MaterialProperty) -> Self {
        Self { diffusivity: Some(diffusivity), solubility: Some(solubility) }
    }

    /// Looks both properties up; a missing pair propagates as `PropertyNotFound`.
    pub fn resolve<R: PropertyResolver + ?Sized>(resolver: &R, material: &str) -> Result<Self, PermeationError> {
        Ok(Self {
            diffusivity: Some(resolver.lookup(material, PropertyKind::Diffusivity)?),
            solubility: Some(resolver.lookup(material, PropertyKind::Solubility)?),
        })
    }
}

fn region(id: u32, label: &str, layer: &LayerProperties) -> Result<MaterialRegion, PermeationError> {
    let diffusivity = layer
        .diffusivity
        .ok_or_else(|| PermeationError::config(Stage::Assembly, format!("{} layer has no diffusivity", label)))?;
    let solubility = layer
        .solubility
        .ok_or_else(|| PermeationError::config(Stage::Assembly, format!("{} layer has no solubility", label)))?;
    Ok(MaterialRegion { id, diffusivity, solubility })
}

/// Builds the barrier (id 1, upstream side) and substrate (id 2) regions.
pub fn assemble_materials(
    barrier: &LayerProperties,
    substrate: &LayerProperties,
) -> Result<Vec<MaterialRegion>, PermeationError> {
    Ok(vec![
        region(BARRIER_ID, "barrier", barrier)?,
        region(SUBSTRATE_ID, "substrate", substrate)?,
    ])
}
