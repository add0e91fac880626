use crate::model::DerivedQuantityKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluxTimeSeries {
    pub times: Vec<f64>,
    pub flux: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressureTimeSeries {
    pub times: Vec<f64>,
    pub pressure: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedSeries {
    pub quantity: DerivedQuantityKind,
    pub values: Vec<f64>,
}

/// Time-indexed scalar output of a transient solve.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DerivedQuantities {
    pub times: Vec<f64>,
    pub series: Vec<DerivedSeries>,
}
