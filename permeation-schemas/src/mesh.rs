use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshRegion {
    pub material_id: u32,
    pub start: f64,
    pub end: f64,
}

/// 1D vertex list. The layer interface appears twice so the engine can carry a
/// discontinuous property across it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<f64>,
    pub regions: Vec<MeshRegion>,
}

impl Mesh {
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn total_thickness(&self) -> f64 {
        self.vertices.last().copied().unwrap_or(0.0) - self.vertices.first().copied().unwrap_or(0.0)
    }
}
