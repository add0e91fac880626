use crate::{
    error::{PermeationError, Stage},
    grid::linspace,
};
use permeation_schemas::{
    experiment::DEFAULT_POINTS_PER_LAYER,
    material::{BARRIER_ID, SUBSTRATE_ID},
    mesh::{Mesh, MeshRegion},
};

/// Two-layer 1D mesh with an independent vertex budget per layer.
#[derive(Debug, Clone, Copy)]
pub struct MeshBuilder {
    points_per_layer: usize,
}

impl Default for MeshBuilder {
    fn default() -> Self {
        Self { points_per_layer: DEFAULT_POINTS_PER_LAYER }
    }
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_points_per_layer(mut self, points: usize) -> Self {
        self.points_per_layer = points;
        self
    }

    /// Concatenates `n` points over `[0, barrier]` and `n` over
    /// `[barrier, barrier + substrate]`. The interface vertex is kept twice.
    pub fn build(&self, barrier: f64, substrate: f64) -> Result<Mesh, PermeationError> {
        for (label, thickness) in [("barrier", barrier), ("substrate", substrate)] {
            if !(thickness.is_finite() && thickness > 0.0) {
                return Err(PermeationError::config(
                    Stage::Meshing,
                    format!("{} thickness must be positive, got {}", label, thickness),
                ));
            }
        }
        if self.points_per_layer < 2 {
            return Err(PermeationError::config(
                Stage::Meshing,
                format!("at least 2 points per layer are required, got {}", self.points_per_layer),
            ));
        }

        let total = barrier + substrate;
        let mut vertices = linspace(0.0, barrier, self.points_per_layer);
        vertices.extend(linspace(barrier, total, self.points_per_layer));

        Ok(Mesh {
            vertices,
            regions: vec![
                MeshRegion { material_id: BARRIER_ID, start: 0.0, end: barrier },
                MeshRegion { material_id: SUBSTRATE_ID, start: barrier, end: total },
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_layout_and_seam() {
        let thickness_pairs = [(1.0e-6, 974.0e-6), (3.3e-7, 1.0e-3), (5.0e-5, 5.0e-5), (0.1, 2.7)];
        for (b, s) in thickness_pairs {
            for n in [2, 7, 100] {
                let mesh = MeshBuilder::new().with_points_per_layer(n).build(b, s).unwrap();
                let v = &mesh.vertices;
                assert_eq!(v.len(), 2 * n);
                assert_eq!(v[0], 0.0);
                assert_eq!(v[2 * n - 1], b + s);
                assert_eq!(v[n - 1], b);
                assert_eq!(v[n], b);
                assert!(v.windows(2).all(|w| w[0] <= w[1]), "mesh must be non-decreasing");
                assert!(v[..n].windows(2).all(|w| w[0] < w[1]));
                assert!(v[n..].windows(2).all(|w| w[0] < w[1]));
            }
        }
    }

    #[test]
    fn test_default_budget_is_one_hundred_per_layer() {
        let mesh = MeshBuilder::default().build(1.0e-6, 1.0e-3).unwrap();
        assert_eq!(mesh.len(), 200);
        assert_eq!(mesh.regions[0].material_id, BARRIER_ID);
        assert_eq!(mesh.regions[1].start, 1.0e-6);
    }

    #[test]
    fn test_rejects_non_positive_thickness() {
        for (b, s) in [(0.0, 1.0e-3), (1.0e-6, -1.0), (f64::NAN, 1.0)] {
            let err = MeshBuilder::new().build(b, s).unwrap_err();
            assert!(matches!(err, PermeationError::Configuration { stage: Stage::Meshing, .. }));
        }
        assert!(MeshBuilder::new().with_points_per_layer(1).build(1.0, 1.0).is_err());
    }
}
