use std::collections::HashMap;

use super::metrics::GeomMetrics;
use super::{Point3, Triangle3};

/// Squared cross-product length below which a triangle counts as degenerate.
const DEGENERATE_AREA2_EPS: f64 = 1e-24;

/// Indexed triangle mesh handed to renderers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeomMesh {
    pub positions: Vec<[f64; 3]>,
    pub indices: Vec<u32>,
    pub uvs: Option<Vec<[f64; 2]>>,
    pub normals: Option<Vec<[f64; 3]>>,
}

impl GeomMesh {
    /// Create a new mesh with positions and indices only.
    #[must_use]
    pub fn new(positions: Vec<[f64; 3]>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            indices,
            uvs: None,
            normals: None,
        }
    }

    #[must_use]
    pub fn with_attributes(
        positions: Vec<[f64; 3]>,
        indices: Vec<u32>,
        uvs: Option<Vec<[f64; 2]>>,
        normals: Option<Vec<[f64; 3]>>,
    ) -> Self {
        Self {
            positions,
            indices,
            uvs,
            normals,
        }
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if any vertex position contains NaN or Inf values.
    #[must_use]
    pub fn has_invalid_vertices(&self) -> bool {
        self.positions
            .iter()
            .any(|p| !p[0].is_finite() || !p[1].is_finite() || !p[2].is_finite())
    }

    /// Returns true if all vertex indices are within bounds.
    #[must_use]
    pub fn has_valid_indices(&self) -> bool {
        let n = self.positions.len();
        self.indices.iter().all(|&i| (i as usize) < n)
    }

    #[must_use]
    pub fn has_triangle_indices(&self) -> bool {
        self.indices.len() % 3 == 0
    }

    /// Returns true if all optional vertex attribute buffers match `positions.len()`.
    #[must_use]
    pub fn has_valid_attribute_lengths(&self) -> bool {
        let n = self.positions.len();
        self.uvs.as_ref().is_none_or(|uvs| uvs.len() == n)
            && self.normals.as_ref().is_none_or(|normals| normals.len() == n)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.has_triangle_indices() {
            return Err("mesh indices are not a triangle list (len % 3 != 0)".to_string());
        }
        if self.has_invalid_vertices() {
            return Err("mesh has invalid vertex coordinates (NaN/Inf)".to_string());
        }
        if !self.has_valid_indices() {
            return Err("mesh has out-of-bounds vertex indices".to_string());
        }
        if !self.has_valid_attribute_lengths() {
            return Err("mesh attribute buffers do not match vertex count".to_string());
        }
        Ok(())
    }

    /// Expands the indexed faces into standalone triangles, in index order.
    ///
    /// Faces referencing missing vertices are skipped; call
    /// [`validate`](Self::validate) first when that matters.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle3> + '_ {
        self.indices.chunks_exact(3).filter_map(|tri| {
            let a = self.positions.get(tri[0] as usize)?;
            let b = self.positions.get(tri[1] as usize)?;
            let c = self.positions.get(tri[2] as usize)?;
            Some(Triangle3::new(
                Point3::from_array(*a),
                Point3::from_array(*b),
                Point3::from_array(*c),
            ))
        })
    }

    /// Returns the position buffer as a flat slice: `[x0, y0, z0, x1, y1, z1, ...]`.
    #[must_use]
    pub fn positions_flat(&self) -> &[f64] {
        self.positions.as_flattened()
    }

    #[must_use]
    pub fn uvs_flat(&self) -> Option<&[f64]> {
        self.uvs.as_deref().map(<[[f64; 2]]>::as_flattened)
    }

    #[must_use]
    pub fn normals_flat(&self) -> Option<&[f64]> {
        self.normals.as_deref().map(<[[f64; 3]]>::as_flattened)
    }
}

/// Per-call state shared by the meshing entry points.
#[derive(Debug, Default)]
pub struct GeomContext {
    pub metrics: GeomMetrics,
}

impl GeomContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Counts `(open, non_manifold)` edges by vertex index.
pub(crate) fn count_edge_topology(indices: &[u32]) -> (usize, usize) {
    let mut edge_counts: HashMap<(u32, u32), u32> = HashMap::new();

    for tri in indices.chunks_exact(3) {
        let i0 = tri[0];
        let i1 = tri[1];
        let i2 = tri[2];

        if i0 == i1 || i1 == i2 || i0 == i2 {
            continue;
        }

        for (ea, eb) in [(i0, i1), (i1, i2), (i2, i0)] {
            let (lo, hi) = if ea <= eb { (ea, eb) } else { (eb, ea) };
            *edge_counts.entry((lo, hi)).or_insert(0) += 1;
        }
    }

    let mut open_edge_count = 0usize;
    let mut non_manifold_edge_count = 0usize;
    for count in edge_counts.into_values() {
        if count == 1 {
            open_edge_count += 1;
        } else if count > 2 {
            non_manifold_edge_count += 1;
        }
    }

    (open_edge_count, non_manifold_edge_count)
}

pub(crate) fn count_degenerate_triangles(points: &[Point3], indices: &[u32]) -> usize {
    indices
        .chunks_exact(3)
        .filter(|tri| {
            let (Some(a), Some(b), Some(c)) = (
                points.get(tri[0] as usize),
                points.get(tri[1] as usize),
                points.get(tri[2] as usize),
            ) else {
                return true;
            };
            let area2 = Triangle3::new(*a, *b, *c).normal().length_squared();
            !area2.is_finite() || area2 <= DEGENERATE_AREA2_EPS
        })
        .count()
}

/// Area-weighted vertex normals. Vertices without a usable face fall back to +Z.
pub(crate) fn compute_smooth_normals(points: &[Point3], indices: &[u32]) -> Vec<[f64; 3]> {
    let mut sums = vec![super::Vec3::ZERO; points.len()];

    for tri in indices.chunks_exact(3) {
        let i0 = tri[0] as usize;
        let i1 = tri[1] as usize;
        let i2 = tri[2] as usize;

        let (Some(a), Some(b), Some(c)) = (points.get(i0), points.get(i1), points.get(i2)) else {
            continue;
        };

        let n = Triangle3::new(*a, *b, *c).normal();
        sums[i0] = sums[i0] + n;
        sums[i1] = sums[i1] + n;
        sums[i2] = sums[i2] + n;
    }

    sums.into_iter()
        .map(|n| n.normalized().map_or([0.0, 0.0, 1.0], super::Vec3::to_array))
        .collect()
}
