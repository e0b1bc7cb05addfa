//! Mesh diagnostics for generated Calabi–Yau meshes.
//!
//! Diagnostics are computed once the vertex grids and triangle indices exist.
//! They never change the mesh: patches are not welded and faces are never
//! re-oriented, so every count here describes exactly what a consumer
//! receives.
//!
//! ```ignore
//! use calabi_engine::geom::{CalabiYauOptions, calabi_yau_mesh};
//!
//! let (mesh, diagnostics) = calabi_yau_mesh(&CalabiYauOptions::default())?;
//! println!("{}", diagnostics.summary());
//! ```

use std::fmt;

/// Topology and quality summary of a generated mesh.
///
/// # Topology
///
/// - `open_edge_count`: edges with a single adjacent triangle. Each patch is a
///   disc, so an unwelded mesh of `p` patches on a `count`-wide grid has
///   `p * 4 * (count - 1)` of them.
/// - `non_manifold_edge_count`: edges shared by more than two triangles.
///
/// # Quality
///
/// - `degenerate_triangle_count`: triangles with (near) zero area. They are
///   kept in the mesh; coinciding radial bounds make every triangle degenerate.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GeomMeshDiagnostics {
    /// Total number of vertices in the mesh.
    pub vertex_count: usize,

    /// Total number of triangles in the mesh.
    pub triangle_count: usize,

    /// Number of `(k0, k1)` patches the mesh was built from.
    pub patch_count: usize,

    /// Number of zero-area triangles.
    pub degenerate_triangle_count: usize,

    /// Number of open (boundary) edges.
    pub open_edge_count: usize,

    /// Number of edges with more than two adjacent triangles.
    pub non_manifold_edge_count: usize,

    /// Optional timing breakdown.
    ///
    /// Only populated when the `mesh_engine_metrics` feature is enabled
    /// and the target is not WASM.
    pub timing: Option<super::metrics::GeomTimingReport>,

    /// Human-readable notes about unusual input or output.
    pub warnings: Vec<String>,
}

impl GeomMeshDiagnostics {
    /// Returns `true` if the mesh has no open edges.
    #[must_use]
    pub fn is_watertight(&self) -> bool {
        self.open_edge_count == 0
    }

    #[must_use]
    pub fn is_manifold(&self) -> bool {
        self.non_manifold_edge_count == 0
    }

    /// Returns `true` if no degenerate faces, non-manifold edges or warnings
    /// were recorded. Open edges are expected between patches and do not
    /// count against this.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.non_manifold_edge_count == 0
            && self.degenerate_triangle_count == 0
            && self.warnings.is_empty()
    }

    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Returns a short summary string suitable for logging.
    ///
    /// Format: `"V:{vertices} T:{triangles} P:{patches} [issues...]"`
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![format!(
            "V:{} T:{} P:{}",
            self.vertex_count, self.triangle_count, self.patch_count
        )];

        if self.degenerate_triangle_count > 0 {
            parts.push(format!("degenerate:{}", self.degenerate_triangle_count));
        }
        if self.open_edge_count > 0 {
            parts.push(format!("open:{}", self.open_edge_count));
        }
        if self.non_manifold_edge_count > 0 {
            parts.push(format!("non-manifold:{}", self.non_manifold_edge_count));
        }
        if !self.warnings.is_empty() {
            parts.push(format!("warnings:{}", self.warnings.len()));
        }

        parts.join(" ")
    }
}

impl fmt::Display for GeomMeshDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mesh Diagnostics:")?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(f, "  Triangles: {}", self.triangle_count)?;
        writeln!(f, "  Patches: {}", self.patch_count)?;

        if self.degenerate_triangle_count > 0 {
            writeln!(f, "  Degenerate triangles: {}", self.degenerate_triangle_count)?;
        }

        if self.open_edge_count > 0 || self.non_manifold_edge_count > 0 {
            writeln!(f, "  Topology:")?;
            if self.open_edge_count > 0 {
                writeln!(f, "    - Open edges: {}", self.open_edge_count)?;
            }
            if self.non_manifold_edge_count > 0 {
                writeln!(f, "    - Non-manifold edges: {}", self.non_manifold_edge_count)?;
            }
        }

        if !self.warnings.is_empty() {
            writeln!(f, "  Warnings:")?;
            for warning in &self.warnings {
                writeln!(f, "    - {warning}")?;
            }
        }

        if let Some(ref timing) = self.timing {
            writeln!(f, "  Timing: {} ms total", timing.total_ms())?;
        }

        let status = if self.is_clean() { "CLEAN" } else { "ISSUES DETECTED" };
        writeln!(f, "  Status: {status}")?;

        Ok(())
    }
}
