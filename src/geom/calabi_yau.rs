//! Calabi–Yau slice sampler and tessellator.
//!
//! The surface is sampled on `n × n` patches `(k0, k1)`. Every patch is a
//! `count × count` grid over radius `r ∈ [r_min, r_max]` and angle
//! `θ ∈ [0, π/2]`, projected to 3D as
//!
//! ```text
//! x = Re z0
//! y = Re z1
//! z = cos(alpha)·Im z0 + sin(alpha)·Im z1
//! ```
//!
//! Vertices are laid out patch by patch (`k0` major, `k1` minor), each patch
//! row-major by `(ir, ii)`. Patch `p = k0·n + k1` owns the vertex range
//! `[p·count², (p+1)·count²)` and triangles never leave their patch.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::complex_surface::{z0k, z1k};
use super::diagnostics::GeomMeshDiagnostics;
use super::mesh::{
    GeomContext, GeomMesh, compute_smooth_normals, count_degenerate_triangles, count_edge_topology,
};
use super::metrics::TimingBucket;
use super::triangulation::{grid_triangle_count, triangulate_patches};
use super::{Point3, Triangle3};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalabiYauError {
    #[error("sample count must be at least 2, got {count}")]
    InvalidSampleCount { count: usize },
    #[error("parameter `{name}` must be finite, got {value}")]
    NonFiniteParameter { name: &'static str, value: f64 },
    #[error("sample at patch ({k0}, {k1}) grid ({ir}, {ii}) is not finite")]
    NonFiniteVertex {
        k0: usize,
        k1: usize,
        ir: usize,
        ii: usize,
    },
    #[error("mesh would need {vertices} vertices, more than 32-bit indices can address")]
    TooManyVertices { vertices: u128 },
}

/// Shape parameters of the slice.
///
/// Defaults reproduce the reference render: five sheets per coordinate,
/// a 45° slice and a 16×16 grid over `r ∈ [-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalabiYauOptions {
    /// Sheets per coordinate; the mesh has `n²` patches.
    pub n: usize,
    /// Slice angle (radians) blending `Im z0` and `Im z1` into the z axis.
    pub alpha: f64,
    /// Samples per grid axis, at least 2.
    pub count: usize,
    pub r_min: f64,
    pub r_max: f64,
}

impl Default for CalabiYauOptions {
    fn default() -> Self {
        Self {
            n: 5,
            alpha: FRAC_PI_4,
            count: 16,
            r_min: -1.0,
            r_max: 1.0,
        }
    }
}

impl CalabiYauOptions {
    #[must_use]
    pub fn new(n: usize, alpha: f64, count: usize, r_min: f64, r_max: f64) -> Self {
        Self {
            n,
            alpha,
            count,
            r_min,
            r_max,
        }
    }

    #[must_use]
    pub fn with_n(mut self, n: usize) -> Self {
        self.n = n;
        self
    }

    #[must_use]
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    #[must_use]
    pub fn with_radius_range(mut self, r_min: f64, r_max: f64) -> Self {
        self.r_min = r_min;
        self.r_max = r_max;
        self
    }

    #[must_use]
    pub fn patch_count(&self) -> usize {
        self.n * self.n
    }

    /// `n² · count²`.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.patch_count() * self.count * self.count
    }

    /// `n² · (count - 1)² · 2`.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.patch_count() * grid_triangle_count(self.count)
    }

    /// Radial distance between neighbouring grid rows.
    #[must_use]
    pub fn radial_step(&self) -> f64 {
        (self.r_max - self.r_min) / (self.count - 1) as f64
    }

    /// Angular distance between neighbouring grid columns, covering `[0, π/2]`.
    #[must_use]
    pub fn angular_step(&self) -> f64 {
        FRAC_PI_2 / (self.count - 1) as f64
    }

    /// Rejects configurations that cannot produce a finite mesh.
    ///
    /// `n == 0` is accepted and yields an empty mesh. `r_min == r_max` is
    /// accepted as well; every triangle is then degenerate.
    pub fn validate(&self) -> Result<(), CalabiYauError> {
        if self.count < 2 {
            return Err(CalabiYauError::InvalidSampleCount { count: self.count });
        }
        for (name, value) in [
            ("alpha", self.alpha),
            ("r_min", self.r_min),
            ("r_max", self.r_max),
        ] {
            if !value.is_finite() {
                return Err(CalabiYauError::NonFiniteParameter { name, value });
            }
        }

        let vertices = (self.n as u128).pow(2) * (self.count as u128).pow(2);
        if vertices > u128::from(u32::MAX) {
            return Err(CalabiYauError::TooManyVertices { vertices });
        }
        Ok(())
    }
}

/// One `(k0, k1)` patch of the slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatchIndex {
    pub k0: usize,
    pub k1: usize,
}

impl PatchIndex {
    #[must_use]
    pub const fn new(k0: usize, k1: usize) -> Self {
        Self { k0, k1 }
    }

    /// Inverse of [`linear`](Self::linear). `None` when `index` lies outside
    /// the `n²` patches, which includes every index for `n == 0`.
    #[must_use]
    pub const fn from_linear(index: usize, n: usize) -> Option<Self> {
        if n == 0 || index / n >= n {
            return None;
        }
        Some(Self {
            k0: index / n,
            k1: index % n,
        })
    }

    /// Position of this patch in generation order, `k0·n + k1`.
    #[must_use]
    pub const fn linear(self, n: usize) -> usize {
        self.k0 * n + self.k1
    }

    /// First vertex of this patch in the flat vertex buffer.
    #[must_use]
    pub const fn vertex_offset(self, n: usize, count: usize) -> usize {
        self.linear(n) * count * count
    }

    /// Patch that owns flat vertex `vertex`, or `None` past the last patch.
    #[must_use]
    pub const fn of_vertex(vertex: usize, n: usize, count: usize) -> Option<Self> {
        match vertex.checked_div(count) {
            Some(row) => Self::from_linear(row / count, n),
            None => None,
        }
    }

    /// All `n²` patches in generation order.
    pub fn all(n: usize) -> impl Iterator<Item = Self> {
        (0..n).flat_map(move |k0| (0..n).map(move |k1| Self::new(k0, k1)))
    }
}

/// Samples one patch grid, row-major by `(ir, ii)`.
///
/// Fails on the first non-finite sample; options are expected to have
/// passed [`CalabiYauOptions::validate`].
pub fn sample_patch_grid(
    options: &CalabiYauOptions,
    patch: PatchIndex,
) -> Result<Vec<Point3>, CalabiYauError> {
    let count = options.count;
    let n = options.n as f64;
    let (sin, cos) = options.alpha.sin_cos();
    let dr = options.radial_step();
    let di = options.angular_step();

    let k0 = patch.k0 as f64;
    let k1 = patch.k1 as f64;

    let mut points = Vec::with_capacity(count * count);
    for ir in 0..count {
        let r = options.r_min + ir as f64 * dr;
        for ii in 0..count {
            let theta = ii as f64 * di;

            let z0 = z0k(r, theta, n, k0);
            let z1 = z1k(r, theta, n, k1);

            let point = Point3::new(z0.re, z1.re, cos * z0.im + sin * z1.im);
            if !point.is_finite() {
                return Err(CalabiYauError::NonFiniteVertex {
                    k0: patch.k0,
                    k1: patch.k1,
                    ir,
                    ii,
                });
            }
            points.push(point);
        }
    }

    Ok(points)
}

#[cfg(feature = "parallel")]
fn sample_patches(
    options: &CalabiYauOptions,
    patches: Vec<PatchIndex>,
) -> Result<Vec<Vec<Point3>>, CalabiYauError> {
    patches
        .into_par_iter()
        .map(|patch| sample_patch_grid(options, patch))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn sample_patches(
    options: &CalabiYauOptions,
    patches: Vec<PatchIndex>,
) -> Result<Vec<Vec<Point3>>, CalabiYauError> {
    patches
        .into_iter()
        .map(|patch| sample_patch_grid(options, patch))
        .collect()
}

/// Samples every patch and concatenates the grids in patch order.
///
/// With the `parallel` feature the patches are evaluated concurrently; the
/// result is identical to the sequential one.
pub fn sample_calabi_yau_vertices(
    options: &CalabiYauOptions,
) -> Result<Vec<Point3>, CalabiYauError> {
    options.validate()?;
    let grids = sample_patches(options, PatchIndex::all(options.n).collect())?;
    Ok(grids.concat())
}

/// Generates the slice as a flat triangle list.
///
/// Triangles come patch by patch, then quad row by quad row; each quad
/// contributes `(v0, v2, v3)` followed by `(v0, v3, v1)`.
pub fn calabi_yau_triangles(options: &CalabiYauOptions) -> Result<Vec<Triangle3>, CalabiYauError> {
    let vertices = sample_calabi_yau_vertices(options)?;
    let triangles = triangulate_patches(options.patch_count(), options.count)
        .into_iter()
        .map(|[a, b, c]| Triangle3::new(vertices[a], vertices[b], vertices[c]))
        .collect::<Vec<_>>();

    log::debug!(
        "calabi-yau: n={} count={} -> {} vertices, {} triangles",
        options.n,
        options.count,
        vertices.len(),
        triangles.len()
    );
    Ok(triangles)
}

pub fn calabi_yau_mesh(
    options: &CalabiYauOptions,
) -> Result<(GeomMesh, GeomMeshDiagnostics), CalabiYauError> {
    let mut ctx = GeomContext::new();
    calabi_yau_mesh_with_context(options, &mut ctx)
}

/// Generates the slice as an indexed mesh with per-patch UVs and smooth normals.
///
/// Patch grids are not welded, so the face order and vertex layout match
/// [`calabi_yau_triangles`] exactly.
pub fn calabi_yau_mesh_with_context(
    options: &CalabiYauOptions,
    ctx: &mut GeomContext,
) -> Result<(GeomMesh, GeomMeshDiagnostics), CalabiYauError> {
    ctx.metrics.begin();

    let points = ctx
        .metrics
        .time(TimingBucket::SurfaceSampling, || sample_calabi_yau_vertices(options))?;

    // `validate` bounded the vertex count to u32.
    let indices: Vec<u32> = ctx.metrics.time(TimingBucket::Triangulation, || {
        triangulate_patches(options.patch_count(), options.count)
            .into_iter()
            .flatten()
            .map(|i| i as u32)
            .collect()
    });

    let (normals, mut diagnostics) = ctx.metrics.time(TimingBucket::Diagnostics, || {
        let normals = compute_smooth_normals(&points, &indices);
        let (open_edge_count, non_manifold_edge_count) = count_edge_topology(&indices);
        let degenerate_triangle_count = count_degenerate_triangles(&points, &indices);

        let mut diagnostics = GeomMeshDiagnostics {
            vertex_count: points.len(),
            triangle_count: indices.len() / 3,
            patch_count: options.patch_count(),
            degenerate_triangle_count,
            open_edge_count,
            non_manifold_edge_count,
            timing: None,
            warnings: Vec::new(),
        };
        if options.n == 0 {
            diagnostics.add_warning("n is 0; mesh is empty");
        }
        if options.r_min == options.r_max {
            diagnostics.add_warning("radial bounds coincide; every triangle is degenerate");
        } else if options.r_min > options.r_max {
            diagnostics.add_warning("r_min exceeds r_max; faces are wound in reverse");
        }
        (normals, diagnostics)
    });

    for warning in &diagnostics.warnings {
        log::warn!("calabi-yau: {warning}");
    }

    let uvs = grid_uvs(options);
    let mesh = GeomMesh::with_attributes(
        points.into_iter().map(Point3::to_array).collect(),
        indices,
        Some(uvs),
        Some(normals),
    );

    diagnostics.timing = ctx.metrics.end();
    log::debug!("calabi-yau mesh: {}", diagnostics.summary());
    Ok((mesh, diagnostics))
}

/// Per-patch texture coordinates: `u` follows the angle, `v` the radius.
fn grid_uvs(options: &CalabiYauOptions) -> Vec<[f64; 2]> {
    let count = options.count;
    let denom = (count - 1) as f64;

    let mut patch = Vec::with_capacity(count * count);
    for ir in 0..count {
        let v = ir as f64 / denom;
        for ii in 0..count {
            patch.push([ii as f64 / denom, v]);
        }
    }

    patch.repeat(options.patch_count())
}
