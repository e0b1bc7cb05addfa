mod calabi_yau;
mod complex_surface;
mod core;
mod diagnostics;
mod mesh;
mod metrics;
mod triangulation;

pub use calabi_yau::{
    CalabiYauError, CalabiYauOptions, PatchIndex, calabi_yau_mesh, calabi_yau_mesh_with_context,
    calabi_yau_triangles, sample_calabi_yau_vertices, sample_patch_grid,
};
pub use complex_surface::{phase_factor, principal_pow, u0, u1, z0k, z1k};
pub use core::{Point3, Triangle3, Vec3};
pub use diagnostics::GeomMeshDiagnostics;
pub use mesh::{GeomContext, GeomMesh};
pub use metrics::{GeomMetrics, GeomTimingReport, TimingBucket};
pub use triangulation::{
    grid_quad, grid_triangle_count, triangulate_grid, triangulate_grid_into, triangulate_patches,
};
