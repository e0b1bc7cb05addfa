//! Fixed-diagonal triangulation of square sample grids.
//!
//! Grid cell `(x, y)` has corners
//!
//! ```text
//!   v0     v1
//!    o-----o
//!    | \   |
//!    |   \ |
//!    o-----o
//!   v2     v3
//! ```
//!
//! and is split along `v0–v3` into `(v0, v2, v3)` and `(v0, v3, v1)`, in that
//! order. Changing either the diagonal or the vertex order flips faces of the
//! rendered surface.

/// Corner indices `[v0, v1, v2, v3]` of quad `(x, y)` in a row-major grid
/// that is `count` samples wide.
#[must_use]
pub const fn grid_quad(count: usize, x: usize, y: usize) -> [usize; 4] {
    let v0 = y * count + x;
    let v1 = y * count + (x + 1);
    let v2 = (y + 1) * count + x;
    let v3 = (y + 1) * count + (x + 1);
    [v0, v1, v2, v3]
}

/// Number of triangles produced for one `count × count` grid.
#[must_use]
pub const fn grid_triangle_count(count: usize) -> usize {
    let quads = count.saturating_sub(1);
    quads * quads * 2
}

/// Triangulates one `count × count` grid whose first vertex sits at `offset`.
///
/// Rows (`y`) are visited in order, then columns (`x`); every quad yields its
/// two triangles back to back.
pub fn triangulate_grid_into(count: usize, offset: usize, out: &mut Vec<[usize; 3]>) {
    let subdivisions = count.saturating_sub(1);
    for y in 0..subdivisions {
        for x in 0..subdivisions {
            let [v0, v1, v2, v3] = grid_quad(count, x, y).map(|v| v + offset);
            out.push([v0, v2, v3]);
            out.push([v0, v3, v1]);
        }
    }
}

#[must_use]
pub fn triangulate_grid(count: usize) -> Vec<[usize; 3]> {
    let mut out = Vec::with_capacity(grid_triangle_count(count));
    triangulate_grid_into(count, 0, &mut out);
    out
}

/// Triangulates `patch_count` grids laid out back to back, each holding
/// `count²` vertices. Patch `p` uses vertex offset `p * count²`, so no triangle
/// references two patches.
#[must_use]
pub fn triangulate_patches(patch_count: usize, count: usize) -> Vec<[usize; 3]> {
    let patch_vertex_count = count * count;
    let mut out = Vec::with_capacity(patch_count * grid_triangle_count(count));
    for patch in 0..patch_count {
        triangulate_grid_into(count, patch * patch_vertex_count, &mut out);
    }
    out
}
