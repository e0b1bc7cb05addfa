use calabi_engine::geom::{
    CalabiYauOptions, GeomMesh, GeomMeshDiagnostics, PatchIndex, calabi_yau_mesh,
    calabi_yau_triangles, z0k, z1k,
};

use std::f64::consts::FRAC_PI_4;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

const SNAPSHOT_QUANTIZE: f64 = 1e-6;
const SNAPSHOT_DECIMALS: usize = 6;

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("calabi_yau")
}

fn fixture_path(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

fn normalize_snapshot_text(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n");
    if normalized.ends_with('\n') {
        normalized
    } else {
        format!("{normalized}\n")
    }
}

fn quantize_f64(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let value = if value == -0.0 { 0.0 } else { value };
    let q = (value / SNAPSHOT_QUANTIZE).round() * SNAPSHOT_QUANTIZE;
    if q == -0.0 { 0.0 } else { q }
}

fn write_f64(out: &mut String, value: f64) {
    let value = quantize_f64(value);
    let _ = write!(out, "{value:.SNAPSHOT_DECIMALS$}");
}

fn write_vec3_line(out: &mut String, prefix: &str, v: [f64; 3]) {
    let _ = write!(out, "{prefix} ");
    write_f64(out, v[0]);
    out.push(' ');
    write_f64(out, v[1]);
    out.push(' ');
    write_f64(out, v[2]);
    out.push('\n');
}

fn write_geom_mesh_diagnostics(out: &mut String, diag: &GeomMeshDiagnostics) {
    let _ = writeln!(out, "mesh_diag.vertex_count {}", diag.vertex_count);
    let _ = writeln!(out, "mesh_diag.triangle_count {}", diag.triangle_count);
    let _ = writeln!(out, "mesh_diag.patch_count {}", diag.patch_count);
    let _ = writeln!(
        out,
        "mesh_diag.degenerate_triangle_count {}",
        diag.degenerate_triangle_count
    );
    let _ = writeln!(out, "mesh_diag.open_edge_count {}", diag.open_edge_count);
    let _ = writeln!(
        out,
        "mesh_diag.non_manifold_edge_count {}",
        diag.non_manifold_edge_count
    );
    let _ = writeln!(out, "mesh_diag.warning_count {}", diag.warnings.len());
}

fn snapshot_mesh(options: &CalabiYauOptions, mesh: &GeomMesh, diag: &GeomMeshDiagnostics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# calabi-engine golden v1");
    let _ = writeln!(out, "op calabi_yau");
    let _ = writeln!(out, "quantize {SNAPSHOT_QUANTIZE:.1e}");

    let _ = writeln!(out, "options.n {}", options.n);
    let _ = write!(out, "options.alpha ");
    write_f64(&mut out, options.alpha);
    out.push('\n');
    let _ = writeln!(out, "options.count {}", options.count);
    let _ = write!(out, "options.r_min ");
    write_f64(&mut out, options.r_min);
    out.push('\n');
    let _ = write!(out, "options.r_max ");
    write_f64(&mut out, options.r_max);
    out.push('\n');

    write_geom_mesh_diagnostics(&mut out, diag);

    let _ = writeln!(out, "mesh.positions {}", mesh.vertex_count());
    for p in &mesh.positions {
        write_vec3_line(&mut out, "v", *p);
    }
    let _ = writeln!(out, "mesh.indices {}", mesh.triangle_count());
    for tri in mesh.indices.chunks_exact(3) {
        let _ = writeln!(out, "f {} {} {}", tri[0], tri[1], tri[2]);
    }
    out
}

fn assert_or_update_fixture(name: &str, actual: &str) {
    let path = fixture_path(name);
    let actual = normalize_snapshot_text(actual);

    if std::env::var_os("CALABI_UPDATE_GOLDENS").is_some() {
        std::fs::create_dir_all(fixtures_dir()).expect("create fixtures dir");
        std::fs::write(&path, actual).expect("write golden fixture");
        return;
    }

    let expected = std::fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("missing fixture `{}`: {err}", path.display()));
    let expected = normalize_snapshot_text(&expected);

    assert_eq!(
        actual, expected,
        "golden mismatch for `{name}` (set CALABI_UPDATE_GOLDENS=1 to update)"
    );
}

fn golden_case(name: &str, options: CalabiYauOptions) {
    let (mesh, diag) = calabi_yau_mesh(&options).expect("mesh");
    assert_or_update_fixture(name, &snapshot_mesh(&options, &mesh, &diag));
}

#[test]
fn golden_two_sheets_quarter_pi() {
    golden_case(
        "n2_count3_quarter_pi.snap",
        CalabiYauOptions::new(2, FRAC_PI_4, 3, -1.0, 1.0),
    );
}

#[test]
fn golden_three_sheets_fractional_power() {
    golden_case(
        "n3_count4_tilted.snap",
        CalabiYauOptions::new(3, 1.1, 4, -1.0, 1.0),
    );
}

fn assert_close(actual: [f64; 3], expected: [f64; 3]) {
    for axis in 0..3 {
        assert!(
            (actual[axis] - expected[axis]).abs() < 1e-9,
            "axis {axis}: {actual:?} vs {expected:?}"
        );
    }
}

#[test]
fn single_patch_unit_square_matches_closed_form() {
    let options = CalabiYauOptions::new(1, 0.0, 2, 0.0, 1.0);
    let (mesh, diag) = calabi_yau_mesh(&options).expect("mesh");

    let c = 1.0_f64.cosh();
    let s = 1.0_f64.sinh();

    assert_eq!(mesh.vertex_count(), 4);
    assert_close(mesh.positions[0], [1.0, 0.0, 0.0]);
    assert_close(mesh.positions[1], [0.0, -1.0, 0.0]);
    assert_close(mesh.positions[2], [c * c, s * s, 0.0]);
    assert_close(mesh.positions[3], [-s * s, -c * c, 0.0]);

    assert_eq!(mesh.indices, vec![0, 2, 3, 0, 3, 1]);
    assert_eq!(diag.patch_count, 1);
    assert_eq!(diag.open_edge_count, 4);
    assert_eq!(diag.non_manifold_edge_count, 0);
}

#[test]
fn reference_configuration_snapshot_is_stable() {
    let options = CalabiYauOptions::default();
    assert_eq!(options, CalabiYauOptions::new(5, FRAC_PI_4, 16, -1.0, 1.0));

    let (mesh_a, diag_a) = calabi_yau_mesh(&options).expect("first run");
    let (mesh_b, diag_b) = calabi_yau_mesh(&options).expect("second run");

    let snap_a = snapshot_mesh(&options, &mesh_a, &diag_a);
    let snap_b = snapshot_mesh(&options, &mesh_b, &diag_b);
    assert_eq!(snap_a, snap_b);

    assert!(snap_a.contains("\nmesh_diag.vertex_count 6400\nmesh_diag.triangle_count 11250\n"));
    assert!(snap_a.contains("\nmesh_diag.patch_count 25\n"));
    assert!(snap_a.contains("\nmesh.positions 6400\n"));
    assert!(snap_a.contains("\nmesh.indices 11250\n"));
    assert!(snap_a.ends_with("f 6382 6398 6399\nf 6382 6399 6383\n"));
}

#[test]
fn triangle_list_agrees_with_indexed_mesh() {
    let options = CalabiYauOptions::new(3, 0.7, 5, -0.8, 0.9);
    let triangles = calabi_yau_triangles(&options).expect("triangles");
    let (mesh, _) = calabi_yau_mesh(&options).expect("mesh");

    assert_eq!(triangles.len(), mesh.triangle_count());
    for (tri, expected) in triangles.iter().zip(mesh.triangles()) {
        assert_eq!(*tri, expected);
    }
}

#[test]
fn every_sample_lies_on_the_complex_curve() {
    let options = CalabiYauOptions::new(4, 1.1, 6, -1.0, 1.0);
    let n = options.n as f64;
    let dr = options.radial_step();
    let di = options.angular_step();

    for patch in PatchIndex::all(options.n) {
        for ir in 0..options.count {
            let r = options.r_min + ir as f64 * dr;
            for ii in 0..options.count {
                let theta = ii as f64 * di;
                let z0 = z0k(r, theta, n, patch.k0 as f64);
                let z1 = z1k(r, theta, n, patch.k1 as f64);
                let residual = z0.powi(4) - z1.powi(4) - 1.0;
                assert!(residual.norm() < 1e-9, "{patch:?} ir={ir} ii={ii}: {residual}");
            }
        }
    }
}

#[test]
fn slice_angle_only_moves_the_third_axis() {
    let base = CalabiYauOptions::new(3, 0.0, 4, -1.0, 1.0);
    let tilted = base.with_alpha(1.3);

    let (a, _) = calabi_yau_mesh(&base).expect("base");
    let (b, _) = calabi_yau_mesh(&tilted).expect("tilted");

    assert_eq!(a.indices, b.indices);
    for (pa, pb) in a.positions.iter().zip(&b.positions) {
        assert_eq!(pa[0], pb[0]);
        assert_eq!(pa[1], pb[1]);
    }
    assert!(
        a.positions
            .iter()
            .zip(&b.positions)
            .any(|(pa, pb)| (pa[2] - pb[2]).abs() > 1e-6)
    );
}
