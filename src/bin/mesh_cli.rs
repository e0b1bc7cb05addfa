#[cfg(target_arch = "wasm32")]
fn main() {
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("mesh_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use calabi_engine::geom::{CalabiYauOptions, GeomMesh, GeomMeshDiagnostics, calabi_yau_mesh};
    use calabi_engine::params::{PARAMETERS, ReferenceView};
    use std::fmt::Write as _;
    use std::fs::{self, File};
    use std::io::{BufWriter, Write};
    use std::path::{Path, PathBuf};

    const SNAPSHOT_QUANTIZE: f64 = 1e-6;
    const SNAPSHOT_DECIMALS: usize = 6;

    const USAGE: &str = r#"mesh_cli (calabi-engine)

USAGE:
  mesh_cli params
  mesh_cli run [options]

OPTIONS (run):
  --n <int>          Sheets per coordinate, n² patches (default 5)
  --alpha <radians>  Slice angle (default π/4)
  --count <int>      Samples per grid axis, at least 2 (default 16)
  --r-min <float>    Lower radius bound (default -1)
  --r-max <float>    Upper radius bound (default 1)
  --obj <path>       Write the mesh as Wavefront OBJ
  --snap <path>      Write a golden-style snapshot instead of printing it
  --overwrite        Overwrite existing output files
  -h, --help         Show this help
"#;

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        match command.as_str() {
            "params" => {
                print_parameters();
                Ok(())
            }
            "run" => cmd_run(&mut args),
            "-h" | "--help" | "help" => {
                print_usage();
                Ok(())
            }
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    fn print_parameters() {
        let defaults = CalabiYauOptions::default();
        for spec in PARAMETERS {
            println!(
                "{:<6} {:<12} [{}, {}] step {} default {}",
                spec.id,
                spec.name,
                spec.min,
                spec.max,
                spec.step,
                spec.get(&defaults)
            );
        }
    }

    fn cmd_run(args: &mut Args) -> Result<(), String> {
        let mut options = CalabiYauOptions::default();
        let mut obj_path: Option<PathBuf> = None;
        let mut snap_path: Option<PathBuf> = None;
        let mut overwrite = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--n" => options.n = args.parsed("--n")?,
                "--alpha" => options.alpha = args.parsed("--alpha")?,
                "--count" => options.count = args.parsed("--count")?,
                "--r-min" => options.r_min = args.parsed("--r-min")?,
                "--r-max" => options.r_max = args.parsed("--r-max")?,
                "--obj" => obj_path = Some(PathBuf::from(args.value("--obj")?)),
                "--snap" => snap_path = Some(PathBuf::from(args.value("--snap")?)),
                "--overwrite" => overwrite = true,
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        let (mesh, diagnostics) = calabi_yau_mesh(&options).map_err(|e| e.to_string())?;
        let snapshot = snapshot_mesh(&options, &mesh, &diagnostics);

        if let Some(path) = snap_path.as_deref() {
            write_text_file(path, &snapshot, overwrite)?;
            eprintln!("wrote {}", path.display());
        } else {
            print!("{snapshot}");
        }

        if let Some(path) = obj_path.as_deref() {
            write_obj_file(path, &mesh, &options, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        eprintln!(
            "calabi_yau: vertices={} triangles={} | {}",
            mesh.vertex_count(),
            mesh.triangle_count(),
            diagnostics.summary()
        );

        Ok(())
    }

    fn refuse_overwrite(path: &Path, overwrite: bool) -> Result<(), String> {
        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }
        Ok(())
    }

    fn write_text_file(path: &Path, text: &str, overwrite: bool) -> Result<(), String> {
        refuse_overwrite(path, overwrite)?;
        fs::write(path, normalize_snapshot_text(text)).map_err(|e| format!("write {}: {e}", path.display()))
    }

    fn write_obj_file(
        path: &Path,
        mesh: &GeomMesh,
        options: &CalabiYauOptions,
        overwrite: bool,
    ) -> Result<(), String> {
        mesh.validate().map_err(|e| format!("mesh validation failed: {e}"))?;
        refuse_overwrite(path, overwrite)?;

        let file = File::create(path).map_err(|e| format!("create {}: {e}", path.display()))?;
        let mut w = BufWriter::new(file);
        write_obj(&mut w, mesh, options).map_err(|e| format!("write obj: {e}"))?;
        w.flush().map_err(|e| format!("flush {}: {e}", path.display()))
    }

    fn write_obj(w: &mut impl Write, mesh: &GeomMesh, options: &CalabiYauOptions) -> std::io::Result<()> {
        let view = ReferenceView::default();
        writeln!(w, "# calabi-engine mesh_cli")?;
        writeln!(
            w,
            "# n={} alpha={} count={} r_min={} r_max={}",
            options.n, options.alpha, options.count, options.r_min, options.r_max
        )?;
        writeln!(
            w,
            "# view eye={:?} center={:?} up={:?} fovy={}",
            view.eye, view.center, view.up, view.fovy
        )?;
        writeln!(w, "o calabi_yau")?;

        for p in &mesh.positions {
            writeln!(w, "v {} {} {}", p[0], p[1], p[2])?;
        }
        if let Some(uvs) = mesh.uvs.as_ref() {
            for uv in uvs {
                writeln!(w, "vt {} {}", uv[0], uv[1])?;
            }
        }
        if let Some(normals) = mesh.normals.as_ref() {
            for n in normals {
                writeln!(w, "vn {} {} {}", n[0], n[1], n[2])?;
            }
        }

        let has_uvs = mesh.uvs.is_some();
        let has_normals = mesh.normals.is_some();

        for tri in mesh.indices.chunks_exact(3) {
            let a = tri[0] + 1;
            let b = tri[1] + 1;
            let c = tri[2] + 1;

            match (has_uvs, has_normals) {
                (true, true) => writeln!(w, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}"),
                (true, false) => writeln!(w, "f {a}/{a} {b}/{b} {c}/{c}"),
                (false, true) => writeln!(w, "f {a}//{a} {b}//{b} {c}//{c}"),
                (false, false) => writeln!(w, "f {a} {b} {c}"),
            }?;
        }
        Ok(())
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
        for (idx, warning) in diag.warnings.iter().enumerate() {
            let _ = writeln!(out, "mesh_diag.warning.{idx} {warning}");
        }
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

    struct Args {
        args: Vec<String>,
        idx: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, idx: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let out = self.args.get(self.idx).cloned();
            if out.is_some() {
                self.idx += 1;
            }
            out
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next().ok_or_else(|| format!("missing value for {flag}"))
        }

        fn parsed<T>(&mut self, flag: &str) -> Result<T, String>
        where
            T: std::str::FromStr,
            T::Err: std::fmt::Display,
        {
            let raw = self.value(flag)?;
            raw.parse::<T>()
                .map_err(|e| format!("invalid value `{raw}` for {flag}: {e}"))
        }
    }
}
