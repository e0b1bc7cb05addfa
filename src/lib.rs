#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod geom;
pub mod params;

use std::fmt;

use geom::{CalabiYauOptions, GeomMesh, GeomMeshDiagnostics, calabi_yau_mesh};
use params::ReferenceView;
use serde::Serialize;
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            // no-op fallback when panic hook is disabled
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {
    // no-op fallback when debug logs are disabled
}

#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
#[wasm_bindgen]
pub async fn initialize_parallel(worker_count: Option<u32>) -> Result<(), JsError> {
    let threads = worker_count
        .map(|count| count.max(1) as usize)
        .or_else(|| {
            std::thread::available_parallelism()
                .map(|value| value.get())
                .ok()
        })
        .unwrap_or(1);

    wasm_bindgen_rayon::init_thread_pool(threads)
        .await
        .map_err(|err| JsError::new(&format!("kon rayon threadpool niet initialiseren: {err}")))
}

#[macro_export]
macro_rules! debug_log {
    ($($t:tt)*) => {{
        #[cfg(feature = "debug_logs")]
        {
            #[cfg(target_arch = "wasm32")]
            {
                ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                println!("{}", format!($($t)*));
            }
        }
    }};
}

#[derive(Debug, Serialize)]
struct GeometryExport<'a> {
    vertices: &'a [[f64; 3]],
    faces: Vec<[u32; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    normals: Option<&'a [[f64; 3]]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    uvs: Option<&'a [[f64; 2]]>,
    diagnostics: DiagnosticsExport<'a>,
}

#[derive(Debug, Serialize)]
struct DiagnosticsExport<'a> {
    vertex_count: usize,
    triangle_count: usize,
    patch_count: usize,
    open_edge_count: usize,
    degenerate_triangle_count: usize,
    summary: String,
    warnings: &'a [String],
}

impl<'a> GeometryExport<'a> {
    fn new(mesh: &'a GeomMesh, diagnostics: &'a GeomMeshDiagnostics) -> Self {
        Self {
            vertices: &mesh.positions,
            faces: mesh
                .indices
                .chunks_exact(3)
                .map(|tri| [tri[0], tri[1], tri[2]])
                .collect(),
            normals: mesh.normals.as_deref(),
            uvs: mesh.uvs.as_deref(),
            diagnostics: DiagnosticsExport {
                vertex_count: diagnostics.vertex_count,
                triangle_count: diagnostics.triangle_count,
                patch_count: diagnostics.patch_count,
                open_edge_count: diagnostics.open_edge_count,
                degenerate_triangle_count: diagnostics.degenerate_triangle_count,
                summary: diagnostics.summary(),
                warnings: &diagnostics.warnings,
            },
        }
    }
}

/// Public entry point for consumers.
#[wasm_bindgen]
pub struct Engine {
    initialized: bool,
    options: CalabiYauOptions,
    last_result: Option<(GeomMesh, GeomMeshDiagnostics)>,
    result_dirty: bool,
}

#[wasm_bindgen]
impl Engine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Engine {
        Engine {
            initialized: true,
            options: CalabiYauOptions::default(),
            last_result: None,
            result_dirty: true,
        }
    }

    /// Geeft terug of de engine de minimale initialisatie heeft doorlopen.
    #[wasm_bindgen]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Haal parameter-specificaties op voor UI-generatie.
    #[wasm_bindgen]
    pub fn get_parameters(&self) -> Result<JsValue, JsValue> {
        let parameters = params::export_parameters(&self.options);
        serde_wasm_bindgen::to_value(&parameters).map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// Stel een parameter in op basis van id of naam; geeft de opgeslagen waarde terug.
    #[wasm_bindgen]
    pub fn set_parameter(&mut self, id_or_name: &str, value: f64) -> Result<f64, JsValue> {
        let previous = self.options;
        let stored =
            params::set_parameter(&mut self.options, id_or_name, value).map_err(to_js_error)?;
        if self.options != previous {
            self.result_dirty = true;
        }
        Ok(stored)
    }

    /// Genereer de mesh voor de huidige parameters.
    #[wasm_bindgen]
    pub fn generate(&mut self) -> Result<(), JsValue> {
        if !self.result_dirty && self.last_result.is_some() {
            return Ok(());
        }

        let result = calabi_yau_mesh(&self.options).map_err(to_js_error)?;
        debug_log!("calabi-yau: {}", result.1.summary());
        self.last_result = Some(result);
        self.result_dirty = false;
        Ok(())
    }

    /// Haalt de geometrie van de laatste generatie op.
    #[wasm_bindgen]
    pub fn get_geometry(&self) -> Result<JsValue, JsValue> {
        let export = self.geometry_export().map_err(|err| js_error(&err))?;
        serde_wasm_bindgen::to_value(&export).map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// Camera-instellingen van de referentieweergave.
    #[wasm_bindgen]
    pub fn get_reference_view(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&ReferenceView::default())
            .map_err(|err| JsError::new(&err.to_string()).into())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    fn geometry_export(&self) -> Result<GeometryExport<'_>, String> {
        if self.result_dirty {
            return Err("mesh is nog niet gegenereerd".to_owned());
        }
        let (mesh, diagnostics) = self
            .last_result
            .as_ref()
            .ok_or_else(|| "er is geen mesh beschikbaar".to_owned())?;
        Ok(GeometryExport::new(mesh, diagnostics))
    }
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}

#[cfg(test)]
mod tests {
    use super::Engine;
    use crate::geom::CalabiYauOptions;

    #[test]
    fn engine_starts_with_reference_options() {
        let engine = Engine::new();
        assert!(engine.is_initialized());
        assert_eq!(engine.options.n, 5);
        assert!(engine.geometry_export().is_err());
    }

    #[test]
    fn generate_exports_faces_in_triangle_order() {
        let mut engine = Engine::new();
        engine.set_parameter("n", 2.0).expect("n");
        engine.set_parameter("count", 3.0).expect("count");
        engine.generate().expect("generate");

        let export = engine.geometry_export().expect("export");
        assert_eq!(export.vertices.len(), 36);
        assert_eq!(export.faces.len(), 32);
        assert_eq!(export.faces[0], [0, 3, 4]);
        assert_eq!(export.faces[1], [0, 4, 1]);
        assert_eq!(export.diagnostics.patch_count, 4);
        assert!(export.diagnostics.summary.contains("T:32"));
    }

    #[test]
    fn parameter_changes_invalidate_geometry() {
        let mut engine = Engine::new();
        engine.set_parameter("count", 4.0).expect("count");
        engine.generate().expect("generate");
        assert!(engine.geometry_export().is_ok());

        engine.set_parameter("alpha", 0.5).expect("alpha");
        assert!(engine.geometry_export().is_err());

        engine.generate().expect("regenerate");
        assert!(engine.geometry_export().is_ok());
    }

    #[test]
    fn unknown_parameters_are_rejected() {
        let mut engine = Engine::new();
        assert!(engine.set_parameter("onbekend", 1.0).is_err());
        assert!(engine.set_parameter("alpha", f64::INFINITY).is_err());
        assert_eq!(engine.options, CalabiYauOptions::default());
    }
}
