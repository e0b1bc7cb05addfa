//! Opt-in timing hooks for mesh generation.
//!
//! Timing is only collected when the `mesh_engine_metrics` feature is enabled
//! and the target is not `wasm32` (no `std::time::Instant` there). Otherwise
//! every call compiles down to running the closure.
//!
//! ```ignore
//! use calabi_engine::geom::{GeomMetrics, TimingBucket};
//!
//! let mut metrics = GeomMetrics::default();
//! metrics.begin();
//! let points = metrics.time(TimingBucket::SurfaceSampling, || sample_everything());
//! if let Some(report) = metrics.end() {
//!     println!("sampling: {} ns", report.surface_sampling_ns);
//! }
//! ```

/// Phases of mesh generation that are timed separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimingBucket {
    /// Evaluating the complex parametrization on every patch grid.
    SurfaceSampling,
    /// Building triangle indices for the patch grids.
    Triangulation,
    /// Normals, edge topology and degenerate-face counting.
    Diagnostics,
}

/// Cumulative nanoseconds per [`TimingBucket`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GeomTimingReport {
    pub surface_sampling_ns: u64,
    pub triangulation_ns: u64,
    pub diagnostics_ns: u64,
}

impl GeomTimingReport {
    /// Returns the total time across all buckets in nanoseconds.
    #[must_use]
    pub fn total_ns(&self) -> u64 {
        self.surface_sampling_ns
            .saturating_add(self.triangulation_ns)
            .saturating_add(self.diagnostics_ns)
    }

    /// Returns the total time in milliseconds (for display purposes).
    #[must_use]
    pub fn total_ms(&self) -> f64 {
        self.total_ns() as f64 / 1_000_000.0
    }
}

/// Accumulator for timing mesh generation.
///
/// When the `mesh_engine_metrics` feature is disabled (or on WASM), all methods
/// are no-ops and [`end`](Self::end) returns `None`.
#[derive(Debug, Default)]
pub struct GeomMetrics {
    #[cfg(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32")))]
    report: GeomTimingReport,
}

impl GeomMetrics {
    /// Resets all timing counters to zero.
    pub fn begin(&mut self) {
        #[cfg(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32")))]
        {
            self.report = GeomTimingReport::default();
        }
    }

    /// Returns the accumulated timing report, or `None` if metrics are disabled.
    #[must_use]
    pub fn end(&self) -> Option<GeomTimingReport> {
        #[cfg(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32")))]
        {
            Some(self.report.clone())
        }
        #[cfg(not(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32"))))]
        {
            None
        }
    }

    /// Times the execution of `f` and accumulates the elapsed time in `bucket`.
    pub fn time<R>(&mut self, bucket: TimingBucket, f: impl FnOnce() -> R) -> R {
        #[cfg(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32")))]
        {
            let start = std::time::Instant::now();
            let result = f();
            let elapsed = start.elapsed();
            // Cap at u64::MAX to prevent overflow
            let nanos_u64 = elapsed.as_nanos().min(u128::from(u64::MAX)) as u64;
            self.add_to_bucket(bucket, nanos_u64);
            result
        }

        #[cfg(not(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32"))))]
        {
            let _ = bucket;
            f()
        }
    }

    #[cfg(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32")))]
    fn add_to_bucket(&mut self, bucket: TimingBucket, nanos: u64) {
        let slot = match bucket {
            TimingBucket::SurfaceSampling => &mut self.report.surface_sampling_ns,
            TimingBucket::Triangulation => &mut self.report.triangulation_ns,
            TimingBucket::Diagnostics => &mut self.report.diagnostics_ns,
        };
        *slot = slot.saturating_add(nanos);
    }
}
