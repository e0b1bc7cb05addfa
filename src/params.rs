//! Named, range-checked parameters for interactive front-ends.
//!
//! Both the wasm [`Engine`](crate::Engine) and the native CLI address the
//! shape options by name. Incoming values are clamped to the parameter range
//! and snapped to its step before they reach [`CalabiYauOptions`].

use serde::Serialize;
use std::f64::consts::TAU;

use crate::geom::CalabiYauOptions;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParameterError {
    #[error("unknown parameter `{0}`")]
    Unknown(String),
    #[error("parameter `{id}` must be a finite number, got {value}")]
    NonFinite { id: &'static str, value: f64 },
}

/// Range and step of one shape parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

pub const PARAMETERS: &[ParameterSpec] = &[
    ParameterSpec {
        id: "n",
        name: "Dimension",
        min: 1.0,
        max: 12.0,
        step: 1.0,
    },
    ParameterSpec {
        id: "alpha",
        name: "Slice angle",
        min: 0.0,
        max: TAU,
        step: 0.01,
    },
    ParameterSpec {
        id: "count",
        name: "Samples",
        min: 2.0,
        max: 128.0,
        step: 1.0,
    },
    ParameterSpec {
        id: "r_min",
        name: "Radius min",
        min: -3.0,
        max: 3.0,
        step: 0.05,
    },
    ParameterSpec {
        id: "r_max",
        name: "Radius max",
        min: -3.0,
        max: 3.0,
        step: 0.05,
    },
];

impl ParameterSpec {
    /// Clamps `value` into range and snaps it to the step grid anchored at `min`.
    #[must_use]
    pub fn snap(&self, value: f64) -> f64 {
        let mut clamped = clamp(value, self.min, self.max);
        if self.step > 0.0 {
            clamped = self.min + ((clamped - self.min) / self.step).round() * self.step;
            clamped = clamp(clamped, self.min, self.max);
        }
        clamped
    }

    /// Current value of this parameter in `options`.
    #[must_use]
    pub fn get(&self, options: &CalabiYauOptions) -> f64 {
        match self.id {
            "n" => options.n as f64,
            "alpha" => options.alpha,
            "count" => options.count as f64,
            "r_min" => options.r_min,
            "r_max" => options.r_max,
            other => unreachable!("parameter table has no entry `{other}`"),
        }
    }

    fn apply(&self, options: &mut CalabiYauOptions, value: f64) {
        match self.id {
            // Integer parameters have step 1 and a positive minimum.
            "n" => options.n = value.round() as usize,
            "alpha" => options.alpha = value,
            "count" => options.count = value.round() as usize,
            "r_min" => options.r_min = value,
            "r_max" => options.r_max = value,
            other => unreachable!("parameter table has no entry `{other}`"),
        }
    }
}

/// Looks a parameter up by id or (case-insensitive) display name.
#[must_use]
pub fn find_parameter(id_or_name: &str) -> Option<&'static ParameterSpec> {
    let trimmed = id_or_name.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized = trimmed.to_lowercase();
    PARAMETERS
        .iter()
        .find(|spec| spec.id == trimmed || spec.name.to_lowercase() == normalized)
}

/// Sets a parameter and returns the value that was actually stored.
pub fn set_parameter(
    options: &mut CalabiYauOptions,
    id_or_name: &str,
    value: f64,
) -> Result<f64, ParameterError> {
    let spec =
        find_parameter(id_or_name).ok_or_else(|| ParameterError::Unknown(id_or_name.to_owned()))?;
    if !value.is_finite() {
        return Err(ParameterError::NonFinite { id: spec.id, value });
    }

    let snapped = spec.snap(value);
    spec.apply(options, snapped);
    log::debug!("parameter {} = {snapped} (requested {value})", spec.id);
    Ok(snapped)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterExport {
    pub id: &'static str,
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub value: f64,
}

#[must_use]
pub fn export_parameters(options: &CalabiYauOptions) -> Vec<ParameterExport> {
    PARAMETERS
        .iter()
        .map(|spec| ParameterExport {
            id: spec.id,
            name: spec.name,
            min: spec.min,
            max: spec.max,
            step: spec.step,
            value: spec.get(options),
        })
        .collect()
}

/// Camera framing of the reference render. Only carried as metadata for
/// viewers; nothing in this crate renders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferenceView {
    pub eye: [f64; 3],
    pub center: [f64; 3],
    pub up: [f64; 3],
    pub fovy: f64,
    pub width: f64,
    pub height: f64,
    pub near: f64,
    pub far: f64,
    pub step: f64,
}

impl ReferenceView {
    pub const DEFAULT: Self = Self {
        eye: [-2.0, -2.0, 8.0],
        center: [0.1, 0.0, 0.0],
        up: [0.0, 1.0, 0.0],
        fovy: 30.0,
        width: 11.0 * 200.0,
        height: 14.0 * 200.0,
        near: 0.1,
        far: 10.0,
        step: 0.01,
    };
}

impl Default for ReferenceView {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_id_and_name() {
        assert_eq!(find_parameter("alpha").unwrap().id, "alpha");
        assert_eq!(find_parameter("  Slice Angle ").unwrap().id, "alpha");
        assert_eq!(find_parameter("samples").unwrap().id, "count");
        assert!(find_parameter("").is_none());
        assert!(find_parameter("unknown").is_none());
    }

    #[test]
    fn values_are_clamped_and_snapped() {
        let mut options = CalabiYauOptions::default();

        assert_eq!(set_parameter(&mut options, "count", 1.0), Ok(2.0));
        assert_eq!(options.count, 2);

        assert_eq!(set_parameter(&mut options, "n", 3.4), Ok(3.0));
        assert_eq!(options.n, 3);

        assert_eq!(set_parameter(&mut options, "n", 500.0), Ok(12.0));
        assert_eq!(options.n, 12);

        let r = set_parameter(&mut options, "r_min", -0.52).unwrap();
        assert!((r + 0.5).abs() < 1e-9);
        assert!((options.r_min + 0.5).abs() < 1e-9);
    }

    #[test]
    fn invalid_updates_leave_options_untouched() {
        let mut options = CalabiYauOptions::default();
        assert!(matches!(
            set_parameter(&mut options, "bogus", 1.0),
            Err(ParameterError::Unknown(_))
        ));
        assert!(matches!(
            set_parameter(&mut options, "alpha", f64::NAN),
            Err(ParameterError::NonFinite { id: "alpha", .. })
        ));
        assert_eq!(options, CalabiYauOptions::default());
    }

    #[test]
    fn every_parameter_writes_its_own_field() {
        for spec in PARAMETERS {
            let mut options = CalabiYauOptions::default();
            let target = spec.snap(spec.min + 2.0 * spec.step);
            set_parameter(&mut options, spec.id, target).unwrap();
            assert_eq!(spec.get(&options), target, "{}", spec.id);

            let untouched = PARAMETERS
                .iter()
                .filter(|other| other.id != spec.id)
                .all(|other| other.get(&options) == other.get(&CalabiYauOptions::default()));
            assert!(untouched, "{} changed another field", spec.id);
        }
    }

    #[test]
    fn export_reports_current_values() {
        let options = CalabiYauOptions::default();
        let exported = export_parameters(&options);
        assert_eq!(exported.len(), PARAMETERS.len());
        let count = exported.iter().find(|p| p.id == "count").unwrap();
        assert_eq!(count.value, 16.0);
        let r_max = exported.iter().find(|p| p.id == "r_max").unwrap();
        assert_eq!(r_max.value, 1.0);
    }

    #[test]
    fn reference_view_matches_reference_render() {
        let view = ReferenceView::default();
        assert_eq!(view.eye, [-2.0, -2.0, 8.0]);
        assert_eq!(view.width, 2200.0);
        assert_eq!(view.height, 2800.0);
    }
}
