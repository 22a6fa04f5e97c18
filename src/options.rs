// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Per-call configuration. Nothing here is process-wide: every overlay call
// resolves its own snapping tolerance from the options and the input extent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ClipError, Result};
use crate::geom::Real;

/// Default snapping epsilon, relative to the largest coordinate magnitude.
pub const DEFAULT_RELATIVE_TOLERANCE: Real = 1e-10;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipOptions {
    /// Properties attached to the output feature.
    pub properties: Option<Map<String, Value>>,
    /// Absolute snapping distance. `None` derives one from the input extent.
    pub tolerance: Option<Real>,
}

impl ClipOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(mut self, tolerance: Real) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    pub fn with_properties(mut self, properties: Map<String, Value>) -> Self {
        self.properties = Some(properties);
        self
    }

    /// Snapping distance for inputs whose largest absolute coordinate is
    /// `magnitude`.
    pub fn resolve_tolerance(&self, magnitude: Real) -> Result<Real> {
        match self.tolerance {
            Some(t) if !t.is_finite() || t < 0.0 => Err(ClipError::invalid(format!(
                "tolerance must be finite and non-negative, got {}",
                t
            ))),
            Some(t) => Ok(t),
            None => Ok(DEFAULT_RELATIVE_TOLERANCE * magnitude.abs().max(1.0)),
        }
    }
}
