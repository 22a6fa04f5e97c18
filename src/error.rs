// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Error types shared by every overlay operation.

use thiserror::Error;

/// Errors that can occur while validating or overlaying polygons.
///
/// A legitimately empty result (disjoint intersection, `A - A`) is never an
/// error; operations report it as `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClipError {
    /// Fewer than three distinct vertices, or a zero-area ring where a
    /// positive area is required.
    #[error("degenerate geometry: {reason}")]
    DegenerateGeometry { reason: String },

    /// The intersection pass kept producing new nodes.
    #[error("noding did not stabilize after {rounds} rounds")]
    NodingFailure { rounds: usize },

    /// Inside/outside evidence for an edge contradicts itself.
    #[error("inconsistent winding labels across edge {edge}")]
    LabelingInconsistency { edge: u32 },

    /// A half-edge walk failed to close, or a hole has no enclosing shell.
    #[error("ring assembly failed: {reason}")]
    RingAssembly { reason: String },

    /// Malformed input rejected before any geometric work.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
}

impl ClipError {
    pub(crate) fn degenerate(reason: impl Into<String>) -> Self {
        ClipError::DegenerateGeometry { reason: reason.into() }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        ClipError::InvalidInput { reason: reason.into() }
    }

    pub(crate) fn assembly(reason: impl Into<String>) -> Self {
        ClipError::RingAssembly { reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, ClipError>;
