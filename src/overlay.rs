// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Overlay driver: noding, mesh construction, face labeling, edge selection
// and ring assembly for two tagged operands.

mod assemble;

use crate::error::Result;
use crate::geom::{Coord, Real};
use crate::geometry::{MultiPolygon, Polygon};
use crate::label::label_faces;
use crate::mesh::Mesh;
use crate::noding::{NodedGraph, Noder, Operand};

/// Rule turning a face's winding number into inside/outside.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WindingRule {
    Odd,
    NonZero,
    Positive,
    Negative,
    AbsGeqTwo,
}

impl WindingRule {
    #[inline]
    pub fn is_inside(self, n: i32) -> bool {
        match self {
            WindingRule::Odd => n & 1 != 0,
            WindingRule::NonZero => n != 0,
            WindingRule::Positive => n > 0,
            WindingRule::Negative => n < 0,
            WindingRule::AbsGeqTwo => n >= 2 || n <= -2,
        }
    }
}

/// The four Boolean set operations.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BooleanOp {
    Union,
    Intersection,
    Difference,
    SymDifference,
}

impl BooleanOp {
    /// Truth table: is a point inside A / inside B part of the result?
    #[inline]
    pub fn contains(self, in_a: bool, in_b: bool) -> bool {
        match self {
            BooleanOp::Union => in_a || in_b,
            BooleanOp::Intersection => in_a && in_b,
            BooleanOp::Difference => in_a && !in_b,
            BooleanOp::SymDifference => in_a != in_b,
        }
    }
}

/// One overlay computation. Rings are added per operand, then `compute`
/// consumes the driver.
pub struct Overlay {
    noder: Noder,
    rule: WindingRule,
}

impl Overlay {
    pub fn new(tolerance: Real, rule: WindingRule) -> Self {
        Overlay {
            noder: Noder::new(tolerance),
            rule,
        }
    }

    /// Adds a closed ring with the orientation it already has.
    pub fn add_ring(&mut self, coords: &[Coord], operand: Operand) {
        self.noder.add_ring(coords, operand);
    }

    pub fn add_polygon(&mut self, polygon: &Polygon, operand: Operand) {
        for ring in polygon.rings() {
            self.add_ring(ring.coords(), operand);
        }
    }

    /// Runs the pipeline and returns the polygons covering the region where
    /// `op` holds. An empty result is an empty MultiPolygon.
    pub fn compute(self, op: BooleanOp) -> Result<MultiPolygon> {
        let graph = self.noder.node()?;
        extract(&graph, self.rule, op)
    }

    /// Like `compute`, but returns `None` when noding leaves the input as
    /// simple closed chains: no splits, no shared nodes, no merged edges.
    pub fn compute_if_kinked(self, op: BooleanOp) -> Result<Option<MultiPolygon>> {
        let segments = self.noder.segment_count();
        let graph = self.noder.node()?;
        if graph.is_simple_cycles(segments) {
            return Ok(None);
        }
        extract(&graph, self.rule, op).map(Some)
    }
}

fn extract(graph: &NodedGraph, rule: WindingRule, op: BooleanOp) -> Result<MultiPolygon> {
    if graph.edges.is_empty() {
        log::debug!("overlay {:?}: no edges survive noding", op);
        return Ok(MultiPolygon::default());
    }
    let mut mesh = Mesh::from_noded(graph);
    label_faces(&mut mesh)?;

    let inside: Vec<bool> = mesh
        .faces
        .iter()
        .map(|f| op.contains(rule.is_inside(f.winding[0]), rule.is_inside(f.winding[1])))
        .collect();
    let result = assemble::assemble(&mesh, &inside)?;
    log::debug!(
        "overlay {:?}: {} faces, {} in result, {} polygons",
        op,
        mesh.faces.len(),
        inside.iter().filter(|&&b| b).count(),
        result.len()
    );
    Ok(result)
}
