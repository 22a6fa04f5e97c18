// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Noding: turns tagged input rings into a set of edges that meet only at
// shared nodes.
//
// Every vertex is snapped through a NodeTable (points within `tolerance` of
// an existing node reuse it). Segment pairs are found with a sweep over
// segments sorted by their left end; each candidate pair is classified as
//   - an endpoint lying on the other segment (T-junction or collinear
//     overlap): the other segment is split at that endpoint's node,
//   - a proper crossing: both segments are split at the snapped
//     intersection node.
// Snapped nodes can move a split point off its segment by up to
// `tolerance`, which can create new crossings, so the pass repeats until a
// round adds no split.
//
// Coincident segments are merged into one undirected edge carrying a
// winding delta per operand.

use std::collections::{BTreeMap, HashMap};

use crate::error::{ClipError, Result};
use crate::geom::{edge_intersect, orient, segment_distance, segment_param, vert_cmp, Coord, Real};
use crate::ring::on_segment;

/// Index into NodeTable::coords
pub type NodeIdx = u32;

/// Rounds of intersection passes before giving up.
pub const MAX_NODING_ROUNDS: usize = 8;

/// Which input an edge came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operand {
    A = 0,
    B = 1,
}

impl Operand {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Node coordinates with tolerance snapping.
pub struct NodeTable {
    coords: Vec<Coord>,
    tolerance: Real,
    exact: HashMap<(u64, u64), NodeIdx>,
    grid: HashMap<(i64, i64), Vec<NodeIdx>>,
}

impl NodeTable {
    pub fn new(tolerance: Real) -> Self {
        NodeTable {
            coords: Vec::new(),
            tolerance,
            exact: HashMap::new(),
            grid: HashMap::new(),
        }
    }

    #[inline]
    pub fn coord(&self, n: NodeIdx) -> Coord {
        self.coords[n as usize]
    }

    pub(crate) fn len(&self) -> usize {
        self.coords.len()
    }

    #[inline]
    fn cell(&self, p: Coord) -> (i64, i64) {
        ((p.x / self.tolerance).floor() as i64, (p.y / self.tolerance).floor() as i64)
    }

    /// Returns the node for `p`, reusing the first node within tolerance.
    pub fn snap(&mut self, p: Coord) -> NodeIdx {
        // -0.0 and 0.0 must hash alike
        let key = ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits());
        if let Some(&n) = self.exact.get(&key) {
            return n;
        }
        if self.tolerance > 0.0 {
            let (cx, cy) = self.cell(p);
            let mut best: Option<(Real, NodeIdx)> = None;
            for dx in -1..=1 {
                for dy in -1..=1 {
                    let Some(bucket) = self.grid.get(&(cx + dx, cy + dy)) else {
                        continue;
                    };
                    for &n in bucket {
                        let d = p.sub(self.coords[n as usize]);
                        let dist = d.dot(d).sqrt();
                        if dist <= self.tolerance && best.map_or(true, |(bd, _)| dist < bd) {
                            best = Some((dist, n));
                        }
                    }
                }
            }
            if let Some((_, n)) = best {
                self.exact.insert(key, n);
                return n;
            }
        }
        let n = self.coords.len() as NodeIdx;
        self.coords.push(p);
        self.exact.insert(key, n);
        if self.tolerance > 0.0 {
            let cell = self.cell(p);
            self.grid.entry(cell).or_default().push(n);
        }
        n
    }
}

/// A directed piece of an input ring between two nodes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub org: NodeIdx,
    pub dst: NodeIdx,
    pub operand: Operand,
}

/// An undirected edge of the noded arrangement, `org < dst`.
/// `wind[k]` is the winding-number change for operand k when crossing the
/// edge from its right side to its left side (seen from org toward dst).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NodedEdge {
    pub org: NodeIdx,
    pub dst: NodeIdx,
    pub wind: [i32; 2],
}

/// Output of the noding engine.
pub struct NodedGraph {
    pub coords: Vec<Coord>,
    pub edges: Vec<NodedEdge>,
}

impl NodedGraph {
    /// True when the `segments` input segments came through noding as
    /// disjoint simple cycles: none split, merged or cancelled, and every
    /// node used by exactly two edges.
    pub fn is_simple_cycles(&self, segments: usize) -> bool {
        if self.edges.len() != segments || segments < 3 {
            return false;
        }
        let mut degree = vec![0u32; self.coords.len()];
        for e in &self.edges {
            degree[e.org as usize] += 1;
            degree[e.dst as usize] += 1;
        }
        degree.iter().all(|&d| d == 0 || d == 2)
    }
}

/// Accumulates rings, then nodes them all at once.
pub struct Noder {
    table: NodeTable,
    segments: Vec<Segment>,
}

impl Noder {
    pub fn new(tolerance: Real) -> Self {
        Noder {
            table: NodeTable::new(tolerance),
            segments: Vec::new(),
        }
    }

    /// Number of segments added so far.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Adds a closed ring (first == last) in the direction given.
    pub fn add_ring(&mut self, coords: &[Coord], operand: Operand) {
        let nodes: Vec<NodeIdx> = coords.iter().map(|&p| self.table.snap(p)).collect();
        let before = self.segments.len();
        for w in nodes.windows(2) {
            if w[0] != w[1] {
                self.segments.push(Segment { org: w[0], dst: w[1], operand });
            }
        }
        if self.segments.len() - before < 3 {
            log::warn!(
                "ring of {} positions collapsed to {} segments under snapping",
                coords.len(),
                self.segments.len() - before
            );
        }
    }

    /// Splits segments at every intersection, then merges coincident ones.
    pub fn node(mut self) -> Result<NodedGraph> {
        let mut converged = false;
        for round in 0..MAX_NODING_ROUNDS {
            let splits = find_splits(&self.segments, &mut self.table);
            let split_count: usize = splits.iter().map(Vec::len).sum();
            log::debug!(
                "noding round {}: {} segments, {} nodes, {} splits",
                round,
                self.segments.len(),
                self.table.len(),
                split_count
            );
            if split_count == 0 {
                converged = true;
                break;
            }
            self.segments = apply_splits(&self.segments, splits, &self.table);
        }
        if !converged {
            return Err(ClipError::NodingFailure { rounds: MAX_NODING_ROUNDS });
        }
        Ok(merge_segments(&self.segments, self.table.coords))
    }
}

/// Axis-aligned extent of a segment.
struct Extent {
    min: Coord,
    max: Coord,
}

fn extent(a: Coord, b: Coord) -> Extent {
    Extent {
        min: Coord::new(a.x.min(b.x), a.y.min(b.y)),
        max: Coord::new(a.x.max(b.x), a.y.max(b.y)),
    }
}

/// One sweep over all segments. Returns, per segment, the nodes at which it
/// must be split.
fn find_splits(segments: &[Segment], table: &mut NodeTable) -> Vec<Vec<NodeIdx>> {
    let tol = table.tolerance;
    let extents: Vec<Extent> = segments
        .iter()
        .map(|s| extent(table.coord(s.org), table.coord(s.dst)))
        .collect();
    let mut order: Vec<usize> = (0..segments.len()).collect();
    order.sort_by(|&i, &j| extents[i].min.x.total_cmp(&extents[j].min.x));

    let mut splits: Vec<Vec<NodeIdx>> = vec![Vec::new(); segments.len()];
    let mut active: Vec<usize> = Vec::new();
    for &i in &order {
        let ei = &extents[i];
        active.retain(|&j| extents[j].max.x >= ei.min.x - tol);
        for &j in &active {
            let ej = &extents[j];
            if ej.max.y < ei.min.y - tol || ei.max.y < ej.min.y - tol {
                continue;
            }
            intersect_pair(segments[i], segments[j], table, |seg, n| {
                let k = if seg == 0 { i } else { j };
                splits[k].push(n);
            });
        }
        active.push(i);
    }

    for (k, s) in splits.iter_mut().enumerate() {
        let seg = segments[k];
        s.retain(|&n| n != seg.org && n != seg.dst);
        s.sort_unstable();
        s.dedup();
    }
    splits
}

/// Classifies one segment pair and reports split nodes through `split`
/// (`0` = first segment, `1` = second).
fn intersect_pair<F>(s: Segment, t: Segment, table: &mut NodeTable, mut split: F)
where
    F: FnMut(u8, NodeIdx),
{
    let tol = table.tolerance;
    let (a, b) = (table.coord(s.org), table.coord(s.dst));
    let (c, d) = (table.coord(t.org), table.coord(t.dst));

    let near = |p: Coord, u: Coord, v: Coord| on_segment(p, u, v) || segment_distance(p, u, v) <= tol;

    let mut touched = false;
    for (n, p) in [(t.org, c), (t.dst, d)] {
        if n != s.org && n != s.dst && near(p, a, b) {
            split(0, n);
            touched = true;
        }
    }
    for (n, p) in [(s.org, a), (s.dst, b)] {
        if n != t.org && n != t.dst && near(p, c, d) {
            split(1, n);
            touched = true;
        }
    }
    if touched {
        return;
    }

    let shares_node = s.org == t.org || s.org == t.dst || s.dst == t.org || s.dst == t.dst;
    if shares_node {
        return;
    }
    let o1 = orient(a, b, c);
    let o2 = orient(a, b, d);
    let o3 = orient(c, d, a);
    let o4 = orient(c, d, b);
    let crosses = ((o1 > 0.0 && o2 < 0.0) || (o1 < 0.0 && o2 > 0.0))
        && ((o3 > 0.0 && o4 < 0.0) || (o3 < 0.0 && o4 > 0.0));
    if !crosses {
        return;
    }
    let p = edge_intersect(a, b, c, d);
    let n = table.snap(p);
    log::trace!("crossing at ({}, {}) -> node {}", p.x, p.y, n);
    split(0, n);
    split(1, n);
}

/// Replaces every segment by the chain through its split nodes, ordered
/// along the segment.
fn apply_splits(segments: &[Segment], splits: Vec<Vec<NodeIdx>>, table: &NodeTable) -> Vec<Segment> {
    let mut out = Vec::with_capacity(segments.len() + splits.iter().map(Vec::len).sum::<usize>());
    for (seg, mut nodes) in segments.iter().zip(splits) {
        if nodes.is_empty() {
            out.push(*seg);
            continue;
        }
        let (a, b) = (table.coord(seg.org), table.coord(seg.dst));
        nodes.sort_by(|&m, &n| {
            segment_param(table.coord(m), a, b)
                .total_cmp(&segment_param(table.coord(n), a, b))
                .then(vert_cmp(table.coord(m), table.coord(n)))
        });
        let mut prev = seg.org;
        for n in nodes.into_iter().chain(std::iter::once(seg.dst)) {
            if n != prev {
                out.push(Segment { org: prev, dst: n, operand: seg.operand });
                prev = n;
            }
        }
    }
    out
}

/// Merges coincident segments and drops edges whose deltas cancel.
fn merge_segments(segments: &[Segment], coords: Vec<Coord>) -> NodedGraph {
    let mut merged: BTreeMap<(NodeIdx, NodeIdx), [i32; 2]> = BTreeMap::new();
    for s in segments {
        let (key, sign) = if s.org < s.dst {
            ((s.org, s.dst), 1)
        } else {
            ((s.dst, s.org), -1)
        };
        merged.entry(key).or_insert([0, 0])[s.operand.index()] += sign;
    }
    let edges: Vec<NodedEdge> = merged
        .into_iter()
        .filter(|(_, w)| w[0] != 0 || w[1] != 0)
        .map(|((org, dst), wind)| NodedEdge { org, dst, wind })
        .collect();
    log::debug!("noded graph: {} nodes, {} edges", coords.len(), edges.len());
    NodedGraph { coords, edges }
}
