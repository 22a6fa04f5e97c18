// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Half-edge graph of the noded arrangement.
//
// Design:
//   - INVALID: u32::MAX  (null index)
//   - Half-edges allocated in pairs: edges[i] and edges[i^1] are always a pair.
//     sym(e) = e ^ 1.  Even index runs org -> dst of the noded edge.
//   - Around every vertex the outgoing half-edges are sorted counter-clockwise
//     by angle from the positive x-axis; onext/oprev link that order.
//   - lnext(e) is the outgoing edge at dst(e) immediately clockwise of sym(e),
//     so following lnext walks the face on the left of e.

use crate::geom::{angle_cmp, vert_cmp, Coord};
use crate::noding::NodedGraph;

pub const INVALID: u32 = u32::MAX;

/// Index into Mesh::verts
pub type VertIdx = u32;
/// Index into Mesh::faces
pub type FaceIdx = u32;
/// Index into Mesh::edges
pub type EdgeIdx = u32;
/// Connected component id
pub type CompIdx = u32;

/// Compute the symmetric half-edge index (always the other half of the pair).
#[inline(always)]
pub fn sym(e: EdgeIdx) -> EdgeIdx {
    e ^ 1
}

#[derive(Clone, Debug)]
pub struct Vertex {
    pub coords: Coord,
    /// First outgoing edge in CCW order, INVALID for an isolated node.
    pub an_edge: EdgeIdx,
    pub component: CompIdx,
}

#[derive(Clone, Debug)]
pub struct HalfEdge {
    /// Origin vertex index.
    pub org: VertIdx,
    /// Next edge CCW around the origin vertex.
    pub onext: EdgeIdx,
    /// Next edge CW around the origin vertex.
    pub oprev: EdgeIdx,
    /// Next edge around the left face.
    pub lnext: EdgeIdx,
    /// Left face index.
    pub lface: FaceIdx,
    /// Winding change per operand when crossing this edge from right to left.
    pub wind: [i32; 2],
}

impl Default for HalfEdge {
    fn default() -> Self {
        Self {
            org: INVALID,
            onext: INVALID,
            oprev: INVALID,
            lnext: INVALID,
            lface: INVALID,
            wind: [0, 0],
        }
    }
}

#[derive(Clone, Debug)]
pub struct Face {
    /// Any half-edge with this face on its left.
    pub an_edge: EdgeIdx,
    /// Winding number per operand, valid once `labeled` is set.
    pub winding: [i32; 2],
    pub labeled: bool,
}

/// The half-edge graph.
pub struct Mesh {
    pub verts: Vec<Vertex>,
    pub edges: Vec<HalfEdge>,
    pub faces: Vec<Face>,
    /// Lexicographically lowest vertex of each component.
    pub component_roots: Vec<VertIdx>,
}

impl Mesh {
    /// Builds the graph from noded edges: pairs, angular order, faces,
    /// components.
    pub fn from_noded(graph: &NodedGraph) -> Self {
        let mut m = Mesh {
            verts: graph
                .coords
                .iter()
                .map(|&c| Vertex { coords: c, an_edge: INVALID, component: INVALID })
                .collect(),
            edges: Vec::with_capacity(graph.edges.len() * 2),
            faces: Vec::new(),
            component_roots: Vec::new(),
        };
        for ne in &graph.edges {
            m.edges.push(HalfEdge { org: ne.org, wind: ne.wind, ..HalfEdge::default() });
            m.edges.push(HalfEdge {
                org: ne.dst,
                wind: [-ne.wind[0], -ne.wind[1]],
                ..HalfEdge::default()
            });
        }
        m.link_vertex_rings();
        m.link_faces();
        m.find_components();
        log::debug!(
            "mesh: {} half-edges, {} faces, {} components",
            m.edges.len(),
            m.faces.len(),
            m.component_roots.len()
        );
        m
    }

    // ──────────────── Navigation helpers ────────────────

    /// Destination vertex of e (= org of Sym).
    #[inline]
    pub fn dst(&self, e: EdgeIdx) -> VertIdx {
        self.edges[sym(e) as usize].org
    }

    /// Right face of e (= lface of Sym).
    #[inline]
    pub fn rface(&self, e: EdgeIdx) -> FaceIdx {
        self.edges[sym(e) as usize].lface
    }

    #[inline]
    pub fn org_coords(&self, e: EdgeIdx) -> Coord {
        self.verts[self.edges[e as usize].org as usize].coords
    }

    #[inline]
    pub fn dst_coords(&self, e: EdgeIdx) -> Coord {
        self.verts[self.dst(e) as usize].coords
    }

    /// Direction vector of e.
    #[inline]
    pub fn direction(&self, e: EdgeIdx) -> Coord {
        self.dst_coords(e).sub(self.org_coords(e))
    }

    /// Outgoing edges of v in CCW order, starting at `an_edge`.
    pub fn outgoing(&self, v: VertIdx) -> Vec<EdgeIdx> {
        let first = self.verts[v as usize].an_edge;
        let mut out = Vec::new();
        if first == INVALID {
            return out;
        }
        let mut e = first;
        loop {
            out.push(e);
            e = self.edges[e as usize].onext;
            if e == first {
                break;
            }
        }
        out
    }

    /// Half-edges of the face cycle through e.
    pub fn face_cycle(&self, e: EdgeIdx) -> Vec<EdgeIdx> {
        let mut out = Vec::new();
        let mut cur = e;
        loop {
            out.push(cur);
            cur = self.edges[cur as usize].lnext;
            if cur == e || out.len() > self.edges.len() {
                break;
            }
        }
        out
    }

    /// The outgoing edge at v whose left sector (up to its onext) contains
    /// direction `dir`.
    pub fn edge_before(&self, v: VertIdx, dir: Coord) -> EdgeIdx {
        let out = self.outgoing(v);
        // an_edge is the smallest angle, so `out` is sorted.
        let mut best = match out.last() {
            Some(&e) => e,
            None => return INVALID,
        };
        for &e in &out {
            if angle_cmp(self.direction(e), dir) == std::cmp::Ordering::Less {
                best = e;
            } else {
                break;
            }
        }
        best
    }

    // ──────────────── Construction ────────────────

    fn link_vertex_rings(&mut self) {
        let mut around: Vec<Vec<EdgeIdx>> = vec![Vec::new(); self.verts.len()];
        for (e, he) in self.edges.iter().enumerate() {
            around[he.org as usize].push(e as EdgeIdx);
        }
        for (v, mut out) in around.into_iter().enumerate() {
            if out.is_empty() {
                continue;
            }
            out.sort_by(|&a, &b| {
                angle_cmp(self.direction(a), self.direction(b))
                    .then_with(|| vert_cmp(self.dst_coords(a), self.dst_coords(b)))
            });
            let n = out.len();
            for i in 0..n {
                let e = out[i];
                self.edges[e as usize].onext = out[(i + 1) % n];
                self.edges[e as usize].oprev = out[(i + n - 1) % n];
            }
            self.verts[v].an_edge = out[0];
        }
        for e in 0..self.edges.len() as EdgeIdx {
            self.edges[e as usize].lnext = self.edges[sym(e) as usize].oprev;
        }
    }

    fn link_faces(&mut self) {
        for start in 0..self.edges.len() as EdgeIdx {
            if self.edges[start as usize].lface != INVALID {
                continue;
            }
            let f = self.faces.len() as FaceIdx;
            let mut e = start;
            loop {
                self.edges[e as usize].lface = f;
                e = self.edges[e as usize].lnext;
                if e == start {
                    break;
                }
            }
            self.faces.push(Face { an_edge: start, winding: [0, 0], labeled: false });
        }
    }

    fn find_components(&mut self) {
        let n = self.verts.len();
        let mut parent: Vec<usize> = (0..n).collect();
        fn find(parent: &mut [usize], mut x: usize) -> usize {
            while parent[x] != x {
                parent[x] = parent[parent[x]];
                x = parent[x];
            }
            x
        }
        for e in (0..self.edges.len()).step_by(2) {
            let a = find(&mut parent, self.edges[e].org as usize);
            let b = find(&mut parent, self.edges[e + 1].org as usize);
            if a != b {
                parent[a.max(b)] = a.min(b);
            }
        }

        let mut comp_of_root: Vec<CompIdx> = vec![INVALID; n];
        for v in 0..n {
            if self.verts[v].an_edge == INVALID {
                continue;
            }
            let r = find(&mut parent, v);
            let c = if comp_of_root[r] == INVALID {
                let c = self.component_roots.len() as CompIdx;
                comp_of_root[r] = c;
                self.component_roots.push(v as VertIdx);
                c
            } else {
                comp_of_root[r]
            };
            self.verts[v].component = c;
            let root = self.component_roots[c as usize];
            if vert_cmp(self.verts[v].coords, self.verts[root as usize].coords) == std::cmp::Ordering::Less {
                self.component_roots[c as usize] = v as VertIdx;
            }
        }
    }
}
