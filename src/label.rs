// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Face labeling: assigns every face of the mesh a winding number per operand.
//
// Inside one connected component, winding numbers are propagated across
// edges: the face left of e has the winding of the face right of e plus
// e's delta. Each component's unbounded face is seeded with the winding
// number of its lowest vertex against the edges of every other component;
// a component's own closed edge chains contribute nothing out there.

use std::collections::VecDeque;

use crate::error::{ClipError, Result};
use crate::geom::{Coord, Real};
use crate::mesh::{sym, CompIdx, EdgeIdx, FaceIdx, Mesh, INVALID};
use crate::ring::crossing;

/// Winding number of `p` against the weighted edges of the mesh, skipping
/// edges of component `skip` (pass INVALID to use every edge).
pub fn winding_at(mesh: &Mesh, p: Coord, skip: CompIdx) -> [i32; 2] {
    let mut w = [0i32; 2];
    for e in (0..mesh.edges.len() as EdgeIdx).step_by(2) {
        let org = mesh.edges[e as usize].org;
        if skip != INVALID && mesh.verts[org as usize].component == skip {
            continue;
        }
        let (a, b) = (mesh.org_coords(e), mesh.dst_coords(e));
        let wind = mesh.edges[e as usize].wind;
        for k in 0..2 {
            if wind[k] != 0 {
                w[k] += crossing(p, a, b, wind[k]);
            }
        }
    }
    w
}

/// Labels every face; fails if propagation meets contradictory evidence
/// that a direct sample cannot settle.
pub fn label_faces(mesh: &mut Mesh) -> Result<()> {
    for c in 0..mesh.component_roots.len() as CompIdx {
        let root = mesh.component_roots[c as usize];
        let p = mesh.verts[root as usize].coords;
        let seed_edge = mesh.edge_before(root, Coord::new(-1.0, 0.0));
        let outer = mesh.edges[seed_edge as usize].lface;
        let seed = winding_at(mesh, p, c);
        log::trace!("component {} root ({}, {}) seeded with {:?}", c, p.x, p.y, seed);
        propagate(mesh, outer, seed)?;
    }
    Ok(())
}

fn propagate(mesh: &mut Mesh, start: FaceIdx, winding: [i32; 2]) -> Result<()> {
    mesh.faces[start as usize].winding = winding;
    mesh.faces[start as usize].labeled = true;
    let mut queue = VecDeque::from([start]);
    while let Some(f) = queue.pop_front() {
        let wf = mesh.faces[f as usize].winding;
        for e in mesh.face_cycle(mesh.faces[f as usize].an_edge) {
            let s = sym(e);
            let g = mesh.edges[s as usize].lface;
            let d = mesh.edges[s as usize].wind;
            let candidate = [wf[0] + d[0], wf[1] + d[1]];
            let face = &mesh.faces[g as usize];
            if !face.labeled {
                mesh.faces[g as usize].winding = candidate;
                mesh.faces[g as usize].labeled = true;
                queue.push_back(g);
            } else if face.winding != candidate {
                resolve_conflict(mesh, g, candidate, e)?;
            }
        }
    }
    Ok(())
}

/// Two paths gave face `g` different windings. Sample a point inside `g`
/// and keep the existing label only if the sample agrees with it.
fn resolve_conflict(mesh: &Mesh, g: FaceIdx, candidate: [i32; 2], across: EdgeIdx) -> Result<()> {
    let existing = mesh.faces[g as usize].winding;
    match face_sample(mesh, g) {
        Some(p) if winding_at(mesh, p, INVALID) == existing => {
            log::warn!(
                "face {} reached with {:?}, kept {:?} after sampling",
                g,
                candidate,
                existing
            );
            Ok(())
        }
        _ => Err(ClipError::LabelingInconsistency { edge: across }),
    }
}

/// A point strictly inside face `g`, just left of the midpoint of its
/// longest boundary edge.
fn face_sample(mesh: &Mesh, g: FaceIdx) -> Option<Coord> {
    let cycle = mesh.face_cycle(mesh.faces[g as usize].an_edge);
    let e = cycle.into_iter().max_by(|&a, &b| {
        let (da, db) = (mesh.direction(a), mesh.direction(b));
        da.dot(da).total_cmp(&db.dot(db))
    })?;
    let d = mesh.direction(e);
    let len = d.dot(d).sqrt();
    if len == 0.0 {
        return None;
    }
    let m = mesh.org_coords(e).midpoint(mesh.dst_coords(e));
    let step: Real = len * 1e-6;
    Some(Coord::new(m.x - d.y / len * step, m.y + d.x / len * step))
}
