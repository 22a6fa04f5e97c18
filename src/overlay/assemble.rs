// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Ring assembly: walks the selected boundary half-edges into closed rings
// and nests holes into shells.

use std::collections::HashMap;

use crate::error::{ClipError, Result};
use crate::geom::{Coord, Real};
use crate::geometry::{MultiPolygon, Polygon, Ring};
use crate::mesh::{sym, EdgeIdx, Mesh};
use crate::ring::{ring_containment, signed_area, Containment};

/// Builds result polygons from the faces marked `inside`. A half-edge is on
/// the result boundary iff its left face is inside and its right face is not.
pub(super) fn assemble(mesh: &Mesh, inside: &[bool]) -> Result<MultiPolygon> {
    let n = mesh.edges.len();
    let selected: Vec<bool> = (0..n as EdgeIdx)
        .map(|e| {
            inside[mesh.edges[e as usize].lface as usize] && !inside[mesh.rface(e) as usize]
        })
        .collect();

    let mut visited = vec![false; n];
    let mut shells: Vec<(Vec<Coord>, Real)> = Vec::new();
    let mut holes: Vec<(Vec<Coord>, Real)> = Vec::new();
    for start in 0..n {
        if !selected[start] || visited[start] {
            continue;
        }
        let walked = walk(mesh, &selected, &mut visited, start as EdgeIdx)?;
        for coords in split_at_repeats(walked) {
            if coords.len() < 3 {
                log::warn!("dropping ring of {} vertices", coords.len());
                continue;
            }
            let area = signed_area(&coords);
            if area > 0.0 {
                shells.push((coords, area));
            } else if area < 0.0 {
                holes.push((coords, area));
            } else {
                log::warn!("dropping zero-area ring of {} vertices", coords.len());
            }
        }
    }

    shells.sort_by(|a, b| b.1.total_cmp(&a.1));
    let shells: Vec<(Ring, Real)> = shells
        .into_iter()
        .map(|(c, a)| (Ring::from_open_loop(c), a))
        .collect();

    let mut holes_of: Vec<Vec<Ring>> = vec![Vec::new(); shells.len()];
    for (hole, area) in holes {
        let owner = shells
            .iter()
            .enumerate()
            .filter(|(_, (shell, shell_area))| *shell_area > -area && hole_inside(&hole, shell))
            .min_by(|a, b| a.1 .1.total_cmp(&b.1 .1))
            .map(|(i, _)| i);
        match owner {
            Some(i) => holes_of[i].push(Ring::from_open_loop(hole)),
            None => {
                return Err(ClipError::assembly(format!(
                    "hole of area {} has no enclosing shell",
                    -area
                )))
            }
        }
    }

    log::trace!("assembled {} shells", shells.len());
    Ok(MultiPolygon(
        shells
            .into_iter()
            .zip(holes_of)
            .map(|((shell, _), holes)| Polygon::new(shell, holes))
            .collect(),
    ))
}

/// Follows selected half-edges from `start` until the ring closes. At each
/// node the next edge is the first selected one clockwise from the reverse
/// of the incoming edge, which keeps the result interior on the left.
fn walk(mesh: &Mesh, selected: &[bool], visited: &mut [bool], start: EdgeIdx) -> Result<Vec<Coord>> {
    let bound = mesh.edges.len();
    let mut coords = Vec::new();
    let mut e = start;
    for _ in 0..bound {
        visited[e as usize] = true;
        coords.push(mesh.org_coords(e));
        let next = next_selected(mesh, selected, e)?;
        if next == start {
            coords.dedup();
            return Ok(coords);
        }
        if visited[next as usize] {
            return Err(ClipError::assembly(format!(
                "ring walk from edge {} re-entered edge {}",
                start, next
            )));
        }
        e = next;
    }
    Err(ClipError::assembly(format!(
        "ring walk from edge {} exceeded {} steps",
        start, bound
    )))
}

/// Cuts a walked loop into simple loops wherever a vertex repeats. A face
/// boundary touching itself (a hole meeting its shell, two holes meeting)
/// passes through the contact vertex twice.
fn split_at_repeats(coords: Vec<Coord>) -> Vec<Vec<Coord>> {
    fn key(p: Coord) -> (u64, u64) {
        ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits())
    }
    let mut loops = Vec::new();
    let mut stack: Vec<Coord> = Vec::with_capacity(coords.len());
    let mut seen: HashMap<(u64, u64), usize> = HashMap::new();
    for p in coords {
        if let Some(&at) = seen.get(&key(p)) {
            let tail: Vec<Coord> = stack.drain(at + 1..).collect();
            for &q in &tail {
                seen.remove(&key(q));
            }
            log::trace!("splitting {} vertices off at ({}, {})", tail.len(), p.x, p.y);
            let mut sub = Vec::with_capacity(tail.len() + 1);
            sub.push(p);
            sub.extend(tail);
            loops.push(sub);
        } else {
            seen.insert(key(p), stack.len());
            stack.push(p);
        }
    }
    loops.push(stack);
    loops
}

fn next_selected(mesh: &Mesh, selected: &[bool], e: EdgeIdx) -> Result<EdgeIdx> {
    let s = sym(e);
    let mut cand = mesh.edges[s as usize].oprev;
    loop {
        if selected[cand as usize] {
            return Ok(cand);
        }
        if cand == s {
            break;
        }
        cand = mesh.edges[cand as usize].oprev;
    }
    Err(ClipError::assembly(format!(
        "no outgoing boundary edge after edge {}",
        e
    )))
}

/// Decides containment from the first hole vertex that is not on the
/// shell boundary, falling back to edge midpoints.
fn hole_inside(hole: &[Coord], shell: &Ring) -> bool {
    let n = hole.len();
    let midpoints = (0..n).map(|i| hole[i].midpoint(hole[(i + 1) % n]));
    for p in hole.iter().copied().chain(midpoints) {
        match ring_containment(p, shell.coords()) {
            Containment::Inside => return true,
            Containment::Outside => return false,
            Containment::Boundary => {}
        }
    }
    false
}
