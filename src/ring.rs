// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Ring primitives: signed area, orientation, and point containment.
//
// Sign convention: counter-clockwise rings (x east, y north) have positive
// signed area. Every orientation decision in the crate goes through
// `signed_area`, so shells, holes and output rings agree on it.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geom::{orient, vert_eq, Coord, Real};
use crate::geometry::{validate_ring, Geometry, Ring};

/// Where a point lies relative to a ring.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Containment {
    Inside,
    Outside,
    Boundary,
}

/// Shoelace area of a vertex sequence. A trailing closing position is
/// optional; an open sequence is closed implicitly.
pub fn signed_area(coords: &[Coord]) -> Real {
    let n = coords.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for w in coords.windows(2) {
        sum += (w[1].x + w[0].x) * (w[1].y - w[0].y);
    }
    let (first, last) = (coords[0], coords[n - 1]);
    if !vert_eq(first, last) {
        sum += (first.x + last.x) * (first.y - last.y);
    }
    sum / 2.0
}

/// True iff the ring winds clockwise. Collinear (zero-area) rings are
/// reported as counter-clockwise.
#[inline]
pub fn is_clockwise(ring: &Ring) -> bool {
    ring.is_clockwise()
}

/// Orientation of a raw closed coordinate ring, validated first.
pub fn boolean_clockwise(coords: &[Coord]) -> Result<bool> {
    validate_ring(coords)?;
    Ok(signed_area(coords) < 0.0)
}

/// Returns true if `p` lies on the closed segment `ab`.
#[inline]
pub fn on_segment(p: Coord, a: Coord, b: Coord) -> bool {
    orient(a, b, p) == 0.0
        && p.x >= a.x.min(b.x)
        && p.x <= a.x.max(b.x)
        && p.y >= a.y.min(b.y)
        && p.y <= a.y.max(b.y)
}

/// Winding-number containment test. Boundary points are detected exactly.
pub fn ring_containment(p: Coord, coords: &[Coord]) -> Containment {
    let n = coords.len();
    if n < 2 {
        return Containment::Outside;
    }
    let mut winding = 0i32;
    let closing = !vert_eq(coords[0], coords[n - 1]);
    let pairs = coords
        .windows(2)
        .map(|w| (w[0], w[1]))
        .chain(closing.then(|| (coords[n - 1], coords[0])));
    for (a, b) in pairs {
        if on_segment(p, a, b) {
            return Containment::Boundary;
        }
        winding += crossing(p, a, b, 1);
    }
    if winding != 0 {
        Containment::Inside
    } else {
        Containment::Outside
    }
}

/// Winding contribution of the directed, weighted edge `a -> b` to the
/// winding number at `p`. `p` must not lie on the edge.
#[inline]
pub(crate) fn crossing(p: Coord, a: Coord, b: Coord, weight: i32) -> i32 {
    if a.y <= p.y {
        if b.y > p.y && orient(a, b, p) > 0.0 {
            return weight;
        }
    } else if b.y <= p.y && orient(a, b, p) < 0.0 {
        return -weight;
    }
    0
}

/// Point-in-ring test on a raw closed ring, validated first.
/// Boundary points count as inside unless `ignore_boundary` is set.
pub fn point_in_ring(p: Coord, coords: &[Coord], ignore_boundary: bool) -> Result<bool> {
    validate_ring(coords)?;
    Ok(match ring_containment(p, coords) {
        Containment::Inside => true,
        Containment::Outside => false,
        Containment::Boundary => !ignore_boundary,
    })
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PointInPolygonOptions {
    /// Report points on an edge or vertex as outside.
    pub ignore_boundary: bool,
}

/// Point-in-polygon for `Polygon` and `MultiPolygon` geometries. Holes
/// exclude their interior; a point on a hole's edge is a boundary point.
pub fn boolean_point_in_polygon(
    p: Coord,
    geometry: &Geometry,
    opts: &PointInPolygonOptions,
) -> Result<bool> {
    let polygons = geometry.polygons()?;
    if let Some(bbox) = geometry.bbox() {
        if !bbox.contains(p) {
            return Ok(false);
        }
    }
    for poly in polygons {
        match polygon_containment(p, poly.rings()) {
            Containment::Inside => return Ok(true),
            Containment::Boundary => return Ok(!opts.ignore_boundary),
            Containment::Outside => {}
        }
    }
    Ok(false)
}

/// Containment against a shell and its holes.
pub(crate) fn polygon_containment(p: Coord, rings: &[Ring]) -> Containment {
    let Some((shell, holes)) = rings.split_first() else {
        return Containment::Outside;
    };
    match ring_containment(p, shell.coords()) {
        Containment::Inside => {}
        other => return other,
    }
    for hole in holes {
        match ring_containment(p, hole.coords()) {
            Containment::Inside => return Containment::Outside,
            Containment::Boundary => return Containment::Boundary,
            Containment::Outside => {}
        }
    }
    Containment::Inside
}
