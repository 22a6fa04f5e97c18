// Copyright 2025 Lars Brubaker
// Shared test utilities for polyclip-rust tests.

#![allow(dead_code)]

use polyclip_rust::{
    boolean_point_in_polygon, Coord, Feature, Geometry, PointInPolygonOptions, Polygon, Real,
};

/// Polygon geometry from GeoJSON-style rings.
pub fn polygon(rings: &[&[[Real; 2]]]) -> Geometry {
    let rings = rings
        .iter()
        .map(|r| r.iter().map(|&p| Coord::from(p)).collect())
        .collect();
    Geometry::Polygon(Polygon::from_coords(rings).expect("valid polygon"))
}

/// Axis-aligned rectangle, counter-clockwise.
pub fn rect(x0: Real, y0: Real, x1: Real, y1: Real) -> Geometry {
    polygon(&[&[[x0, y0], [x1, y0], [x1, y1], [x0, y1], [x0, y0]]])
}

/// Area of an optional result feature; `None` counts as zero.
pub fn area_of(f: &Option<Feature>) -> Real {
    f.as_ref().map_or(0.0, |f| f.geometry.area())
}

pub fn assert_area_approx(actual: Real, expected: Real, label: &str) {
    assert!(
        (actual - expected).abs() <= 1e-7 * expected.abs().max(1.0),
        "{}: area {} != expected {}",
        label,
        actual,
        expected
    );
}

/// Strict interior containment of a point in an optional result.
pub fn covers(f: &Option<Feature>, p: Coord) -> bool {
    let strict = PointInPolygonOptions { ignore_boundary: true };
    f.as_ref()
        .map_or(false, |f| boolean_point_in_polygon(p, &f.geometry, &strict).unwrap())
}

/// Grid of sample points offset from integer coordinates so they never
/// land on an edge of integer-aligned test shapes.
pub fn sample_points(min: Real, max: Real, steps: usize) -> Vec<Coord> {
    let d = (max - min) / steps as Real;
    let mut pts = Vec::new();
    for i in 0..steps {
        for j in 0..steps {
            pts.push(Coord::new(
                min + (i as Real + 0.37) * d,
                min + (j as Real + 0.61) * d,
            ));
        }
    }
    pts
}

fn cross(o: Coord, a: Coord, b: Coord) -> Real {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

fn segments_meet_improperly(a: Coord, b: Coord, c: Coord, d: Coord) -> bool {
    let d1 = cross(c, d, a);
    let d2 = cross(c, d, b);
    let d3 = cross(a, b, c);
    let d4 = cross(a, b, d);
    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}

/// True when no two non-adjacent edges of the closed ring cross and no
/// vertex repeats.
pub fn ring_is_simple(ring: &[Coord]) -> bool {
    let n = ring.len() - 1;
    for i in 0..n {
        for j in (i + 1)..n {
            if ring[i] == ring[j] {
                return false;
            }
        }
    }
    for i in 0..n {
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            if segments_meet_improperly(ring[i], ring[i + 1], ring[j], ring[j + 1]) {
                return false;
            }
        }
    }
    true
}

/// Every ring of a polygonal geometry, as raw coordinates.
pub fn rings_of(g: &Geometry) -> Vec<Vec<Coord>> {
    g.polygons()
        .unwrap()
        .iter()
        .flat_map(|p| p.rings())
        .map(|r| r.coords().to_vec())
        .collect()
}

/// Distinct vertices of a closed ring, rotated to start at the lowest one
/// and normalized to counter-clockwise order.
pub fn canonical_ring(ring: &[Coord]) -> Vec<[Real; 2]> {
    let mut pts: Vec<Coord> = ring[..ring.len() - 1].to_vec();
    if polyclip_rust::signed_area(ring) < 0.0 {
        pts.reverse();
    }
    let start = (0..pts.len())
        .min_by(|&i, &j| {
            pts[i]
                .x
                .total_cmp(&pts[j].x)
                .then(pts[i].y.total_cmp(&pts[j].y))
        })
        .unwrap_or(0);
    pts.rotate_left(start);
    pts.into_iter().map(|c| [c.x, c.y]).collect()
}
