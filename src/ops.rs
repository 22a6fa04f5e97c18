// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Public Boolean operations on Polygon / MultiPolygon geometries.
//
// Inputs are validated and orientation-normalized (shell CCW, holes CW)
// before any geometry work, then run through the overlay engine with the
// Positive winding rule. Self-intersecting rings are split into simple
// pieces first, so no lobe of a kinked operand winds negative.

use serde_json::Map;

use crate::error::{ClipError, Result};
use crate::geom::{orient, Coord, Real};
use crate::geometry::{Bbox, Feature, Geometry, MultiPolygon, Polygon, Ring};
use crate::noding::Operand;
use crate::options::ClipOptions;
use crate::overlay::{BooleanOp, Overlay, WindingRule};
use crate::unkink::repair_ring;

/// Union of two polygonal geometries.
pub fn union(a: &Geometry, b: &Geometry, opts: &ClipOptions) -> Result<Option<Feature>> {
    feature_result(overlay(a, b, BooleanOp::Union, opts)?, opts)
}

/// Intersection; `None` when the operands share no area.
pub fn intersect(a: &Geometry, b: &Geometry, opts: &ClipOptions) -> Result<Option<Feature>> {
    feature_result(overlay(a, b, BooleanOp::Intersection, opts)?, opts)
}

/// The part of `a` not covered by `b`.
pub fn difference(a: &Geometry, b: &Geometry, opts: &ClipOptions) -> Result<Option<Feature>> {
    feature_result(overlay(a, b, BooleanOp::Difference, opts)?, opts)
}

/// Symmetric difference.
pub fn xor(a: &Geometry, b: &Geometry, opts: &ClipOptions) -> Result<Option<Feature>> {
    feature_result(overlay(a, b, BooleanOp::SymDifference, opts)?, opts)
}

/// Runs `op` on two geometries and returns the bare result geometry:
/// `None` when empty, a `Polygon` for one part, a `MultiPolygon` otherwise.
pub fn overlay(
    a: &Geometry,
    b: &Geometry,
    op: BooleanOp,
    opts: &ClipOptions,
) -> Result<Option<Geometry>> {
    let (ra, rb) = (a.polygons()?, b.polygons()?);
    let tolerance = opts.resolve_tolerance(max_magnitude(ra).max(max_magnitude(rb)))?;
    let (pa, a_repaired) = normalized_polygons(ra, tolerance)?;
    let (pb, _) = normalized_polygons(rb, tolerance)?;

    if let (Some(ba), Some(bb)) = (polygons_bbox(&pa), polygons_bbox(&pb)) {
        if !ba.intersects(&bb) {
            log::debug!("{:?}: disjoint bounding boxes", op);
            return Ok(match op {
                BooleanOp::Intersection => None,
                BooleanOp::Difference if !a_repaired => Some(a.clone()),
                BooleanOp::Difference => MultiPolygon(pa).into_geometry(),
                BooleanOp::Union | BooleanOp::SymDifference => {
                    Some(Geometry::MultiPolygon(MultiPolygon(pa.into_iter().chain(pb).collect())))
                }
            });
        }
    }

    log::debug!(
        "{:?}: {} + {} polygons, tolerance {}",
        op,
        pa.len(),
        pb.len(),
        tolerance
    );
    let mut engine = Overlay::new(tolerance, WindingRule::Positive);
    for p in &pa {
        engine.add_polygon(p, Operand::A);
    }
    for p in &pb {
        engine.add_polygon(p, Operand::B);
    }
    Ok(engine.compute(op)?.into_geometry())
}

fn feature_result(geometry: Option<Geometry>, opts: &ClipOptions) -> Result<Option<Feature>> {
    Ok(geometry.map(|g| {
        Feature::with_properties(g, opts.properties.clone().unwrap_or_else(Map::new))
    }))
}

/// The polygons with every shell counter-clockwise and every hole
/// clockwise. Rings that cross or touch themselves are first split into
/// simple pieces under the non-zero rule; the flag reports whether any
/// polygon needed that. Collinear rings are rejected.
pub(crate) fn normalized_polygons(polygons: &[Polygon], tolerance: Real) -> Result<(Vec<Polygon>, bool)> {
    let mut out = Vec::with_capacity(polygons.len());
    let mut repaired = false;
    for poly in polygons {
        match normalize_polygon(poly, tolerance)? {
            Normalized::Simple(p) => out.push(p),
            Normalized::Repaired(parts) => {
                repaired = true;
                out.extend(parts.0);
            }
        }
    }
    Ok((out, repaired))
}

enum Normalized {
    Simple(Polygon),
    Repaired(MultiPolygon),
}

fn normalize_polygon(poly: &Polygon, tolerance: Real) -> Result<Normalized> {
    let mut rings: Vec<Ring> = Vec::with_capacity(poly.rings().len());
    let mut kinked = false;
    for (i, ring) in poly.rings().iter().enumerate() {
        let ccw = i == 0;
        if is_collinear(ring.coords()) {
            return Err(ClipError::degenerate(format!(
                "ring of {} positions has zero area",
                ring.len()
            )));
        }
        match repair_ring(ring.coords(), tolerance)? {
            None => rings.push(oriented(ring, ccw)),
            Some(parts) if parts.is_empty() => {
                return Err(ClipError::degenerate(format!(
                    "ring of {} positions encloses no area",
                    ring.len()
                )));
            }
            Some(parts) => {
                log::debug!("ring {} repaired into {} simple parts", i, parts.len());
                kinked = true;
                for part in parts.0 {
                    for r in Vec::<Ring>::from(part) {
                        rings.push(if ccw { r } else { r.reversed() });
                    }
                }
            }
        }
    }
    if !kinked {
        return Ok(Normalized::Simple(Polygon::try_from(rings)?));
    }
    // Shell pieces wind +1 and hole pieces -1, so the positive region is
    // the repaired polygon.
    let mut engine = Overlay::new(tolerance, WindingRule::Positive);
    for r in &rings {
        engine.add_ring(r.coords(), Operand::A);
    }
    Ok(Normalized::Repaired(engine.compute(BooleanOp::Union)?))
}

fn is_collinear(coords: &[Coord]) -> bool {
    let Some(&a) = coords.first() else {
        return true;
    };
    let Some(&b) = coords.iter().find(|&&p| p != a) else {
        return true;
    };
    coords.iter().all(|&p| orient(a, b, p) == 0.0)
}

fn oriented(ring: &Ring, ccw: bool) -> Ring {
    if (ring.signed_area() > 0.0) == ccw {
        ring.clone()
    } else {
        ring.reversed()
    }
}

/// Largest absolute coordinate over all rings, used to scale the default
/// tolerance.
pub(crate) fn max_magnitude(polygons: &[Polygon]) -> Real {
    polygons
        .iter()
        .flat_map(|p| p.rings())
        .flat_map(|r| r.coords())
        .fold(0.0, |m: Real, c| m.max(c.x.abs()).max(c.y.abs()))
}

fn polygons_bbox(polygons: &[Polygon]) -> Option<Bbox> {
    polygons.iter().map(Polygon::bbox).reduce(Bbox::union)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn square(x0: Real, y0: Real, size: Real) -> Geometry {
        let pts = [[x0, y0], [x0 + size, y0], [x0 + size, y0 + size], [x0, y0 + size], [x0, y0]];
        Geometry::Polygon(Polygon::from_coords(vec![pts.iter().map(|&p| p.into()).collect()]).unwrap())
    }

    #[test]
    fn clockwise_input_is_normalized() {
        let mut cw: Vec<Coord> = [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]]
            .iter()
            .map(|&p| p.into())
            .collect();
        let g = Geometry::Polygon(Polygon::from_coords(vec![cw.clone()]).unwrap());
        let (polys, repaired) = normalized_polygons(g.polygons().unwrap(), 1e-10).unwrap();
        assert!(!repaired);
        assert!(!polys[0].shell().is_clockwise());
        cw.reverse();
        assert_eq!(polys[0].shell().coords(), &cw[..]);
    }

    #[test]
    fn non_polygon_input_rejected() {
        let point = Geometry::Point(Coord::new(0.0, 0.0));
        let err = union(&point, &square(0.0, 0.0, 1.0), &ClipOptions::default()).unwrap_err();
        assert!(matches!(err, ClipError::InvalidInput { .. }));
    }

    #[test]
    fn collinear_ring_rejected() {
        let flat: Vec<Coord> = [[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [0.0, 0.0]]
            .iter()
            .map(|&p| p.into())
            .collect();
        let g = Geometry::Polygon(Polygon::from_coords(vec![flat]).unwrap());
        let err = intersect(&g, &square(0.0, 0.0, 1.0), &ClipOptions::default()).unwrap_err();
        assert!(matches!(err, ClipError::DegenerateGeometry { .. }));
    }

    #[test]
    fn properties_attached() {
        let mut props = Map::new();
        props.insert("name".into(), json!("merged"));
        let opts = ClipOptions::new().with_properties(props);
        let f = union(&square(0.0, 0.0, 2.0), &square(1.0, 0.0, 2.0), &opts)
            .unwrap()
            .unwrap();
        assert_eq!(f.properties["name"], json!("merged"));
        assert!((f.geometry.area() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn disjoint_short_cut() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(5.0, 5.0, 1.0);
        let opts = ClipOptions::default();
        assert!(intersect(&a, &b, &opts).unwrap().is_none());
        assert_eq!(difference(&a, &b, &opts).unwrap().unwrap().geometry, a);
        match union(&a, &b, &opts).unwrap().unwrap().geometry {
            Geometry::MultiPolygon(mp) => assert_eq!(mp.len(), 2),
            other => panic!("expected MultiPolygon, got {}", other.type_name()),
        }
        let x = xor(&a, &b, &opts).unwrap().unwrap();
        assert!((x.geometry.area() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn bad_tolerance_rejected() {
        let opts = ClipOptions::new().with_tolerance(-1.0);
        let err = union(&square(0.0, 0.0, 1.0), &square(0.5, 0.0, 1.0), &opts).unwrap_err();
        assert!(matches!(err, ClipError::InvalidInput { .. }));
    }

    #[test]
    fn magnitude_covers_negative_coordinates() {
        let g = square(-50.0, 3.0, 1.0);
        assert_eq!(max_magnitude(g.polygons().unwrap()), 50.0);
    }

    #[test]
    fn kinked_shell_is_split_into_lobes() {
        let bow: Vec<Coord> = [[0.0, 0.0], [2.0, 2.0], [2.0, 0.0], [0.0, 2.0], [0.0, 0.0]]
            .iter()
            .map(|&p| p.into())
            .collect();
        let g = Geometry::Polygon(Polygon::from_coords(vec![bow]).unwrap());
        let (polys, repaired) = normalized_polygons(g.polygons().unwrap(), 1e-10).unwrap();
        assert!(repaired);
        assert_eq!(polys.len(), 2);
        for p in &polys {
            assert!(!p.shell().is_clockwise());
            assert!((p.area() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn kinked_hole_keeps_both_lobes_as_holes() {
        let shell: Vec<Coord> = [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]]
            .iter()
            .map(|&p| p.into())
            .collect();
        let hole: Vec<Coord> = [[2.0, 2.0], [4.0, 4.0], [4.0, 2.0], [2.0, 4.0], [2.0, 2.0]]
            .iter()
            .map(|&p| p.into())
            .collect();
        let g = Geometry::Polygon(Polygon::from_coords(vec![shell, hole]).unwrap());
        let (polys, repaired) = normalized_polygons(g.polygons().unwrap(), 1e-10).unwrap();
        assert!(repaired);
        let area: Real = polys.iter().map(Polygon::area).sum();
        assert!((area - 98.0).abs() < 1e-9);
    }
}
