// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Self-intersection repair. Each input polygon is noded against itself
// with its rings as given, every face with a non-zero winding number is
// kept, and the result is reassembled into simple polygons.

use crate::error::Result;
use crate::geom::{Coord, Real};
use crate::geometry::{Feature, FeatureCollection, Geometry, MultiPolygon};
use crate::noding::Operand;
use crate::ops::max_magnitude;
use crate::options::ClipOptions;
use crate::overlay::{BooleanOp, Overlay, WindingRule};

/// Splits a Polygon / MultiPolygon at its self-intersections. The parts of
/// every input polygon are appended in order.
pub fn unkink_polygon(geometry: &Geometry) -> Result<MultiPolygon> {
    let polygons = geometry.polygons()?;
    let tolerance = ClipOptions::default().resolve_tolerance(max_magnitude(polygons))?;
    let mut parts = Vec::new();
    for poly in polygons {
        let mut engine = Overlay::new(tolerance, WindingRule::NonZero);
        engine.add_polygon(poly, Operand::A);
        let repaired = engine.compute(BooleanOp::Union)?;
        log::debug!("unkink: {} rings -> {} parts", poly.rings().len(), repaired.len());
        parts.extend(repaired.0);
    }
    Ok(MultiPolygon(parts))
}

/// Repairs one ring under the non-zero rule. `None` when the ring is
/// already simple and needs no repair.
pub(crate) fn repair_ring(coords: &[Coord], tolerance: Real) -> Result<Option<MultiPolygon>> {
    let mut engine = Overlay::new(tolerance, WindingRule::NonZero);
    engine.add_ring(coords, Operand::A);
    engine.compute_if_kinked(BooleanOp::Union)
}

/// Feature form of `unkink_polygon`: one Polygon feature per part, each
/// with a copy of the input properties.
pub fn unkink_feature(feature: &Feature) -> Result<FeatureCollection> {
    let parts = unkink_polygon(&feature.geometry)?;
    Ok(FeatureCollection {
        features: parts
            .0
            .into_iter()
            .map(|p| Feature::with_properties(Geometry::Polygon(p), feature.properties.clone()))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Polygon;
    use serde_json::json;

    fn polygon(pts: &[[Real; 2]]) -> Geometry {
        Geometry::Polygon(Polygon::from_coords(vec![pts.iter().map(|&p| p.into()).collect()]).unwrap())
    }

    #[test]
    fn figure_eight_splits_into_lobes() {
        let g = polygon(&[[0.0, 0.0], [2.0, 2.0], [2.0, 0.0], [0.0, 2.0], [0.0, 0.0]]);
        let parts = unkink_polygon(&g).unwrap();
        assert_eq!(parts.len(), 2);
        for p in parts.polygons() {
            assert!((p.area() - 1.0).abs() < 1e-9);
            assert!(!p.shell().is_clockwise());
            assert!(p.shell().coords().contains(&Coord::new(1.0, 1.0)));
        }
    }

    #[test]
    fn simple_polygon_unchanged_in_area() {
        let g = polygon(&[[0.0, 0.0], [0.0, 3.0], [3.0, 3.0], [3.0, 0.0], [0.0, 0.0]]);
        let parts = unkink_polygon(&g).unwrap();
        assert_eq!(parts.len(), 1);
        assert!((parts.area() - 9.0).abs() < 1e-9);
    }

    #[test]
    fn feature_properties_copied() {
        let g = polygon(&[[0.0, 0.0], [2.0, 2.0], [2.0, 0.0], [0.0, 2.0], [0.0, 0.0]]);
        let mut f = Feature::new(g);
        f.properties.insert("id".into(), json!(7));
        let fc = unkink_feature(&f).unwrap();
        assert_eq!(fc.features.len(), 2);
        assert!(fc.features.iter().all(|part| part.properties["id"] == json!(7)));
    }

    #[test]
    fn line_input_rejected() {
        let line = Geometry::LineString(vec![Coord::new(0.0, 0.0), Coord::new(1.0, 1.0)]);
        assert!(unkink_polygon(&line).is_err());
    }
}
