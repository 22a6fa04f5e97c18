// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// GeoJSON-compatible geometry model. Rings are validated on construction
// (including deserialization), so code downstream of a `Ring` can rely on
// closure and on at least three distinct vertices.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{ClipError, Result};
use crate::geom::{vert_cmp, vert_eq, Coord, Real};
use crate::ring::signed_area;

/// A closed ring: >= 4 positions, first == last, >= 3 distinct positions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Coord>", into = "Vec<Coord>")]
pub struct Ring(Vec<Coord>);

impl Ring {
    /// Validates and wraps a closed coordinate sequence.
    pub fn new(coords: Vec<Coord>) -> Result<Self> {
        validate_ring(&coords)?;
        Ok(Ring(coords))
    }

    /// Builds a ring from an open vertex loop produced by the engine,
    /// appending the closing position.
    pub(crate) fn from_open_loop(mut coords: Vec<Coord>) -> Self {
        if let Some(&first) = coords.first() {
            coords.push(first);
        }
        Ring(coords)
    }

    #[inline]
    pub fn coords(&self) -> &[Coord] {
        &self.0
    }

    /// Number of positions including the closing one.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn signed_area(&self) -> Real {
        signed_area(&self.0)
    }

    pub fn is_clockwise(&self) -> bool {
        self.signed_area() < 0.0
    }

    /// Same ring traversed in the opposite direction.
    pub fn reversed(&self) -> Ring {
        let mut coords = self.0.clone();
        coords.reverse();
        Ring(coords)
    }
}

impl TryFrom<Vec<Coord>> for Ring {
    type Error = ClipError;

    fn try_from(coords: Vec<Coord>) -> Result<Self> {
        Ring::new(coords)
    }
}

impl From<Ring> for Vec<Coord> {
    fn from(r: Ring) -> Self {
        r.0
    }
}

/// Checks closure, finiteness and the distinct-vertex count of a raw ring.
pub fn validate_ring(coords: &[Coord]) -> Result<()> {
    if coords.is_empty() {
        return Err(ClipError::invalid("ring has no positions"));
    }
    if let Some(p) = coords.iter().find(|p| !p.is_finite()) {
        return Err(ClipError::invalid(format!(
            "ring position ({}, {}) is not finite",
            p.x, p.y
        )));
    }
    let first = coords[0];
    let last = coords[coords.len() - 1];
    if coords.len() < 2 || !vert_eq(first, last) {
        return Err(ClipError::invalid("ring is not closed (first != last)"));
    }
    let distinct = distinct_count(coords);
    if distinct < 3 {
        return Err(ClipError::degenerate(format!(
            "ring has {} distinct vertices, at least 3 required",
            distinct
        )));
    }
    if coords.len() < 4 {
        return Err(ClipError::invalid("ring needs at least 4 positions"));
    }
    Ok(())
}

fn distinct_count(coords: &[Coord]) -> usize {
    let mut sorted = coords.to_vec();
    sorted.sort_by(|a, b| vert_cmp(*a, *b));
    sorted.dedup_by(|a, b| vert_eq(*a, *b));
    sorted.len()
}

/// A shell ring followed by zero or more hole rings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Ring>", into = "Vec<Ring>")]
pub struct Polygon {
    rings: Vec<Ring>,
}

impl Polygon {
    pub fn new(shell: Ring, holes: Vec<Ring>) -> Self {
        let mut rings = Vec::with_capacity(holes.len() + 1);
        rings.push(shell);
        rings.extend(holes);
        Polygon { rings }
    }

    /// Builds a polygon from raw GeoJSON-style coordinates.
    pub fn from_coords(rings: Vec<Vec<Coord>>) -> Result<Self> {
        let rings = rings.into_iter().map(Ring::new).collect::<Result<Vec<_>>>()?;
        Polygon::try_from(rings)
    }

    #[inline]
    pub fn shell(&self) -> &Ring {
        &self.rings[0]
    }

    #[inline]
    pub fn holes(&self) -> &[Ring] {
        &self.rings[1..]
    }

    #[inline]
    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    /// Planar area: shell minus holes, independent of ring orientation.
    pub fn area(&self) -> Real {
        let shell = self.shell().signed_area().abs();
        let holes: Real = self.holes().iter().map(|h| h.signed_area().abs()).sum();
        shell - holes
    }

    pub fn bbox(&self) -> Bbox {
        Bbox::of_coords(self.shell().coords())
    }
}

impl TryFrom<Vec<Ring>> for Polygon {
    type Error = ClipError;

    fn try_from(rings: Vec<Ring>) -> Result<Self> {
        if rings.is_empty() {
            return Err(ClipError::invalid("polygon has no rings"));
        }
        Ok(Polygon { rings })
    }
}

impl From<Polygon> for Vec<Ring> {
    fn from(p: Polygon) -> Self {
        p.rings
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MultiPolygon(pub Vec<Polygon>);

impl MultiPolygon {
    pub fn polygons(&self) -> &[Polygon] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn area(&self) -> Real {
        self.0.iter().map(Polygon::area).sum()
    }

    /// Collapses to the simplest geometry: `None` when empty, a `Polygon`
    /// for a single part, otherwise a `MultiPolygon`.
    pub fn into_geometry(mut self) -> Option<Geometry> {
        match self.0.len() {
            0 => None,
            1 => self.0.pop().map(Geometry::Polygon),
            _ => Some(Geometry::MultiPolygon(self)),
        }
    }
}

/// Axis-aligned bounding box `[min_x, min_y, max_x, max_y]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bbox {
    pub min: Coord,
    pub max: Coord,
}

impl Bbox {
    pub fn of_coords(coords: &[Coord]) -> Bbox {
        let mut min = Coord::new(Real::INFINITY, Real::INFINITY);
        let mut max = Coord::new(Real::NEG_INFINITY, Real::NEG_INFINITY);
        for p in coords {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Bbox { min, max }
    }

    pub fn union(self, o: Bbox) -> Bbox {
        Bbox {
            min: Coord::new(self.min.x.min(o.min.x), self.min.y.min(o.min.y)),
            max: Coord::new(self.max.x.max(o.max.x), self.max.y.max(o.max.y)),
        }
    }

    /// Closed-box overlap; boxes touching along an edge or corner overlap.
    pub fn intersects(&self, o: &Bbox) -> bool {
        self.min.x <= o.max.x && o.min.x <= self.max.x && self.min.y <= o.max.y && o.min.y <= self.max.y
    }

    pub fn contains(&self, p: Coord) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn to_array(&self) -> [Real; 4] {
        [self.min.x, self.min.y, self.max.x, self.max.y]
    }
}

/// A GeoJSON geometry, dispatched by pattern matching rather than type strings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(Coord),
    LineString(Vec<Coord>),
    Polygon(Polygon),
    MultiPolygon(MultiPolygon),
}

impl Geometry {
    /// Planar area; zero for points and lines.
    pub fn area(&self) -> Real {
        match self {
            Geometry::Point(_) | Geometry::LineString(_) => 0.0,
            Geometry::Polygon(p) => p.area(),
            Geometry::MultiPolygon(mp) => mp.area(),
        }
    }

    pub fn bbox(&self) -> Option<Bbox> {
        match self {
            Geometry::Point(p) => Some(Bbox { min: *p, max: *p }),
            Geometry::LineString(ls) if ls.is_empty() => None,
            Geometry::LineString(ls) => Some(Bbox::of_coords(ls)),
            Geometry::Polygon(p) => Some(p.bbox()),
            Geometry::MultiPolygon(mp) => mp
                .polygons()
                .iter()
                .map(Polygon::bbox)
                .reduce(Bbox::union),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::LineString(_) => "LineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
        }
    }

    /// The polygonal parts of this geometry, or `InvalidInput` for
    /// non-areal variants.
    pub fn polygons(&self) -> Result<&[Polygon]> {
        match self {
            Geometry::Polygon(p) => Ok(std::slice::from_ref(p)),
            Geometry::MultiPolygon(mp) => Ok(mp.polygons()),
            other => Err(ClipError::invalid(format!(
                "expected Polygon or MultiPolygon, got {}",
                other.type_name()
            ))),
        }
    }
}

impl From<Polygon> for Geometry {
    fn from(p: Polygon) -> Self {
        Geometry::Polygon(p)
    }
}

impl From<MultiPolygon> for Geometry {
    fn from(mp: MultiPolygon) -> Self {
        Geometry::MultiPolygon(mp)
    }
}

/// A geometry plus free-form properties.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    pub geometry: Geometry,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: Map<String, Value>,
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Feature { geometry, properties: Map::new() }
    }

    pub fn with_properties(geometry: Geometry, properties: Map<String, Value>) -> Self {
        Feature { geometry, properties }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

fn null_as_empty<'de, D>(d: D) -> std::result::Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(d)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(pts: &[[Real; 2]]) -> Vec<Coord> {
        pts.iter().map(|&p| p.into()).collect()
    }

    #[test]
    fn ring_requires_closure() {
        let err = Ring::new(coords(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]])).unwrap_err();
        assert!(matches!(err, ClipError::InvalidInput { .. }));
    }

    #[test]
    fn ring_requires_three_distinct_vertices() {
        let err = Ring::new(coords(&[[0.0, 0.0], [1.0, 1.0], [1.0, 1.0], [0.0, 0.0]])).unwrap_err();
        assert!(matches!(err, ClipError::DegenerateGeometry { .. }));
    }

    #[test]
    fn ring_rejects_nan() {
        let err = Ring::new(coords(&[[0.0, 0.0], [Real::NAN, 0.0], [1.0, 1.0], [0.0, 0.0]])).unwrap_err();
        assert!(matches!(err, ClipError::InvalidInput { .. }));
    }

    #[test]
    fn polygon_area_subtracts_holes() {
        let p = Polygon::from_coords(vec![
            coords(&[[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0], [0.0, 0.0]]),
            coords(&[[1.0, 1.0], [1.0, 2.0], [2.0, 2.0], [2.0, 1.0], [1.0, 1.0]]),
        ])
        .unwrap();
        assert_eq!(p.area(), 15.0);
        assert_eq!(p.bbox().to_array(), [0.0, 0.0, 4.0, 4.0]);
    }

    #[test]
    fn geometry_round_trips_as_geojson() {
        let json = r#"{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]}"#;
        let g: Geometry = serde_json::from_str(json).unwrap();
        assert!(matches!(g, Geometry::Polygon(_)));
        let out = serde_json::to_value(&g).unwrap();
        assert_eq!(out["type"], "Polygon");
        assert_eq!(out["coordinates"][0][1], serde_json::json!([1.0, 0.0]));
    }

    #[test]
    fn deserializing_an_open_ring_fails() {
        let json = r#"{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,1]]]}"#;
        assert!(serde_json::from_str::<Geometry>(json).is_err());
    }

    #[test]
    fn feature_accepts_null_properties() {
        let json = r#"{"type":"Feature","geometry":{"type":"Point","coordinates":[1,2]},"properties":null}"#;
        let f: Feature = serde_json::from_str(json).unwrap();
        assert!(f.properties.is_empty());
        assert_eq!(f.geometry, Geometry::Point(Coord::new(1.0, 2.0)));
    }

    #[test]
    fn multipolygon_collapses_to_simplest_geometry() {
        assert!(MultiPolygon::default().into_geometry().is_none());
        let p = Polygon::from_coords(vec![coords(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]])]).unwrap();
        let g = MultiPolygon(vec![p.clone()]).into_geometry();
        assert_eq!(g, Some(Geometry::Polygon(p)));
    }

    #[test]
    fn points_are_not_polygonal() {
        let g = Geometry::Point(Coord::new(0.0, 0.0));
        assert!(matches!(g.polygons(), Err(ClipError::InvalidInput { .. })));
    }
}
