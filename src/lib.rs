// polyclip-rust: planar polygon overlay for GeoJSON-style geometry
// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)

pub mod error;
pub mod geom;
pub mod geometry;
pub mod label;
pub mod mesh;
pub mod noding;
pub mod ops;
pub mod options;
pub mod overlay;
pub mod ring;
pub mod unkink;

pub use error::{ClipError, Result};
pub use geom::{Coord, Real};
pub use geometry::{Bbox, Feature, FeatureCollection, Geometry, MultiPolygon, Polygon, Ring};
pub use ops::{difference, intersect, overlay, union, xor};
pub use options::{ClipOptions, DEFAULT_RELATIVE_TOLERANCE};
pub use overlay::{BooleanOp, WindingRule};
pub use ring::{boolean_clockwise, boolean_point_in_polygon, is_clockwise, signed_area, PointInPolygonOptions};
pub use unkink::{unkink_feature, unkink_polygon};
