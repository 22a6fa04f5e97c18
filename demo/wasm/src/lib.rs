// Copyright 2025 Lars Brubaker
// WASM bindings for polyclip-rust. Geometry crosses the boundary as GeoJSON
// strings; an empty result is the string "null".

use polyclip_rust::{
    boolean_point_in_polygon, ops, unkink_feature, BooleanOp, ClipOptions, Coord, Feature,
    Geometry, PointInPolygonOptions,
};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main_js() {
    console_error_panic_hook::set_once();
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_geometry(json: &str) -> Result<Geometry, JsValue> {
    serde_json::from_str(json).map_err(js_err)
}

fn parse_options(json: &str) -> Result<ClipOptions, JsValue> {
    if json.trim().is_empty() {
        return Ok(ClipOptions::default());
    }
    serde_json::from_str(json).map_err(js_err)
}

fn boolean_op(op: u32) -> Result<BooleanOp, JsValue> {
    match op {
        0 => Ok(BooleanOp::Union),
        1 => Ok(BooleanOp::Intersection),
        2 => Ok(BooleanOp::Difference),
        3 => Ok(BooleanOp::SymDifference),
        _ => Err(JsValue::from_str(&format!("unknown boolean op code {}", op))),
    }
}

fn run(a: &str, b: &str, op: BooleanOp, options: &str) -> Result<String, JsValue> {
    let opts = parse_options(options)?;
    let result = ops::overlay(&parse_geometry(a)?, &parse_geometry(b)?, op, &opts).map_err(js_err)?;
    let feature = result.map(|g| Feature::with_properties(g, opts.properties.unwrap_or_default()));
    serde_json::to_string(&feature).map_err(js_err)
}

/// op: 0=Union 1=Intersection 2=Difference 3=SymDifference
#[wasm_bindgen]
pub fn overlay_json(a: &str, b: &str, op: u32, options: &str) -> Result<String, JsValue> {
    run(a, b, boolean_op(op)?, options)
}

#[wasm_bindgen]
pub fn union_json(a: &str, b: &str, options: &str) -> Result<String, JsValue> {
    run(a, b, BooleanOp::Union, options)
}

#[wasm_bindgen]
pub fn intersect_json(a: &str, b: &str, options: &str) -> Result<String, JsValue> {
    run(a, b, BooleanOp::Intersection, options)
}

#[wasm_bindgen]
pub fn difference_json(a: &str, b: &str, options: &str) -> Result<String, JsValue> {
    run(a, b, BooleanOp::Difference, options)
}

/// Takes a GeoJSON Feature, returns a FeatureCollection of simple parts.
#[wasm_bindgen]
pub fn unkink_json(feature: &str) -> Result<String, JsValue> {
    let f: Feature = serde_json::from_str(feature).map_err(js_err)?;
    let parts = unkink_feature(&f).map_err(js_err)?;
    serde_json::to_string(&parts).map_err(js_err)
}

#[wasm_bindgen]
pub fn point_in_polygon_json(x: f64, y: f64, polygon: &str, ignore_boundary: bool) -> Result<bool, JsValue> {
    let opts = PointInPolygonOptions { ignore_boundary };
    boolean_point_in_polygon(Coord::new(x, y), &parse_geometry(polygon)?, &opts).map_err(js_err)
}
