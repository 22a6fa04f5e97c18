// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Planar coordinate type and the geometric predicates the overlay is built on.
//
// Orderings are lexicographic (x first, then y). Intersection points are
// computed with interpolation that stays inside the bounding box of both
// segments, so a computed node never escapes the segments it splits.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

pub type Real = f64;

/// A planar position. Serializes as a GeoJSON position `[x, y]`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[Real; 2]", into = "[Real; 2]")]
pub struct Coord {
    pub x: Real,
    pub y: Real,
}

impl Coord {
    #[inline]
    pub const fn new(x: Real, y: Real) -> Self {
        Coord { x, y }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[inline]
    pub fn sub(self, o: Coord) -> Coord {
        Coord::new(self.x - o.x, self.y - o.y)
    }

    #[inline]
    pub fn dot(self, o: Coord) -> Real {
        self.x * o.x + self.y * o.y
    }

    #[inline]
    pub fn cross(self, o: Coord) -> Real {
        self.x * o.y - self.y * o.x
    }

    #[inline]
    pub fn midpoint(self, o: Coord) -> Coord {
        Coord::new(self.x / 2.0 + o.x / 2.0, self.y / 2.0 + o.y / 2.0)
    }
}

impl From<[Real; 2]> for Coord {
    fn from(p: [Real; 2]) -> Self {
        Coord::new(p[0], p[1])
    }
}

impl From<Coord> for [Real; 2] {
    fn from(c: Coord) -> Self {
        [c.x, c.y]
    }
}

impl From<(Real, Real)> for Coord {
    fn from(p: (Real, Real)) -> Self {
        Coord::new(p.0, p.1)
    }
}

/// Returns true if u is lexicographically <= v (x first, then y).
#[inline]
pub fn vert_leq(u: Coord, v: Coord) -> bool {
    u.x < v.x || (u.x == v.x && u.y <= v.y)
}

/// Returns true if u == v (exact equality).
#[inline]
pub fn vert_eq(u: Coord, v: Coord) -> bool {
    u.x == v.x && u.y == v.y
}

/// Returns true if u is lexicographically <= v with x and y transposed.
#[inline]
pub fn trans_leq(u: Coord, v: Coord) -> bool {
    u.y < v.y || (u.y == v.y && u.x <= v.x)
}

/// Total lexicographic order used for node ordering.
#[inline]
pub fn vert_cmp(u: Coord, v: Coord) -> Ordering {
    u.x.total_cmp(&v.x).then(u.y.total_cmp(&v.y))
}

/// Twice the signed area of triangle (u, v, w). Positive when counter-clockwise.
#[inline]
pub fn orient(u: Coord, v: Coord, w: Coord) -> Real {
    (v.x - u.x) * (w.y - u.y) - (v.y - u.y) * (w.x - u.x)
}

/// Euclidean distance from `p` to the closed segment `ab`.
pub fn segment_distance(p: Coord, a: Coord, b: Coord) -> Real {
    let ab = b.sub(a);
    let len2 = ab.dot(ab);
    if len2 == 0.0 {
        let d = p.sub(a);
        return d.dot(d).sqrt();
    }
    let t = (p.sub(a).dot(ab) / len2).clamp(0.0, 1.0);
    let q = Coord::new(a.x + ab.x * t, a.y + ab.y * t);
    let d = p.sub(q);
    d.dot(d).sqrt()
}

/// Projection parameter of `p` onto the line through `a` and `b`
/// (0 at `a`, 1 at `b`). Used to order split points along a segment.
#[inline]
pub fn segment_param(p: Coord, a: Coord, b: Coord) -> Real {
    let ab = b.sub(a);
    let len2 = ab.dot(ab);
    if len2 == 0.0 {
        0.0
    } else {
        p.sub(a).dot(ab) / len2
    }
}

/// Compares two direction vectors by their angle measured counter-clockwise
/// from the positive x-axis, in [0, 2π). Exact: no trigonometry involved.
pub fn angle_cmp(a: Coord, b: Coord) -> Ordering {
    fn half(d: Coord) -> u8 {
        // 0 for angles in [0, π), 1 for [π, 2π)
        if d.y > 0.0 || (d.y == 0.0 && d.x > 0.0) {
            0
        } else {
            1
        }
    }
    let (ha, hb) = (half(a), half(b));
    if ha != hb {
        return ha.cmp(&hb);
    }
    let c = a.cross(b);
    if c > 0.0 {
        Ordering::Less
    } else if c < 0.0 {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

/// Given three vertices u,v,w such that vert_leq(u,v) && vert_leq(v,w),
/// evaluates the y-coord of edge uw at the x-coord of v.
/// Returns v.y - (uw)(v.x), the signed distance from uw to v.
/// If uw is vertical (passes through v), returns zero.
pub fn edge_eval(u: Coord, v: Coord, w: Coord) -> Real {
    let gap_l = v.x - u.x;
    let gap_r = w.x - v.x;
    if gap_l + gap_r > 0.0 {
        if gap_l < gap_r {
            (v.y - u.y) + (u.y - w.y) * (gap_l / (gap_l + gap_r))
        } else {
            (v.y - w.y) + (w.y - u.y) * (gap_r / (gap_l + gap_r))
        }
    } else {
        0.0
    }
}

/// Like edge_eval but with x and y transposed.
pub fn trans_eval(u: Coord, v: Coord, w: Coord) -> Real {
    let gap_l = v.y - u.y;
    let gap_r = w.y - v.y;
    if gap_l + gap_r > 0.0 {
        if gap_l < gap_r {
            (v.x - u.x) + (u.x - w.x) * (gap_l / (gap_l + gap_r))
        } else {
            (v.x - w.x) + (w.x - u.x) * (gap_r / (gap_l + gap_r))
        }
    } else {
        0.0
    }
}

/// Numerically stable interpolation: returns (b*x + a*y) / (a + b),
/// or (x + y) / 2 if a == b == 0. Requires a, b >= 0 and enforces this.
/// Guarantees MIN(x,y) <= result <= MAX(x,y).
#[inline]
pub fn real_interpolate(mut a: Real, x: Real, mut b: Real, y: Real) -> Real {
    if a < 0.0 {
        a = 0.0;
    }
    if b < 0.0 {
        b = 0.0;
    }
    if a <= b {
        if b == 0.0 {
            x / 2.0 + y / 2.0
        } else {
            x + (y - x) * (a / (a + b))
        }
    } else {
        y + (x - y) * (b / (a + b))
    }
}

/// Computes one coordinate of the intersection of (o1,d1) and (o2,d2).
/// `leq` orders the endpoints along the axis being solved, `eval` measures
/// signed distances across it, and `pick` extracts that axis.
fn intersect_axis(
    o1: Coord,
    d1: Coord,
    o2: Coord,
    d2: Coord,
    leq: fn(Coord, Coord) -> bool,
    eval: fn(Coord, Coord, Coord) -> Real,
    pick: fn(Coord) -> Real,
) -> Real {
    let (mut a, mut b, mut c, mut d) = (o1, d1, o2, d2);
    if !leq(a, b) {
        std::mem::swap(&mut a, &mut b);
    }
    if !leq(c, d) {
        std::mem::swap(&mut c, &mut d);
    }
    if !leq(a, c) {
        std::mem::swap(&mut a, &mut c);
        std::mem::swap(&mut b, &mut d);
    }

    if !leq(c, b) {
        // No overlap along this axis; split the gap.
        pick(c) / 2.0 + pick(b) / 2.0
    } else if leq(b, d) {
        // Interpolate between c and b.
        let mut z1 = eval(a, c, b);
        let mut z2 = eval(c, b, d);
        if z1 + z2 < 0.0 {
            z1 = -z1;
            z2 = -z2;
        }
        real_interpolate(z1, pick(c), z2, pick(b))
    } else {
        // cd lies inside ab along this axis.
        let mut z1 = eval(a, c, b);
        let mut z2 = -eval(a, d, b);
        if z1 + z2 < 0.0 {
            z1 = -z1;
            z2 = -z2;
        }
        real_interpolate(z1, pick(c), z2, pick(d))
    }
}

/// Compute the intersection point of edges (o1,d1) and (o2,d2).
/// The result is guaranteed to lie within the bounding rectangle of both edges.
pub fn edge_intersect(o1: Coord, d1: Coord, o2: Coord, d2: Coord) -> Coord {
    let x = intersect_axis(o1, d1, o2, d2, vert_leq, edge_eval, |p| p.x);
    let y = intersect_axis(o1, d1, o2, d2, trans_leq, trans_eval, |p| p.y);
    Coord::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: Real, y: Real) -> Coord {
        Coord::new(x, y)
    }

    #[test]
    fn vert_leq_basic() {
        assert!(vert_leq(c(0.0, 0.0), c(1.0, 0.0)));
        assert!(vert_leq(c(0.0, 0.0), c(0.0, 1.0)));
        assert!(vert_leq(c(0.0, 0.0), c(0.0, 0.0)));
        assert!(!vert_leq(c(1.0, 0.0), c(0.0, 0.0)));
    }

    #[test]
    fn trans_leq_basic() {
        assert!(trans_leq(c(0.0, 0.0), c(0.0, 1.0)));
        assert!(trans_leq(c(0.0, 0.0), c(1.0, 0.0)));
        assert!(!trans_leq(c(0.0, 1.0), c(0.0, 0.0)));
    }

    #[test]
    fn edge_eval_horizontal() {
        let r = edge_eval(c(0.0, 0.0), c(0.5, 1.0), c(1.0, 0.0));
        assert!((r - 1.0).abs() < 1e-12, "got {}", r);
    }

    #[test]
    fn edge_eval_vertical_returns_zero() {
        let r = edge_eval(c(0.0, 0.0), c(0.0, 0.5), c(0.0, 1.0));
        assert_eq!(r, 0.0);
    }

    #[test]
    fn orient_sign_matches_ccw() {
        assert!(orient(c(0.0, 0.0), c(1.0, 0.0), c(0.5, 1.0)) > 0.0);
        assert!(orient(c(0.0, 0.0), c(0.5, 1.0), c(1.0, 0.0)) < 0.0);
        assert_eq!(orient(c(0.0, 0.0), c(1.0, 1.0), c(2.0, 2.0)), 0.0);
    }

    #[test]
    fn real_interpolate_midpoint() {
        assert!((real_interpolate(0.0, 0.0, 0.0, 1.0) - 0.5).abs() < 1e-12);
        assert!((real_interpolate(1.0, 0.0, 1.0, 2.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn edge_intersect_crossing() {
        let p = edge_intersect(c(0.0, 0.0), c(1.0, 1.0), c(0.0, 1.0), c(1.0, 0.0));
        assert!((p.x - 0.5).abs() < 1e-12, "x={}", p.x);
        assert!((p.y - 0.5).abs() < 1e-12, "y={}", p.y);
    }

    #[test]
    fn edge_intersect_stays_in_bounds() {
        let p = edge_intersect(
            c(0.0, 0.0),
            c(10.0, 1e-9),
            c(3.0, -1.0),
            c(3.0000001, 1.0),
        );
        assert!(p.x >= 3.0 && p.x <= 3.0000001);
        assert!(p.y >= 0.0 && p.y <= 1e-9);
    }

    #[test]
    fn angle_order_counter_clockwise_from_x_axis() {
        let mut dirs = vec![
            c(0.0, -1.0),
            c(-1.0, 0.0),
            c(1.0, 1.0),
            c(1.0, 0.0),
            c(-1.0, -1.0),
            c(0.0, 1.0),
        ];
        dirs.sort_by(|a, b| angle_cmp(*a, *b));
        assert_eq!(
            dirs,
            vec![
                c(1.0, 0.0),
                c(1.0, 1.0),
                c(0.0, 1.0),
                c(-1.0, 0.0),
                c(-1.0, -1.0),
                c(0.0, -1.0),
            ]
        );
    }

    #[test]
    fn segment_distance_and_param() {
        assert!((segment_distance(c(1.0, 1.0), c(0.0, 0.0), c(2.0, 0.0)) - 1.0).abs() < 1e-12);
        assert!((segment_distance(c(3.0, 0.0), c(0.0, 0.0), c(2.0, 0.0)) - 1.0).abs() < 1e-12);
        assert!((segment_param(c(1.0, 5.0), c(0.0, 0.0), c(2.0, 0.0)) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn coord_serializes_as_position() {
        let json = serde_json::to_string(&c(1.5, -2.0)).unwrap();
        assert_eq!(json, "[1.5,-2.0]");
        let back: Coord = serde_json::from_str("[3, 4]").unwrap();
        assert_eq!(back, c(3.0, 4.0));
    }
}
