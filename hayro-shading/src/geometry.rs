//! Geometric helpers shared by triangles, lines and patches.

use crate::settings::POINT_TOLERANCE;
use kurbo::{CubicBez, ParamCurve, Point};

/// Whether two points coincide within [`POINT_TOLERANCE`].
#[inline]
pub(crate) fn points_coincide(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < POINT_TOLERANCE && (a.y - b.y).abs() < POINT_TOLERANCE
}

/// Evaluate the equation of the line through `p1` and `p2` at `p`.
///
/// The sign tells on which side of the line `p` lies, the magnitude is twice the
/// area of the triangle `(p, p1, p2)`.
#[inline]
pub(crate) fn edge_equation(p: Point, p1: Point, p2: Point) -> f64 {
    (p2.y - p1.y) * (p.x - p1.x) - (p2.x - p1.x) * (p.y - p1.y)
}

/// Whether `p` lies on the inner side of the edge `e1 -> e2` of a triangle with a
/// positive signed area.
///
/// Points exactly on the edge only count as inside for top edges (pointing in positive
/// x direction) and left edges (pointing in negative y direction). An edge shared by
/// two triangles is traversed in opposite directions by both, so its points belong to
/// exactly one of them.
#[inline]
pub(crate) fn covers_edge(p: Point, e1: Point, e2: Point) -> bool {
    let w = -edge_equation(p, e1, e2);

    if w != 0.0 {
        return w > 0.0;
    }

    let d = e2 - e1;

    d.y < 0.0 || (d.y == 0.0 && d.x > 0.0)
}

/// The signed area of the triangle `(a, b, c)`, positive if counter-clockwise.
#[inline]
pub(crate) fn signed_area(a: Point, b: Point, c: Point) -> f64 {
    ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)) / 2.0
}

/// The cubic Bernstein basis polynomials evaluated at `t`.
#[inline]
pub(crate) fn bernstein(t: f64) -> [f64; 4] {
    let s = 1.0 - t;

    [s * s * s, 3.0 * t * s * s, 3.0 * t * t * s, t * t * t]
}

/// Evaluate the cubic Bezier curve with the given control points.
#[inline]
pub(crate) fn eval_cubic(ctl: [Point; 4], t: f64) -> Point {
    CubicBez::new(ctl[0], ctl[1], ctl[2], ctl[3]).eval(t)
}

/// Whether a cubic Bezier curve is close enough to its chord to be treated as
/// a straight line.
///
/// The deviation of both inner control points from the chord needs to be bounded
/// by the horizontal or the vertical extent of the chord.
pub(crate) fn is_edge_straight(ctl: [Point; 4]) -> bool {
    let d1 = edge_equation(ctl[1], ctl[0], ctl[3]).abs();
    let d2 = edge_equation(ctl[2], ctl[0], ctl[3]).abs();
    let x = (ctl[0].x - ctl[3].x).abs();
    let y = (ctl[0].y - ctl[3].y).abs();

    (d1 <= x && d2 <= x) || (d1 <= y && d2 <= y)
}

/// Whether `p` lies strictly on the same side of both lines `a1 -> a2` and `b1 -> b2`.
#[inline]
pub(crate) fn same_side_of_both(p: Point, a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    edge_equation(p, a1, a2) * edge_equation(p, b1, b2) > 0.0
}

/// Pick the subdivision level for a chord of the given length in device pixels.
#[inline]
pub(crate) fn level_for_length(length: f64) -> u8 {
    if length > 800.0 {
        4
    } else if length > 400.0 {
        3
    } else if length > 200.0 {
        2
    } else {
        1
    }
}
