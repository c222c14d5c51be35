//! Rasterized lines, used for triangles that collapsed into a line segment.

use crate::color::ColorComponents;
use crate::settings::DeviceRect;
use kurbo::Point;

/// A line between two device pixels with a linearly interpolated color.
///
/// The line is walked along the axis with the greater extent, one pixel per step,
/// with the other coordinate rounded to the nearest pixel.
#[derive(Debug, Clone)]
pub struct Line {
    p0: Point,
    p1: Point,
    c0: ColorComponents,
    c1: ColorComponents,
}

impl Line {
    /// Create a new line. The endpoints are rounded to the nearest pixel.
    pub fn new(p0: Point, p1: Point, c0: ColorComponents, c1: ColorComponents) -> Self {
        Self {
            p0: p0.round(),
            p1: p1.round(),
            c0,
            c1,
        }
    }

    /// The pixels covered by the line that lie within `bounds`.
    ///
    /// Only the part of the line inside of `bounds` is walked, so the number of steps
    /// never exceeds the width or height of `bounds`.
    pub fn pixels(&self, bounds: DeviceRect) -> impl Iterator<Item = (i32, i32)> + '_ {
        let steep = self.is_steep();
        let (lo, hi) = if steep {
            (bounds.y, bounds.max_y())
        } else {
            (bounds.x, bounds.max_x())
        };
        let (start, end) = self.major_range();
        let start = start.max(lo as f64);
        let end = end.min(hi as f64);

        // Both ends are integers within `lo..=hi` if the range is not empty.
        let (start, end) = if self.is_finite() && start <= end {
            (start as i32, end as i32)
        } else {
            (1, 0)
        };

        (start..=end).filter_map(move |major| {
            let minor = self.minor_at(major as f64);

            if !(i32::MIN as f64..=i32::MAX as f64).contains(&minor) {
                return None;
            }

            let (x, y) = if steep {
                (minor as i32, major)
            } else {
                (major, minor as i32)
            };

            bounds.contains(x, y).then_some((x, y))
        })
    }

    /// Whether the line covers the pixel at the given point.
    pub fn contains(&self, p: Point) -> bool {
        if !self.is_finite() {
            return false;
        }

        let p = p.round();
        let (major, minor) = self.split(p);
        let (start, end) = self.major_range();

        major >= start && major <= end && self.minor_at(major) == minor
    }

    /// The color at the given pixel.
    ///
    /// The color is interpolated along the axis in which the line has the greater extent.
    pub fn color_at(&self, pixel: (i32, i32)) -> ColorComponents {
        let d = self.p1 - self.p0;

        if d.x == 0.0 && d.y == 0.0 {
            return self.c0.clone();
        }

        let t = if self.is_steep() {
            (pixel.1 as f64 - self.p0.y) / d.y
        } else {
            (pixel.0 as f64 - self.p0.x) / d.x
        };
        let t = t.clamp(0.0, 1.0);

        self.c0
            .iter()
            .zip(self.c1.iter())
            .map(|(c0, c1)| (*c0 as f64 * (1.0 - t) + *c1 as f64 * t) as f32)
            .collect()
    }

    fn is_finite(&self) -> bool {
        self.p0.is_finite() && self.p1.is_finite()
    }

    fn is_steep(&self) -> bool {
        (self.p1.y - self.p0.y).abs() > (self.p1.x - self.p0.x).abs()
    }

    /// Split a point into its coordinate along the walking axis and the other one.
    fn split(&self, p: Point) -> (f64, f64) {
        if self.is_steep() {
            (p.y, p.x)
        } else {
            (p.x, p.y)
        }
    }

    fn major_range(&self) -> (f64, f64) {
        let (a0, _) = self.split(self.p0);
        let (a1, _) = self.split(self.p1);

        (a0.min(a1), a0.max(a1))
    }

    /// The rounded minor coordinate of the pixel at `major`.
    fn minor_at(&self, major: f64) -> f64 {
        let (a0, b0) = self.split(self.p0);
        let (a1, b1) = self.split(self.p1);

        if a0 == a1 {
            return b0;
        }

        (b0 + (major - a0) * (b1 - b0) / (a1 - a0)).round()
    }
}

#[inline]
pub(crate) fn round_point(p: Point) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}
