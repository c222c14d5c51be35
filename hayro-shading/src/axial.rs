//! Axial shadings, evaluated in closed form.

use crate::color::ColorMapper;
use kurbo::{Affine, Point, Vec2};

/// The maximum number of entries of the color lookup table.
const MAX_LUT_LENGTH: f64 = 65536.0;

/// Evaluates an axial shading for single device pixels.
#[derive(Debug, Clone)]
pub(crate) struct AxialEvaluator {
    /// Maps device space into shading space. `None` if the transform is not invertible.
    inverse: Option<Affine>,
    start: Point,
    axis: Vec2,
    denom: f64,
    extend: [bool; 2],
    length: f64,
    lut: Vec<[u8; 3]>,
}

impl AxialEvaluator {
    pub(crate) fn new(
        coords: [f32; 4],
        domain: [f32; 2],
        extend: [bool; 2],
        transform: Affine,
        mapper: &ColorMapper<'_>,
    ) -> Self {
        let [x0, y0, x1, y1] = coords.map(|c| c as f64);
        let [d0, d1] = domain.map(|d| d as f64);

        let start = Point::new(x0, y0);
        let end = Point::new(x1, y1);
        let axis = end - start;
        let denom = axis.hypot2();

        let inverse = (transform.determinant() != 0.0).then(|| transform.inverse());
        let length = (transform * start)
            .distance(transform * end)
            .min(MAX_LUT_LENGTH);
        let length = if length.is_finite() { length } else { 0.0 };

        let lut = (0..=length.round() as usize)
            .map(|i| {
                let s = if length > 0.0 {
                    (i as f64 / length).min(1.0)
                } else {
                    0.0
                };

                mapper.to_rgb8(&[(d0 + s * (d1 - d0)) as f32])
            })
            .collect();

        Self {
            inverse,
            start,
            axis,
            denom,
            extend,
            length,
            lut,
        }
    }

    /// The color at the integer device point `(x, y)`, or `None` if the point is
    /// not painted by the shading.
    pub(crate) fn color_at(&self, x: i32, y: i32) -> Option<[u8; 3]> {
        let inverse = self.inverse?;

        if self.denom == 0.0 {
            return None;
        }

        let p = inverse * Point::new(x as f64, y as f64);
        let t = (p - self.start).dot(self.axis) / self.denom;

        let t = if t < 0.0 {
            if !self.extend[0] {
                return None;
            }

            0.0
        } else if t > 1.0 {
            if !self.extend[1] {
                return None;
            }

            1.0
        } else {
            t
        };

        let idx = ((t * self.length).round() as usize).min(self.lut.len().saturating_sub(1));

        self.lut.get(idx).copied()
    }
}
