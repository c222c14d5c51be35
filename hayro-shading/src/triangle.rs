//! Gouraud-shaded triangles, including their degenerate forms.

use crate::color::ColorComponents;
use crate::geometry::{covers_edge, points_coincide, signed_area};
use crate::line::{Line, round_point};
use crate::mesh::Vertex;
use crate::settings::POINT_TOLERANCE;
use kurbo::{Point, Rect};

/// The number of distinct corners of a triangle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Degeneracy {
    /// All three corners coincide.
    Point = 1,
    /// The triangle collapsed into a line segment.
    Line = 2,
    /// A proper triangle with a non-zero area.
    Proper = 3,
}

/// A triangle with a color at each corner.
#[derive(Debug, Clone)]
pub struct Triangle {
    points: [Point; 3],
    colors: [ColorComponents; 3],
    degeneracy: Degeneracy,
    line: Option<Line>,
    area: f64,
}

impl Triangle {
    /// Create a new triangle, classifying its degeneracy.
    pub fn new(points: [Point; 3], colors: [ColorComponents; 3]) -> Self {
        let [a, b, c] = points;
        let area = signed_area(a, b, c);
        let coincident = [
            points_coincide(a, b),
            points_coincide(a, c),
            points_coincide(b, c),
        ];

        let degeneracy = match coincident.iter().filter(|c| **c).count() {
            0 if area.abs() >= POINT_TOLERANCE => Degeneracy::Proper,
            0 | 1 => Degeneracy::Line,
            _ => Degeneracy::Point,
        };

        let line = (degeneracy == Degeneracy::Line).then(|| {
            // Use the two corners that are the farthest apart. This picks the two distinct
            // corners if two of them coincide, and the end points of the segment if all
            // three lie on one line.
            let (i, j) = [(0, 1), (0, 2), (1, 2)]
                .into_iter()
                .max_by(|(i1, j1), (i2, j2)| {
                    let d1 = points[*i1].distance_squared(points[*j1]);
                    let d2 = points[*i2].distance_squared(points[*j2]);
                    d1.total_cmp(&d2)
                })
                .unwrap_or((0, 1));

            Line::new(points[i], points[j], colors[i].clone(), colors[j].clone())
        });

        Self {
            points,
            colors,
            degeneracy,
            line,
            area,
        }
    }

    /// Create a new triangle from three mesh vertices.
    pub fn from_vertices(vertices: [Vertex; 3]) -> Self {
        let [v0, v1, v2] = vertices;

        Self::new([v0.point, v1.point, v2.point], [v0.color, v1.color, v2.color])
    }

    /// The degeneracy of the triangle.
    pub fn degeneracy(&self) -> Degeneracy {
        self.degeneracy
    }

    /// The corners of the triangle.
    pub fn points(&self) -> &[Point; 3] {
        &self.points
    }

    /// The colors at the corners of the triangle.
    pub fn colors(&self) -> &[ColorComponents; 3] {
        &self.colors
    }

    /// The line the triangle collapsed into, if its degeneracy is [`Degeneracy::Line`].
    pub fn line(&self) -> Option<&Line> {
        self.line.as_ref()
    }

    /// The bounding box of the corners.
    pub fn bounding_box(&self) -> Rect {
        let [a, b, c] = self.points;

        Rect::from_points(a, b).union_pt(c)
    }

    /// Whether the point lies inside of the triangle.
    ///
    /// Points on the top and left edges of a proper triangle are inside, points on
    /// the other edges are not. This way, adjacent triangles never both contain the
    /// points of their shared edge.
    pub fn contains(&self, p: Point) -> bool {
        let [a, b, c] = self.points;

        match self.degeneracy {
            Degeneracy::Point => points_coincide(a, p),
            Degeneracy::Line => self.line.as_ref().is_some_and(|l| l.contains(p)),
            Degeneracy::Proper => {
                let [a, b, c] = if self.area > 0.0 { [a, b, c] } else { [a, c, b] };

                covers_edge(p, a, b) && covers_edge(p, b, c) && covers_edge(p, c, a)
            }
        }
    }

    /// The interpolated color at the given point.
    pub fn color_at(&self, p: Point) -> ColorComponents {
        let [a, b, c] = self.points;

        match self.degeneracy {
            Degeneracy::Point => {
                let [c0, c1, c2] = &self.colors;

                c0.iter()
                    .zip(c1.iter())
                    .zip(c2.iter())
                    .map(|((c0, c1), c2)| ((*c0 as f64 + *c1 as f64 + *c2 as f64) / 3.0) as f32)
                    .collect()
            }
            Degeneracy::Line => match &self.line {
                Some(line) => line.color_at(round_point(p)),
                None => self.colors[0].clone(),
            },
            Degeneracy::Proper => {
                let weights = [
                    signed_area(p, b, c) / self.area,
                    signed_area(a, p, c) / self.area,
                    signed_area(a, b, p) / self.area,
                ];
                let [c0, c1, c2] = &self.colors;

                c0.iter()
                    .zip(c1.iter())
                    .zip(c2.iter())
                    .map(|((c0, c1), c2)| {
                        (*c0 as f64 * weights[0] + *c1 as f64 * weights[1] + *c2 as f64 * weights[2])
                            as f32
                    })
                    .collect()
            }
        }
    }
}
