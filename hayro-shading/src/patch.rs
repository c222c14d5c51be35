//! Coons and tensor-product patches and their tessellation into triangles.

use crate::color::ColorComponents;
use crate::geometry::{
    bernstein, eval_cubic, is_edge_straight, level_for_length, points_coincide,
    same_side_of_both,
};
use crate::triangle::Triangle;
use kurbo::Point;
use smallvec::SmallVec;

/// The order in which the control points of a patch appear in the stream, as
/// indices into the 4x4 control point grid.
///
/// Coons patches only store the first 12 points.
const STREAM_ORDER: [(usize, usize); 16] = [
    (0, 0),
    (0, 1),
    (0, 2),
    (0, 3),
    (1, 3),
    (2, 3),
    (3, 3),
    (3, 2),
    (3, 1),
    (3, 0),
    (2, 0),
    (1, 0),
    (1, 1),
    (1, 2),
    (2, 2),
    (2, 1),
];

/// The kind of a patch.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PatchKind {
    /// A Coons patch, defined by its four boundary curves.
    Coons,
    /// A tensor-product patch, defined by a full grid of 16 control points.
    Tensor,
}

impl PatchKind {
    /// The number of control points stored for a patch of this kind.
    pub fn num_points(self) -> usize {
        match self {
            Self::Coons => 12,
            Self::Tensor => 16,
        }
    }
}

/// An edge shared with the next patch in the stream.
#[derive(Debug, Clone)]
pub(crate) struct EdgeCarry {
    pub(crate) points: [Point; 4],
    pub(crate) colors: [ColorComponents; 2],
}

/// A bicubic patch with a color at each corner, in device space.
///
/// The control points are stored in a grid `p[i][j]`, where `i` runs along the
/// `u` direction and `j` along the `v` direction. The corner colors belong to
/// `p[0][0]`, `p[0][3]`, `p[3][3]` and `p[3][0]`, in that order.
#[derive(Debug, Clone)]
pub struct Patch {
    kind: PatchKind,
    grid: [[Point; 4]; 4],
    colors: [ColorComponents; 4],
    level_u: u8,
    level_v: u8,
    triangles: Vec<Triangle>,
}

impl Patch {
    /// Create a Coons patch from its 12 boundary points, in stream order.
    pub fn coons(points: [Point; 12], colors: [ColorComponents; 4]) -> Self {
        let mut grid = grid_from_stream(&points);
        let v = |i: usize, j: usize| grid[i][j].to_vec2();

        let p11 = (v(0, 0) * -4.0 + (v(0, 1) + v(1, 0)) * 6.0 - (v(0, 3) + v(3, 0)) * 2.0
            + (v(3, 1) + v(1, 3)) * 3.0
            - v(3, 3))
            / 9.0;
        let p12 = (v(0, 3) * -4.0 + (v(0, 2) + v(1, 3)) * 6.0 - (v(0, 0) + v(3, 3)) * 2.0
            + (v(3, 2) + v(1, 0)) * 3.0
            - v(3, 0))
            / 9.0;
        let p21 = (v(3, 0) * -4.0 + (v(3, 1) + v(2, 0)) * 6.0 - (v(3, 3) + v(0, 0)) * 2.0
            + (v(0, 1) + v(2, 3)) * 3.0
            - v(0, 3))
            / 9.0;
        let p22 = (v(3, 3) * -4.0 + (v(3, 2) + v(2, 3)) * 6.0 - (v(3, 0) + v(0, 3)) * 2.0
            + (v(0, 2) + v(2, 0)) * 3.0
            - v(0, 0))
            / 9.0;

        grid[1][1] = p11.to_point();
        grid[1][2] = p12.to_point();
        grid[2][1] = p21.to_point();
        grid[2][2] = p22.to_point();

        Self::from_grid(PatchKind::Coons, grid, colors)
    }

    /// Create a tensor-product patch from its 16 control points, in stream order.
    pub fn tensor(points: [Point; 16], colors: [ColorComponents; 4]) -> Self {
        Self::from_grid(PatchKind::Tensor, grid_from_stream(&points), colors)
    }

    /// Create a patch from points and colors read from a mesh stream.
    pub(crate) fn from_stream(
        kind: PatchKind,
        points: &[Point],
        colors: SmallVec<[ColorComponents; 4]>,
    ) -> Option<Self> {
        let colors = colors.into_inner().ok()?;

        match kind {
            PatchKind::Coons => Some(Self::coons(points.try_into().ok()?, colors)),
            PatchKind::Tensor => Some(Self::tensor(points.try_into().ok()?, colors)),
        }
    }

    fn from_grid(kind: PatchKind, grid: [[Point; 4]; 4], colors: [ColorComponents; 4]) -> Self {
        let (level_u, level_v) = subdivision_levels(&grid);

        let mut patch = Self {
            kind,
            grid,
            colors,
            level_u,
            level_v,
            triangles: vec![],
        };
        patch.triangles = patch.tessellate();

        patch
    }

    /// The kind of the patch.
    pub fn kind(&self) -> PatchKind {
        self.kind
    }

    /// The control point grid.
    pub fn grid(&self) -> &[[Point; 4]; 4] {
        &self.grid
    }

    /// The subdivision levels in `u` and `v` direction.
    pub fn levels(&self) -> (u8, u8) {
        (self.level_u, self.level_v)
    }

    /// The triangles the patch was tessellated into.
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// The edge and the two corner colors that the next patch inherits for the
    /// given flag, with points ordered as the next patch expects them.
    pub(crate) fn edge(&self, flag: u32) -> Option<EdgeCarry> {
        let g = &self.grid;
        let [c0, c1, c2, c3] = &self.colors;

        let (points, colors) = match flag {
            1 => ([g[0][3], g[1][3], g[2][3], g[3][3]], [c1, c2]),
            2 => ([g[3][3], g[3][2], g[3][1], g[3][0]], [c2, c3]),
            3 => ([g[3][0], g[2][0], g[1][0], g[0][0]], [c3, c0]),
            _ => return None,
        };

        Some(EdgeCarry {
            points,
            colors: colors.map(|c| c.clone()),
        })
    }

    /// Evaluate the surface at the given parametric coordinates.
    pub fn eval(&self, u: f64, v: f64) -> Point {
        let g = &self.grid;

        match self.kind {
            PatchKind::Coons => {
                let c1 = eval_cubic([g[0][0], g[1][0], g[2][0], g[3][0]], u).to_vec2();
                let c2 = eval_cubic([g[0][3], g[1][3], g[2][3], g[3][3]], u).to_vec2();
                let d1 = eval_cubic(g[0], v).to_vec2();
                let d2 = eval_cubic(g[3], v).to_vec2();

                let sc = c1 * (1.0 - v) + c2 * v;
                let sd = d1 * (1.0 - u) + d2 * u;
                let sb = g[0][0].to_vec2() * ((1.0 - u) * (1.0 - v))
                    + g[0][3].to_vec2() * ((1.0 - u) * v)
                    + g[3][0].to_vec2() * (u * (1.0 - v))
                    + g[3][3].to_vec2() * (u * v);

                (sc + sd - sb).to_point()
            }
            PatchKind::Tensor => {
                let bu = bernstein(u);
                let bv = bernstein(v);
                let mut x = 0.0;
                let mut y = 0.0;

                for i in 0..4 {
                    for j in 0..4 {
                        let w = bu[i] * bv[j];
                        x += g[i][j].x * w;
                        y += g[i][j].y * w;
                    }
                }

                Point::new(x, y)
            }
        }
    }

    /// The color at the given parametric coordinates, bilinearly interpolated from
    /// the corner colors.
    pub fn color_at(&self, u: f64, v: f64) -> ColorComponents {
        let [c0, c1, c2, c3] = &self.colors;

        (0..c0.len())
            .map(|i| {
                let get = |c: &ColorComponents| c.get(i).copied().unwrap_or(0.0) as f64;

                ((1.0 - v) * ((1.0 - u) * get(c0) + u * get(c3))
                    + v * ((1.0 - u) * get(c1) + u * get(c2))) as f32
            })
            .collect()
    }

    fn tessellate(&self) -> Vec<Triangle> {
        let size_u = (1usize << self.level_u) + 1;
        let size_v = (1usize << self.level_v) + 1;

        let mut samples = Vec::with_capacity(size_v);

        for i in 0..size_v {
            let v = i as f64 / (size_v - 1) as f64;
            let row = (0..size_u)
                .map(|j| {
                    let u = j as f64 / (size_u - 1) as f64;
                    (self.eval(u, v), self.color_at(u, v))
                })
                .collect::<Vec<_>>();

            samples.push(row);
        }

        let mut triangles = Vec::with_capacity((size_u - 1) * (size_v - 1) * 2);

        for i in 1..size_v {
            for j in 1..size_u {
                let (p0, c0) = &samples[i - 1][j - 1];
                let (p1, c1) = &samples[i - 1][j];
                let (p2, c2) = &samples[i][j];
                let (p3, c3) = &samples[i][j - 1];

                let lower_left = !points_coincide(*p0, *p1) && !points_coincide(*p0, *p3);

                if lower_left {
                    triangles.push(Triangle::new(
                        [*p0, *p1, *p3],
                        [c0.clone(), c1.clone(), c3.clone()],
                    ));
                }

                // The upper right triangle can only be dropped if the lower left one
                // already covers the cell.
                if !lower_left || !(points_coincide(*p2, *p1) || points_coincide(*p2, *p3)) {
                    triangles.push(Triangle::new(
                        [*p3, *p1, *p2],
                        [c3.clone(), c1.clone(), c2.clone()],
                    ));
                }
            }
        }

        triangles
    }
}

fn grid_from_stream(points: &[Point]) -> [[Point; 4]; 4] {
    let mut grid = [[Point::ZERO; 4]; 4];

    for (point, (i, j)) in points.iter().zip(STREAM_ORDER) {
        grid[i][j] = *point;
    }

    grid
}

/// Choose the number of subdivisions in `u` and `v` direction.
///
/// If the two boundary curves running along a direction are straight and no inner
/// control point lies outside of them, fewer subdivisions are needed for short edges.
fn subdivision_levels(g: &[[Point; 4]; 4]) -> (u8, u8) {
    let inner = [g[1][1], g[1][2], g[2][1], g[2][2]];
    let chord = |curve: [Point; 4]| curve[0].distance(curve[3]);

    let level = |first: [Point; 4], second: [Point; 4]| {
        let straight = is_edge_straight(first) && is_edge_straight(second);
        let outside = inner
            .iter()
            .any(|p| same_side_of_both(*p, first[0], first[3], second[0], second[3]));

        if straight && !outside {
            level_for_length(chord(first).max(chord(second)))
        } else {
            4
        }
    };

    let level_u = level(
        [g[0][0], g[1][0], g[2][0], g[3][0]],
        [g[0][3], g[1][3], g[2][3], g[3][3]],
    );
    let level_v = level(g[0], g[3]);

    (level_u, level_v)
}
