//! Precomputed colors for every device pixel covered by a mesh.

use crate::color::ColorMapper;
use crate::settings::DeviceRect;
use crate::triangle::{Degeneracy, Triangle};
use kurbo::Point;
use rustc_hash::FxHashMap;

/// A map from device pixels to their resolved RGB color.
#[derive(Debug, Clone, Default)]
pub(crate) struct PixelTable {
    pixels: FxHashMap<(i32, i32), [u8; 3]>,
}

impl PixelTable {
    /// Rasterize all triangles. If triangles overlap, the one that comes last wins.
    ///
    /// The pixel at `(x, y)` is sampled at the integer point `(x, y)`. Only pixels within
    /// `bounds` are evaluated, so the table never holds more entries than `bounds` has
    /// pixels.
    pub(crate) fn build<'a>(
        triangles: impl IntoIterator<Item = &'a Triangle>,
        mapper: &ColorMapper<'_>,
        bounds: DeviceRect,
    ) -> Self {
        let mut pixels = FxHashMap::default();

        for triangle in triangles {
            if let (Degeneracy::Line, Some(line)) = (triangle.degeneracy(), triangle.line()) {
                for pixel in line.pixels(bounds) {
                    pixels.insert(pixel, mapper.to_rgb8(&line.color_at(pixel)));
                }

                continue;
            }

            let bbox = triangle.bounding_box();
            let x0 = (bbox.x0.floor() as i32).max(bounds.x);
            let y0 = (bbox.y0.floor() as i32).max(bounds.y);
            let x1 = (bbox.x1.ceil() as i32).min(bounds.max_x());
            let y1 = (bbox.y1.ceil() as i32).min(bounds.max_y());

            for y in y0..=y1 {
                for x in x0..=x1 {
                    let p = Point::new(x as f64, y as f64);

                    if triangle.contains(p) {
                        pixels.insert((x, y), mapper.to_rgb8(&triangle.color_at(p)));
                    }
                }
            }
        }

        Self { pixels }
    }

    /// The color of the pixel, if it is covered by the mesh.
    #[inline]
    pub(crate) fn get(&self, x: i32, y: i32) -> Option<[u8; 3]> {
        self.pixels.get(&(x, y)).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.pixels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{ColorComponents, DeviceGray};
    use crate::settings::RasterSettings;
    use smallvec::smallvec;

    const TILE: DeviceRect = DeviceRect {
        x: -8,
        y: -8,
        width: 32,
        height: 32,
    };

    fn gray(v: f32) -> ColorComponents {
        smallvec![v]
    }

    fn build(triangles: &[Triangle], bounds: DeviceRect) -> PixelTable {
        let settings = RasterSettings::default();
        let mapper = ColorMapper {
            color_space: &DeviceGray,
            function: None,
            settings: &settings,
        };

        PixelTable::build(triangles, &mapper, bounds)
    }

    #[test]
    fn proper_triangle() {
        let triangle = Triangle::new(
            [
                Point::new(0.0, 0.0),
                Point::new(4.0, 0.0),
                Point::new(0.0, 4.0),
            ],
            [gray(0.0), gray(1.0), gray(1.0)],
        );
        let table = build(&[triangle], TILE);

        // 4 + 3 + 2 + 1 pixels, the diagonal edge is not part of the triangle.
        assert_eq!(table.len(), 10);
        assert_eq!(table.get(0, 0), Some([0, 0, 0]));
        assert_eq!(table.get(2, 1), Some([191, 191, 191]));
        assert_eq!(table.get(0, 3), Some([191, 191, 191]));
        assert_eq!(table.get(4, 0), None);
        assert_eq!(table.get(2, 2), None);
    }

    #[test]
    fn clipped_to_bounds() {
        let triangle = Triangle::new(
            [
                Point::new(0.0, 0.0),
                Point::new(4.0, 0.0),
                Point::new(0.0, 4.0),
            ],
            [gray(0.5), gray(0.5), gray(0.5)],
        );
        let table = build(&[triangle], DeviceRect::new(1, 0, 2, 1));

        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1, 0), Some([127, 127, 127]));
        assert_eq!(table.get(0, 0), None);
    }

    #[test]
    fn degenerate_line_clipped_to_bounds() {
        let triangle = Triangle::new(
            [
                Point::new(0.0, 0.0),
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
            ],
            [gray(0.0), gray(0.0), gray(1.0)],
        );

        let table = build(&[triangle.clone()], TILE);
        assert_eq!(table.len(), 11);
        assert_eq!(table.get(10, 0), Some([255, 255, 255]));

        let table = build(&[triangle], DeviceRect::new(0, 0, 2, 2));
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(2, 0), None);
    }

    #[test]
    fn huge_triangles_stay_within_bounds() {
        let proper = Triangle::new(
            [
                Point::new(-1e7, -1e7),
                Point::new(1e7, -1e7),
                Point::new(0.0, 1e7),
            ],
            [gray(1.0), gray(1.0), gray(1.0)],
        );
        let line = Triangle::new(
            [
                Point::new(-3e9, 0.0),
                Point::new(-3e9, 0.0),
                Point::new(3e9, 0.0),
            ],
            [gray(0.0), gray(0.0), gray(0.0)],
        );
        let table = build(&[proper, line], TILE);

        assert_eq!(table.len(), 32 * 32);
        assert_eq!(table.get(5, 0), Some([0, 0, 0]));
        assert_eq!(table.get(5, 1), Some([255, 255, 255]));
        assert_eq!(table.get(24, 0), None);
    }

    #[test]
    fn shared_edge_is_painted_once() {
        let first = Triangle::new(
            [
                Point::new(0.0, 0.0),
                Point::new(4.0, 0.0),
                Point::new(4.0, 4.0),
            ],
            [gray(0.0), gray(0.0), gray(0.0)],
        );
        let second = Triangle::new(
            [
                Point::new(0.0, 0.0),
                Point::new(4.0, 4.0),
                Point::new(0.0, 4.0),
            ],
            [gray(1.0), gray(1.0), gray(1.0)],
        );

        // The diagonal belongs to the first triangle, no matter the order.
        for triangles in [[first.clone(), second.clone()], [second, first]] {
            let table = build(&triangles, TILE);

            assert_eq!(table.get(2, 2), Some([0, 0, 0]));
            assert_eq!(table.get(3, 1), Some([0, 0, 0]));
            assert_eq!(table.get(1, 3), Some([255, 255, 255]));
            assert_eq!(table.len(), 16);
        }
    }
}
