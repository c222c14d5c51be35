//! Rasterizing shadings into RGBA pixel buffers.

use crate::axial::AxialEvaluator;
use crate::color::ColorMapper;
use crate::error::Result;
use crate::mesh::{MeshFormat, decode_free_form, decode_lattice, decode_patches};
use crate::patch::PatchKind;
use crate::pixel_table::PixelTable;
use crate::settings::{DeviceRect, RasterSettings, ShadingWarning};
use crate::shading::{MeshLayout, ShadingDescriptor, ShadingType};
use crate::triangle::Triangle;
use kurbo::{Affine, Rect};
use log::{debug, error};

/// A rectangle of RGBA pixels in device space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    /// The x coordinate of the leftmost pixel column.
    pub x: i32,
    /// The y coordinate of the topmost pixel row.
    pub y: i32,
    /// The number of pixel columns.
    pub width: u32,
    /// The number of pixel rows.
    pub height: u32,
    /// The pixels in row-major order, with 4 bytes (R, G, B, A) per pixel.
    pub data: Vec<u8>,
}

impl Raster {
    /// The pixel at the given device coordinates.
    ///
    /// Returns a fully transparent pixel for coordinates outside of the raster.
    pub fn pixel(&self, x: i32, y: i32) -> [u8; 4] {
        let col = x as i64 - self.x as i64;
        let row = y as i64 - self.y as i64;

        if col < 0 || row < 0 || col >= self.width as i64 || row >= self.height as i64 {
            return [0; 4];
        }

        let idx = ((row * self.width as i64 + col) * 4) as usize;

        self.data
            .get(idx..idx + 4)
            .and_then(|p| p.try_into().ok())
            .unwrap_or([0; 4])
    }
}

#[derive(Debug, Clone)]
enum Paint {
    Axial(AxialEvaluator),
    Mesh(PixelTable),
    Empty,
}

/// Rasterizes a single shading.
///
/// All decoding and tessellation happens once when creating the rasterizer. Afterwards,
/// it is immutable and can be queried from multiple threads at once.
#[derive(Debug, Clone)]
pub struct ShadingRasterizer {
    paint: Paint,
    background: Option<[u8; 3]>,
    bbox: Option<Rect>,
}

impl ShadingRasterizer {
    /// Create a new rasterizer for the shading.
    ///
    /// `data` holds the already decompressed vertex stream of mesh-based shadings and
    /// is ignored for axial shadings. `transform` maps shading space into device space.
    ///
    /// `bounds` is the device area that will be queried later on. Meshes are only
    /// rasterized within it, so pixels of a mesh shading outside of `bounds` are not
    /// painted (the background still is).
    ///
    /// Fails if the descriptor is unusable. Malformed vertex data is not an error: in
    /// this case, as much of the mesh as possible is decoded.
    pub fn try_new(
        descriptor: &ShadingDescriptor,
        data: &[u8],
        transform: Affine,
        bounds: DeviceRect,
        settings: &RasterSettings,
    ) -> Result<Self> {
        descriptor.validate()?;

        let mapper = ColorMapper {
            color_space: descriptor.color_space.as_ref(),
            function: descriptor.function.as_deref(),
            settings,
        };
        let num_components = descriptor.num_vertex_components();

        let build_table = |triangles: &[Triangle]| {
            let table = PixelTable::build(triangles, &mapper, bounds);
            debug!(
                "built pixel table with {} pixels from {} triangles",
                table.len(),
                triangles.len()
            );

            Paint::Mesh(table)
        };

        let patch_table = |layout: &MeshLayout, kind: PatchKind| -> Result<Paint> {
            let format = MeshFormat::new(layout, num_components, true)?;
            let patches = decode_patches(data, &format, transform, kind, settings);
            let triangles = patches
                .iter()
                .flat_map(|p| p.triangles().iter().cloned())
                .collect::<Vec<_>>();

            Ok(build_table(&triangles))
        };

        let paint = match &descriptor.shading_type {
            ShadingType::Axial {
                coords,
                domain,
                extend,
            } => Paint::Axial(AxialEvaluator::new(
                *coords, *domain, *extend, transform, &mapper,
            )),
            ShadingType::FreeFormTriangleMesh(layout) => {
                let format = MeshFormat::new(layout, num_components, true)?;
                let triangles = decode_free_form(data, &format, transform, settings)
                    .into_iter()
                    .map(Triangle::from_vertices)
                    .collect::<Vec<_>>();

                build_table(&triangles)
            }
            ShadingType::LatticeFormTriangleMesh {
                layout,
                vertices_per_row,
            } => {
                let format = MeshFormat::new(layout, num_components, false)?;
                let triangles =
                    decode_lattice(data, &format, transform, *vertices_per_row, settings)
                        .into_iter()
                        .map(Triangle::from_vertices)
                        .collect::<Vec<_>>();

                build_table(&triangles)
            }
            ShadingType::CoonsPatchMesh(layout) => patch_table(layout, PatchKind::Coons)?,
            ShadingType::TensorProductPatchMesh(layout) => {
                patch_table(layout, PatchKind::Tensor)?
            }
        };

        Ok(Self {
            paint,
            background: convert_background(descriptor, settings),
            bbox: device_bbox(descriptor, transform),
        })
    }

    /// Create a new rasterizer for the shading.
    ///
    /// Like [`ShadingRasterizer::try_new`], but if the descriptor is unusable, a
    /// rasterizer that only paints the background (if any) is returned instead.
    pub fn new(
        descriptor: &ShadingDescriptor,
        data: &[u8],
        transform: Affine,
        bounds: DeviceRect,
        settings: &RasterSettings,
    ) -> Self {
        match Self::try_new(descriptor, data, transform, bounds, settings) {
            Ok(rasterizer) => rasterizer,
            Err(e) => {
                error!("failed to construct shading: {e}");
                settings.report(ShadingWarning::ConstructionFailure);

                Self::empty(descriptor, transform, settings)
            }
        }
    }

    fn empty(descriptor: &ShadingDescriptor, transform: Affine, settings: &RasterSettings) -> Self {
        Self {
            paint: Paint::Empty,
            background: convert_background(descriptor, settings),
            bbox: device_bbox(descriptor, transform),
        }
    }

    /// The color of the device pixel, or `None` if it is not painted.
    pub fn color_at(&self, x: i32, y: i32) -> Option<[u8; 3]> {
        if let Some(bbox) = self.bbox {
            let (px, py) = (x as f64, y as f64);

            if px < bbox.x0 || px > bbox.x1 || py < bbox.y0 || py > bbox.y1 {
                return None;
            }
        }

        let color = match &self.paint {
            Paint::Axial(axial) => axial.color_at(x, y),
            Paint::Mesh(table) => table.get(x, y),
            Paint::Empty => None,
        };

        color.or(self.background)
    }

    /// Rasterize the given rectangle of device pixels.
    ///
    /// Painted pixels are fully opaque, all other pixels are fully transparent.
    pub fn get_raster(&self, x: i32, y: i32, width: u32, height: u32) -> Raster {
        let stride = width as usize * 4;
        let mut data = vec![0; stride * height as usize];

        for (row, line) in data.chunks_exact_mut(stride.max(1)).enumerate() {
            let py = y.saturating_add(row as i32);

            for (col, pixel) in line.chunks_exact_mut(4).enumerate() {
                let px = x.saturating_add(col as i32);

                if let Some([r, g, b]) = self.color_at(px, py) {
                    pixel.copy_from_slice(&[r, g, b, 255]);
                }
            }
        }

        Raster {
            x,
            y,
            width,
            height,
            data,
        }
    }
}

fn convert_background(descriptor: &ShadingDescriptor, settings: &RasterSettings) -> Option<[u8; 3]> {
    let background = descriptor.background.as_ref()?;

    if background.len() != descriptor.color_space.num_components() {
        return None;
    }

    let mapper = ColorMapper {
        color_space: descriptor.color_space.as_ref(),
        function: None,
        settings,
    };

    Some(mapper.to_rgb8(background))
}

/// Transform the bounding box into device space. Boxes without an area don't clip.
fn device_bbox(descriptor: &ShadingDescriptor, transform: Affine) -> Option<Rect> {
    let bbox = descriptor.bbox?.abs();
    let bbox = transform.transform_rect_bbox(bbox);

    (bbox.width() > 0.0 && bbox.height() > 0.0).then_some(bbox)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::DeviceRgb;
    use crate::error::DecodeError;
    use hayro_common::bit::{BitSize, BitWriter};
    use smallvec::smallvec;
    use std::sync::Arc;

    const TILE: DeviceRect = DeviceRect {
        x: -16,
        y: -16,
        width: 64,
        height: 64,
    };

    fn triangle_descriptor() -> ShadingDescriptor {
        ShadingDescriptor::new(
            ShadingType::FreeFormTriangleMesh(MeshLayout {
                bits_per_coordinate: 8,
                bits_per_component: 8,
                bits_per_flag: 8,
                decode: vec![0.0, 255.0, 0.0, 255.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0],
            }),
            Arc::new(DeviceRgb),
        )
    }

    fn triangle_data() -> Vec<u8> {
        let mut w = BitWriter::new();

        for (x, y) in [(0, 0), (8, 0), (0, 8)] {
            w.write_all([0, x, y, 0, 255, 0], BitSize::EIGHT);
        }

        w.finish()
    }

    #[test]
    fn raster_layout() {
        let rasterizer = ShadingRasterizer::new(
            &triangle_descriptor(),
            &triangle_data(),
            Affine::IDENTITY,
            TILE,
            &RasterSettings::default(),
        );
        let raster = rasterizer.get_raster(-1, 0, 3, 2);

        assert_eq!(raster.data.len(), 3 * 2 * 4);
        assert_eq!(raster.pixel(-1, 0), [0, 0, 0, 0]);
        assert_eq!(raster.pixel(0, 0), [0, 255, 0, 255]);
        assert_eq!(raster.pixel(1, 1), [0, 255, 0, 255]);
        assert_eq!(raster.pixel(5, 5), [0, 0, 0, 0]);
        assert_eq!(&raster.data[4..8], &[0, 255, 0, 255]);
    }

    #[test]
    fn mesh_is_only_rasterized_within_bounds() {
        // Covers millions of pixels in each direction.
        let rasterizer = ShadingRasterizer::new(
            &triangle_descriptor(),
            &triangle_data(),
            Affine::scale(1e6),
            TILE,
            &RasterSettings::default(),
        );

        let Paint::Mesh(table) = &rasterizer.paint else {
            panic!("expected a mesh");
        };

        assert_eq!(table.len(), 48 * 48);
        assert_eq!(rasterizer.color_at(47, 47), Some([0, 255, 0]));
        assert_eq!(rasterizer.color_at(48, 0), None);
        assert_eq!(rasterizer.color_at(-1, 0), None);
    }

    #[test]
    fn bbox_clips_even_background() {
        let descriptor = triangle_descriptor()
            .with_background(smallvec![1.0, 0.0, 0.0])
            .with_bbox(Rect::new(0.0, 0.0, 10.0, 10.0));
        let rasterizer = ShadingRasterizer::new(
            &descriptor,
            &triangle_data(),
            Affine::translate((10.0, 0.0)),
            TILE,
            &RasterSettings::default(),
        );

        assert_eq!(rasterizer.color_at(10, 0), Some([0, 255, 0]));
        assert_eq!(rasterizer.color_at(19, 9), Some([255, 0, 0]));
        assert_eq!(rasterizer.color_at(21, 0), None);
        assert_eq!(rasterizer.color_at(9, 0), None);
    }

    #[test]
    fn degenerate_bbox_does_not_clip() {
        let descriptor = triangle_descriptor().with_bbox(Rect::new(3.0, 0.0, 3.0, 10.0));
        let rasterizer = ShadingRasterizer::new(
            &descriptor,
            &triangle_data(),
            Affine::IDENTITY,
            TILE,
            &RasterSettings::default(),
        );

        assert_eq!(rasterizer.color_at(1, 1), Some([0, 255, 0]));
    }

    #[test]
    fn construction_failure() {
        let mut descriptor = triangle_descriptor().with_background(smallvec![0.0, 0.0, 1.0]);
        descriptor.shading_type = ShadingType::FreeFormTriangleMesh(MeshLayout {
            bits_per_coordinate: 40,
            bits_per_component: 8,
            bits_per_flag: 8,
            decode: vec![],
        });

        let result = ShadingRasterizer::try_new(
            &descriptor,
            &triangle_data(),
            Affine::IDENTITY,
            TILE,
            &RasterSettings::default(),
        );
        assert_eq!(result.unwrap_err(), DecodeError::InvalidBitSize(40));

        let reported = Arc::new(std::sync::Mutex::new(vec![]));
        let cloned = reported.clone();
        let settings = RasterSettings {
            warning_sink: Arc::new(move |w| cloned.lock().unwrap().push(w)),
        };
        let rasterizer = ShadingRasterizer::new(
            &descriptor,
            &triangle_data(),
            Affine::IDENTITY,
            TILE,
            &settings,
        );

        assert_eq!(rasterizer.color_at(1, 1), Some([0, 0, 255]));
        assert_eq!(*reported.lock().unwrap(), [ShadingWarning::ConstructionFailure]);
    }
}
