//! End-to-end tests for hayro-shading.
//!
//! Mesh streams are assembled with the bit writer from `hayro-common` and rendered
//! through the public rasterizer API.

use hayro_common::bit::{BitSize, BitWriter};
use hayro_shading::{
    ColorComponents, ColorSpace, DeviceGray, DeviceRect, ExponentialFunction, MeshLayout,
    RasterSettings, ShadingDescriptor, ShadingRasterizer, ShadingType, ShadingWarning,
};
use kurbo::Affine;
use smallvec::smallvec;
use std::sync::{Arc, Mutex};


/// The device area all tests query.
pub(crate) const TILE: DeviceRect = DeviceRect {
    x: -128,
    y: -128,
    width: 512,
    height: 512,
};

pub(crate) fn bs(bits: u8) -> BitSize {
    BitSize::from_u8(bits).unwrap()
}

/// A layout with 8-bit fields whose coordinates decode to the raw byte values.
pub(crate) fn byte_layout(num_components: usize) -> MeshLayout {
    let mut decode = vec![0.0, 255.0, 0.0, 255.0];

    for _ in 0..num_components {
        decode.extend([0.0, 1.0]);
    }

    MeshLayout {
        bits_per_coordinate: 8,
        bits_per_component: 8,
        bits_per_flag: 8,
        decode,
    }
}

/// Write a vertex of a triangle mesh with 8-bit fields.
pub(crate) fn write_vertex(w: &mut BitWriter, flag: Option<u32>, point: (u32, u32), color: &[u32]) {
    if let Some(flag) = flag {
        w.write(flag, bs(8));
    }

    w.write_all([point.0, point.1], bs(8));
    w.write_all(color.iter().copied(), bs(8));
    w.align();
}

/// Write a patch with 8-bit fields.
pub(crate) fn write_patch(w: &mut BitWriter, flag: u32, points: &[(u32, u32)], colors: &[&[u32]]) {
    w.write(flag, bs(8));

    for (x, y) in points {
        w.write_all([*x, *y], bs(8));
    }

    for color in colors {
        w.write_all(color.iter().copied(), bs(8));
    }
}

/// A linear function from black to white.
pub(crate) fn gray_ramp() -> Arc<ExponentialFunction> {
    Arc::new(ExponentialFunction::new(
        [0.0, 1.0],
        smallvec![0.0],
        smallvec![1.0],
        1.0,
    ))
}

/// Settings that record all emitted warnings.
pub(crate) fn recording_settings() -> (RasterSettings, Arc<Mutex<Vec<ShadingWarning>>>) {
    let warnings = Arc::new(Mutex::new(vec![]));
    let cloned = warnings.clone();
    let settings = RasterSettings {
        warning_sink: Arc::new(move |w| cloned.lock().unwrap().push(w)),
    };

    (settings, warnings)
}

pub(crate) fn rasterize(descriptor: &ShadingDescriptor, data: &[u8]) -> ShadingRasterizer {
    ShadingRasterizer::new(
        descriptor,
        data,
        Affine::IDENTITY,
        TILE,
        &RasterSettings::default(),
    )
}

/// Assert that a pixel is opaque gray with the given value, within a tolerance of one.
#[track_caller]
pub(crate) fn assert_gray(pixel: [u8; 4], expected: u8) {
    let [r, g, b, a] = pixel;

    assert_eq!(a, 255, "pixel {pixel:?} is not opaque");
    assert!(r == g && g == b, "pixel {pixel:?} is not gray");
    assert!(
        r.abs_diff(expected) <= 1,
        "pixel {pixel:?} is not close to {expected}"
    );
}

/// A color space that can't convert anything.
pub(crate) struct BrokenColorSpace;

impl ColorSpace for BrokenColorSpace {
    fn num_components(&self) -> usize {
        1
    }

    fn to_rgb(&self, _: &[f32]) -> Option<[f32; 3]> {
        None
    }
}

#[test]
fn device_gray_descriptor_has_one_component() {
    let descriptor = ShadingDescriptor::new(
        ShadingType::FreeFormTriangleMesh(byte_layout(1)),
        Arc::new(DeviceGray),
    );
    let background: ColorComponents = smallvec![0.5];

    assert_eq!(descriptor.num_vertex_components(), 1);
    assert_eq!(descriptor.with_background(background).background.unwrap().len(), 1);
}
