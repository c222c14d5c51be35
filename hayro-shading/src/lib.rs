/*!
A crate for rasterizing PDF shadings.

This crate turns axial shadings and the four kinds of mesh-based shadings (free-form and
lattice-form triangle meshes, Coons patch meshes and tensor-product patch meshes) into RGBA
pixels. Parsing the PDF file itself is not part of this crate: you describe the shading with
a [`ShadingDescriptor`], hand over the already decompressed vertex stream as well as the
transform into device space and the device area you are going to query. Afterwards, you can
query arbitrary rectangles of device pixels from the resulting [`ShadingRasterizer`].

The whole mesh is decoded, tessellated and rasterized once when the rasterizer is created.
Afterwards, the rasterizer is immutable, so it can be shared between threads that render
different tiles of the same page.

Mesh streams in the wild are frequently slightly broken. Instead of rejecting them, this crate
renders everything that could be decoded. You can inspect the problems that were encountered
by registering a warning sink in the [`RasterSettings`].

## Example
```
use hayro_shading::{
    DeviceGray, DeviceRect, ExponentialFunction, RasterSettings, ShadingDescriptor,
    ShadingRasterizer, ShadingType,
};
use kurbo::Affine;
use smallvec::smallvec;
use std::sync::Arc;

let function = ExponentialFunction::new([0.0, 1.0], smallvec![0.0], smallvec![1.0], 1.0);
let descriptor = ShadingDescriptor::new(
    ShadingType::Axial {
        coords: [0.0, 0.0, 100.0, 0.0],
        domain: [0.0, 1.0],
        extend: [false, false],
    },
    Arc::new(DeviceGray),
)
.with_function(Arc::new(function));

let rasterizer = ShadingRasterizer::new(
    &descriptor,
    &[],
    Affine::IDENTITY,
    DeviceRect::new(0, 0, 200, 1),
    &RasterSettings::default(),
);
let raster = rasterizer.get_raster(0, 0, 200, 1);

assert_eq!(raster.pixel(50, 0), [127, 127, 127, 255]);
assert_eq!(raster.pixel(150, 0), [0, 0, 0, 0]);
```

## Safety
This crate forbids unsafe code via a crate-level attribute.
*/

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod axial;
mod color;
mod error;
mod function;
mod geometry;
mod line;
mod mesh;
mod patch;
mod pixel_table;
mod raster;
mod settings;
mod shading;
mod triangle;

pub use color::{ColorComponents, ColorSpace, DeviceCmyk, DeviceGray, DeviceRgb, rgb8};
pub use error::{DecodeError, Result};
pub use function::{ExponentialFunction, ShadingFunction};
pub use line::Line;
pub use mesh::Vertex;
pub use patch::{Patch, PatchKind};
pub use raster::{Raster, ShadingRasterizer};
pub use settings::{DeviceRect, POINT_TOLERANCE, RasterSettings, ShadingWarning, WarningSinkFn};
pub use shading::{MeshLayout, ShadingDescriptor, ShadingType};
pub use triangle::{Degeneracy, Triangle};
