//! Settings and diagnostics for constructing a shading rasterizer.

use std::sync::Arc;

/// A callback function for receiving warnings while decoding a shading.
pub type WarningSinkFn = Arc<dyn Fn(ShadingWarning) + Send + Sync>;

/// The tolerance under which two device-space points are considered to coincide.
///
/// Used for triangle degeneracy, overlapping points of a tessellated patch and
/// containment tests of degenerate triangles.
pub const POINT_TOLERANCE: f64 = 1e-3;

/// A rectangle of device pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DeviceRect {
    /// The x coordinate of the leftmost pixel column.
    pub x: i32,
    /// The y coordinate of the topmost pixel row.
    pub y: i32,
    /// The number of pixel columns.
    pub width: u32,
    /// The number of pixel rows.
    pub height: u32,
}

impl DeviceRect {
    /// Create a new device rectangle.
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The x coordinate of the rightmost pixel column (inclusive).
    pub fn max_x(&self) -> i32 {
        self.x.saturating_add_unsigned(self.width).saturating_sub(1)
    }

    /// The y coordinate of the bottommost pixel row (inclusive).
    pub fn max_y(&self) -> i32 {
        self.y.saturating_add_unsigned(self.height).saturating_sub(1)
    }

    /// Whether the pixel lies inside of the rectangle.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x <= self.max_x() && y >= self.y && y <= self.max_y()
    }
}

#[derive(Clone)]
/// Settings that should be applied when building a shading rasterizer.
pub struct RasterSettings {
    /// In certain cases, a warning will be emitted in case an issue was encountered while
    /// decoding the shading. Providing a callback allows you to catch those warnings and
    /// handle them, if desired.
    pub warning_sink: WarningSinkFn,
}

impl RasterSettings {
    pub(crate) fn report(&self, warning: ShadingWarning) {
        (self.warning_sink)(warning);
    }
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            warning_sink: Arc::new(|_| {}),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Warnings that can occur while decoding or rasterizing a shading.
pub enum ShadingWarning {
    /// The mesh stream ended in the middle of a record.
    TruncatedStream,
    /// A flag outside of the valid range for the shading type was encountered.
    InvalidFlag,
    /// A record referenced a previous record, but it was the first one.
    MissingPredecessor,
    /// The color space or the function failed to evaluate a color.
    ColorConversionFailure,
    /// The shading could not be constructed and will not paint any mesh.
    ConstructionFailure,
}
