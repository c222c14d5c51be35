//! Color spaces and the conversion of shading colors into RGB.

use crate::function::ShadingFunction;
use crate::settings::{RasterSettings, ShadingWarning};
use log::warn;
use smallvec::SmallVec;

/// A buffer holding the components of a color.
pub type ColorComponents = SmallVec<[f32; 4]>;

/// A color space that can convert its components into RGB.
pub trait ColorSpace: Send + Sync {
    /// The number of components of a color in this color space.
    fn num_components(&self) -> usize;

    /// Convert the components into RGB, each channel between 0 and 1.
    ///
    /// Returns `None` if the conversion failed.
    fn to_rgb(&self, c: &[f32]) -> Option<[f32; 3]>;
}

/// The device gray color space.
#[derive(Debug, Copy, Clone, Default)]
pub struct DeviceGray;

impl ColorSpace for DeviceGray {
    fn num_components(&self) -> usize {
        1
    }

    fn to_rgb(&self, c: &[f32]) -> Option<[f32; 3]> {
        let g = *c.first()?;
        Some([g, g, g])
    }
}

/// The device RGB color space.
#[derive(Debug, Copy, Clone, Default)]
pub struct DeviceRgb;

impl ColorSpace for DeviceRgb {
    fn num_components(&self) -> usize {
        3
    }

    fn to_rgb(&self, c: &[f32]) -> Option<[f32; 3]> {
        let [r, g, b] = *c.first_chunk::<3>()?;
        Some([r, g, b])
    }
}

/// The device CMYK color space, using a naive conversion formula.
#[derive(Debug, Copy, Clone, Default)]
pub struct DeviceCmyk;

impl ColorSpace for DeviceCmyk {
    fn num_components(&self) -> usize {
        4
    }

    fn to_rgb(&self, c: &[f32]) -> Option<[f32; 3]> {
        let [c, m, y, k] = *c.first_chunk::<4>()?;
        let convert = |v: f32| 1.0 - (v + k).min(1.0);

        Some([convert(c), convert(m), convert(y)])
    }
}

/// Convert floating point RGB channels into 8-bit channels.
///
/// Channels are clamped to the unit range and truncated.
#[inline]
pub fn rgb8(rgb: [f32; 3]) -> [u8; 3] {
    rgb.map(|v| (v.clamp(0.0, 1.0) * 255.0) as u8)
}

/// Maps the colors stored in a shading (possibly a single parametric value if
/// a function is present) to 8-bit RGB.
#[derive(Clone, Copy)]
pub(crate) struct ColorMapper<'a> {
    pub(crate) color_space: &'a dyn ColorSpace,
    pub(crate) function: Option<&'a dyn ShadingFunction>,
    pub(crate) settings: &'a RasterSettings,
}

impl ColorMapper<'_> {
    /// Convert the color, substituting black if evaluation fails.
    pub(crate) fn to_rgb8(&self, components: &[f32]) -> [u8; 3] {
        self.try_to_rgb8(components).unwrap_or_else(|| {
            warn!("failed to convert shading color {components:?}, using black instead");
            self.settings.report(ShadingWarning::ColorConversionFailure);

            [0, 0, 0]
        })
    }

    fn try_to_rgb8(&self, components: &[f32]) -> Option<[u8; 3]> {
        let rgb = match self.function {
            Some(function) => self.color_space.to_rgb(&function.eval(components)?)?,
            None => self.color_space.to_rgb(components)?,
        };

        Some(rgb8(rgb))
    }
}
