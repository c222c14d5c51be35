//! Functions mapping parametric shading values to color components.

use crate::color::ColorComponents;

/// A function that maps the input values of a shading to color components.
pub trait ShadingFunction: Send + Sync {
    /// Evaluate the function with the given input.
    ///
    /// Returns `None` if the function could not be evaluated.
    fn eval(&self, input: &[f32]) -> Option<ColorComponents>;
}

/// An exponential interpolation function (PDF function type 2).
#[derive(Debug, Clone)]
pub struct ExponentialFunction {
    domain: [f32; 2],
    c0: ColorComponents,
    c1: ColorComponents,
    n: f32,
}

impl ExponentialFunction {
    /// Create a new exponential function.
    ///
    /// The function evaluates to `c0 + x^n * (c1 - c0)`, where `x` is the input
    /// clamped to `domain`.
    pub fn new(domain: [f32; 2], c0: ColorComponents, c1: ColorComponents, n: f32) -> Self {
        Self { domain, c0, c1, n }
    }
}

impl ShadingFunction for ExponentialFunction {
    fn eval(&self, input: &[f32]) -> Option<ColorComponents> {
        let [min, max] = self.domain;
        let x = input.first()?.clamp(min.min(max), max.max(min));

        let out = self
            .c0
            .iter()
            .zip(self.c1.iter())
            .map(|(c0, c1)| *c0 + x.powf(self.n) * (*c1 - *c0))
            .collect();

        Some(out)
    }
}
