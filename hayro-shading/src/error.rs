//! Errors that can occur while validating a shading descriptor.

use core::fmt;

/// A specialized [`Result`] type for shading construction.
pub type Result<T> = core::result::Result<T, DecodeError>;

/// An error that makes a shading descriptor unusable.
///
/// Running out of data while reading a mesh stream is not an error: decoding
/// simply stops and all records read so far are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A bits-per-coordinate, bits-per-component or bits-per-flag value outside
    /// of the supported range.
    InvalidBitSize(u8),
    /// The decode array is too short for the coordinates and color components.
    InvalidDecodeArray,
    /// A lattice-form mesh with fewer than two vertices per row.
    InvalidVerticesPerRow(u32),
    /// The shading requires a function, but none was provided.
    MissingFunction,
    /// The background color does not match the number of color space components.
    ComponentMismatch,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBitSize(bits) => write!(f, "invalid bit size {bits}"),
            Self::InvalidDecodeArray => f.write_str("invalid decode array"),
            Self::InvalidVerticesPerRow(n) => write!(f, "invalid number of vertices per row {n}"),
            Self::MissingFunction => f.write_str("missing shading function"),
            Self::ComponentMismatch => f.write_str("mismatched number of color components"),
        }
    }
}

impl core::error::Error for DecodeError {}
