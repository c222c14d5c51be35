//! An internal crate with the bit-level utilities shared by the hayro crates.
//!
//! Mesh-based shadings pack coordinates, color components and flags with arbitrary bit
//! widths. The [`bit`] module reads such streams and writes them back.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod bit;
