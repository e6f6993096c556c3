#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
///
/// Defines [`IoError`] variants for file access, encoding/decoding failures,
/// and format-specific errors.
pub mod error;

/// High-level image reading functions.
///
/// See [`functional::read_image_any`] for automatic format detection.
pub mod functional;

/// PNG image encoding and decoding.
///
/// Read and write PNG images with 8-bit and 16-bit samples.
pub mod png;

/// Internal utility functions for image bit depth conversion.
mod conv_utils;

pub use crate::error::IoError;
pub use crate::functional::{read_image_any, GenericImage};
