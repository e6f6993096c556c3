mod parser;
mod properties;
mod writer;

pub use parser::*;
pub use properties::*;
pub use writer::*;

/// Error types for the PLY module.
#[derive(Debug, thiserror::Error)]
pub enum PlyError {
    /// Failed to read or write the PLY file
    #[error("Failed to read or write PLY file")]
    Io(#[from] std::io::Error),

    /// The header describes a layout this module does not handle
    #[error("Unsupported PLY format: {0}")]
    UnsupportedFormat(String),

    /// The body does not match the header
    #[error("Failed to parse PLY file: {0}")]
    Parse(String),
}
