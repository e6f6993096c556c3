#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use rgbdcloud_image as image;

#[doc(inline)]
pub use rgbdcloud_io as io;

#[doc(inline)]
pub use rgbdcloud_assoc as assoc;

#[doc(inline)]
pub use rgbdcloud_3d as k3d;

/// Configuration shared by the command line tools.
pub mod config;

/// Batch reconstruction of correlated frames into PLY files.
pub mod pipeline;
