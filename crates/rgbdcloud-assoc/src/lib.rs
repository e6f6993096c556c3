#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Greedy nearest-neighbour association of two timestamp sets.
pub mod associate;

/// Three-way depth/color/pose correlation.
pub mod correlate;

/// Reading and writing the correlated frame file.
pub mod correlated;

/// Error types for the association module.
pub mod error;

/// Stamped text records.
pub mod record;

pub use crate::associate::{associate, AssociationConfig, Match};
pub use crate::correlate::{correlate, correlate_streams, CorrelationPolicy, Triple};
pub use crate::correlated::{
    read_correlated_file, write_correlated_file, CorrelatedFrame, CORRELATED_LINE_TOKENS,
};
pub use crate::error::AssocError;
pub use crate::record::{read_stamped_file, RecordSet, StampedRecord};
