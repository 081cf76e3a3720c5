//! Value trees and the slash-delimited path codec for param-sync
//!
//! Provides the two directions of the transform between nested configuration
//! and a flat parameter namespace:
//!
//! - [`flatten`]: nested tree → `(path, scalar)` entries
//! - [`reconstruct`]: `(path, scalar)` entries below a [`Header`] → nested tree
//!
//! and the file formats those trees are read from and written to.

pub mod error;
pub mod flatten;
pub mod format;
pub mod handlers;
pub mod path;
pub mod reconstruct;
pub mod value;

pub use error::{Error, Result};
pub use flatten::flatten;
pub use format::{FileFormat, FormatHandler};
pub use handlers::{PropertiesHandler, YamlHandler};
pub use reconstruct::{Header, MAX_SEQUENCE_INDEX, reconstruct};
pub use value::{Mapping, Scalar, ValueNode};
