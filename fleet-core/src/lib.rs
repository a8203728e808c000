//! Fleet Core Library
//!
//! Shared wire types, versioned spec documents and errors for the Fleet CLI.

pub mod api;
pub mod error;
pub mod spec;
pub mod types;

// Re-export commonly used types
pub use error::*;
pub use spec::{Spec, SpecDocument, SpecKind, API_VERSION};
pub use types::*;
