//! Core utilities and common types for the editorial engine.

pub mod error;
pub mod types;

pub use error::{Error, ErrorKind, Result};
pub use types::*;
