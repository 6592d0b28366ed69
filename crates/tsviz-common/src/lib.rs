//! # tsviz Common
//!
//! Shared types, errors and utilities for the tsviz workspace.
//!
//! This crate provides the foundational record types, the workspace-wide
//! error type and the calendar helpers used by every other crate.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::*;
pub use types::*;
pub use utils::*;
