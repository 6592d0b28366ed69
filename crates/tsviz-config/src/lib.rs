//! # tsviz Config
//!
//! Type-safe configuration for tsviz charts and data sources.
//!
//! This crate provides the configuration schema, the defaults reproducing
//! the reference charts, file loading in TOML, YAML or JSON, and validation.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validator;

pub use defaults::*;
pub use loader::*;
pub use schema::*;
pub use validator::*;
