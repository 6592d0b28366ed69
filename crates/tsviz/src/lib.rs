//! # tsviz
//!
//! Command line charting of daily page views.
//!
//! This is the main binary crate that loads the configuration, runs the
//! page view pipeline and writes the line, bar and box plot images.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod app;

pub use app::*;
