//! # tsviz Graphs
//!
//! Page view loading, outlier filtering, aggregation and chart rendering.
//!
//! This crate reads the daily page view CSV, drops the extreme tails once,
//! derives the monthly and calendar groupings, and renders the line, bar and
//! box plot charts natively with plotters.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregator;
pub mod calendar;
pub mod dataset;
pub mod filter;
pub mod statistics;

// Chart model and rendering
pub mod figure;
pub mod renderer;
pub mod visualizer;

pub use aggregator::*;
pub use calendar::*;
pub use dataset::*;
pub use figure::*;
pub use filter::*;
pub use renderer::*;
pub use statistics::*;
pub use visualizer::*;
