//! Dashboard rendering.
//!
//! Chart specifications for Plotly plus the HTML, Markdown and JSON writers.

pub mod charts;
pub mod generator;

pub use generator::*;
