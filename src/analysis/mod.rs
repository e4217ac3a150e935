//! Demographic analysis.
//!
//! Pure aggregation of loaded records into the counts behind each chart.

pub mod aggregator;

pub use aggregator::*;
