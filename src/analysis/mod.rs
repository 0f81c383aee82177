//! Analysis history metrics.
//!
//! Aggregates the filtered record set into the counts and distributions
//! shown next to the history table.

pub mod aggregator;

pub use aggregator::*;
