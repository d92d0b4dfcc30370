//! Project recommendation and analysis.

pub mod aggregator;

pub use aggregator::*;
