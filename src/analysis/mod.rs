//! Analysis modules.
//!
//! The aggregator turns a loaded dataset into the demographic statistics.

pub mod aggregator;

pub use aggregator::calculate_demographic_data;
