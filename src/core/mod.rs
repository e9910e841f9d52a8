//! Core Module - Parsing, Aggregation & Scoring
//!
//! The estimator drives the other three: parse the input, collect signals,
//! fold rules and signals into a valuation.

pub mod aggregator;
pub mod estimator;
pub mod parser;
pub mod valuation;

pub use aggregator::*;
pub use estimator::*;
pub use parser::*;
pub use valuation::*;
