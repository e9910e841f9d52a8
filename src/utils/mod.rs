//! Utils Module - Shared Cache & Constants

pub mod cache;
pub mod constants;

pub use cache::*;
pub use constants::*;
