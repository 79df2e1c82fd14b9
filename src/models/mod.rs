//! Core data models for the betting tracker.

mod bet;
mod fixture;
pub mod format;
mod ids;
mod league;
mod stats;

pub use bet::*;
pub use fixture::*;
pub use ids::*;
pub use league::*;
pub use stats::*;
