//! Core data models for the score ledger.

mod game;
mod ids;
mod stats;

#[cfg(test)]
pub(crate) mod fixtures;

pub use game::*;
pub use ids::*;
pub use stats::*;
