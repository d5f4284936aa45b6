//! # Crowns Ledger
//!
//! Score tracking statistics for Five Crowns game nights.
//!
//! ## Architecture
//!
//! - **models**: Game records and the derived statistics types
//! - **calculate**: The statistics engine (leaderboards, facts, charts, history)
//! - **validate**: Checking shared game records before they join the log
//! - **storage**: The append-only JSONL game log
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod models;
pub mod storage;
pub mod validate;

pub use models::*;
