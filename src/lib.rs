//! # Matchbook
//!
//! A local football betting tracker: imports fixtures, compares the recent
//! form of two sides, and keeps a ledger of wagers with profit and ROI.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (leagues, matches, bets, stats)
//! - **calculate**: Head-to-head aggregation and bet ledger math
//! - **storage**: JSONL data store
//! - **fetch**: Fixture API client
//! - **ingest**: Fixture import pipeline
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod fetch;
pub mod ingest;
pub mod models;
pub mod storage;

pub use models::*;

use chrono::NaiveDate;

/// Parse a `YYYY-MM-DD` date, also accepting "today".
pub fn parse_date(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("today") {
        return Some(today);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
