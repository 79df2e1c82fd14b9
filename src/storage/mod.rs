//! Local data store.
//!
//! Leagues, matches and bets live as JSON Lines files in one data directory:
//! - `leagues.jsonl`: leagues fixtures are imported for
//! - `matches.jsonl`: imported fixtures, replaced by id on re-import
//! - `bets.jsonl`: the user's wagers

mod jsonl;
mod store;

pub use jsonl::*;
pub use store::*;

use std::path::PathBuf;
use thiserror::Error;

use crate::models::{BetError, BetId, MatchId};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Bet not found: {0}")]
    BetNotFound(BetId),

    #[error("Match not found: {0}")]
    MatchNotFound(MatchId),

    #[error(transparent)]
    InvalidBet(#[from] BetError),

    #[error("Store lock poisoned")]
    Poisoned,
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Path of the file holding `entity`.
    pub fn entity_path(&self, entity: EntityType) -> PathBuf {
        self.data_dir.join(entity.filename())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
