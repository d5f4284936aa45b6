//! The append-only game log.

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::models::{GameId, GameRecord};

use super::jsonl::{JsonlReader, JsonlWriter};
use super::{StorageConfig, StorageError};

/// Finished games in recording order, stored as `games.jsonl`.
pub struct GameLog {
    path: PathBuf,
}

impl GameLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn open(config: &StorageConfig) -> Self {
        Self::new(config.games_path())
    }

    fn reader(&self) -> JsonlReader<GameRecord> {
        JsonlReader::new(self.path.clone())
    }

    fn writer(&self) -> JsonlWriter<GameRecord> {
        JsonlWriter::new(self.path.clone())
    }

    /// Every readable record. A missing log is empty.
    pub fn load(&self) -> Result<Vec<GameRecord>, StorageError> {
        if !self.reader().exists() {
            debug!("No game log at {:?} yet", self.path);
        }
        let games = self.reader().read_all()?;
        info!("Loaded {} games from {:?}", games.len(), self.path);
        Ok(games)
    }

    /// Number of non-blank lines, without parsing them.
    pub fn count(&self) -> Result<usize, StorageError> {
        self.reader().count()
    }

    pub fn ids(&self) -> Result<HashSet<GameId>, StorageError> {
        Ok(self.load()?.iter().map(GameRecord::id).collect())
    }

    /// Append one record unless the same game is already logged.
    ///
    /// Returns `false` for a duplicate.
    pub fn append(&self, record: &GameRecord) -> Result<bool, StorageError> {
        let id = record.id();
        if self.ids()?.contains(&id) {
            info!("Game {} is already in the log, skipping", id);
            return Ok(false);
        }

        self.writer().append(record)?;
        info!("Recorded game {} won by {}", id, record.winner);
        Ok(true)
    }

    /// Append every record not already logged, including repeats within
    /// `records` itself. Returns how many were written.
    pub fn append_new(&self, records: &[GameRecord]) -> Result<usize, StorageError> {
        let mut seen = self.ids()?;
        let fresh: Vec<GameRecord> = records
            .iter()
            .filter(|record| seen.insert(record.id()))
            .cloned()
            .collect();

        let skipped = records.len() - fresh.len();
        if skipped > 0 {
            info!("Skipping {} games already in the log", skipped);
        }

        self.writer().append_batch(&fresh)
    }
}
