//! JSONL (JSON Lines) storage.
//!
//! Each line is one JSON object. Files are rewritten whole on update; the
//! data set is a single user's leagues, fixtures and bets.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::{StorageConfig, StorageError};

/// Entity types stored as JSONL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    League,
    Match,
    Bet,
}

impl EntityType {
    /// Get the filename for this entity type.
    pub fn filename(&self) -> &'static str {
        match self {
            EntityType::League => "leagues.jsonl",
            EntityType::Match => "matches.jsonl",
            EntityType::Bet => "bets.jsonl",
        }
    }
}

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    pub fn for_entity(config: &StorageConfig, entity: EntityType) -> Self {
        Self::new(config.entity_path(entity))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write entities, replacing the entire file.
    ///
    /// Written to a sibling `.tmp` file first, then renamed over the target.
    pub fn write_all(&self, entities: &[T]) -> Result<usize, StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = self.path.with_extension("jsonl.tmp");
        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        for entity in entities {
            serde_json::to_writer(&mut writer, entity)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        drop(writer);

        fs::rename(&tmp_path, &self.path)?;
        debug!("Wrote {} entities to {:?}", entities.len(), self.path);

        Ok(entities.len())
    }
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    pub fn for_entity(config: &StorageConfig, entity: EntityType) -> Self {
        Self::new(config.entity_path(entity))
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read all entities. A missing file reads as empty; malformed lines
    /// are logged and skipped.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let mut entities = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(entity) => entities.push(entity),
                Err(e) => {
                    warn!("Failed to parse line {} in {:?}: {}", idx + 1, self.path, e);
                }
            }
        }

        debug!("Read {} entities from {:?}", entities.len(), self.path);
        Ok(entities)
    }

    /// Read entities matching a predicate.
    pub fn read_where<F>(&self, predicate: F) -> Result<Vec<T>, StorageError>
    where
        F: Fn(&T) -> bool,
    {
        let all = self.read_all()?;
        Ok(all.into_iter().filter(predicate).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::League;
    use tempfile::TempDir;

    fn leagues() -> Vec<League> {
        vec![
            League::new(253, "Major League Soccer", "MLS"),
            League::new(15, "FIFA Club World Cup", "CWC"),
            League::new(39, "Premier League", "EPL"),
        ]
    }

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("leagues.jsonl");

        let writer: JsonlWriter<League> = JsonlWriter::new(path.clone());
        assert_eq!(writer.write_all(&leagues()).unwrap(), 3);

        let reader: JsonlReader<League> = JsonlReader::new(path);
        assert_eq!(reader.read_all().unwrap(), leagues());
    }

    #[test]
    fn test_read_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let reader: JsonlReader<League> = JsonlReader::new(temp_dir.path().join("none.jsonl"));

        assert!(!reader.exists());
        assert!(reader.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_write_all_overwrites_and_creates_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::new(temp_dir.path().join("nested").join("data"));

        let writer: JsonlWriter<League> = JsonlWriter::for_entity(&config, EntityType::League);
        writer.write_all(&leagues()).unwrap();
        writer
            .write_all(&[League::new(1, "World Cup", "WC")])
            .unwrap();

        let reader: JsonlReader<League> = JsonlReader::for_entity(&config, EntityType::League);
        let read = reader.read_all().unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].code, "WC");
        assert!(!writer.path().with_extension("jsonl.tmp").exists());
    }

    #[test]
    fn test_read_all_skips_bad_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad_lines.jsonl");

        std::fs::write(
            &path,
            r#"{"id":253,"name":"Major League Soccer","code":"MLS"}
not-valid-json

{"id":15,"name":"FIFA Club World Cup","code":"CWC"}
"#,
        )
        .unwrap();

        let reader: JsonlReader<League> = JsonlReader::new(path);
        let read = reader.read_all().unwrap();
        assert_eq!(read.len(), 2);
        assert_eq!(read[1].id, 15);
    }

    #[test]
    fn test_read_where() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("leagues.jsonl");
        JsonlWriter::<League>::new(path.clone())
            .write_all(&leagues())
            .unwrap();

        let reader: JsonlReader<League> = JsonlReader::new(path);
        let filtered = reader.read_where(|l| l.id > 20).unwrap();

        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].code, "MLS");
        assert_eq!(filtered[1].code, "EPL");
    }

    #[test]
    fn test_entity_type_filenames() {
        assert_eq!(EntityType::League.filename(), "leagues.jsonl");
        assert_eq!(EntityType::Match.filename(), "matches.jsonl");
        assert_eq!(EntityType::Bet.filename(), "bets.jsonl");
    }
}
