//! JSONL (JSON Lines) storage.
//!
//! Each line is a valid JSON object representing one record. The fetcher
//! owns the files; the service only reads them.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{StorageConfig, StorageError};

/// Record collections in the data lake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    RankingRecord,
    LotteryWinRecord,
}

impl EntityType {
    /// Get the filename for this entity type.
    pub fn filename(&self) -> &'static str {
        match self {
            EntityType::RankingRecord => "article_earning_ranking_records.jsonl",
            EntityType::LotteryWinRecord => "lottery_win_records.jsonl",
        }
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

    /// Read all records in file order.
    ///
    /// A missing file is an empty collection: the fetcher has not run yet.
    /// Lines that fail to parse are logged and skipped.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
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

        debug!("Read {} records from {:?}", entities.len(), self.path);
        Ok(entities)
    }
}


#[cfg(test)]
pub use writer::JsonlWriter;

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Row {
        slug: String,
        ranking: u32,
    }

    fn row(slug: &str, ranking: u32) -> Row {
        Row {
            slug: slug.to_string(),
            ranking,
        }
    }

    #[test]
    fn test_write_then_read_preserves_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rows.jsonl");

        let writer: JsonlWriter<Row> = JsonlWriter::new(path.clone());
        assert_eq!(writer.write_all(&[row("b", 2), row("a", 1)]).unwrap(), 2);

        let rows = JsonlReader::<Row>::new(path).read_all().unwrap();
        assert_eq!(rows, vec![row("b", 2), row("a", 1)]);
    }

    #[test]
    fn test_reader_for_entity_uses_normalized_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::new(temp_dir.path().to_path_buf());

        let writer: JsonlWriter<Row> = JsonlWriter::for_entity(&config, EntityType::RankingRecord);
        writer.write_all(&[row("a", 1), row("b", 2)]).unwrap();
        assert!(config.entity_path(EntityType::RankingRecord).exists());

        let rows = JsonlReader::<Row>::for_entity(&config, EntityType::RankingRecord)
            .read_all()
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert!(JsonlReader::<Row>::for_entity(&config, EntityType::LotteryWinRecord)
            .read_all()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_read_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let reader: JsonlReader<Row> = JsonlReader::new(temp_dir.path().join("nope.jsonl"));
        assert!(reader.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_read_skips_malformed_and_blank_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mixed.jsonl");
        std::fs::write(
            &path,
            "{\"slug\":\"a\",\"ranking\":1}\n\nnot json\n{\"slug\":\"b\",\"ranking\":2}\n",
        )
        .unwrap();

        let rows = JsonlReader::<Row>::new(path).read_all().unwrap();
        assert_eq!(rows, vec![row("a", 1), row("b", 2)]);
    }
}
