//! JSONL (JSON Lines) files.
//!
//! Each line is a complete JSON document. Readers tolerate blank lines and
//! skip lines that fail to parse.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use super::StorageError;

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

    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    fn open_append(&self) -> Result<BufWriter<File>, StorageError> {
        self.ensure_dir()?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        Ok(BufWriter::new(file))
    }

    /// Append a single item to the file.
    pub fn append(&self, item: &T) -> Result<(), StorageError> {
        let mut writer = self.open_append()?;
        writeln!(writer, "{}", serde_json::to_string(item)?)?;
        writer.flush()?;

        debug!("Appended line to {:?}", self.path);
        Ok(())
    }

    /// Append multiple items in one write.
    pub fn append_batch(&self, items: &[T]) -> Result<usize, StorageError> {
        if items.is_empty() {
            return Ok(0);
        }

        let mut writer = self.open_append()?;
        for item in items {
            writeln!(writer, "{}", serde_json::to_string(item)?)?;
        }
        writer.flush()?;

        info!("Appended {} lines to {:?}", items.len(), self.path);
        Ok(items.len())
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

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read every parseable line. A missing file reads as empty.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let mut items = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(item) => items.push(item),
                Err(e) => {
                    warn!(
                        "Failed to parse line {} in {:?}: {}",
                        index + 1,
                        self.path,
                        e
                    );
                }
            }
        }

        debug!("Read {} lines from {:?}", items.len(), self.path);
        Ok(items)
    }

    /// Count non-blank lines without parsing them.
    pub fn count(&self) -> Result<usize, StorageError> {
        if !self.path.exists() {
            return Ok(0);
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let mut count = 0;
        for line in reader.lines() {
            if !line?.trim().is_empty() {
                count += 1;
            }
        }
        Ok(count)
    }
}
