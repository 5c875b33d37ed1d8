//! Whole-file access to the backing JSON document.

use crate::error::{Result, StoreError};
use crate::types::Record;
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::trace;

/// A JSON array of records on disk.
///
/// Reads and writes always cover the entire file. Writes truncate and
/// rewrite in place; there is no temp-file rename, so a crash mid-write can
/// leave a partial file.
#[derive(Clone, Debug)]
pub struct JsonFile {
    path: PathBuf,

    /// Indent output instead of writing it on one line.
    pretty: bool,
}

impl JsonFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            pretty: false,
        }
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file as UTF-8 text.
    pub fn read_text(&self) -> Result<String> {
        Ok(fs::read_to_string(&self.path)?)
    }

    /// Read and parse the file. The top level must be an array of objects.
    pub fn read_collection(&self) -> Result<Vec<Record>> {
        let text = self.read_text()?;
        let json: Value =
            serde_json::from_str(&text).map_err(|e| StoreError::Parse(e.to_string()))?;

        let Value::Array(items) = json else {
            return Err(StoreError::NotAnArray);
        };

        let records = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(record) => Ok(record),
                _ => Err(StoreError::NotAnObject(i)),
            })
            .collect::<Result<Vec<_>>>()?;

        trace!(path = %self.path.display(), records = records.len(), "read collection");
        Ok(records)
    }

    /// Overwrite the file with `records`, creating parent directories.
    pub fn write_collection(&self, records: &[Record]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut writer = BufWriter::new(File::create(&self.path)?);
        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, records)?;
        } else {
            serde_json::to_writer(&mut writer, records)?;
        }
        writer.write_all(b"\n")?;
        writer.flush()?;

        trace!(path = %self.path.display(), records = records.len(), "wrote collection");
        Ok(())
    }
}
