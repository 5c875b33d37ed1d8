//! Main Store struct tying the backing file, collection and validator together.

use crate::error::{Result, StoreError};
use crate::file::JsonFile;
use crate::schema::{Schema, Validator};
use crate::types::{Batch, GetOptions, Record, Selector};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Store configuration.
#[derive(Clone, Debug, Default)]
pub struct StoreConfig {
    /// Path of the backing JSON file. Must be set.
    pub path: PathBuf,

    /// Checks and coerces every record before it is stored.
    pub validator: Option<Arc<dyn Validator>>,

    /// Indent the backing file instead of writing it on one line.
    pub pretty: bool,
}

/// A file-backed record store.
///
/// The collection is loaded once when the store is opened and held in
/// memory. Every successful mutation rewrites the whole backing file before
/// returning, so the file and the collection match between calls.
///
/// Two stores opened on the same file do not coordinate; the last write
/// wins.
#[derive(Debug)]
pub struct Store {
    /// Backing file.
    file: JsonFile,

    /// The collection, in file order.
    records: Vec<Record>,

    /// Optional validator applied on create and update.
    validator: Option<Arc<dyn Validator>>,
}

impl Store {
    /// Open the store backed by the JSON array at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_config(StoreConfig {
            path: path.as_ref().to_path_buf(),
            ..Default::default()
        })
    }

    /// Open with records validated against `schema`.
    pub fn open_with_schema(path: impl AsRef<Path>, schema: Schema) -> Result<Self> {
        Self::with_config(StoreConfig {
            path: path.as_ref().to_path_buf(),
            validator: Some(Arc::new(schema)),
            ..Default::default()
        })
    }

    /// Open with a schema given in its JSON form.
    pub fn open_with_schema_value(path: impl AsRef<Path>, schema: &Value) -> Result<Self> {
        if !Schema::is_schema(schema) {
            return Err(StoreError::InvalidSchema);
        }
        Self::open_with_schema(path, Schema::from_value(schema)?)
    }

    pub fn with_config(config: StoreConfig) -> Result<Self> {
        if config.path.as_os_str().is_empty() {
            return Err(StoreError::MissingPath);
        }

        let file = JsonFile::new(&config.path).pretty(config.pretty);
        let records = file.read_collection()?;

        debug!(
            path = %config.path.display(),
            records = records.len(),
            validated = config.validator.is_some(),
            "opened store"
        );

        Ok(Self {
            file,
            records,
            validator: config.validator,
        })
    }

    // --- Queries ---

    /// Records in collection order, paginated by `options`.
    pub fn get(&self, options: &GetOptions) -> Result<Vec<&Record>> {
        options.paginate(self.records.iter().collect())
    }

    /// Records matching `predicate`, paginated by `options`.
    pub fn get_where<F>(&self, predicate: F, options: &GetOptions) -> Result<Vec<&Record>>
    where
        F: Fn(&Record) -> bool,
    {
        options.paginate(self.records.iter().filter(|r| predicate(r)).collect())
    }

    /// The first record matching `selector`.
    pub fn find(&self, selector: &Selector<'_>) -> Result<&Record> {
        let position = self.position(selector)?;
        Ok(&self.records[position])
    }

    /// Position of the first record matching `selector`.
    pub fn position(&self, selector: &Selector<'_>) -> Result<usize> {
        selector.resolve(&self.records)
    }

    // --- Mutations ---

    /// Append one record or a batch of them.
    ///
    /// With a validator, every record is checked before anything is
    /// appended; one failure rejects the whole batch. Returns the stored
    /// records in the same shape as the input.
    pub fn create(&mut self, input: impl Into<Batch>) -> Result<Batch> {
        let input = input.into();
        if input.is_empty() {
            return Err(StoreError::NoArguments);
        }

        let single = matches!(input, Batch::One(_));
        let records = input
            .into_vec()
            .into_iter()
            .map(|record| self.validate(record))
            .collect::<Result<Vec<_>>>()?;

        let previous_len = self.records.len();
        self.records.extend(records.iter().cloned());
        if let Err(e) = self.persist() {
            self.records.truncate(previous_len);
            return Err(e);
        }

        debug!(created = records.len(), total = self.records.len(), "created records");

        Ok(if single {
            Batch::One(records.into_iter().next().ok_or(StoreError::NoArguments)?)
        } else {
            Batch::Many(records)
        })
    }

    /// Replace the record matching `selector` with `record`. No merge.
    pub fn update(&mut self, selector: &Selector<'_>, record: Record) -> Result<Record> {
        let position = self.position(selector)?;
        let record = self.validate(record)?;

        let previous = std::mem::replace(&mut self.records[position], record.clone());
        if let Err(e) = self.persist() {
            self.records[position] = previous;
            return Err(e);
        }

        debug!(position, "updated record");
        Ok(record)
    }

    /// Remove and return the record matching `selector`.
    pub fn destroy(&mut self, selector: &Selector<'_>) -> Result<Record> {
        let position = self.position(selector)?;

        let removed = self.records.remove(position);
        if let Err(e) = self.persist() {
            self.records.insert(position, removed);
            return Err(e);
        }

        debug!(position, total = self.records.len(), "destroyed record");
        Ok(removed)
    }

    // --- Accessors ---

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn has_validator(&self) -> bool {
        self.validator.is_some()
    }

    /// Replace or remove the validator. Existing records are not rechecked.
    pub fn set_validator(&mut self, validator: Option<Arc<dyn Validator>>) {
        self.validator = validator;
    }

    pub fn set_schema(&mut self, schema: Option<Schema>) {
        self.validator = schema.map(|s| Arc::new(s) as Arc<dyn Validator>);
    }

    fn validate(&self, record: Record) -> Result<Record> {
        match &self.validator {
            Some(validator) => validator.validate(record).map_err(|e| {
                debug!(error = %e, "record rejected by validator");
                StoreError::from(e)
            }),
            None => Ok(record),
        }
    }

    fn persist(&self) -> Result<()> {
        self.file.write_collection(&self.records)
    }
}
