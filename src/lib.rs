//! # JSON Records
//!
//! A small record store backed by a single JSON file.
//!
//! ## Core Concepts
//!
//! - **Records**: JSON objects, kept in file order
//! - **Selectors**: pick one record by index, by key/value, or by predicate
//! - **Schemas**: optional validation and coercion before anything is stored
//! - **Persistence**: every mutation rewrites the whole file
//!
//! ## Example
//!
//! ```ignore
//! use jsonrecords::{GetOptions, Selector, Store};
//! use serde_json::json;
//!
//! let mut store = Store::open("./people.json")?;
//!
//! // Read the first three records
//! let first = store.get(&GetOptions::default().with_limit(3))?;
//!
//! // Insert one
//! let record = json!({"id": 9, "name": "Ada"}).as_object().cloned().unwrap();
//! store.create(record)?;
//!
//! // Remove it again
//! store.destroy(&Selector::prop("id", 9))?;
//! ```

pub mod error;
pub mod file;
pub mod schema;
pub mod store;
pub mod types;

// Re-exports
pub use error::{Result, StoreError};
pub use file::JsonFile;
pub use schema::{
    ArrayRule, Field, Format, Keys, NumberRule, ObjectRule, Rule, Schema, StringRule, ValidationError,
    Validator,
};
pub use store::{Store, StoreConfig};
pub use types::*;
