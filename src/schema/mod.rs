//! Declarative record schemas.
//!
//! A [`Schema`] describes the fields a record may carry: which are required,
//! what type each holds, and per-field constraints (format, numeric range,
//! enumerations). Validation is a transform: compatible values are coerced
//! to the declared type (numeric strings become numbers, `"true"` becomes
//! `true`, strings are trimmed or re-cased) and the coerced record is
//! returned for storage.
//!
//! Schemas are usually written as JSON:
//!
//! ```
//! use jsonrecords::Schema;
//! use serde_json::json;
//!
//! let schema = Schema::from_value(&json!({
//!     "type": "object",
//!     "keys": {
//!         "id": { "type": "string", "format": "uuid", "required": true },
//!         "age": { "type": "number", "integer": true, "min": 0, "max": 125 }
//!     }
//! }))
//! .unwrap();
//! assert!(schema.field("id").is_some());
//! ```

mod format;
mod validate;

use crate::error::{Result, StoreError};
use crate::types::Record;
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

pub use format::Format;

/// Anything that can check and coerce a record before it is stored.
pub trait Validator: fmt::Debug + Send + Sync {
    /// Validate `record`, returning the value to store.
    fn validate(&self, record: Record) -> std::result::Result<Record, ValidationError>;
}

/// A failed validation: which field, and what was wrong with it.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("\"{path}\" {reason}")]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `address.zip`.
    pub path: String,
    pub reason: String,
}

impl ValidationError {
    pub(crate) fn new(path: &str, reason: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

/// A field declaration: its rule plus presence constraints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Field {
    #[serde(flatten)]
    pub rule: Rule,

    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub allow_null: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Field {
    pub fn new(rule: Rule) -> Self {
        Self {
            rule,
            required: false,
            allow_null: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn allow_null(mut self) -> Self {
        self.allow_null = true;
        self
    }
}

impl From<Rule> for Field {
    fn from(rule: Rule) -> Self {
        Field::new(rule)
    }
}

/// Type-specific rules, tagged by `"type"` in the JSON form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Rule {
    String(StringRule),
    Number(NumberRule),
    Boolean,
    Object(ObjectRule),
    Array(ArrayRule),
    Any,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StringRule {
    pub format: Option<Format>,
    pub trim: bool,
    pub uppercase: bool,
    pub lowercase: bool,
    /// Accept `""`. Empty strings are rejected otherwise.
    pub allow_empty: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    /// Enumeration of accepted values, checked after conversion.
    pub valid: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberRule {
    pub integer: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub valid: Option<Vec<f64>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectRule {
    /// Declared keys. `None` accepts any keys without checking them.
    pub keys: Option<Keys>,
    /// Keep keys that are not declared instead of rejecting them.
    pub allow_unknown: bool,
}

/// Declared object keys, kept in the order the schema lists them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Keys(Vec<(String, Field)>);

impl Keys {
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.0.iter().find(|(k, _)| k == name).map(|(_, f)| f)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Add or replace a key. Replacing keeps its original position.
    pub fn insert(&mut self, name: String, field: Field) {
        match self.0.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = field,
            None => self.0.push((name, field)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Field)> {
        self.0.iter().map(|(k, f)| (k, f))
    }
}

impl Serialize for Keys {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, field) in &self.0 {
            map.serialize_entry(name, field)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Keys {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        let mut keys = Keys::default();
        for (name, value) in raw {
            let field = Field::deserialize(&value).map_err(D::Error::custom)?;
            keys.insert(name, field);
        }
        Ok(keys)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrayRule {
    pub items: Option<Box<Field>>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
}

/// A schema for whole records: an object rule at the top level.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schema {
    root: ObjectRule,
}

impl Schema {
    /// An empty schema that rejects every key until some are declared.
    pub fn new() -> Self {
        Self {
            root: ObjectRule {
                keys: Some(Keys::default()),
                allow_unknown: false,
            },
        }
    }

    /// Declare a key.
    pub fn key(mut self, name: impl Into<String>, field: impl Into<Field>) -> Self {
        self.root
            .keys
            .get_or_insert_with(Keys::default)
            .insert(name.into(), field.into());
        self
    }

    pub fn allow_unknown(mut self, allow: bool) -> Self {
        self.root.allow_unknown = allow;
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.root.keys.as_ref()?.get(name)
    }

    /// Whether `value` describes a record schema.
    pub fn is_schema(value: &Value) -> bool {
        matches!(Rule::deserialize(value), Ok(Rule::Object(_)))
    }

    /// Build a schema from its JSON form.
    pub fn from_value(value: &Value) -> Result<Self> {
        match Rule::deserialize(value) {
            Ok(Rule::Object(root)) => Ok(Self { root }),
            _ => Err(StoreError::InvalidSchema),
        }
    }

    /// The JSON form of this schema.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(Rule::Object(self.root.clone())).unwrap_or(Value::Null)
    }
}

impl Validator for Schema {
    fn validate(&self, record: Record) -> std::result::Result<Record, ValidationError> {
        validate::object(&self.root, "", record)
    }
}
