//! Core types for the record store.

use crate::error::{Result, StoreError};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::fmt;

/// One element of the collection: a JSON object.
pub type Record = Map<String, Value>;

/// Identifies a single record in the collection.
///
/// Resolution always picks the first match in collection order.
pub enum Selector<'a> {
    /// Position in the collection. Negative positions never match.
    Index(i64),

    /// First record whose field `key` is strictly equal to `value`.
    Prop { key: String, value: Value },

    /// First record for which the predicate returns true.
    Predicate(Box<dyn Fn(&Record) -> bool + 'a>),
}

impl<'a> Selector<'a> {
    pub fn index(index: usize) -> Self {
        Selector::Index(i64::try_from(index).unwrap_or(i64::MAX))
    }

    pub fn prop(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Selector::Prop {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Record) -> bool + 'a,
    {
        Selector::Predicate(Box::new(f))
    }

    /// Parse the options-object form: `{"index": n}` or `{"prop": [key, value]}`.
    ///
    /// `index` wins when both are present. Any number is accepted as an
    /// index; whole floats such as `2.0` address position 2, and a number
    /// that can never address a position reports not-found straight away.
    pub fn from_options(options: &Value) -> Result<Selector<'static>> {
        let obj = options.as_object().ok_or(StoreError::MissingSelector)?;

        if let Some(index) = obj.get("index") {
            return parse_index(index).map(Selector::Index);
        }

        if let Some(prop) = obj.get("prop") {
            return match prop.as_array().map(Vec::as_slice) {
                Some([key, value]) => Ok(Selector::Prop {
                    key: display_value(key),
                    value: value.clone(),
                }),
                _ => Err(StoreError::InvalidProp),
            };
        }

        Err(StoreError::MissingSelector)
    }

    /// Position of the first matching record in `records`.
    pub(crate) fn resolve(&self, records: &[Record]) -> Result<usize> {
        let found = match self {
            Selector::Index(index) => usize::try_from(*index).ok().filter(|i| *i < records.len()),
            Selector::Prop { key, value } => {
                records.iter().position(|r| r.get(key).is_some_and(|v| strict_eq(v, value)))
            }
            Selector::Predicate(f) => records.iter().position(|r| f(r)),
        };
        found.ok_or_else(|| self.not_found())
    }

    /// The error reported when nothing matches.
    pub(crate) fn not_found(&self) -> StoreError {
        match self {
            Selector::Index(index) => StoreError::IndexNotFound(*index),
            Selector::Prop { key, value } => StoreError::PropNotFound {
                key: key.clone(),
                value: display_value(value),
            },
            Selector::Predicate(_) => StoreError::PredicateNotFound,
        }
    }
}

impl fmt::Debug for Selector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Index(index) => write!(f, "Index({})", index),
            Selector::Prop { key, value } => write!(f, "Prop({} = {})", key, value),
            Selector::Predicate(_) => write!(f, "Predicate(..)"),
        }
    }
}

fn parse_index(index: &Value) -> Result<i64> {
    if let Some(i) = index.as_i64() {
        return Ok(i);
    }
    let f = index.as_f64().ok_or(StoreError::InvalidIndex)?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Ok(f as i64)
    } else {
        Err(StoreError::FractionalIndex(f))
    }
}

/// Equality on JSON values where `1` and `1.0` are the same number.
fn strict_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) if x.is_f64() || y.is_f64() => {
            x.as_f64() == y.as_f64()
        }
        _ => a == b,
    }
}

/// Strings print bare, everything else as JSON text.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Pagination for `get`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GetOptions {
    /// Number of leading matches to skip.
    pub offset: usize,

    /// Maximum number of records to return. Must be at least 1 when set.
    #[serde(deserialize_with = "limit_from_number")]
    pub limit: Option<i64>,
}

/// Any JSON number is a limit; fractions round down, so `0.5` is below 1.
fn limit_from_number<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.map(|f| f.floor() as i64))
}

impl GetOptions {
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Parse an options object such as `{"offset": 3, "limit": 1}`.
    pub fn from_value(value: &Value) -> Result<Self> {
        GetOptions::deserialize(value).map_err(|e| StoreError::InvalidOptions(e.to_string()))
    }

    /// Apply to an already filtered sequence.
    pub(crate) fn paginate<T>(&self, items: Vec<T>) -> Result<Vec<T>> {
        let take = match self.limit {
            Some(limit) if limit < 1 => return Err(StoreError::LimitBelowOne),
            Some(limit) => usize::try_from(limit).unwrap_or(usize::MAX),
            None => usize::MAX,
        };
        Ok(items.into_iter().skip(self.offset).take(take).collect())
    }
}

/// Input to and result of `create`: one record or a sequence of them.
#[derive(Clone, Debug, PartialEq)]
pub enum Batch {
    One(Record),
    Many(Vec<Record>),
}

impl Batch {
    pub fn len(&self) -> usize {
        match self {
            Batch::One(_) => 1,
            Batch::Many(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The single record, if this batch was created from one.
    pub fn into_one(self) -> Option<Record> {
        match self {
            Batch::One(record) => Some(record),
            Batch::Many(_) => None,
        }
    }

    pub fn into_vec(self) -> Vec<Record> {
        match self {
            Batch::One(record) => vec![record],
            Batch::Many(records) => records,
        }
    }
}

impl From<Record> for Batch {
    fn from(record: Record) -> Self {
        Batch::One(record)
    }
}

impl From<Vec<Record>> for Batch {
    fn from(records: Vec<Record>) -> Self {
        Batch::Many(records)
    }
}
