//! Coercing validation of JSON values against rules.
//!
//! Every function takes the value by ownership and returns what should be
//! stored, or the first error found.

use super::{ArrayRule, Field, NumberRule, ObjectRule, Rule, StringRule, ValidationError};
use crate::types::Record;
use serde_json::{Number, Value};

type Result<T> = std::result::Result<T, ValidationError>;

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

/// Validate an object's keys in declared order, coercing values in place.
/// Undeclared keys are rejected unless allowed.
pub(super) fn object(rule: &ObjectRule, path: &str, mut record: Record) -> Result<Record> {
    let Some(keys) = &rule.keys else {
        return Ok(record);
    };

    for (name, field) in keys.iter() {
        let child = join(path, name);
        match record.get_mut(name.as_str()) {
            Some(slot) => *slot = checked(field, &child, slot.take())?,
            None if field.required => {
                return Err(ValidationError::new(&child, "is required"));
            }
            None => {}
        }
    }

    if !rule.allow_unknown {
        if let Some(unknown) = record.keys().find(|k| !keys.contains(k)) {
            return Err(ValidationError::new(&join(path, unknown), "is not allowed"));
        }
    }

    Ok(record)
}

/// Null handling, then the field's rule.
fn checked(field: &Field, path: &str, value: Value) -> Result<Value> {
    match value {
        Value::Null if field.allow_null => Ok(Value::Null),
        value => apply(&field.rule, path, value),
    }
}

fn apply(rule: &Rule, path: &str, value: Value) -> Result<Value> {
    match rule {
        Rule::String(rule) => string(rule, path, value),
        Rule::Number(rule) => number(rule, path, value),
        Rule::Boolean => boolean(path, value),
        Rule::Object(rule) => match value {
            Value::Object(map) => object(rule, path, map).map(Value::Object),
            _ => Err(ValidationError::new(path, "must be an object")),
        },
        Rule::Array(rule) => array(rule, path, value),
        Rule::Any => Ok(value),
    }
}

fn string(rule: &StringRule, path: &str, value: Value) -> Result<Value> {
    let Value::String(mut s) = value else {
        return Err(ValidationError::new(path, "must be a string"));
    };

    if rule.trim {
        s = s.trim().to_string();
    }
    if rule.uppercase {
        s = s.to_uppercase();
    } else if rule.lowercase {
        s = s.to_lowercase();
    }

    if s.is_empty() && !rule.allow_empty {
        return Err(ValidationError::new(path, "is not allowed to be empty"));
    }

    let len = s.chars().count();
    if let Some(min) = rule.min_length {
        if len < min {
            return Err(ValidationError::new(
                path,
                format!("length must be at least {} characters long", min),
            ));
        }
    }
    if let Some(max) = rule.max_length {
        if len > max {
            return Err(ValidationError::new(
                path,
                format!("length must be less than or equal to {} characters long", max),
            ));
        }
    }

    if let Some(valid) = &rule.valid {
        if !valid.contains(&s) {
            return Err(ValidationError::new(
                path,
                format!("must be one of [{}]", valid.join(", ")),
            ));
        }
    }

    if let Some(format) = rule.format {
        if !format.check(&s) {
            return Err(ValidationError::new(
                path,
                format!("must be {}", format.describe()),
            ));
        }
    }

    Ok(Value::String(s))
}

fn number(rule: &NumberRule, path: &str, value: Value) -> Result<Value> {
    let n = match value {
        Value::Number(n) => n,
        Value::String(s) => parse_number(s.trim())
            .ok_or_else(|| ValidationError::new(path, "must be a number"))?,
        _ => return Err(ValidationError::new(path, "must be a number")),
    };
    let f = n.as_f64().unwrap_or(f64::NAN);

    if rule.integer && f.fract() != 0.0 {
        return Err(ValidationError::new(path, "must be an integer"));
    }
    if let Some(min) = rule.min {
        if f < min {
            return Err(ValidationError::new(
                path,
                format!("must be larger than or equal to {}", min),
            ));
        }
    }
    if let Some(max) = rule.max {
        if f > max {
            return Err(ValidationError::new(
                path,
                format!("must be less than or equal to {}", max),
            ));
        }
    }
    if let Some(valid) = &rule.valid {
        if !valid.contains(&f) {
            let listed: Vec<String> = valid.iter().map(|v| v.to_string()).collect();
            return Err(ValidationError::new(
                path,
                format!("must be one of [{}]", listed.join(", ")),
            ));
        }
    }

    Ok(Value::Number(n))
}

/// Integers stay integers; anything else must be a finite float.
fn parse_number(s: &str) -> Option<Number> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(i.into());
    }
    if let Ok(u) = s.parse::<u64>() {
        return Some(u.into());
    }
    let f = s.parse::<f64>().ok().filter(|f| f.is_finite())?;
    if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        return Some((f as i64).into());
    }
    Number::from_f64(f)
}

fn boolean(path: &str, value: Value) -> Result<Value> {
    match value {
        Value::Bool(b) => Ok(Value::Bool(b)),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(Value::Bool(true)),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(Value::Bool(false)),
        _ => Err(ValidationError::new(path, "must be a boolean")),
    }
}

fn array(rule: &ArrayRule, path: &str, value: Value) -> Result<Value> {
    let Value::Array(items) = value else {
        return Err(ValidationError::new(path, "must be an array"));
    };

    if let Some(min) = rule.min_items {
        if items.len() < min {
            return Err(ValidationError::new(
                path,
                format!("must contain at least {} items", min),
            ));
        }
    }
    if let Some(max) = rule.max_items {
        if items.len() > max {
            return Err(ValidationError::new(
                path,
                format!("must contain less than or equal to {} items", max),
            ));
        }
    }

    let Some(item_field) = &rule.items else {
        return Ok(Value::Array(items));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            checked(item_field, &format!("{}[{}]", path, i), item)
        })
        .collect::<Result<Vec<_>>>()
        .map(Value::Array)
}
