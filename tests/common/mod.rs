//! Shared helpers for integration tests.

#![allow(dead_code)]

use jsonrecords::{Record, Schema, Store};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Copy the eight-person fixture into `dir` so tests can mutate it.
pub fn copy_fixture(dir: &TempDir) -> PathBuf {
    let destination = dir.path().join("data").join("00-valid.json");
    fs::create_dir_all(destination.parent().unwrap()).unwrap();
    fs::copy(fixture("00-valid.json"), &destination).unwrap();
    destination
}

pub fn test_store(dir: &TempDir) -> Store {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    Store::open(copy_fixture(dir)).unwrap()
}

pub fn schema_value() -> Value {
    serde_json::from_str(&fs::read_to_string(fixture("person-schema.json")).unwrap()).unwrap()
}

pub fn person_schema() -> Schema {
    Schema::from_value(&schema_value()).unwrap()
}

pub fn record(value: Value) -> Record {
    value.as_object().cloned().expect("record must be an object")
}

pub fn debora() -> Record {
    record(json!({
        "id": "e466a135-496c-4784-8059-d3d3dff93888",
        "age": 25,
        "name": "Debora Whitney",
        "company": "FREAKIN",
        "email": "debora.whitney@freakin.com",
        "address": { "line1": "138 Miller Place", "city": "Russellville", "state": "Connecticut", "zip": 88464 }
    }))
}

pub fn walton() -> Record {
    record(json!({
        "id": "b797765b-3295-4c4e-9825-6437ff3417c7",
        "age": 18,
        "name": "Walton Reynolds",
        "company": "POWERNET",
        "email": "walton.reynolds@powernet.com",
        "address": { "line1": "343 Centre Street", "city": "Islandia", "state": "Vermont", "zip": 65455 }
    }))
}

/// The backing file, re-read from disk.
pub fn read_back(path: &Path) -> Vec<Value> {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}
