//! Resolving a single record by selector.

mod common;

use common::fixture;
use jsonrecords::{Selector, Store, StoreError};
use serde_json::json;

fn store() -> Store {
    Store::open(fixture("00-valid.json")).unwrap()
}

#[test]
fn test_find_requires_selector() {
    for options in [json!({}), json!(10), json!(null)] {
        let err = Selector::from_options(&options).unwrap_err();
        assert!(err.is_usage());
        assert_eq!(
            err.to_string(),
            "options object or a callback function is required"
        );
    }
}

#[test]
fn test_find_by_index() {
    let store = store();
    let found = store.find(&Selector::from_options(&json!({"index": 2})).unwrap()).unwrap();
    assert_eq!(found["id"], store.records()[2]["id"]);
    assert_eq!(store.position(&Selector::index(2)).unwrap(), 2);
}

#[test]
fn test_find_index_out_of_bounds() {
    let store = store();
    let err = store.find(&Selector::index(99)).unwrap_err();
    assert!(matches!(err, StoreError::IndexNotFound(99)));
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "did not find element at index 99");
}

#[test]
fn test_find_negative_index() {
    let store = store();
    let err = store
        .find(&Selector::from_options(&json!({"index": -1})).unwrap())
        .unwrap_err();
    assert!(matches!(err, StoreError::IndexNotFound(-1)));
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "did not find element at index -1");
}

#[test]
fn test_find_whole_float_index() {
    let store = store();
    let found = store
        .find(&Selector::from_options(&json!({"index": 2.0})).unwrap())
        .unwrap();
    assert_eq!(found, &store.records()[2]);
}

#[test]
fn test_find_index_must_be_a_number() {
    let err = Selector::from_options(&json!({"index": "2"})).unwrap_err();
    assert!(matches!(err, StoreError::InvalidIndex));
    assert!(err.is_usage());
}

#[test]
fn test_find_by_prop() {
    let store = store();
    let id = store.records()[1]["id"].clone();
    let found = store
        .find(&Selector::from_options(&json!({"prop": ["id", id]})).unwrap())
        .unwrap();
    assert_eq!(found, &store.records()[1]);
}

#[test]
fn test_find_prop_must_be_pair() {
    for options in [json!({"prop": {"id": 1}}), json!({"prop": [1]})] {
        let err = Selector::from_options(&options).unwrap_err();
        assert!(matches!(err, StoreError::InvalidProp));
        assert_eq!(err.to_string(), "prop must be an array with exactly 2 items");
    }
}

#[test]
fn test_find_prop_key_without_match() {
    let store = store();
    let id = store.records()[1]["id"].as_str().unwrap().to_string();
    let err = store.find(&Selector::prop("uuid", id.as_str())).unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("did not find element with key uuid and value {}", id)
    );
}

#[test]
fn test_find_prop_value_without_match() {
    let store = store();
    let err = store.find(&Selector::prop("id", 0)).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "did not find element with key id and value 0");
}

#[test]
fn test_find_prop_is_strict() {
    let store = store();
    let age = store.records()[0]["age"].as_i64().unwrap();
    assert!(store.find(&Selector::prop("age", age)).is_ok());
    assert!(store.find(&Selector::prop("age", age.to_string())).is_err());
}

// --- With a predicate ---

#[test]
fn test_find_by_predicate() {
    let store = store();
    let name = store.records()[1]["name"].clone();
    let found = store.find(&Selector::predicate(|r| r["name"] == name)).unwrap();
    assert_eq!(found["id"], store.records()[1]["id"]);
}

#[test]
fn test_find_predicate_without_match() {
    let store = store();
    let err = store
        .find(&Selector::predicate(|r| r["name"] == "XXXXXXXX"))
        .unwrap_err();
    assert!(matches!(err, StoreError::PredicateNotFound));
    assert_eq!(err.to_string(), "did not find element with callback function");
}

#[test]
fn test_find_returns_first_match() {
    let store = store();
    let found = store.find(&Selector::predicate(|r| r["age"].as_i64() > Some(35))).unwrap();
    assert_eq!(found, &store.records()[0]);
}

#[test]
fn test_find_is_idempotent() {
    let store = store();
    let selector = Selector::prop("name", "Tania Brewer");
    let first = store.find(&selector).unwrap().clone();
    let second = store.find(&selector).unwrap();
    assert_eq!(&first, second);
    assert_eq!(store.len(), 8);
}
