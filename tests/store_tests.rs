// Copyright (c) 2026 Fintrack Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs;

use serde::{Deserialize, Serialize};

use fintrack::backend::{Storage, StorageMode};
use fintrack::config::StorageConfig;
use fintrack::json::JsonStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Record {
    #[serde(rename = "_id")]
    id: String,
    value: i64,
}

fn setup() -> (tempfile::TempDir, JsonStore) {
    let dir = tempfile::TempDir::new().unwrap();
    let store = JsonStore::open(Some(dir.path().to_path_buf())).unwrap();
    (dir, store)
}

fn records(n: i64) -> Vec<Record> {
    (0..n)
        .map(|i| Record {
            id: format!("r{}", i),
            value: i,
        })
        .collect()
}

#[test]
fn round_trip_preserves_order() {
    let (_dir, store) = setup();
    let path = store.path("records.json");
    let expected = records(7);
    store.write(&path, &expected).unwrap();
    let got: Vec<Record> = store.read(&path).unwrap();
    assert_eq!(got, expected);
}

#[test]
fn missing_file_reads_empty_and_is_created() {
    let (_dir, store) = setup();
    let path = store.path("records.json");
    let got: Vec<Record> = store.read(&path).unwrap();
    assert!(got.is_empty());
    assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
}

#[test]
fn blank_file_resets_to_empty() {
    let (_dir, store) = setup();
    let path = store.path("records.json");
    fs::write(&path, "   \n").unwrap();
    let got: Vec<Record> = store.read(&path).unwrap();
    assert!(got.is_empty());
    assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
}

#[test]
fn truncated_file_resets_and_writes_succeed() {
    let (_dir, store) = setup();
    let path = store.path("records.json");
    fs::write(&path, "[{\"_id\": \"r0\", \"val").unwrap();
    let got: Vec<Record> = store.read(&path).unwrap();
    assert!(got.is_empty());

    let expected = records(3);
    store.write(&path, &expected).unwrap();
    let got: Vec<Record> = store.read(&path).unwrap();
    assert_eq!(got, expected);
}

#[test]
fn non_array_document_resets_to_empty() {
    let (_dir, store) = setup();
    let path = store.path("records.json");
    fs::write(&path, "{\"not\": \"a list\"}").unwrap();
    let got: Vec<Record> = store.read(&path).unwrap();
    assert!(got.is_empty());
}

#[test]
fn write_replaces_atomically_without_leftover_tmp() {
    let (dir, store) = setup();
    let path = store.path("records.json");
    store.write(&path, &records(4)).unwrap();

    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .filter(|name| name.ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "tmp files left behind: {leftovers:?}");
}

#[test]
fn selector_falls_back_without_uri() {
    let dir = tempfile::TempDir::new().unwrap();
    let cfg = StorageConfig {
        data_dir: Some(dir.path().to_path_buf()),
        ..StorageConfig::default()
    };
    let storage = Storage::connect(&cfg).unwrap();
    assert_eq!(storage.mode(), StorageMode::JsonFiles);
    assert_eq!(storage.fallback_reason(), Some("MONGO_URI not set"));
}
