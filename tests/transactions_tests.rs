// Copyright (c) 2026 Fintrack Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{TimeZone, Utc};

use fintrack::backend::{Storage, TxFilter};
use fintrack::config::StorageConfig;
use fintrack::error::ServiceError;
use fintrack::models::{NewTransaction, NewUser, TxKind, TxPatch, User};

fn setup() -> (tempfile::TempDir, Storage) {
    let dir = tempfile::TempDir::new().unwrap();
    let cfg = StorageConfig {
        data_dir: Some(dir.path().to_path_buf()),
        ..StorageConfig::default()
    };
    let storage = Storage::connect(&cfg).unwrap();
    (dir, storage)
}

fn register(storage: &Storage, name: &str) -> User {
    storage
        .users()
        .create(NewUser {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password: "secret1".to_string(),
        })
        .unwrap()
}

fn spend(title: &str, amount: f64, category: &str, date: &str) -> NewTransaction {
    NewTransaction {
        title: title.to_string(),
        amount,
        category: category.to_string(),
        kind: TxKind::Expense,
        date: Some(date.to_string()),
        description: None,
        payment_method: None,
    }
}

#[test]
fn create_applies_defaults() {
    let (_dir, storage) = setup();
    let alice = register(&storage, "alice");
    let tx = storage
        .transactions()
        .create(&alice.id, spend("Coffee", 4.5, "Food", "2026-08-10"))
        .unwrap();
    assert_eq!(tx.payment_method, "Cash");
    assert_eq!(tx.date, Utc.with_ymd_and_hms(2026, 8, 10, 0, 0, 0).unwrap());
    assert!(tx.updated_at.is_none());
}

#[test]
fn unparseable_date_falls_back_to_now() {
    let (_dir, storage) = setup();
    let alice = register(&storage, "alice");
    let before = Utc::now();
    let tx = storage
        .transactions()
        .create(&alice.id, spend("Coffee", 4.5, "Food", "not-a-date"))
        .unwrap();
    assert!(tx.date >= before && tx.date <= Utc::now());
}

#[test]
fn returned_timestamps_match_a_subsequent_read() {
    let (_dir, storage) = setup();
    let alice = register(&storage, "alice");
    let tx = storage
        .transactions()
        .create(
            &alice.id,
            NewTransaction {
                title: "Coffee".to_string(),
                amount: 4.5,
                category: "Food".to_string(),
                kind: TxKind::Expense,
                date: None,
                description: None,
                payment_method: None,
            },
        )
        .unwrap();

    let listed = storage
        .transactions()
        .list(&alice.id, &TxFilter::default())
        .unwrap();
    assert_eq!(listed[0].date, tx.date);

    let updated = storage
        .transactions()
        .update(
            &alice.id,
            &tx.id,
            TxPatch {
                amount: Some(5.0),
                ..TxPatch::default()
            },
        )
        .unwrap();
    let reread = storage
        .transactions()
        .list(&alice.id, &TxFilter::default())
        .unwrap();
    assert_eq!(reread[0].updated_at, updated.updated_at);
}

#[test]
fn nonpositive_amount_is_a_validation_error() {
    let (_dir, storage) = setup();
    let alice = register(&storage, "alice");
    let err = storage
        .transactions()
        .create(&alice.id, spend("Coffee", -4.5, "Food", "2026-08-10"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[test]
fn partial_patch_preserves_unspecified_fields() {
    let (_dir, storage) = setup();
    let alice = register(&storage, "alice");
    let tx = storage
        .transactions()
        .create(&alice.id, spend("Coffee", 4.5, "Food", "2026-08-10"))
        .unwrap();

    let updated = storage
        .transactions()
        .update(
            &alice.id,
            &tx.id,
            TxPatch {
                category: Some("Entertainment".to_string()),
                ..TxPatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.title, "Coffee");
    assert_eq!(updated.amount, 4.5);
    assert_eq!(updated.category, "Entertainment");
    assert_eq!(updated.date, tx.date);
    assert!(updated.updated_at.is_some());
}

#[test]
fn list_defaults_to_newest_first() {
    let (_dir, storage) = setup();
    let alice = register(&storage, "alice");
    for (title, date) in [
        ("first", "2026-08-01"),
        ("third", "2026-08-20"),
        ("second", "2026-08-10"),
    ] {
        storage
            .transactions()
            .create(&alice.id, spend(title, 10.0, "Food", date))
            .unwrap();
    }
    let txs = storage
        .transactions()
        .list(&alice.id, &TxFilter::default())
        .unwrap();
    let titles: Vec<&str> = txs.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["third", "second", "first"]);
}

#[test]
fn filters_compose() {
    let (_dir, storage) = setup();
    let alice = register(&storage, "alice");
    storage
        .transactions()
        .create(&alice.id, spend("Morning coffee", 4.5, "Food", "2026-08-05"))
        .unwrap();
    storage
        .transactions()
        .create(&alice.id, spend("Bus pass", 30.0, "Transport", "2026-08-06"))
        .unwrap();
    storage
        .transactions()
        .create(
            &alice.id,
            NewTransaction {
                title: "Paycheck".to_string(),
                amount: 500.0,
                category: "Part-time Job".to_string(),
                kind: TxKind::Income,
                date: Some("2026-08-07".to_string()),
                description: Some("August wages".to_string()),
                payment_method: None,
            },
        )
        .unwrap();

    let expenses = storage
        .transactions()
        .list(
            &alice.id,
            &TxFilter {
                kind: Some(TxKind::Expense),
                ..TxFilter::default()
            },
        )
        .unwrap();
    assert_eq!(expenses.len(), 2);

    // Case-insensitive substring search over title/category/description.
    let hits = storage
        .transactions()
        .list(
            &alice.id,
            &TxFilter {
                query: Some("COFFEE".to_string()),
                ..TxFilter::default()
            },
        )
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Morning coffee");

    let wages = storage
        .transactions()
        .list(
            &alice.id,
            &TxFilter {
                query: Some("wages".to_string()),
                ..TxFilter::default()
            },
        )
        .unwrap();
    assert_eq!(wages.len(), 1);

    let mid_range = storage
        .transactions()
        .list(
            &alice.id,
            &TxFilter {
                min_amount: Some(10.0),
                max_amount: Some(100.0),
                ..TxFilter::default()
            },
        )
        .unwrap();
    assert_eq!(mid_range.len(), 1);
    assert_eq!(mid_range[0].title, "Bus pass");

    let windowed = storage
        .transactions()
        .list(
            &alice.id,
            &TxFilter {
                start: Some(Utc.with_ymd_and_hms(2026, 8, 6, 0, 0, 0).unwrap()),
                end: Some(Utc.with_ymd_and_hms(2026, 8, 6, 23, 59, 59).unwrap()),
                ..TxFilter::default()
            },
        )
        .unwrap();
    assert_eq!(windowed.len(), 1);
    assert_eq!(windowed[0].title, "Bus pass");

    let by_amount = storage
        .transactions()
        .list(
            &alice.id,
            &TxFilter {
                sort: Some("amount".to_string()),
                ..TxFilter::default()
            },
        )
        .unwrap();
    assert_eq!(by_amount[0].amount, 4.5);
    assert_eq!(by_amount[2].amount, 500.0);
}

#[test]
fn listing_is_scoped_to_the_owner() {
    let (_dir, storage) = setup();
    let alice = register(&storage, "alice");
    let bob = register(&storage, "bob");
    storage
        .transactions()
        .create(&alice.id, spend("Coffee", 4.5, "Food", "2026-08-10"))
        .unwrap();
    let bobs = storage
        .transactions()
        .list(&bob.id, &TxFilter::default())
        .unwrap();
    assert!(bobs.is_empty());
}

#[test]
fn cross_user_delete_is_not_authorized_and_leaves_record() {
    let (_dir, storage) = setup();
    let alice = register(&storage, "alice");
    let bob = register(&storage, "bob");
    let tx = storage
        .transactions()
        .create(&alice.id, spend("Coffee", 4.5, "Food", "2026-08-10"))
        .unwrap();

    let err = storage.transactions().delete(&bob.id, &tx.id).unwrap_err();
    assert!(matches!(err, ServiceError::NotAuthorized));

    let remaining = storage
        .transactions()
        .list(&alice.id, &TxFilter::default())
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].title, "Coffee");
}

#[test]
fn update_unknown_id_is_not_found() {
    let (_dir, storage) = setup();
    let alice = register(&storage, "alice");
    let err = storage
        .transactions()
        .update(&alice.id, "missing", TxPatch::default())
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound));
}
