// Copyright (c) 2026 Fintrack Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use fintrack::backend::{BudgetFilter, Storage};
use fintrack::config::StorageConfig;
use fintrack::error::ServiceError;
use fintrack::models::{BudgetInput, NewUser, User};

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

fn input(category: &str, limit: f64, month: i32, year: i32) -> BudgetInput {
    BudgetInput {
        category: category.to_string(),
        limit,
        month,
        year,
    }
}

#[test]
fn upsert_overwrites_instead_of_duplicating() {
    let (_dir, storage) = setup();
    let alice = register(&storage, "alice");

    let first = storage
        .budgets()
        .upsert(&alice.id, input("Food", 100.0, 8, 2026))
        .unwrap();
    let second = storage
        .budgets()
        .upsert(&alice.id, input("Food", 150.0, 8, 2026))
        .unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(second.created_at, first.created_at);
    assert_eq!(second.limit, 150.0);

    let all = storage
        .budgets()
        .list(&alice.id, &BudgetFilter::default())
        .unwrap();
    assert_eq!(all.len(), 1);
}

#[test]
fn distinct_key_components_create_distinct_records() {
    let (_dir, storage) = setup();
    let alice = register(&storage, "alice");
    storage
        .budgets()
        .upsert(&alice.id, input("Food", 100.0, 8, 2026))
        .unwrap();
    storage
        .budgets()
        .upsert(&alice.id, input("Food", 100.0, 9, 2026))
        .unwrap();
    storage
        .budgets()
        .upsert(&alice.id, input("Transport", 50.0, 8, 2026))
        .unwrap();

    let all = storage
        .budgets()
        .list(&alice.id, &BudgetFilter::default())
        .unwrap();
    assert_eq!(all.len(), 3);
}

#[test]
fn same_key_different_owner_is_a_separate_budget() {
    let (_dir, storage) = setup();
    let alice = register(&storage, "alice");
    let bob = register(&storage, "bob");
    storage
        .budgets()
        .upsert(&alice.id, input("Food", 100.0, 8, 2026))
        .unwrap();
    storage
        .budgets()
        .upsert(&bob.id, input("Food", 200.0, 8, 2026))
        .unwrap();

    let alices = storage
        .budgets()
        .list(&alice.id, &BudgetFilter::default())
        .unwrap();
    assert_eq!(alices.len(), 1);
    assert_eq!(alices[0].limit, 100.0);
}

#[test]
fn month_and_year_filters_apply() {
    let (_dir, storage) = setup();
    let alice = register(&storage, "alice");
    storage
        .budgets()
        .upsert(&alice.id, input("Food", 100.0, 8, 2026))
        .unwrap();
    storage
        .budgets()
        .upsert(&alice.id, input("Food", 90.0, 7, 2026))
        .unwrap();
    storage
        .budgets()
        .upsert(&alice.id, input("Food", 80.0, 8, 2025))
        .unwrap();

    let current = storage
        .budgets()
        .list(
            &alice.id,
            &BudgetFilter {
                month: Some(8),
                year: Some(2026),
            },
        )
        .unwrap();
    assert_eq!(current.len(), 1);
    assert_eq!(current[0].limit, 100.0);
}

#[test]
fn out_of_range_month_is_a_validation_error() {
    let (_dir, storage) = setup();
    let alice = register(&storage, "alice");
    for month in [0, 13] {
        let err = storage
            .budgets()
            .upsert(&alice.id, input("Food", 100.0, month, 2026))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}

#[test]
fn pre_2000_year_is_a_validation_error() {
    let (_dir, storage) = setup();
    let alice = register(&storage, "alice");
    let err = storage
        .budgets()
        .upsert(&alice.id, input("Food", 100.0, 8, 1999))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[test]
fn nonpositive_limit_is_a_validation_error() {
    let (_dir, storage) = setup();
    let alice = register(&storage, "alice");
    let err = storage
        .budgets()
        .upsert(&alice.id, input("Food", 0.0, 8, 2026))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[test]
fn cross_user_delete_is_not_authorized() {
    let (_dir, storage) = setup();
    let alice = register(&storage, "alice");
    let bob = register(&storage, "bob");
    let budget = storage
        .budgets()
        .upsert(&alice.id, input("Food", 100.0, 8, 2026))
        .unwrap();

    let err = storage.budgets().delete(&bob.id, &budget.id).unwrap_err();
    assert!(matches!(err, ServiceError::NotAuthorized));

    let remaining = storage
        .budgets()
        .list(&alice.id, &BudgetFilter::default())
        .unwrap();
    assert_eq!(remaining.len(), 1);
}

#[test]
fn delete_unknown_id_is_not_found() {
    let (_dir, storage) = setup();
    let alice = register(&storage, "alice");
    let err = storage.budgets().delete(&alice.id, "missing").unwrap_err();
    assert!(matches!(err, ServiceError::NotFound));
}
