// Copyright (c) 2026 Fintrack Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::config::{redact_uri, StorageConfig};
use crate::error::ServiceResult;
use crate::json;
use crate::models::{
    Budget, BudgetInput, Category, CategoryPatch, NewCategory, NewTransaction, NewUser,
    Notification, Transaction, TxKind, TxPatch, User, UserPatch,
};
use crate::mongo;

/// Transaction listing filters. All fields are conjunctive; `sort`
/// names a field (`date`, `amount`, `title`, `category`) with a `-`
/// prefix for descending order, defaulting to `-date`.
#[derive(Debug, Clone, Default)]
pub struct TxFilter {
    pub kind: Option<TxKind>,
    pub category: Option<String>,
    /// Case-insensitive substring match over title, category and
    /// description.
    pub query: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub sort: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BudgetFilter {
    pub month: Option<i32>,
    pub year: Option<i32>,
}

pub trait UserStore: Send + Sync {
    fn create(&self, input: NewUser) -> ServiceResult<User>;
    fn find_by_email(&self, email: &str) -> ServiceResult<Option<User>>;
    fn find_by_id(&self, id: &str) -> ServiceResult<Option<User>>;
    fn update(&self, id: &str, patch: UserPatch) -> ServiceResult<User>;
    fn set_password(&self, id: &str, new_password: &str) -> ServiceResult<()>;
}

pub trait TransactionStore: Send + Sync {
    fn list(&self, owner: &str, filter: &TxFilter) -> ServiceResult<Vec<Transaction>>;
    fn create(&self, owner: &str, input: NewTransaction) -> ServiceResult<Transaction>;
    fn update(&self, owner: &str, id: &str, patch: TxPatch) -> ServiceResult<Transaction>;
    fn delete(&self, owner: &str, id: &str) -> ServiceResult<()>;
}

pub trait CategoryStore: Send + Sync {
    /// Union of global and owner-specific categories, sorted by
    /// (kind, name).
    fn list(&self, owner: &str, kind: Option<TxKind>) -> ServiceResult<Vec<Category>>;
    fn create(&self, owner: &str, input: NewCategory) -> ServiceResult<Category>;
    fn update(&self, owner: &str, id: &str, patch: CategoryPatch) -> ServiceResult<Category>;
    fn delete(&self, owner: &str, id: &str) -> ServiceResult<()>;
}

pub trait BudgetStore: Send + Sync {
    fn list(&self, owner: &str, filter: &BudgetFilter) -> ServiceResult<Vec<Budget>>;
    /// Keyed on (owner, category, month, year): an existing record
    /// keeps its id and creation time, only the limit changes.
    fn upsert(&self, owner: &str, input: BudgetInput) -> ServiceResult<Budget>;
    fn delete(&self, owner: &str, id: &str) -> ServiceResult<()>;
}

pub trait NotificationStore: Send + Sync {
    fn list(&self, owner: &str, unread_only: bool) -> ServiceResult<Vec<Notification>>;
    /// Dedupe lookup for the (owner, kind, message) triple.
    fn find_matching(
        &self,
        owner: &str,
        kind: &str,
        message: &str,
    ) -> ServiceResult<Option<Notification>>;
    fn create(&self, owner: &str, kind: &str, message: &str) -> ServiceResult<Notification>;
    /// Check-and-insert in one mutual-exclusion region: if a record
    /// with the same (owner, kind, message) exists it is returned
    /// unchanged, otherwise a new one is inserted. Concurrent callers
    /// can never produce duplicates.
    fn create_if_absent(&self, owner: &str, kind: &str, message: &str)
        -> ServiceResult<Notification>;
    fn mark_read(&self, owner: &str, id: &str) -> ServiceResult<Notification>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    /// Document database answered the startup probe.
    Mongo,
    /// Flat-file JSON services.
    JsonFiles,
}

/// The backend selected at startup. Handlers depend only on the entity
/// traits exposed here; which implementation answers is decided once
/// in [`Storage::connect`] and never re-probed.
pub struct Storage {
    mode: StorageMode,
    fallback_reason: Option<String>,
    users: Box<dyn UserStore>,
    transactions: Box<dyn TransactionStore>,
    categories: Box<dyn CategoryStore>,
    budgets: Box<dyn BudgetStore>,
    notifications: Box<dyn NotificationStore>,
}

impl Storage {
    /// Probe the document database within the configured timeout and
    /// build the matching service set. Any probe failure (no URI,
    /// timeout, auth, network, certificate) falls back to the
    /// flat-file services; unavailability is never fatal.
    pub fn connect(cfg: &StorageConfig) -> ServiceResult<Storage> {
        let reason = match &cfg.mongo_uri {
            Some(uri) => match mongo::connect(cfg) {
                Ok(db) => {
                    info!(uri = %redact_uri(uri), "document database connected");
                    return Ok(Storage::mongo(&db));
                }
                Err(err) => {
                    warn!(
                        uri = %redact_uri(uri),
                        error = %err,
                        "document database unreachable, using flat-file storage"
                    );
                    err.to_string()
                }
            },
            None => {
                warn!("MONGO_URI not set, using flat-file storage");
                "MONGO_URI not set".to_string()
            }
        };

        let store = Arc::new(json::JsonStore::open(cfg.data_dir.clone())?);
        Ok(Storage {
            mode: StorageMode::JsonFiles,
            fallback_reason: Some(reason),
            users: Box::new(json::JsonUsers::new(store.clone())),
            transactions: Box::new(json::JsonTransactions::new(store.clone())),
            categories: Box::new(json::JsonCategories::new(store.clone())),
            budgets: Box::new(json::JsonBudgets::new(store.clone())),
            notifications: Box::new(json::JsonNotifications::new(store)),
        })
    }

    fn mongo(db: &mongodb::sync::Database) -> Storage {
        Storage {
            mode: StorageMode::Mongo,
            fallback_reason: None,
            users: Box::new(mongo::MongoUsers::new(db)),
            transactions: Box::new(mongo::MongoTransactions::new(db)),
            categories: Box::new(mongo::MongoCategories::new(db)),
            budgets: Box::new(mongo::MongoBudgets::new(db)),
            notifications: Box::new(mongo::MongoNotifications::new(db)),
        }
    }

    pub fn mode(&self) -> StorageMode {
        self.mode
    }

    /// Why the process is running on flat files, when it is.
    pub fn fallback_reason(&self) -> Option<&str> {
        self.fallback_reason.as_deref()
    }

    pub fn users(&self) -> &dyn UserStore {
        self.users.as_ref()
    }

    pub fn transactions(&self) -> &dyn TransactionStore {
        self.transactions.as_ref()
    }

    pub fn categories(&self) -> &dyn CategoryStore {
        self.categories.as_ref()
    }

    pub fn budgets(&self) -> &dyn BudgetStore {
        self.budgets.as_ref()
    }

    pub fn notifications(&self) -> &dyn NotificationStore {
        self.notifications.as_ref()
    }
}
