// Copyright (c) 2026 Fintrack Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cmp::Ordering;
use std::sync::Arc;


use crate::backend::{TransactionStore, TxFilter};
use crate::error::{ServiceError, ServiceResult};
use crate::json::store::{JsonStore, TRANSACTIONS_FILE};
use crate::models::{new_id, normalize_date, now, NewTransaction, Transaction, TxPatch};

pub struct JsonTransactions {
    store: Arc<JsonStore>,
}

impl JsonTransactions {
    pub fn new(store: Arc<JsonStore>) -> Self {
        JsonTransactions { store }
    }
}

fn matches(tx: &Transaction, filter: &TxFilter) -> bool {
    if let Some(kind) = filter.kind {
        if tx.kind != kind {
            return false;
        }
    }
    if let Some(category) = &filter.category {
        if &tx.category != category {
            return false;
        }
    }
    if let Some(start) = filter.start {
        if tx.date < start {
            return false;
        }
    }
    if let Some(end) = filter.end {
        if tx.date > end {
            return false;
        }
    }
    if let Some(min) = filter.min_amount {
        if tx.amount < min {
            return false;
        }
    }
    if let Some(max) = filter.max_amount {
        if tx.amount > max {
            return false;
        }
    }
    if let Some(query) = &filter.query {
        let needle = query.to_lowercase();
        let hit = tx.title.to_lowercase().contains(&needle)
            || tx.category.to_lowercase().contains(&needle)
            || tx
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
        if !hit {
            return false;
        }
    }
    true
}

fn sort_transactions(txs: &mut [Transaction], key: &str) {
    let (descending, field) = match key.strip_prefix('-') {
        Some(field) => (true, field),
        None => (false, key),
    };
    txs.sort_by(|a, b| {
        let ord = match field {
            "amount" => a.amount.partial_cmp(&b.amount).unwrap_or(Ordering::Equal),
            "title" => a.title.cmp(&b.title),
            "category" => a.category.cmp(&b.category),
            // Unknown keys fall back to date ordering.
            _ => a.date.cmp(&b.date),
        };
        if descending {
            ord.reverse()
        } else {
            ord
        }
    });
}

impl TransactionStore for JsonTransactions {
    fn list(&self, owner: &str, filter: &TxFilter) -> ServiceResult<Vec<Transaction>> {
        let path = self.store.path(TRANSACTIONS_FILE);
        let all: Vec<Transaction> = self.store.read(&path)?;
        let mut txs: Vec<Transaction> = all
            .into_iter()
            .filter(|t| t.user == owner)
            .filter(|t| matches(t, filter))
            .collect();
        sort_transactions(&mut txs, filter.sort.as_deref().unwrap_or("-date"));
        Ok(txs)
    }

    fn create(&self, owner: &str, input: NewTransaction) -> ServiceResult<Transaction> {
        input.validate()?;
        let _guard = self.store.guard();
        let path = self.store.path(TRANSACTIONS_FILE);
        let mut all: Vec<Transaction> = self.store.read(&path)?;

        let now = now();
        let tx = Transaction {
            id: new_id(),
            user: owner.to_string(),
            title: input.title,
            amount: input.amount,
            category: input.category,
            kind: input.kind,
            date: normalize_date(input.date.as_deref(), now),
            description: input.description,
            payment_method: input.payment_method.unwrap_or_else(|| "Cash".to_string()),
            updated_at: None,
        };
        all.push(tx.clone());
        self.store.write(&path, &all)?;
        Ok(tx)
    }

    fn update(&self, owner: &str, id: &str, patch: TxPatch) -> ServiceResult<Transaction> {
        patch.validate()?;
        let _guard = self.store.guard();
        let path = self.store.path(TRANSACTIONS_FILE);
        let mut all: Vec<Transaction> = self.store.read(&path)?;

        let idx = all
            .iter()
            .position(|t| t.id == id)
            .ok_or(ServiceError::NotFound)?;
        if all[idx].user != owner {
            return Err(ServiceError::NotAuthorized);
        }

        let now = now();
        let tx = &mut all[idx];
        if let Some(title) = patch.title {
            tx.title = title;
        }
        if let Some(amount) = patch.amount {
            tx.amount = amount;
        }
        if let Some(category) = patch.category {
            tx.category = category;
        }
        if let Some(kind) = patch.kind {
            tx.kind = kind;
        }
        if let Some(date) = &patch.date {
            tx.date = normalize_date(Some(date), now);
        }
        if let Some(description) = patch.description {
            tx.description = Some(description);
        }
        if let Some(payment_method) = patch.payment_method {
            tx.payment_method = payment_method;
        }
        tx.updated_at = Some(now);

        let updated = tx.clone();
        self.store.write(&path, &all)?;
        Ok(updated)
    }

    fn delete(&self, owner: &str, id: &str) -> ServiceResult<()> {
        let _guard = self.store.guard();
        let path = self.store.path(TRANSACTIONS_FILE);
        let mut all: Vec<Transaction> = self.store.read(&path)?;

        let idx = all
            .iter()
            .position(|t| t.id == id)
            .ok_or(ServiceError::NotFound)?;
        if all[idx].user != owner {
            return Err(ServiceError::NotAuthorized);
        }
        all.remove(idx);
        self.store.write(&path, &all)?;
        Ok(())
    }
}
