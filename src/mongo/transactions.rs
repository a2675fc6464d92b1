// Copyright (c) 2026 Fintrack Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use mongodb::bson::{doc, Document};
use mongodb::options::FindOptions;
use mongodb::sync::{Collection, Database};

use crate::backend::{TransactionStore, TxFilter};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{fmt_iso, new_id, normalize_date, now, NewTransaction, Transaction, TxPatch};

pub struct MongoTransactions {
    coll: Collection<Transaction>,
}

impl MongoTransactions {
    pub fn new(db: &Database) -> Self {
        MongoTransactions {
            coll: db.collection("transactions"),
        }
    }
}

fn query_for(owner: &str, filter: &TxFilter) -> Document {
    let mut query = doc! { "user": owner };
    if let Some(kind) = filter.kind {
        query.insert("type", kind.as_str());
    }
    if let Some(category) = &filter.category {
        query.insert("category", category.as_str());
    }

    let mut date_range = Document::new();
    if let Some(start) = filter.start {
        date_range.insert("$gte", fmt_iso(&start));
    }
    if let Some(end) = filter.end {
        date_range.insert("$lte", fmt_iso(&end));
    }
    if !date_range.is_empty() {
        query.insert("date", date_range);
    }

    let mut amount_range = Document::new();
    if let Some(min) = filter.min_amount {
        amount_range.insert("$gte", min);
    }
    if let Some(max) = filter.max_amount {
        amount_range.insert("$lte", max);
    }
    if !amount_range.is_empty() {
        query.insert("amount", amount_range);
    }

    if let Some(text) = &filter.query {
        let pattern = regex::escape(text);
        let clause = |field: &str| {
            let mut doc = Document::new();
            doc.insert(field, doc! { "$regex": pattern.as_str(), "$options": "i" });
            doc
        };
        query.insert(
            "$or",
            vec![clause("title"), clause("category"), clause("description")],
        );
    }
    query
}

fn sort_doc(key: &str) -> Document {
    let (descending, field) = match key.strip_prefix('-') {
        Some(field) => (true, field),
        None => (false, key),
    };
    let field = match field {
        "amount" | "title" | "category" | "date" => field,
        _ => "date",
    };
    let mut sort = Document::new();
    sort.insert(field, if descending { -1 } else { 1 });
    sort
}

impl TransactionStore for MongoTransactions {
    fn list(&self, owner: &str, filter: &TxFilter) -> ServiceResult<Vec<Transaction>> {
        let options = FindOptions::builder()
            .sort(sort_doc(filter.sort.as_deref().unwrap_or("-date")))
            .build();
        let cursor = self.coll.find(query_for(owner, filter), options)?;
        let txs = cursor.collect::<Result<Vec<_>, _>>()?;
        Ok(txs)
    }

    fn create(&self, owner: &str, input: NewTransaction) -> ServiceResult<Transaction> {
        input.validate()?;
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
        self.coll.insert_one(&tx, None)?;
        Ok(tx)
    }

    fn update(&self, owner: &str, id: &str, patch: TxPatch) -> ServiceResult<Transaction> {
        patch.validate()?;
        let mut tx = self
            .coll
            .find_one(doc! { "_id": id }, None)?
            .ok_or(ServiceError::NotFound)?;
        if tx.user != owner {
            return Err(ServiceError::NotAuthorized);
        }

        let now = now();
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

        self.coll.replace_one(doc! { "_id": id }, &tx, None)?;
        Ok(tx)
    }

    fn delete(&self, owner: &str, id: &str) -> ServiceResult<()> {
        let tx = self
            .coll
            .find_one(doc! { "_id": id }, None)?
            .ok_or(ServiceError::NotFound)?;
        if tx.user != owner {
            return Err(ServiceError::NotAuthorized);
        }
        self.coll.delete_one(doc! { "_id": id }, None)?;
        Ok(())
    }
}
