// Copyright (c) 2026 Fintrack Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use mongodb::bson::doc;
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};
use mongodb::sync::{Collection, Database};

use crate::backend::{BudgetFilter, BudgetStore};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{fmt_iso, new_id, now, Budget, BudgetInput};

pub struct MongoBudgets {
    coll: Collection<Budget>,
}

impl MongoBudgets {
    pub fn new(db: &Database) -> Self {
        MongoBudgets {
            coll: db.collection("budgets"),
        }
    }
}

impl BudgetStore for MongoBudgets {
    fn list(&self, owner: &str, filter: &BudgetFilter) -> ServiceResult<Vec<Budget>> {
        let mut query = doc! { "user": owner };
        if let Some(month) = filter.month {
            query.insert("month", month);
        }
        if let Some(year) = filter.year {
            query.insert("year", year);
        }
        let cursor = self.coll.find(query, None)?;
        let budgets = cursor.collect::<Result<Vec<_>, _>>()?;
        Ok(budgets)
    }

    fn upsert(&self, owner: &str, input: BudgetInput) -> ServiceResult<Budget> {
        input.validate()?;
        let now = now();
        // Single find-and-update-or-insert call; the unique index on
        // (user, category, month, year) backs the same invariant the
        // flat-file scan enforces.
        let query = doc! {
            "user": owner,
            "category": &input.category,
            "month": input.month,
            "year": input.year,
        };
        let update = doc! {
            "$set": { "limit": input.limit, "updatedAt": fmt_iso(&now) },
            "$setOnInsert": { "_id": new_id(), "createdAt": fmt_iso(&now) },
        };
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();
        let budget = self
            .coll
            .find_one_and_update(query, update, options)?
            .ok_or_else(|| {
                ServiceError::Unavailable("budget upsert returned no document".to_string())
            })?;
        Ok(budget)
    }

    fn delete(&self, owner: &str, id: &str) -> ServiceResult<()> {
        let budget = self
            .coll
            .find_one(doc! { "_id": id }, None)?
            .ok_or(ServiceError::NotFound)?;
        if budget.user != owner {
            return Err(ServiceError::NotAuthorized);
        }
        self.coll.delete_one(doc! { "_id": id }, None)?;
        Ok(())
    }
}
