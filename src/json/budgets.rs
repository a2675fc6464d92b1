// Copyright (c) 2026 Fintrack Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;


use crate::backend::{BudgetFilter, BudgetStore};
use crate::error::{ServiceError, ServiceResult};
use crate::json::store::{JsonStore, BUDGETS_FILE};
use crate::models::{new_id, now, Budget, BudgetInput};

pub struct JsonBudgets {
    store: Arc<JsonStore>,
}

impl JsonBudgets {
    pub fn new(store: Arc<JsonStore>) -> Self {
        JsonBudgets { store }
    }
}

impl BudgetStore for JsonBudgets {
    fn list(&self, owner: &str, filter: &BudgetFilter) -> ServiceResult<Vec<Budget>> {
        let path = self.store.path(BUDGETS_FILE);
        let all: Vec<Budget> = self.store.read(&path)?;
        Ok(all
            .into_iter()
            .filter(|b| b.user == owner)
            .filter(|b| filter.month.map_or(true, |m| b.month == m))
            .filter(|b| filter.year.map_or(true, |y| b.year == y))
            .collect())
    }

    fn upsert(&self, owner: &str, input: BudgetInput) -> ServiceResult<Budget> {
        input.validate()?;
        let _guard = self.store.guard();
        let path = self.store.path(BUDGETS_FILE);
        let mut all: Vec<Budget> = self.store.read(&path)?;

        let now = now();
        // The linear scan is the uniqueness constraint for this
        // backend: at most one record per (owner, category, month,
        // year) ever exists in the file.
        let existing = all.iter_mut().find(|b| {
            b.user == owner
                && b.category == input.category
                && b.month == input.month
                && b.year == input.year
        });

        let record = match existing {
            Some(budget) => {
                budget.limit = input.limit;
                budget.updated_at = now;
                budget.clone()
            }
            None => {
                let budget = Budget {
                    id: new_id(),
                    user: owner.to_string(),
                    category: input.category,
                    limit: input.limit,
                    month: input.month,
                    year: input.year,
                    created_at: now,
                    updated_at: now,
                };
                all.push(budget.clone());
                budget
            }
        };
        self.store.write(&path, &all)?;
        Ok(record)
    }

    fn delete(&self, owner: &str, id: &str) -> ServiceResult<()> {
        let _guard = self.store.guard();
        let path = self.store.path(BUDGETS_FILE);
        let mut all: Vec<Budget> = self.store.read(&path)?;

        let idx = all
            .iter()
            .position(|b| b.id == id)
            .ok_or(ServiceError::NotFound)?;
        if all[idx].user != owner {
            return Err(ServiceError::NotAuthorized);
        }
        all.remove(idx);
        self.store.write(&path, &all)?;
        Ok(())
    }
}
