// Copyright (c) 2026 Fintrack Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use crate::backend::{BudgetFilter, Storage, TxFilter};
use crate::error::ServiceResult;
use crate::models::{now, Budget, TxKind};

pub const BUDGET_WARNING: &str = "budget_warning";
pub const BUDGET_EXCEEDED: &str = "budget_exceeded";

const WARNING_PERCENT: i64 = 80;
const EXCEEDED_PERCENT: i64 = 100;

#[derive(Debug, Clone, Serialize)]
pub struct BudgetStatus {
    #[serde(flatten)]
    pub budget: Budget,
    pub used: f64,
    #[serde(rename = "percentUsed")]
    pub percent_used: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    #[serde(rename = "incomeTotal")]
    pub income_total: f64,
    #[serde(rename = "expenseTotal")]
    pub expense_total: f64,
    pub balance: f64,
    pub month: i32,
    pub year: i32,
    #[serde(rename = "budgetStatuses")]
    pub budget_statuses: Vec<BudgetStatus>,
}

/// Compute the dashboard summary for the current calendar month and
/// run the budget-alert pass as a side effect.
pub fn summarize(storage: &Storage, owner: &str) -> ServiceResult<DashboardSummary> {
    summarize_at(storage, owner, now())
}

/// As [`summarize`], with an explicit clock.
///
/// The notification message embeds the current date and the live used
/// and limit figures, and that full string is the dedupe key: a later
/// transaction that changes `used` on the same day produces a fresh
/// notification alongside the earlier one. That accumulation matches
/// the established behavior and is kept deliberately.
pub fn summarize_at(
    storage: &Storage,
    owner: &str,
    now: DateTime<Utc>,
) -> ServiceResult<DashboardSummary> {
    let month = now.month() as i32;
    let year = now.year();

    let txs = storage.transactions().list(owner, &TxFilter::default())?;
    let income_total: f64 = txs
        .iter()
        .filter(|t| t.kind == TxKind::Income)
        .map(|t| t.amount)
        .sum();
    let expense_total: f64 = txs
        .iter()
        .filter(|t| t.kind == TxKind::Expense)
        .map(|t| t.amount)
        .sum();

    let mut used_by_category: HashMap<&str, f64> = HashMap::new();
    for tx in txs
        .iter()
        .filter(|t| t.kind == TxKind::Expense)
        .filter(|t| t.date.year() == year && t.date.month() == now.month())
    {
        *used_by_category.entry(tx.category.as_str()).or_default() += tx.amount;
    }

    let budgets = storage.budgets().list(
        owner,
        &BudgetFilter {
            month: Some(month),
            year: Some(year),
        },
    )?;

    let today = now.format("%Y-%m-%d").to_string();
    let mut budget_statuses = Vec::with_capacity(budgets.len());
    for budget in budgets {
        let used = used_by_category
            .get(budget.category.as_str())
            .copied()
            .unwrap_or(0.0);
        let percent_used = if budget.limit > 0.0 {
            (used / budget.limit * 100.0).round() as i64
        } else {
            0
        };

        if budget.limit > 0.0 {
            if percent_used >= EXCEEDED_PERCENT {
                let message = format!(
                    "[{today}] Budget exceeded for {}: {:.2} / {:.2}",
                    budget.category, used, budget.limit
                );
                emit(storage, owner, BUDGET_EXCEEDED, &message)?;
            } else if percent_used >= WARNING_PERCENT {
                let message = format!(
                    "[{today}] Budget at {percent_used}% for {}: {:.2} / {:.2}",
                    budget.category, used, budget.limit
                );
                emit(storage, owner, BUDGET_WARNING, &message)?;
            }
        }

        budget_statuses.push(BudgetStatus {
            budget,
            used,
            percent_used,
        });
    }

    Ok(DashboardSummary {
        income_total,
        expense_total,
        balance: income_total - expense_total,
        month,
        year,
        budget_statuses,
    })
}

/// Idempotent under the (owner, kind, message) triple: an identical
/// notification is never inserted twice, even from parallel callers.
fn emit(storage: &Storage, owner: &str, kind: &str, message: &str) -> ServiceResult<()> {
    storage.notifications().create_if_absent(owner, kind, message)?;
    Ok(())
}
