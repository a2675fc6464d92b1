// Copyright (c) 2026 Fintrack Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod budgets;
pub mod categories;
pub mod notifications;
pub mod store;
pub mod transactions;
pub mod users;

pub use budgets::JsonBudgets;
pub use categories::JsonCategories;
pub use notifications::JsonNotifications;
pub use store::JsonStore;
pub use transactions::JsonTransactions;
pub use users::JsonUsers;
