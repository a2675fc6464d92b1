// Copyright (c) 2026 Fintrack Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;


use crate::backend::CategoryStore;
use crate::error::{ServiceError, ServiceResult};
use crate::json::store::{JsonStore, CATEGORIES_FILE};
use crate::models::{default_catalog, new_id, now, Category, CategoryPatch, NewCategory, TxKind};

pub struct JsonCategories {
    store: Arc<JsonStore>,
}

impl JsonCategories {
    pub fn new(store: Arc<JsonStore>) -> Self {
        JsonCategories { store }
    }

    /// Install the global default catalog the first time an empty
    /// collection is read. Caller must hold the store guard.
    fn read_seeded(&self) -> ServiceResult<Vec<Category>> {
        let path = self.store.path(CATEGORIES_FILE);
        let cats: Vec<Category> = self.store.read(&path)?;
        if !cats.is_empty() {
            return Ok(cats);
        }
        let seeded = default_catalog(now());
        self.store.write(&path, &seeded)?;
        Ok(seeded)
    }
}

fn sort_catalog(cats: &mut [Category]) {
    cats.sort_by(|a, b| {
        (a.kind.as_str(), a.name.as_str()).cmp(&(b.kind.as_str(), b.name.as_str()))
    });
}

impl CategoryStore for JsonCategories {
    fn list(&self, owner: &str, kind: Option<TxKind>) -> ServiceResult<Vec<Category>> {
        let _guard = self.store.guard();
        let all = self.read_seeded()?;
        let mut cats: Vec<Category> = all
            .into_iter()
            .filter(|c| c.user.is_none() || c.user.as_deref() == Some(owner))
            .filter(|c| kind.map_or(true, |k| c.kind == k))
            .collect();
        sort_catalog(&mut cats);
        Ok(cats)
    }

    fn create(&self, owner: &str, input: NewCategory) -> ServiceResult<Category> {
        input.validate()?;
        let _guard = self.store.guard();
        let mut all = self.read_seeded()?;

        let cat = Category {
            id: new_id(),
            user: Some(owner.to_string()),
            name: input.name,
            kind: input.kind,
            color: input.color.unwrap_or_else(|| "#cccccc".to_string()),
            icon: input.icon.unwrap_or_else(|| "fa-tag".to_string()),
            created_at: now(),
        };
        all.push(cat.clone());
        self.store.write(&self.store.path(CATEGORIES_FILE), &all)?;
        Ok(cat)
    }

    fn update(&self, owner: &str, id: &str, patch: CategoryPatch) -> ServiceResult<Category> {
        patch.validate()?;
        let _guard = self.store.guard();
        let mut all = self.read_seeded()?;

        let idx = all
            .iter()
            .position(|c| c.id == id)
            .ok_or(ServiceError::NotFound)?;
        // Global categories (no owner) are read-only for everyone.
        if all[idx].user.as_deref() != Some(owner) {
            return Err(ServiceError::NotAuthorized);
        }

        let cat = &mut all[idx];
        if let Some(name) = patch.name {
            cat.name = name;
        }
        if let Some(color) = patch.color {
            cat.color = color;
        }
        if let Some(icon) = patch.icon {
            cat.icon = icon;
        }

        let updated = cat.clone();
        self.store.write(&self.store.path(CATEGORIES_FILE), &all)?;
        Ok(updated)
    }

    fn delete(&self, owner: &str, id: &str) -> ServiceResult<()> {
        let _guard = self.store.guard();
        let mut all = self.read_seeded()?;

        let idx = all
            .iter()
            .position(|c| c.id == id)
            .ok_or(ServiceError::NotFound)?;
        if all[idx].user.as_deref() != Some(owner) {
            return Err(ServiceError::NotAuthorized);
        }
        all.remove(idx);
        self.store.write(&self.store.path(CATEGORIES_FILE), &all)?;
        Ok(())
    }
}
