// Copyright (c) 2026 Fintrack Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use mongodb::bson::{doc, Bson};
use mongodb::options::FindOptions;
use mongodb::sync::{Collection, Database};

use crate::backend::CategoryStore;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{default_catalog, new_id, now, Category, CategoryPatch, NewCategory, TxKind};

pub struct MongoCategories {
    coll: Collection<Category>,
}

impl MongoCategories {
    pub fn new(db: &Database) -> Self {
        MongoCategories {
            coll: db.collection("categories"),
        }
    }

    fn ensure_seeded(&self) -> ServiceResult<()> {
        let globals = self
            .coll
            .count_documents(doc! { "user": Bson::Null }, None)?;
        if globals == 0 {
            self.coll.insert_many(default_catalog(now()), None)?;
        }
        Ok(())
    }
}

impl CategoryStore for MongoCategories {
    fn list(&self, owner: &str, kind: Option<TxKind>) -> ServiceResult<Vec<Category>> {
        self.ensure_seeded()?;
        let mut query = doc! { "$or": [ { "user": Bson::Null }, { "user": owner } ] };
        if let Some(kind) = kind {
            query.insert("type", kind.as_str());
        }
        let options = FindOptions::builder()
            .sort(doc! { "type": 1, "name": 1 })
            .build();
        let cursor = self.coll.find(query, options)?;
        let cats = cursor.collect::<Result<Vec<_>, _>>()?;
        Ok(cats)
    }

    fn create(&self, owner: &str, input: NewCategory) -> ServiceResult<Category> {
        input.validate()?;
        self.ensure_seeded()?;
        let cat = Category {
            id: new_id(),
            user: Some(owner.to_string()),
            name: input.name,
            kind: input.kind,
            color: input.color.unwrap_or_else(|| "#cccccc".to_string()),
            icon: input.icon.unwrap_or_else(|| "fa-tag".to_string()),
            created_at: now(),
        };
        self.coll.insert_one(&cat, None)?;
        Ok(cat)
    }

    fn update(&self, owner: &str, id: &str, patch: CategoryPatch) -> ServiceResult<Category> {
        patch.validate()?;
        let mut cat = self
            .coll
            .find_one(doc! { "_id": id }, None)?
            .ok_or(ServiceError::NotFound)?;
        // Global categories are read-only for everyone.
        if cat.user.as_deref() != Some(owner) {
            return Err(ServiceError::NotAuthorized);
        }

        if let Some(name) = patch.name {
            cat.name = name;
        }
        if let Some(color) = patch.color {
            cat.color = color;
        }
        if let Some(icon) = patch.icon {
            cat.icon = icon;
        }
        self.coll.replace_one(doc! { "_id": id }, &cat, None)?;
        Ok(cat)
    }

    fn delete(&self, owner: &str, id: &str) -> ServiceResult<()> {
        let cat = self
            .coll
            .find_one(doc! { "_id": id }, None)?
            .ok_or(ServiceError::NotFound)?;
        if cat.user.as_deref() != Some(owner) {
            return Err(ServiceError::NotAuthorized);
        }
        self.coll.delete_one(doc! { "_id": id }, None)?;
        Ok(())
    }
}
