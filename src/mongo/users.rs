// Copyright (c) 2026 Fintrack Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use mongodb::bson::{doc, Document};
use mongodb::sync::{Collection, Database};

use crate::auth;
use crate::backend::UserStore;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{new_id, now, NewUser, User, UserPatch, UserSettings};

pub struct MongoUsers {
    coll: Collection<User>,
}

impl MongoUsers {
    pub fn new(db: &Database) -> Self {
        MongoUsers {
            coll: db.collection("users"),
        }
    }
}

// Usernames are unique case-insensitively; emails are stored
// lowercased so an exact match suffices there.
fn username_query(username: &str) -> Document {
    doc! {
        "username": {
            "$regex": format!("^{}$", regex::escape(username)),
            "$options": "i",
        }
    }
}

impl UserStore for MongoUsers {
    fn create(&self, input: NewUser) -> ServiceResult<User> {
        input.validate()?;
        let email = input.email.trim().to_lowercase();
        if self.coll.find_one(doc! { "email": &email }, None)?.is_some() {
            return Err(ServiceError::EmailInUse);
        }
        if self
            .coll
            .find_one(username_query(&input.username), None)?
            .is_some()
        {
            return Err(ServiceError::UsernameInUse);
        }

        let user = User {
            id: new_id(),
            username: input.username,
            email,
            password: auth::hash_password(&input.password)?,
            settings: UserSettings::default(),
            created_at: now(),
            updated_at: None,
        };
        self.coll.insert_one(&user, None)?;
        Ok(user)
    }

    fn find_by_email(&self, email: &str) -> ServiceResult<Option<User>> {
        Ok(self
            .coll
            .find_one(doc! { "email": email.to_lowercase() }, None)?)
    }

    fn find_by_id(&self, id: &str) -> ServiceResult<Option<User>> {
        Ok(self.coll.find_one(doc! { "_id": id }, None)?)
    }

    fn update(&self, id: &str, patch: UserPatch) -> ServiceResult<User> {
        patch.validate()?;
        let mut user = self
            .coll
            .find_one(doc! { "_id": id }, None)?
            .ok_or(ServiceError::NotFound)?;

        if let Some(email) = &patch.email {
            let lower = email.to_lowercase();
            let conflict = self
                .coll
                .find_one(doc! { "email": &lower, "_id": { "$ne": id } }, None)?;
            if conflict.is_some() {
                return Err(ServiceError::EmailInUse);
            }
        }
        if let Some(username) = &patch.username {
            let mut query = username_query(username);
            query.insert("_id", doc! { "$ne": id });
            if self.coll.find_one(query, None)?.is_some() {
                return Err(ServiceError::UsernameInUse);
            }
        }

        if let Some(username) = patch.username {
            user.username = username;
        }
        if let Some(email) = patch.email {
            user.email = email.to_lowercase();
        }
        if let Some(settings) = &patch.settings {
            settings.apply(&mut user.settings);
        }
        user.updated_at = Some(now());

        self.coll.replace_one(doc! { "_id": id }, &user, None)?;
        Ok(user)
    }

    fn set_password(&self, id: &str, new_password: &str) -> ServiceResult<()> {
        let mut user = self
            .coll
            .find_one(doc! { "_id": id }, None)?
            .ok_or(ServiceError::NotFound)?;
        user.password = auth::hash_password(new_password)?;
        user.updated_at = Some(now());
        self.coll.replace_one(doc! { "_id": id }, &user, None)?;
        Ok(())
    }
}
