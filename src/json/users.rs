// Copyright (c) 2026 Fintrack Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;


use crate::auth;
use crate::backend::UserStore;
use crate::error::{ServiceError, ServiceResult};
use crate::json::store::{JsonStore, USERS_FILE};
use crate::models::{new_id, now, NewUser, User, UserPatch, UserSettings};

pub struct JsonUsers {
    store: Arc<JsonStore>,
}

impl JsonUsers {
    pub fn new(store: Arc<JsonStore>) -> Self {
        JsonUsers { store }
    }
}

impl UserStore for JsonUsers {
    fn create(&self, input: NewUser) -> ServiceResult<User> {
        input.validate()?;
        let _guard = self.store.guard();
        let path = self.store.path(USERS_FILE);
        let mut users: Vec<User> = self.store.read(&path)?;

        let email = input.email.trim().to_lowercase();
        if users.iter().any(|u| u.email.eq_ignore_ascii_case(&email)) {
            return Err(ServiceError::EmailInUse);
        }
        if users
            .iter()
            .any(|u| u.username.eq_ignore_ascii_case(&input.username))
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
        users.push(user.clone());
        self.store.write(&path, &users)?;
        Ok(user)
    }

    fn find_by_email(&self, email: &str) -> ServiceResult<Option<User>> {
        let path = self.store.path(USERS_FILE);
        let users: Vec<User> = self.store.read(&path)?;
        Ok(users
            .into_iter()
            .find(|u| u.email.eq_ignore_ascii_case(email)))
    }

    fn find_by_id(&self, id: &str) -> ServiceResult<Option<User>> {
        let path = self.store.path(USERS_FILE);
        let users: Vec<User> = self.store.read(&path)?;
        Ok(users.into_iter().find(|u| u.id == id))
    }

    fn update(&self, id: &str, patch: UserPatch) -> ServiceResult<User> {
        patch.validate()?;
        let _guard = self.store.guard();
        let path = self.store.path(USERS_FILE);
        let mut users: Vec<User> = self.store.read(&path)?;

        let idx = users
            .iter()
            .position(|u| u.id == id)
            .ok_or(ServiceError::NotFound)?;

        if let Some(email) = &patch.email {
            let lower = email.to_lowercase();
            if users
                .iter()
                .any(|u| u.id != id && u.email.eq_ignore_ascii_case(&lower))
            {
                return Err(ServiceError::EmailInUse);
            }
        }
        if let Some(username) = &patch.username {
            if users
                .iter()
                .any(|u| u.id != id && u.username.eq_ignore_ascii_case(username))
            {
                return Err(ServiceError::UsernameInUse);
            }
        }

        let user = &mut users[idx];
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

        let updated = user.clone();
        self.store.write(&path, &users)?;
        Ok(updated)
    }

    fn set_password(&self, id: &str, new_password: &str) -> ServiceResult<()> {
        let _guard = self.store.guard();
        let path = self.store.path(USERS_FILE);
        let mut users: Vec<User> = self.store.read(&path)?;

        let idx = users
            .iter()
            .position(|u| u.id == id)
            .ok_or(ServiceError::NotFound)?;
        users[idx].password = auth::hash_password(new_password)?;
        users[idx].updated_at = Some(now());
        self.store.write(&path, &users)?;
        Ok(())
    }
}
