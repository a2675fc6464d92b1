// Copyright (c) 2026 Fintrack Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;


use crate::backend::NotificationStore;
use crate::error::{ServiceError, ServiceResult};
use crate::json::store::{JsonStore, NOTIFICATIONS_FILE};
use crate::models::{new_id, now, Notification};

pub struct JsonNotifications {
    store: Arc<JsonStore>,
}

impl JsonNotifications {
    pub fn new(store: Arc<JsonStore>) -> Self {
        JsonNotifications { store }
    }
}

impl NotificationStore for JsonNotifications {
    fn list(&self, owner: &str, unread_only: bool) -> ServiceResult<Vec<Notification>> {
        let path = self.store.path(NOTIFICATIONS_FILE);
        let all: Vec<Notification> = self.store.read(&path)?;
        let mut notifications: Vec<Notification> = all
            .into_iter()
            .filter(|n| n.user == owner)
            .filter(|n| !unread_only || !n.read)
            .collect();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notifications)
    }

    fn find_matching(
        &self,
        owner: &str,
        kind: &str,
        message: &str,
    ) -> ServiceResult<Option<Notification>> {
        let path = self.store.path(NOTIFICATIONS_FILE);
        let all: Vec<Notification> = self.store.read(&path)?;
        Ok(all
            .into_iter()
            .find(|n| n.user == owner && n.kind == kind && n.message == message))
    }

    fn create(&self, owner: &str, kind: &str, message: &str) -> ServiceResult<Notification> {
        let _guard = self.store.guard();
        let path = self.store.path(NOTIFICATIONS_FILE);
        let mut all: Vec<Notification> = self.store.read(&path)?;

        let notification = Notification {
            id: new_id(),
            user: owner.to_string(),
            kind: kind.to_string(),
            message: message.to_string(),
            read: false,
            created_at: now(),
        };
        all.push(notification.clone());
        self.store.write(&path, &all)?;
        Ok(notification)
    }

    fn create_if_absent(
        &self,
        owner: &str,
        kind: &str,
        message: &str,
    ) -> ServiceResult<Notification> {
        let _guard = self.store.guard();
        let path = self.store.path(NOTIFICATIONS_FILE);
        let mut all: Vec<Notification> = self.store.read(&path)?;

        if let Some(existing) = all
            .iter()
            .find(|n| n.user == owner && n.kind == kind && n.message == message)
        {
            return Ok(existing.clone());
        }

        let notification = Notification {
            id: new_id(),
            user: owner.to_string(),
            kind: kind.to_string(),
            message: message.to_string(),
            read: false,
            created_at: now(),
        };
        all.push(notification.clone());
        self.store.write(&path, &all)?;
        Ok(notification)
    }

    fn mark_read(&self, owner: &str, id: &str) -> ServiceResult<Notification> {
        let _guard = self.store.guard();
        let path = self.store.path(NOTIFICATIONS_FILE);
        let mut all: Vec<Notification> = self.store.read(&path)?;

        let idx = all
            .iter()
            .position(|n| n.id == id)
            .ok_or(ServiceError::NotFound)?;
        if all[idx].user != owner {
            return Err(ServiceError::NotAuthorized);
        }
        all[idx].read = true;

        let updated = all[idx].clone();
        self.store.write(&path, &all)?;
        Ok(updated)
    }
}
