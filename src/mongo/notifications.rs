// Copyright (c) 2026 Fintrack Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use mongodb::bson::doc;
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::sync::{Collection, Database};

use crate::backend::NotificationStore;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{fmt_iso, new_id, now, Notification};

pub struct MongoNotifications {
    coll: Collection<Notification>,
}

impl MongoNotifications {
    pub fn new(db: &Database) -> Self {
        MongoNotifications {
            coll: db.collection("notifications"),
        }
    }
}

impl NotificationStore for MongoNotifications {
    fn list(&self, owner: &str, unread_only: bool) -> ServiceResult<Vec<Notification>> {
        let mut query = doc! { "user": owner };
        if unread_only {
            query.insert("read", false);
        }
        let options = FindOptions::builder()
            .sort(doc! { "createdAt": -1 })
            .build();
        let cursor = self.coll.find(query, options)?;
        let notifications = cursor.collect::<Result<Vec<_>, _>>()?;
        Ok(notifications)
    }

    fn find_matching(
        &self,
        owner: &str,
        kind: &str,
        message: &str,
    ) -> ServiceResult<Option<Notification>> {
        Ok(self.coll.find_one(
            doc! { "user": owner, "type": kind, "message": message },
            None,
        )?)
    }

    fn create(&self, owner: &str, kind: &str, message: &str) -> ServiceResult<Notification> {
        let notification = Notification {
            id: new_id(),
            user: owner.to_string(),
            kind: kind.to_string(),
            message: message.to_string(),
            read: false,
            created_at: now(),
        };
        self.coll.insert_one(&notification, None)?;
        Ok(notification)
    }

    fn create_if_absent(
        &self,
        owner: &str,
        kind: &str,
        message: &str,
    ) -> ServiceResult<Notification> {
        // One atomic find-and-update-or-insert call; the equality
        // fields of the query become the inserted document's values.
        let query = doc! { "user": owner, "type": kind, "message": message };
        let update = doc! {
            "$setOnInsert": {
                "_id": new_id(),
                "read": false,
                "createdAt": fmt_iso(&now()),
            },
        };
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();
        let notification = self
            .coll
            .find_one_and_update(query, update, options)?
            .ok_or_else(|| {
                ServiceError::Unavailable("notification upsert returned no document".to_string())
            })?;
        Ok(notification)
    }

    fn mark_read(&self, owner: &str, id: &str) -> ServiceResult<Notification> {
        let mut notification = self
            .coll
            .find_one(doc! { "_id": id }, None)?
            .ok_or(ServiceError::NotFound)?;
        if notification.user != owner {
            return Err(ServiceError::NotAuthorized);
        }
        self.coll
            .update_one(doc! { "_id": id }, doc! { "$set": { "read": true } }, None)?;
        notification.read = true;
        Ok(notification)
    }
}
