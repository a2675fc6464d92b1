// Copyright (c) 2026 Fintrack Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::{ServiceError, ServiceResult};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.fintrack", "Fintrack", "fintrack"));

pub const USERS_FILE: &str = "users.json";
pub const TRANSACTIONS_FILE: &str = "transactions.json";
pub const CATEGORIES_FILE: &str = "categories.json";
pub const BUDGETS_FILE: &str = "budgets.json";
pub const NOTIFICATIONS_FILE: &str = "notifications.json";

/// Flat-file record store: one JSON array per entity type, rewritten
/// whole on every mutation. The mutex serializes read-modify-write
/// sequences within the process; there is no cross-process locking.
pub struct JsonStore {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl JsonStore {
    pub fn open(dir: Option<PathBuf>) -> ServiceResult<Self> {
        let dir = match dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        fs::create_dir_all(&dir)?;
        Ok(JsonStore {
            dir,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    /// Acquire the per-store mutual-exclusion region. Every service
    /// holds this guard across its full read-modify-write sequence.
    pub fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Read the whole collection. A missing, empty, non-array or
    /// otherwise unreadable file is reset to `[]` and read as empty;
    /// corruption never propagates to the caller.
    pub fn read<T: DeserializeOwned>(&self, path: &Path) -> ServiceResult<Vec<T>> {
        if !path.exists() {
            fs::write(path, "[]")?;
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(path)?;
        if raw.trim().is_empty() {
            fs::write(path, "[]")?;
            return Ok(Vec::new());
        }
        let value: serde_json::Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => return self.reset(path, &err.to_string()),
        };
        if !value.is_array() {
            return self.reset(path, "top-level value is not an array");
        }
        match serde_json::from_value(value) {
            Ok(records) => Ok(records),
            Err(err) => self.reset(path, &err.to_string()),
        }
    }

    /// Serialize the whole collection and replace the file atomically:
    /// write to a temporary sibling, then rename over the original.
    pub fn write<T: Serialize>(&self, path: &Path, records: &[T]) -> ServiceResult<()> {
        let body = serde_json::to_string_pretty(records)?;
        let tmp = tmp_path(path);
        fs::write(&tmp, body)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    fn reset<T>(&self, path: &Path, reason: &str) -> ServiceResult<Vec<T>> {
        warn!(
            file = %path.display(),
            reason,
            "unreadable record file, resetting to empty collection"
        );
        fs::write(path, "[]")?;
        Ok(Vec::new())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".tmp");
    PathBuf::from(os)
}

fn default_data_dir() -> ServiceResult<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2).ok_or_else(|| {
        ServiceError::Unavailable("could not determine platform-specific data dir".to_string())
    })?;
    Ok(proj.data_dir().to_path_buf())
}
