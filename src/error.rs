// Copyright (c) 2026 Fintrack Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Business outcomes and infrastructure failures of the storage services.
///
/// `Validation`, `NotFound`, `NotAuthorized` and the two uniqueness
/// conflicts are expected results the caller maps to user-visible
/// responses. The remaining variants wrap infrastructure sources that
/// escape the storage layer only when recovery is impossible (a corrupt
/// flat file or an unreachable database never surface here, see the
/// json store and the startup selector).
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("record not found")]
    NotFound,
    #[error("not authorized")]
    NotAuthorized,
    #[error("email already in use")]
    EmailInUse,
    #[error("username already in use")]
    UsernameInUse,
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Database(#[from] mongodb::error::Error),
    #[error(transparent)]
    Hash(#[from] argon2::Error),
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ServiceError::Validation(msg.into())
    }
}
