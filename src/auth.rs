// Copyright (c) 2026 Fintrack Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use argon2::Config;
use rand::Rng;

use crate::error::ServiceResult;

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(plain: &str) -> ServiceResult<String> {
    let salt: [u8; 16] = rand::thread_rng().r#gen();
    let hash = argon2::hash_encoded(plain.as_bytes(), &salt, &Config::default())?;
    Ok(hash)
}

/// Compare a plaintext candidate against a stored hash. Any decode
/// failure counts as a mismatch.
pub fn verify_password(hash: &str, plain: &str) -> bool {
    argon2::verify_encoded(hash, plain.as_bytes()).unwrap_or(false)
}
