// Copyright (c) 2026 Fintrack Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use fintrack::backend::{Storage, StorageMode};
use fintrack::config::StorageConfig;

/// Connectivity checker: probe the configured backends once and report
/// which one will answer requests.
fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    let cfg = StorageConfig::from_env();
    let storage = Storage::connect(&cfg)?;
    match storage.mode() {
        StorageMode::Mongo => println!("storage mode: document database"),
        StorageMode::JsonFiles => {
            println!("storage mode: flat-file json");
            if let Some(reason) = storage.fallback_reason() {
                println!("reason: {reason}");
            }
        }
    }
    Ok(())
}
