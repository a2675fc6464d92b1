// Copyright (c) 2026 Fintrack Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod alerts;
pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod json;
pub mod models;
pub mod mongo;
