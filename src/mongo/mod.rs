// Copyright (c) 2026 Fintrack Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use mongodb::bson::doc;
use mongodb::options::{ClientOptions, Tls, TlsOptions};
use mongodb::sync::{Client, Database};

use crate::config::StorageConfig;

pub mod budgets;
pub mod categories;
pub mod notifications;
pub mod transactions;
pub mod users;

pub use budgets::MongoBudgets;
pub use categories::MongoCategories;
pub use notifications::MongoNotifications;
pub use transactions::MongoTransactions;
pub use users::MongoUsers;

/// Establish and probe the document-database connection. The ping is
/// bounded by the configured server-selection timeout; any error here
/// makes the selector fall back to flat files.
pub(crate) fn connect(cfg: &StorageConfig) -> Result<Database, mongodb::error::Error> {
    let uri = cfg.mongo_uri.as_deref().unwrap_or_default();
    let mut options = ClientOptions::parse(uri)?;
    options.server_selection_timeout = Some(cfg.server_selection_timeout);
    options.connect_timeout = Some(cfg.server_selection_timeout);
    if let Some(tls) = tls_override(cfg) {
        options.tls = Some(tls);
    }

    let db_name = options
        .default_database
        .clone()
        .unwrap_or_else(|| "fintrack".to_string());
    let client = Client::with_options(options)?;
    let db = client.database(&db_name);
    db.run_command(doc! { "ping": 1 }, None)?;
    Ok(db)
}

/// Map the configured TLS relaxations onto the driver's options. The
/// driver exposes a single switch that disables both certificate-chain
/// and hostname verification, so either relaxation enables it.
fn tls_override(cfg: &StorageConfig) -> Option<Tls> {
    if !cfg.tls_insecure
        && !cfg.tls_allow_invalid_certs
        && !cfg.tls_allow_invalid_hostnames
        && cfg.tls_ca_file.is_none()
    {
        return None;
    }
    let mut tls = TlsOptions::default();
    tls.allow_invalid_certificates = Some(
        cfg.tls_insecure || cfg.tls_allow_invalid_certs || cfg.tls_allow_invalid_hostnames,
    );
    tls.ca_file_path = cfg.tls_ca_file.clone();
    Some(Tls::Enabled(tls))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_config_leaves_driver_tls_defaults_alone() {
        assert!(tls_override(&StorageConfig::default()).is_none());
    }

    #[test]
    fn hostname_relaxation_disables_certificate_verification() {
        let cfg = StorageConfig {
            tls_allow_invalid_hostnames: true,
            ..StorageConfig::default()
        };
        match tls_override(&cfg) {
            Some(Tls::Enabled(tls)) => {
                assert_eq!(tls.allow_invalid_certificates, Some(true));
                assert!(tls.ca_file_path.is_none());
            }
            other => panic!("expected enabled tls, got {other:?}"),
        }
    }

    #[test]
    fn ca_file_alone_keeps_verification_strict() {
        let cfg = StorageConfig {
            tls_ca_file: Some(std::path::PathBuf::from("/tmp/ca.pem")),
            ..StorageConfig::default()
        };
        match tls_override(&cfg) {
            Some(Tls::Enabled(tls)) => {
                assert_eq!(tls.allow_invalid_certificates, Some(false));
                assert!(tls.ca_file_path.is_some());
            }
            other => panic!("expected enabled tls, got {other:?}"),
        }
    }
}
