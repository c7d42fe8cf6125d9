// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{acme, requeue};
use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Operator configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Namespace to watch; all namespaces when unset
    pub watch_namespace: Option<String>,
    pub requeue_interval: Duration,
    pub error_backoff: Duration,
    pub issuer: IssuerSettings,
}

/// Operator-wide ACME settings stamped into every Issuer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuerSettings {
    pub server: String,
    pub email: String,
}

impl Default for IssuerSettings {
    fn default() -> Self {
        Self {
            server: acme::SERVER.to_string(),
            email: acme::EMAIL.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            watch_namespace: None,
            requeue_interval: Duration::from_secs(requeue::INTERVAL_SECS),
            error_backoff: Duration::from_secs(requeue::ERROR_BACKOFF_SECS),
            issuer: IssuerSettings::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let watch_namespace = lookup("WATCH_NAMESPACE").filter(|ns| !ns.is_empty());

        let requeue_interval = match lookup("REQUEUE_INTERVAL_SECS") {
            Some(v) => v
                .parse()
                .context("REQUEUE_INTERVAL_SECS must be a whole number of seconds")?,
            None => requeue::INTERVAL_SECS,
        };
        let error_backoff = match lookup("ERROR_BACKOFF_SECS") {
            Some(v) => v
                .parse()
                .context("ERROR_BACKOFF_SECS must be a whole number of seconds")?,
            None => requeue::ERROR_BACKOFF_SECS,
        };

        let issuer = IssuerSettings {
            server: lookup("ACME_SERVER").unwrap_or_else(|| acme::SERVER.to_string()),
            email: lookup("ACME_EMAIL").unwrap_or_else(|| acme::EMAIL.to_string()),
        };

        Ok(Config {
            watch_namespace,
            requeue_interval: Duration::from_secs(requeue_interval),
            error_backoff: Duration::from_secs(error_backoff),
            issuer,
        })
    }
}
