// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! CRD availability checking utilities

use crate::constants::crd::{POLL_INTERVAL_SECS, POLL_MAX_INTERVAL_SECS};
use crate::error::Result;
use kube::{discovery::Discovery, Client};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// A custom resource the operator reads or writes, as (group, version, kind)
pub type CrdRef = (&'static str, &'static str, &'static str);

/// The operator's own CRD and the cert-manager CRDs it creates resources of
pub const REQUIRED_CRDS: &[CrdRef] = &[
    ("app.cisco.com", "v1", "NginxOperator"),
    ("cert-manager.io", "v1", "Issuer"),
    ("cert-manager.io", "v1", "Certificate"),
];

/// Wait for all `crds` to become available in the cluster.
/// This uses exponential backoff starting at POLL_INTERVAL_SECS seconds.
pub async fn wait_for_crds(client: &Client, crds: &[CrdRef]) -> Result<()> {
    let mut interval = POLL_INTERVAL_SECS;

    loop {
        match missing_crds(client, crds).await {
            Ok(missing) if missing.is_empty() => {
                info!("All required CRDs are available");
                return Ok(());
            }
            Ok(missing) => {
                info!(
                    "CRDs not yet available: {}, waiting {} seconds...",
                    missing.join(", "),
                    interval
                );
            }
            Err(e) => {
                warn!(
                    "Error checking for CRDs: {}, retrying in {} seconds...",
                    e, interval
                );
            }
        }

        sleep(Duration::from_secs(interval)).await;

        // Exponential backoff with max cap
        interval = next_interval(interval);
    }
}

fn next_interval(interval: u64) -> u64 {
    (interval * 2).min(POLL_MAX_INTERVAL_SECS)
}

/// Discover the groups of `crds` and return those not served by the API server.
async fn missing_crds(client: &Client, crds: &[CrdRef]) -> Result<Vec<String>> {
    let mut groups: Vec<&str> = crds.iter().map(|(group, _, _)| *group).collect();
    groups.dedup();

    let discovery = Discovery::new(client.clone())
        .filter(&groups)
        .run()
        .await?;

    let served: Vec<(String, String, String)> = discovery
        .groups()
        .flat_map(|group| {
            group
                .recommended_resources()
                .into_iter()
                .map(|(ar, _)| (ar.group, ar.version, ar.kind))
        })
        .collect();

    Ok(crds
        .iter()
        .filter(|(group, version, kind)| {
            !served
                .iter()
                .any(|(g, v, k)| g == group && v == version && k == kind)
        })
        .map(|(group, version, kind)| format!("{}/{}/{}", group, version, kind))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_up_to_cap() {
        let mut interval = POLL_INTERVAL_SECS;
        let mut seen = vec![interval];
        for _ in 0..4 {
            interval = next_interval(interval);
            seen.push(interval);
        }

        assert_eq!(seen, vec![10, 20, 40, 60, 60]);
    }

    #[test]
    fn test_required_crds_cover_written_kinds() {
        let kinds: Vec<&str> = REQUIRED_CRDS.iter().map(|(_, _, kind)| *kind).collect();
        assert_eq!(kinds, vec!["NginxOperator", "Issuer", "Certificate"]);
    }
}
