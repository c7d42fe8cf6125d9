// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use kube::Client;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use nginx_operator::config::Config;
use nginx_operator::kubernetes::{wait_for_crds, REQUIRED_CRDS};
use nginx_operator::reconcilers::NginxOperatorReconciler;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting nginx operator");

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: watch_namespace={:?}, acme_server={}",
        config.watch_namespace, config.issuer.server
    );

    // Create Kubernetes client
    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    // Issuers and Certificates cannot be created before cert-manager is installed
    info!("Waiting for required CRDs to become available...");
    wait_for_crds(&client, REQUIRED_CRDS).await?;

    let reconciler = NginxOperatorReconciler::new(client, config);

    info!("Starting reconciler...");
    reconciler.run().await?;

    warn!("Reconciler stopped");
    Ok(())
}
