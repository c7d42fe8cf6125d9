// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! NginxOperator reconciler - watches records and the resources they own and
//! hands each changed record to the convergence driver.

use crate::config::Config;
use crate::convergence::{Outcome, RecordKey, Reconciler};
use crate::error::{OperatorError, Result};
use crate::kubernetes::KubeStore;
use crate::store::StoredResource;
use crate::types::{Certificate, Issuer, NginxOperator};
use futures::StreamExt;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use k8s_openapi::api::networking::v1::Ingress;
use kube::{
    runtime::{controller::Action, Controller},
    Api, Client, ResourceExt,
};
use kube_runtime::watcher::Config as WatcherConfig;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub struct NginxOperatorReconciler {
    client: Client,
    config: Config,
    driver: Reconciler<KubeStore>,
}

impl NginxOperatorReconciler {
    pub fn new(client: Client, config: Config) -> Self {
        let driver = Reconciler::new(KubeStore::new(client.clone()), config.issuer.clone());
        Self {
            client,
            config,
            driver,
        }
    }

    fn api<K: StoredResource>(&self) -> Api<K> {
        match &self.config.watch_namespace {
            Some(namespace) => Api::namespaced(self.client.clone(), namespace),
            None => Api::all(self.client.clone()),
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let records: Api<NginxOperator> = self.api();
        let deployments: Api<Deployment> = self.api();
        let services: Api<Service> = self.api();
        let ingresses: Api<Ingress> = self.api();
        let issuers: Api<Issuer> = self.api();
        let certificates: Api<Certificate> = self.api();

        match &self.config.watch_namespace {
            Some(namespace) => info!("Watching NginxOperator resources in namespace {}", namespace),
            None => info!("Watching NginxOperator resources in all namespaces"),
        }

        let context = Arc::new(self);

        Controller::new(records, WatcherConfig::default())
            .owns(deployments, WatcherConfig::default())
            .owns(services, WatcherConfig::default())
            .owns(ingresses, WatcherConfig::default())
            .owns(issuers, WatcherConfig::default())
            .owns(certificates, WatcherConfig::default())
            .shutdown_on_signal()
            .run(reconcile, error_policy, context)
            .for_each(|res| async move {
                match res {
                    Ok(o) => debug!("Reconciled NginxOperator: {:?}", o),
                    Err(e) => warn!("Reconciliation error: {:?}", e),
                }
            })
            .await;

        Ok(())
    }
}

async fn reconcile(
    record: Arc<NginxOperator>,
    ctx: Arc<NginxOperatorReconciler>,
) -> Result<Action> {
    let namespace = record
        .namespace()
        .ok_or(OperatorError::MissingObjectKey(".metadata.namespace"))?;
    let key = RecordKey::new(namespace, record.name_any());

    debug!("Reconciling NginxOperator: {}", key);

    let outcome = ctx.driver.reconcile(&key).await?;
    Ok(action_for(outcome, &ctx.config))
}

/// Map a convergence outcome onto when the controller should look at the record again
pub fn action_for(outcome: Outcome, config: &Config) -> Action {
    match outcome {
        Outcome::Requeue => Action::requeue(config.requeue_interval),
        // Owned resources are watched, so drift or deletion triggers a new invocation
        Outcome::Converged | Outcome::NoOp => Action::await_change(),
    }
}

fn error_policy(
    record: Arc<NginxOperator>,
    error: &OperatorError,
    ctx: Arc<NginxOperatorReconciler>,
) -> Action {
    error!(
        "Reconciliation of NginxOperator {}/{} failed: {}",
        record.namespace().unwrap_or_default(),
        record.name_any(),
        error
    );
    Action::requeue(ctx.config.error_backoff)
}
