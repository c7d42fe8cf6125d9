// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Convergence driver: runs the state machine for one record against the store.

use super::state::{observe_deployment, transition, Mutation, Observation, Outcome, State, Step};
use crate::config::IssuerSettings;
use crate::error::{OperatorError, Result};
use crate::resources::{
    certificate_for, deployment_for, ingress_for, issuer_for, service_for, ManagedResource,
    ResourceKind,
};
use crate::store::ResourceStore;
use crate::types::{Certificate, Issuer, NginxOperator};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use k8s_openapi::api::networking::v1::Ingress;
use kube::{Resource, ResourceExt};
use std::fmt;
use tracing::{debug, error, info, instrument};

/// Identity of a desired-state record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub namespace: String,
    pub name: String,
}

impl RecordKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Names resolved from the store earlier in the same invocation
#[derive(Debug, Default)]
struct Resolved {
    deployment: Option<Deployment>,
    issuer_name: Option<String>,
    certificate_secret: Option<String>,
}

pub struct Reconciler<S> {
    store: S,
    issuer: IssuerSettings,
}

impl<S: ResourceStore> Reconciler<S> {
    pub fn new(store: S, issuer: IssuerSettings) -> Self {
        Self { store, issuer }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Converge the managed resources of the record identified by `key`.
    ///
    /// Returns `Err` for any store failure; resources written earlier are left
    /// in place and the next invocation picks up from what the store holds.
    #[instrument(skip(self, key), fields(record = %key))]
    pub async fn reconcile(&self, key: &RecordKey) -> Result<Outcome> {
        let record = match self
            .store
            .get::<NginxOperator>(&key.namespace, &key.name)
            .await
        {
            Ok(record) => record,
            Err(e) if e.is_not_found() => {
                info!("NginxOperator {} not found, ignoring since it must have been deleted", key);
                return Ok(Outcome::NoOp);
            }
            Err(source) => {
                error!("Failed to get NginxOperator {}: {}", key, source);
                return Err(OperatorError::Store {
                    op: "get",
                    kind: NginxOperator::kind(&()).to_string(),
                    namespace: key.namespace.clone(),
                    name: key.name.clone(),
                    source,
                });
            }
        };

        if record.uid().is_none() {
            return Err(OperatorError::MissingObjectKey(".metadata.uid"));
        }

        let mut resolved = Resolved::default();
        let mut state = State::START;

        loop {
            let kind = match state {
                State::Converging(kind) => kind,
                State::Converged => {
                    debug!("All managed resources are in sync");
                    return Ok(Outcome::Converged);
                }
            };

            let observed = self.observe(kind, &record, &mut resolved).await?;
            debug!("Observed {} as {:?}", kind, observed);

            match transition(kind, observed) {
                Step::Advance(next) => state = next,
                Step::Mutate(mutation) => {
                    self.apply(kind, mutation, &record, &resolved).await?;
                    return Ok(mutation.outcome());
                }
            }
        }
    }

    async fn observe(
        &self,
        kind: ResourceKind,
        record: &NginxOperator,
        resolved: &mut Resolved,
    ) -> Result<Observation> {
        let observed = match kind {
            ResourceKind::Deployment => match self.lookup::<Deployment>(record).await? {
                None => Observation::Absent,
                Some(found) => {
                    let observed = observe_deployment(&deployment_for(record), &found);
                    resolved.deployment = Some(found);
                    observed
                }
            },
            ResourceKind::Service => presence(self.lookup::<Service>(record).await?),
            ResourceKind::Issuer => {
                let found = self.lookup::<Issuer>(record).await?;
                resolved.issuer_name = found.as_ref().map(|issuer| issuer.name_any());
                presence(found)
            }
            ResourceKind::Certificate => {
                let found = self.lookup::<Certificate>(record).await?;
                resolved.certificate_secret = found.as_ref().map(|c| c.spec.secret_name.clone());
                presence(found)
            }
            ResourceKind::Ingress => presence(self.lookup::<Ingress>(record).await?),
        };
        Ok(observed)
    }

    async fn apply(
        &self,
        kind: ResourceKind,
        mutation: Mutation,
        record: &NginxOperator,
        resolved: &Resolved,
    ) -> Result<()> {
        match mutation {
            Mutation::Create => self.create_missing(kind, record, resolved).await,
            Mutation::Overwrite => {
                let found = resolved_deployment(resolved)?;
                let mut desired = deployment_for(record);
                desired.metadata.resource_version = found.resource_version();
                info!("Updating Deployment {}/{}", namespace_of(&desired), desired.name_any());
                self.write(desired, Write::Update).await
            }
            Mutation::ScaleReplicas => {
                let mut found = resolved_deployment(resolved)?.clone();
                if let Some(spec) = found.spec.as_mut() {
                    spec.replicas = Some(record.spec.replicas);
                }
                info!(
                    "Updating Deployment {}/{} for matching replicas ({})",
                    namespace_of(&found),
                    found.name_any(),
                    record.spec.replicas
                );
                self.write(found, Write::Update).await
            }
        }
    }

    async fn create_missing(
        &self,
        kind: ResourceKind,
        record: &NginxOperator,
        resolved: &Resolved,
    ) -> Result<()> {
        match kind {
            ResourceKind::Deployment => self.write(deployment_for(record), Write::Create).await,
            ResourceKind::Service => self.write(service_for(record), Write::Create).await,
            ResourceKind::Issuer => {
                self.write(issuer_for(record, &self.issuer), Write::Create)
                    .await
            }
            ResourceKind::Certificate => {
                let issuer = resolved_issuer(resolved)?;
                self.write(certificate_for(record, issuer), Write::Create)
                    .await
            }
            ResourceKind::Ingress => {
                let issuer = resolved_issuer(resolved)?;
                let secret = resolved
                    .certificate_secret
                    .as_deref()
                    .ok_or(OperatorError::MissingObjectKey("Certificate .spec.secretName"))?;
                self.write(ingress_for(record, issuer, secret), Write::Create)
                    .await
            }
        }
    }

    /// Fetch the record's resource of kind `K`, mapping not-found to `None`
    async fn lookup<K: ManagedResource>(&self, record: &NginxOperator) -> Result<Option<K>> {
        let namespace = record.namespace_or_default();
        let name = K::name_for(&record.name_any());

        match self.store.get::<K>(&namespace, &name).await {
            Ok(found) => Ok(Some(found)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(source) => {
                error!("Failed to get {} {}/{}: {}", K::KIND, namespace, name, source);
                Err(OperatorError::Store {
                    op: "get",
                    kind: K::KIND.to_string(),
                    namespace,
                    name,
                    source,
                })
            }
        }
    }

    async fn write<K: ManagedResource>(&self, resource: K, write: Write) -> Result<()> {
        let namespace = namespace_of(&resource);
        let name = resource.name_any();

        if write == Write::Create {
            info!("Creating a new {} {}/{}", K::KIND, namespace, name);
        }

        let result = match write {
            Write::Create => self.store.create(&resource).await,
            Write::Update => self.store.update(&resource).await,
        };

        match result {
            Ok(_) => {
                info!("{} {}/{} {} successfully", K::KIND, namespace, name, write.past_tense());
                Ok(())
            }
            Err(source) => {
                error!("Failed to {} {} {}/{}: {}", write.as_str(), K::KIND, namespace, name, source);
                Err(OperatorError::Store {
                    op: write.as_str(),
                    kind: K::KIND.to_string(),
                    namespace,
                    name,
                    source,
                })
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Write {
    Create,
    Update,
}

impl Write {
    fn as_str(self) -> &'static str {
        match self {
            Write::Create => "create",
            Write::Update => "update",
        }
    }

    fn past_tense(self) -> &'static str {
        match self {
            Write::Create => "created",
            Write::Update => "updated",
        }
    }
}

fn presence<K>(found: Option<K>) -> Observation {
    match found {
        Some(_) => Observation::InSync,
        None => Observation::Absent,
    }
}

fn namespace_of<K: Resource>(resource: &K) -> String {
    resource.namespace().unwrap_or_default()
}

fn resolved_deployment(resolved: &Resolved) -> Result<&Deployment> {
    resolved
        .deployment
        .as_ref()
        .ok_or(OperatorError::MissingObjectKey("observed Deployment"))
}

fn resolved_issuer(resolved: &Resolved) -> Result<&str> {
    resolved
        .issuer_name
        .as_deref()
        .ok_or(OperatorError::MissingObjectKey("Issuer .metadata.name"))
}
