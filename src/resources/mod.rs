// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Synthesizers for the resources managed on behalf of an `NginxOperator`.
//!
//! Each synthesizer is a pure function from the record (plus, for the
//! Certificate and Ingress, the names of resources they depend on) to a
//! complete resource definition, already stamped with a controller owner
//! reference back to the record.

pub mod certificate;
pub mod deployment;
pub mod ingress;
pub mod issuer;
pub mod service;

pub use certificate::certificate_for;
pub use deployment::deployment_for;
pub use ingress::ingress_for;
pub use issuer::issuer_for;
pub use service::service_for;

use crate::constants::{labels, suffix};
use crate::store::StoredResource;
use crate::types::{Certificate, Issuer, NginxOperator};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use k8s_openapi::api::networking::v1::Ingress;
use kube::{api::ObjectMeta, Resource, ResourceExt};
use std::collections::BTreeMap;
use std::fmt;

/// Managed resource kinds, in the order they are converged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Deployment,
    Service,
    Issuer,
    Certificate,
    Ingress,
}

impl ResourceKind {
    /// Dependency order, leaves first
    pub const ORDER: [ResourceKind; 5] = [
        ResourceKind::Deployment,
        ResourceKind::Service,
        ResourceKind::Issuer,
        ResourceKind::Certificate,
        ResourceKind::Ingress,
    ];

    pub fn next(self) -> Option<ResourceKind> {
        match self {
            ResourceKind::Deployment => Some(ResourceKind::Service),
            ResourceKind::Service => Some(ResourceKind::Issuer),
            ResourceKind::Issuer => Some(ResourceKind::Certificate),
            ResourceKind::Certificate => Some(ResourceKind::Ingress),
            ResourceKind::Ingress => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Deployment => "Deployment",
            ResourceKind::Service => "Service",
            ResourceKind::Issuer => "Issuer",
            ResourceKind::Certificate => "Certificate",
            ResourceKind::Ingress => "Ingress",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resource type the operator manages, with the name it derives from a record.
pub trait ManagedResource: StoredResource {
    const KIND: ResourceKind;

    fn name_for(record_name: &str) -> String;
}

impl ManagedResource for Deployment {
    const KIND: ResourceKind = ResourceKind::Deployment;

    fn name_for(record_name: &str) -> String {
        record_name.to_string()
    }
}

impl ManagedResource for Service {
    const KIND: ResourceKind = ResourceKind::Service;

    fn name_for(record_name: &str) -> String {
        record_name.to_string()
    }
}

impl ManagedResource for Issuer {
    const KIND: ResourceKind = ResourceKind::Issuer;

    fn name_for(record_name: &str) -> String {
        format!("{}{}", record_name, suffix::ISSUER)
    }
}

impl ManagedResource for Certificate {
    const KIND: ResourceKind = ResourceKind::Certificate;

    fn name_for(record_name: &str) -> String {
        format!("{}{}", record_name, suffix::CERTIFICATE)
    }
}

impl ManagedResource for Ingress {
    const KIND: ResourceKind = ResourceKind::Ingress;

    fn name_for(record_name: &str) -> String {
        record_name.to_string()
    }
}

/// Name of the TLS secret cert-manager writes for a record's Certificate
pub fn secret_name_for(record_name: &str) -> String {
    format!("{}{}", record_name, suffix::SECRET)
}

/// Labels selecting the record's pods, used by both the Deployment and the Service
pub fn selector_labels(record_name: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        (labels::APP.to_string(), labels::APP_VALUE.to_string()),
        (labels::CR_NAME.to_string(), record_name.to_string()),
    ])
}

/// Stamp a controller owner reference to `owner` onto `meta`, replacing any existing one.
///
/// Requires the owner to carry a name and uid; records read from the store always do.
pub fn set_owner(meta: &mut ObjectMeta, owner: &NginxOperator) {
    let Some(mut owner_ref) = owner.controller_owner_ref(&()) else {
        return;
    };
    owner_ref.block_owner_deletion = Some(true);

    let refs = meta.owner_references.get_or_insert_with(Vec::new);
    refs.retain(|r| r.controller != Some(true) && r.uid != owner_ref.uid);
    refs.push(owner_ref);
}

/// Metadata for a managed resource named `name` in the record's namespace, owned by the record
fn owned_metadata(record: &NginxOperator, name: String) -> ObjectMeta {
    let mut meta = ObjectMeta {
        name: Some(name),
        namespace: Some(record.namespace_or_default()),
        ..Default::default()
    };
    set_owner(&mut meta, record);
    meta
}

/// Whether `resource` is controlled by `owner`
pub fn is_owned_by<K: Resource>(resource: &K, owner: &NginxOperator) -> bool {
    let Some(uid) = owner.uid() else {
        return false;
    };
    resource
        .owner_references()
        .iter()
        .any(|r| r.controller == Some(true) && r.uid == uid && r.kind == "NginxOperator")
}
