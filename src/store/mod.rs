// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The external resource store the convergence driver reads and writes.
//!
//! Every record, desired state and managed resource alike, is addressed by
//! kind (the Rust type), namespace and name. The Kubernetes-backed
//! implementation lives in [`crate::kubernetes::KubeStore`].

use k8s_openapi::NamespaceResourceScope;
use kube::Resource;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;
use std::future::Future;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("not found")]
    NotFound,

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("store unavailable: {0}")]
    Unavailable(#[source] BoxError),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }
}

impl From<kube::Error> for StoreError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(resp) if resp.code == 404 => StoreError::NotFound,
            kube::Error::Api(resp) if resp.code == 409 && resp.reason == "AlreadyExists" => {
                StoreError::AlreadyExists(resp.message)
            }
            kube::Error::Api(resp) if resp.code == 409 => StoreError::Conflict(resp.message),
            other => StoreError::Unavailable(Box::new(other)),
        }
    }
}

/// Any namespaced resource type with static type information.
pub trait StoredResource:
    Resource<DynamicType = (), Scope = NamespaceResourceScope>
    + Clone
    + Debug
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
}

impl<K> StoredResource for K where
    K: Resource<DynamicType = (), Scope = NamespaceResourceScope>
        + Clone
        + Debug
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static
{
}

pub trait ResourceStore: Send + Sync {
    fn get<K: StoredResource>(
        &self,
        namespace: &str,
        name: &str,
    ) -> impl Future<Output = Result<K, StoreError>> + Send;

    /// Create a resource in the namespace recorded in its metadata
    fn create<K: StoredResource>(
        &self,
        resource: &K,
    ) -> impl Future<Output = Result<K, StoreError>> + Send;

    /// Replace a resource. A `resourceVersion` in the metadata makes the write
    /// conditional on the stored object not having changed.
    fn update<K: StoredResource>(
        &self,
        resource: &K,
    ) -> impl Future<Output = Result<K, StoreError>> + Send;
}
