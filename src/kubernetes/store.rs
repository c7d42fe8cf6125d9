// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Resource store backed by the Kubernetes API server.

use crate::constants::OPERATOR_NAME;
use crate::store::{ResourceStore, StoreError, StoredResource};
use kube::{api::PostParams, Api, Client, Resource, ResourceExt};
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl KubeStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api_for<K: StoredResource>(&self, resource: &K) -> Api<K> {
        let namespace = resource
            .namespace()
            .unwrap_or_else(|| self.client.default_namespace().to_string());
        Api::namespaced(self.client.clone(), &namespace)
    }
}

fn post_params() -> PostParams {
    PostParams {
        dry_run: false,
        field_manager: Some(OPERATOR_NAME.to_string()),
    }
}

impl ResourceStore for KubeStore {
    #[instrument(skip(self), fields(kind = %K::kind(&())))]
    async fn get<K: StoredResource>(&self, namespace: &str, name: &str) -> Result<K, StoreError> {
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        debug!("Getting {}/{}", namespace, name);
        Ok(api.get(name).await?)
    }

    #[instrument(skip(self, resource), fields(kind = %K::kind(&()), name = %resource.name_any()))]
    async fn create<K: StoredResource>(&self, resource: &K) -> Result<K, StoreError> {
        Ok(self.api_for(resource).create(&post_params(), resource).await?)
    }

    #[instrument(skip(self, resource), fields(kind = %K::kind(&()), name = %resource.name_any()))]
    async fn update<K: StoredResource>(&self, resource: &K) -> Result<K, StoreError> {
        let name = resource.name_any();
        Ok(self
            .api_for(resource)
            .replace(&name, &post_params(), resource)
            .await?)
    }
}
