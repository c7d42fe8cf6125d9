// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use kube::{CustomResource, ResourceExt};
use serde::{Deserialize, Serialize};

/// Desired state of a single nginx workload exposed over TLS.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[kube(group = "app.cisco.com", version = "v1", kind = "NginxOperator")]
#[kube(namespaced)]
#[kube(shortname = "nginxop")]
#[serde(rename_all = "camelCase")]
pub struct NginxOperatorSpec {
    #[schemars(range(min = 0))]
    pub replicas: i32,
    pub image: String,
    pub host: String,
}

impl NginxOperator {
    /// Namespace of the record, falling back to "default" for records built without one
    pub fn namespace_or_default(&self) -> String {
        self.namespace().unwrap_or_else(|| "default".to_string())
    }
}
