// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::{owned_metadata, selector_labels, ManagedResource};
use crate::constants::WORKLOAD_PORT;
use crate::types::NginxOperator;
use k8s_openapi::api::core::v1::{Service, ServicePort, ServiceSpec};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::ResourceExt;

/// Build the ClusterIP Service fronting the record's pods
pub fn service_for(record: &NginxOperator) -> Service {
    let name = record.name_any();

    Service {
        metadata: owned_metadata(record, Service::name_for(&name)),
        spec: Some(ServiceSpec {
            type_: Some("ClusterIP".to_string()),
            selector: Some(selector_labels(&name)),
            ports: Some(vec![ServicePort {
                port: WORKLOAD_PORT,
                target_port: Some(IntOrString::Int(WORKLOAD_PORT)),
                protocol: Some("TCP".to_string()),
                ..Default::default()
            }]),
            ..Default::default()
        }),
        ..Default::default()
    }
}
