// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::{owned_metadata, ManagedResource};
use crate::constants::{acme, annotations, WORKLOAD_PORT};
use crate::types::NginxOperator;
use k8s_openapi::api::core::v1::Service;
use k8s_openapi::api::networking::v1::{
    HTTPIngressPath, HTTPIngressRuleValue, Ingress, IngressBackend, IngressRule,
    IngressServiceBackend, IngressSpec, IngressTLS, ServiceBackendPort,
};
use kube::ResourceExt;
use std::collections::BTreeMap;

/// Build the Ingress routing `host` to the record's Service over TLS.
///
/// `tls_secret_name` is the secret declared by the record's Certificate and
/// `issuer_name` is bound through the cert-manager annotation.
pub fn ingress_for(record: &NginxOperator, issuer_name: &str, tls_secret_name: &str) -> Ingress {
    let name = record.name_any();
    let host = record.spec.host.clone();

    let mut metadata = owned_metadata(record, Ingress::name_for(&name));
    metadata.annotations = Some(BTreeMap::from([
        (annotations::INGRESS_CLASS.to_string(), acme::INGRESS_CLASS.to_string()),
        (annotations::SSL_REDIRECT.to_string(), "true".to_string()),
        (annotations::FORCE_SSL_REDIRECT.to_string(), "true".to_string()),
        (annotations::CERT_MANAGER_ISSUER.to_string(), issuer_name.to_string()),
    ]));

    let path = HTTPIngressPath {
        path: Some("/".to_string()),
        path_type: "Prefix".to_string(),
        backend: IngressBackend {
            service: Some(IngressServiceBackend {
                name: Service::name_for(&name),
                port: Some(ServiceBackendPort {
                    number: Some(WORKLOAD_PORT),
                    name: None,
                }),
            }),
            resource: None,
        },
    };

    Ingress {
        metadata,
        spec: Some(IngressSpec {
            tls: Some(vec![IngressTLS {
                hosts: Some(vec![host.clone()]),
                secret_name: Some(tls_secret_name.to_string()),
            }]),
            rules: Some(vec![IngressRule {
                host: Some(host),
                http: Some(HTTPIngressRuleValue { paths: vec![path] }),
            }]),
            ..Default::default()
        }),
        ..Default::default()
    }
}
