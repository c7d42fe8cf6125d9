// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::{owned_metadata, secret_name_for, ManagedResource};
use crate::types::cert_manager::ObjectReference;
use crate::types::{Certificate, CertificateSpec, NginxOperator};
use kube::ResourceExt;

/// Build the Certificate for `host`, issued by `issuer_name`
pub fn certificate_for(record: &NginxOperator, issuer_name: &str) -> Certificate {
    let record_name = record.name_any();
    let name = Certificate::name_for(&record_name);
    let mut certificate = Certificate::new(
        &name,
        CertificateSpec {
            secret_name: secret_name_for(&record_name),
            issuer_ref: ObjectReference {
                name: issuer_name.to_string(),
                kind: None,
                group: None,
            },
            dns_names: vec![record.spec.host.clone()],
        },
    );
    certificate.metadata = owned_metadata(record, name);
    certificate
}
