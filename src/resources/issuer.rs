// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::{owned_metadata, ManagedResource};
use crate::config::IssuerSettings;
use crate::constants::acme;
use crate::types::cert_manager::{
    AcmeChallengeSolver, AcmeChallengeSolverHttp01, AcmeChallengeSolverHttp01Ingress, AcmeIssuer,
    SecretKeySelector,
};
use crate::types::{Issuer, IssuerSpec, NginxOperator};
use kube::ResourceExt;

/// Build the ACME Issuer solving HTTP-01 challenges through the nginx ingress class
pub fn issuer_for(record: &NginxOperator, settings: &IssuerSettings) -> Issuer {
    let name = Issuer::name_for(&record.name_any());
    let mut issuer = Issuer::new(
        &name,
        IssuerSpec {
            acme: Some(AcmeIssuer {
                server: settings.server.clone(),
                email: Some(settings.email.clone()),
                private_key_secret_ref: SecretKeySelector {
                    name: acme::PRIVATE_KEY_SECRET.to_string(),
                    key: None,
                },
                solvers: vec![AcmeChallengeSolver {
                    http01: Some(AcmeChallengeSolverHttp01 {
                        ingress: Some(AcmeChallengeSolverHttp01Ingress {
                            class: Some(acme::INGRESS_CLASS.to_string()),
                        }),
                    }),
                }],
            }),
        },
    );
    issuer.metadata = owned_metadata(record, name);
    issuer
}
