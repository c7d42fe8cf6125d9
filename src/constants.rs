// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// The operator name used as field manager on writes
pub const OPERATOR_NAME: &str = "nginx-operator";

/// Port the workload listens on; shared by the Deployment, Service and Ingress
pub const WORKLOAD_PORT: i32 = 5678;

/// Container settings for the managed Deployment
pub mod workload {
    pub const CONTAINER_NAME: &str = "operator-image";
    pub const ARGS: &[&str] = &["-text=foo"];
    pub const IMAGE_PULL_POLICY: &str = "Always";
}

/// Selector labels shared by the Deployment's pods and the Service
pub mod labels {
    pub const APP: &str = "app";
    pub const APP_VALUE: &str = "operator";
    pub const CR_NAME: &str = "cr_name";
}

/// Name suffixes of resources derived from a record name
pub mod suffix {
    pub const ISSUER: &str = "-issuer";
    pub const CERTIFICATE: &str = "-certificate";
    pub const SECRET: &str = "-secret";
}

/// ACME issuer defaults, applied to every Issuer the operator creates
pub mod acme {
    pub const SERVER: &str = "https://acme-v02.api.letsencrypt.org/directory";
    pub const EMAIL: &str = "admin@example.com";
    pub const PRIVATE_KEY_SECRET: &str = "operator-secret-key";
    pub const INGRESS_CLASS: &str = "nginx";
}

/// Annotation keys set on the managed Ingress
pub mod annotations {
    pub const INGRESS_CLASS: &str = "kubernetes.io/ingress.class";
    pub const SSL_REDIRECT: &str = "nginx.ingress.kubernetes.io/ssl-redirect";
    pub const FORCE_SSL_REDIRECT: &str = "nginx.ingress.kubernetes.io/force-ssl-redirect";
    pub const CERT_MANAGER_ISSUER: &str = "cert-manager.io/issuer";
}

/// CRD polling configuration
pub mod crd {
    /// Initial polling interval in seconds when waiting for CRD
    pub const POLL_INTERVAL_SECS: u64 = 10;
    /// Maximum polling interval in seconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_SECS: u64 = 60;
}

/// Requeue timing defaults
pub mod requeue {
    /// Delay before re-invoking after a resource was created or updated
    pub const INTERVAL_SECS: u64 = 5;
    /// Delay before re-invoking after a failed invocation
    pub const ERROR_BACKOFF_SECS: u64 = 60;
}
