// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Typed records read and written by the operator.

pub mod cert_manager;
pub mod nginx_operator;

pub use cert_manager::{Certificate, CertificateSpec, Issuer, IssuerSpec};
pub use nginx_operator::{NginxOperator, NginxOperatorSpec};
