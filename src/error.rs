// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OperatorError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to {op} {kind} {namespace}/{name}: {source}")]
    Store {
        op: &'static str,
        kind: String,
        namespace: String,
        name: String,
        #[source]
        source: StoreError,
    },

    #[error("Missing object key: {0}")]
    MissingObjectKey(&'static str),
}

impl OperatorError {
    /// The store failure behind this error, if any
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            OperatorError::Store { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, OperatorError>;
