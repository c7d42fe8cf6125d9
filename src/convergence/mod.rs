// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Drives the managed resources of one `NginxOperator` toward its desired state.

pub mod driver;
pub mod semantic;
pub mod state;

pub use driver::{RecordKey, Reconciler};
pub use state::{Mutation, Observation, Outcome, State, Step};
