// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The convergence state machine.
//!
//! Each invocation walks the managed kinds in dependency order. At every kind
//! the store is observed and [`transition`] decides whether to advance to the
//! next kind or to mutate the store. A mutation always ends the invocation
//! with [`Outcome::Requeue`], so an invocation writes at most one resource.

use super::semantic::is_derivative;
use crate::resources::ResourceKind;
use k8s_openapi::api::apps::v1::Deployment;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Converging(ResourceKind),
    Converged,
}

impl State {
    pub const START: State = State::Converging(ResourceKind::ORDER[0]);

    fn after(kind: ResourceKind) -> State {
        kind.next().map_or(State::Converged, State::Converging)
    }
}

/// What the store holds for the kind being converged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    Absent,
    /// Present, but the synthesized spec is not a semantic subset of the stored one
    Drifted,
    /// Present and matching, except for the replica count
    ReplicasDrifted,
    InSync,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Create,
    /// Replace the stored object with the synthesized one
    Overwrite,
    /// Set only the replica count on the stored object
    ScaleReplicas,
}

impl Mutation {
    pub fn outcome(self) -> Outcome {
        Outcome::Requeue
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Mutate(Mutation),
    Advance(State),
}

/// Result of a single invocation that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every managed resource exists and is in sync
    Converged,
    /// A resource was written; invoke again to continue
    Requeue,
    /// The desired-state record no longer exists
    NoOp,
}

/// Decide the next step for `kind` given what the store holds.
///
/// Only the Deployment is corrected for drift; the other kinds are created
/// when missing and otherwise left alone.
pub fn transition(kind: ResourceKind, observed: Observation) -> Step {
    match (kind, observed) {
        (_, Observation::Absent) => Step::Mutate(Mutation::Create),
        (ResourceKind::Deployment, Observation::Drifted) => Step::Mutate(Mutation::Overwrite),
        (ResourceKind::Deployment, Observation::ReplicasDrifted) => {
            Step::Mutate(Mutation::ScaleReplicas)
        }
        (kind, _) => Step::Advance(State::after(kind)),
    }
}

/// Compare a stored Deployment against the synthesized one.
///
/// The pod template is checked first; a replica mismatch only counts when the
/// template matches, so drift in both is corrected by a single overwrite.
pub fn observe_deployment(desired: &Deployment, found: &Deployment) -> Observation {
    let (Some(desired), Some(found)) = (desired.spec.as_ref(), found.spec.as_ref()) else {
        return Observation::Drifted;
    };

    if !is_derivative(&desired.template, &found.template) {
        return Observation::Drifted;
    }

    if desired.replicas != found.replicas {
        return Observation::ReplicasDrifted;
    }

    Observation::InSync
}
