// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::{owned_metadata, selector_labels, ManagedResource};
use crate::constants::{workload, WORKLOAD_PORT};
use crate::types::NginxOperator;
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{Container, ContainerPort, PodSpec, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::{api::ObjectMeta, ResourceExt};

/// Build the Deployment running the record's image with `replicas` pods
pub fn deployment_for(record: &NginxOperator) -> Deployment {
    let name = record.name_any();
    let labels = selector_labels(&name);

    Deployment {
        metadata: owned_metadata(record, Deployment::name_for(&name)),
        spec: Some(DeploymentSpec {
            replicas: Some(record.spec.replicas),
            selector: LabelSelector {
                match_labels: Some(labels.clone()),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(labels),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![Container {
                        name: workload::CONTAINER_NAME.to_string(),
                        image: Some(record.spec.image.clone()),
                        args: Some(workload::ARGS.iter().map(|a| a.to_string()).collect()),
                        image_pull_policy: Some(workload::IMAGE_PULL_POLICY.to_string()),
                        ports: Some(vec![ContainerPort {
                            container_port: WORKLOAD_PORT,
                            ..Default::default()
                        }]),
                        ..Default::default()
                    }],
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::is_owned_by;
    use crate::test_utils::demo_record;

    #[test]
    fn test_deployment_shape() {
        let record = demo_record();
        let deployment = deployment_for(&record);

        assert_eq!(deployment.metadata.name.as_deref(), Some("demo"));
        assert_eq!(deployment.metadata.namespace.as_deref(), Some("web"));

        let spec = deployment.spec.unwrap();
        assert_eq!(spec.replicas, Some(2));

        let pod = spec.template.spec.unwrap();
        assert_eq!(pod.containers.len(), 1);
        let container = &pod.containers[0];
        assert_eq!(container.name, "operator-image");
        assert_eq!(container.image.as_deref(), Some("nginx:1.21"));
        assert_eq!(container.args, Some(vec!["-text=foo".to_string()]));
        assert_eq!(container.image_pull_policy.as_deref(), Some("Always"));
        assert_eq!(container.ports.as_ref().unwrap()[0].container_port, 5678);
    }

    #[test]
    fn test_selector_matches_pod_labels() {
        let deployment = deployment_for(&demo_record());
        let spec = deployment.spec.unwrap();

        let selector = spec.selector.match_labels.unwrap();
        let pod_labels = spec.template.metadata.unwrap().labels.unwrap();
        assert_eq!(selector, pod_labels);
        assert_eq!(pod_labels["cr_name"], "demo");
    }

    #[test]
    fn test_deployment_is_owned_by_record() {
        let record = demo_record();
        let deployment = deployment_for(&record);
        assert!(is_owned_by(&deployment, &record));

        let owner = &deployment.metadata.owner_references.as_ref().unwrap()[0];
        assert_eq!(owner.block_owner_deletion, Some(true));
    }
}
