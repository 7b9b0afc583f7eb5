//! # Deployment Builder
//!
//! Constructs the managed Deployment for a Dummy resource: labels, operand
//! image, restrictive security contexts, and the controller owner reference
//! used for garbage collection.

use std::collections::BTreeMap;
use std::env;

use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{
    Capabilities, Container, PodSecurityContext, PodSpec, PodTemplateSpec, SeccompProfile,
    SecurityContext,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use kube::{Resource, ResourceExt};

use crate::constants::{CONTROLLER_NAME, MANAGED_REPLICAS, OPERAND_IMAGE_ENV};
use crate::crd::Dummy;

use super::Error;

/// Resolve the operand image reference from the environment
///
/// Absence is a hard failure of the current reconcile pass; the dispatcher
/// retries, but the pass will keep failing until the environment is fixed.
pub fn operand_image() -> Result<String, Error> {
    env::var(OPERAND_IMAGE_ENV).map_err(|_| Error::MissingOperandImage)
}

/// Labels for selecting the resources managed for a Dummy instance
///
/// Follows the recommended Kubernetes common labels. The version tag is
/// taken from the operand image reference when one is resolvable.
pub fn labels_for(name: &str, image: Option<&str>) -> BTreeMap<String, String> {
    let version = image
        .and_then(|image| image.split(':').nth(1))
        .unwrap_or_default();
    BTreeMap::from([
        ("app.kubernetes.io/name".to_owned(), "Dummy".to_owned()),
        ("app.kubernetes.io/instance".to_owned(), name.to_owned()),
        ("app.kubernetes.io/version".to_owned(), version.to_owned()),
        (
            "app.kubernetes.io/part-of".to_owned(),
            CONTROLLER_NAME.to_owned(),
        ),
        (
            "app.kubernetes.io/created-by".to_owned(),
            CONTROLLER_NAME.to_owned(),
        ),
    ])
}

/// Build the Deployment for a Dummy resource
///
/// The security posture is hard-coded policy, not configuration: non-root
/// execution at pod and container level, a fixed non-root user id, no
/// privilege escalation, all capabilities dropped, and the runtime default
/// seccomp profile. The owner reference back to the Dummy lets the
/// platform garbage-collect the Deployment when the Dummy is deleted.
pub fn deployment_for(dummy: &Dummy) -> Result<Deployment, Error> {
    let name = dummy.name_any();
    let image = operand_image()?;
    let labels = labels_for(&name, Some(&image));

    Ok(Deployment {
        metadata: ObjectMeta {
            name: Some(name),
            namespace: dummy.namespace(),
            owner_references: dummy.controller_owner_ref(&()).map(|owner| vec![owner]),
            ..ObjectMeta::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(MANAGED_REPLICAS),
            selector: LabelSelector {
                match_labels: Some(labels.clone()),
                ..LabelSelector::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(labels),
                    ..ObjectMeta::default()
                }),
                spec: Some(PodSpec {
                    security_context: Some(PodSecurityContext {
                        run_as_non_root: Some(true),
                        seccomp_profile: Some(SeccompProfile {
                            type_: "RuntimeDefault".to_owned(),
                            ..SeccompProfile::default()
                        }),
                        ..PodSecurityContext::default()
                    }),
                    containers: vec![Container {
                        name: "dummy".to_owned(),
                        image: Some(image),
                        image_pull_policy: Some("IfNotPresent".to_owned()),
                        security_context: Some(SecurityContext {
                            run_as_non_root: Some(true),
                            run_as_user: Some(1001),
                            allow_privilege_escalation: Some(false),
                            capabilities: Some(Capabilities {
                                drop: Some(vec!["ALL".to_owned()]),
                                ..Capabilities::default()
                            }),
                            ..SecurityContext::default()
                        }),
                        ..Container::default()
                    }],
                    ..PodSpec::default()
                }),
            },
            ..DeploymentSpec::default()
        }),
        ..Deployment::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::DummySpec;
    use kube::core::ObjectMeta as KubeObjectMeta;
    use std::sync::Mutex;

    // Serializes tests that mutate the operand image environment variable.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn dummy(name: &str, namespace: &str) -> Dummy {
        let mut dummy = Dummy::new(
            name,
            DummySpec {
                message: "hello".to_owned(),
                size: 1,
            },
        );
        dummy.metadata = KubeObjectMeta {
            name: Some(name.to_owned()),
            namespace: Some(namespace.to_owned()),
            uid: Some("b12ed74d-1111-2222-3333-444455556666".to_owned()),
            ..KubeObjectMeta::default()
        };
        dummy
    }

    #[test]
    fn labels_carry_instance_and_version_tag() {
        let labels = labels_for("my-dummy", Some("example.com/image:test"));
        assert_eq!(labels["app.kubernetes.io/name"], "Dummy");
        assert_eq!(labels["app.kubernetes.io/instance"], "my-dummy");
        assert_eq!(labels["app.kubernetes.io/version"], "test");
        assert_eq!(labels["app.kubernetes.io/part-of"], CONTROLLER_NAME);
        assert_eq!(labels["app.kubernetes.io/created-by"], CONTROLLER_NAME);
    }

    #[test]
    fn labels_version_is_empty_without_image_tag() {
        let labels = labels_for("my-dummy", None);
        assert_eq!(labels["app.kubernetes.io/version"], "");
    }

    #[test]
    fn operand_image_fails_when_env_unset() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        std::env::remove_var(OPERAND_IMAGE_ENV);
        assert!(matches!(operand_image(), Err(Error::MissingOperandImage)));
    }

    #[test]
    fn deployment_enforces_restrictive_security_context() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        std::env::set_var(OPERAND_IMAGE_ENV, "example.com/image:test");

        let deployment = deployment_for(&dummy("my-dummy", "default")).expect("builds");
        std::env::remove_var(OPERAND_IMAGE_ENV);

        let spec = deployment.spec.expect("deployment spec");
        assert_eq!(spec.replicas, Some(MANAGED_REPLICAS));
        let pod_spec = spec.template.spec.expect("pod spec");
        let pod_security = pod_spec.security_context.expect("pod security context");
        assert_eq!(pod_security.run_as_non_root, Some(true));
        assert_eq!(
            pod_security.seccomp_profile.expect("seccomp profile").type_,
            "RuntimeDefault"
        );

        let container = &pod_spec.containers[0];
        assert_eq!(container.name, "dummy");
        assert_eq!(container.image.as_deref(), Some("example.com/image:test"));
        assert_eq!(container.image_pull_policy.as_deref(), Some("IfNotPresent"));
        let security = container.security_context.as_ref().expect("security context");
        assert_eq!(security.run_as_non_root, Some(true));
        assert_eq!(security.run_as_user, Some(1001));
        assert_eq!(security.allow_privilege_escalation, Some(false));
        assert_eq!(
            security.capabilities.as_ref().and_then(|c| c.drop.clone()),
            Some(vec!["ALL".to_owned()])
        );
    }

    #[test]
    fn deployment_is_owned_by_the_dummy() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        std::env::set_var(OPERAND_IMAGE_ENV, "example.com/image:test");

        let deployment = deployment_for(&dummy("my-dummy", "default")).expect("builds");
        std::env::remove_var(OPERAND_IMAGE_ENV);

        let owners = deployment
            .metadata
            .owner_references
            .expect("owner references");
        assert_eq!(owners.len(), 1);
        assert_eq!(owners[0].kind, "Dummy");
        assert_eq!(owners[0].name, "my-dummy");
        assert_eq!(owners[0].controller, Some(true));
    }
}
