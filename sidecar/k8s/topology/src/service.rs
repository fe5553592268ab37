use crate::metadata::object_meta;
use codewind_sidecar_core::{Component, WorkspaceIdentity};
use codewind_sidecar_k8s_api::{Service, ServicePort, ServiceSpec};

/// Returns the service exposing the component's port, selecting the pods of
/// the component's deployment.
pub fn service(component: Component, identity: &WorkspaceIdentity) -> Service {
    let labels = identity.labels(component);
    Service {
        metadata: object_meta(identity, identity.name(component), labels.clone()),
        spec: Some(ServiceSpec {
            ports: Some(vec![ServicePort {
                name: Some(format!("{}-http", component.prefix())),
                port: component.port().into(),
                ..Default::default()
            }]),
            selector: Some(labels),
            ..Default::default()
        }),
        ..Default::default()
    }
}
