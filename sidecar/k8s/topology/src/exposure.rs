use crate::metadata::object_meta;
use codewind_sidecar_core::{Component, Platform, WorkspaceIdentity};
use codewind_sidecar_k8s_api::{
    route::{
        InsecureEdgeTerminationPolicy, RoutePort, RouteSpec, RouteTargetReference, TlsConfig,
        TlsTermination,
    },
    HTTPIngressPath, HTTPIngressRuleValue, Ingress, IngressBackend, IngressRule,
    IngressServiceBackend, IngressSpec, IntOrString, ObjectMeta, Route, ServiceBackendPort,
};

/// The object that makes PFE reachable from outside the cluster.
#[derive(Clone, Debug, PartialEq)]
pub enum Exposure {
    Ingress(Ingress),
    Route(Route),
}

// === impl Exposure ===

impl Exposure {
    pub fn metadata(&self) -> &ObjectMeta {
        match self {
            Self::Ingress(ingress) => &ingress.metadata,
            Self::Route(route) => &route.metadata,
        }
    }

    /// The external hostname the object routes.
    #[cfg(test)]
    pub(crate) fn host(&self) -> Option<&str> {
        match self {
            Self::Ingress(ingress) => ingress
                .spec
                .as_ref()?
                .rules
                .as_ref()?
                .first()?
                .host
                .as_deref(),
            Self::Route(route) => route.spec.host.as_deref(),
        }
    }
}

/// Exposes PFE with a Route on legacy clusters and an Ingress otherwise.
pub fn exposure(identity: &WorkspaceIdentity, platform: Platform) -> Exposure {
    match platform {
        Platform::Legacy => Exposure::Route(route(identity)),
        Platform::Standard => Exposure::Ingress(ingress(identity)),
    }
}

pub fn ingress(identity: &WorkspaceIdentity) -> Ingress {
    let name = identity.name(Component::Pfe);
    let mut metadata = object_meta(identity, name.clone(), identity.labels(Component::Pfe));
    metadata.annotations = Some(
        [
            ("nginx.ingress.kubernetes.io/rewrite-target", "/"),
            ("nginx.ingress.kubernetes.io/backend-protocol", "HTTPS"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect(),
    );

    Ingress {
        metadata,
        spec: Some(IngressSpec {
            rules: Some(vec![IngressRule {
                host: Some(identity.ingress_host.clone()),
                http: Some(HTTPIngressRuleValue {
                    paths: vec![HTTPIngressPath {
                        path: Some("/".to_string()),
                        path_type: "ImplementationSpecific".to_string(),
                        backend: IngressBackend {
                            service: Some(IngressServiceBackend {
                                name,
                                port: Some(ServiceBackendPort {
                                    number: Some(Component::Pfe.port().into()),
                                    ..Default::default()
                                }),
                            }),
                            ..Default::default()
                        },
                    }],
                }),
            }]),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// PFE terminates TLS itself, so the route passes TLS through and redirects
/// plain HTTP.
pub fn route(identity: &WorkspaceIdentity) -> Route {
    let name = identity.name(Component::Pfe);
    Route {
        metadata: object_meta(identity, name.clone(), identity.labels(Component::Pfe)),
        spec: RouteSpec {
            host: Some(identity.ingress_host.clone()),
            port: Some(RoutePort {
                target_port: IntOrString::Int(Component::Pfe.port().into()),
            }),
            tls: Some(TlsConfig {
                termination: TlsTermination::Passthrough,
                insecure_edge_termination_policy: Some(InsecureEdgeTerminationPolicy::Redirect),
            }),
            to: RouteTargetReference {
                kind: "Service".to_string(),
                name,
                weight: Some(100),
            },
        },
    }
}
