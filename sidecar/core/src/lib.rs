#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod component;
mod identity;
mod images;
mod ingress;
mod platform;

pub use self::{
    component::{Component, APP_LABEL, PFE_PVC_PREFIX, WORKSPACE_LABEL},
    identity::{OwnerRef, WorkspaceIdentity},
    images::{Images, DEFAULT_PERFORMANCE_IMAGE, DEFAULT_PFE_IMAGE, DEFAULT_TAG},
    ingress::{derive_ingress_host, IngressHostError},
    platform::{ClusterInfo, Platform, ROUTE_API_GROUP},
};
