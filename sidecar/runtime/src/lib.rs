#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub use codewind_sidecar_core as core;
pub use codewind_sidecar_k8s_api as k8s;
pub use codewind_sidecar_k8s_topology as topology;

mod args;
pub mod cluster;
pub mod detect;
pub mod provision;
pub mod redeploy;
pub mod resolve;
pub mod service;


pub use self::{
    args::Args,
    cluster::{Cluster, KubeCluster, Namespaced, ResourceSink},
};
