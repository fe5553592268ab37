use codewind_sidecar_k8s_api::{labels::Map, Selector};
use std::fmt;

/// Label key naming the component a resource belongs to.
pub const APP_LABEL: &str = "app";

/// Label key carrying the Che workspace ID on every resource Codewind creates.
pub const WORKSPACE_LABEL: &str = "codewindWorkspace";

/// Name prefix of the claim backing the PFE container storage.
pub const PFE_PVC_PREFIX: &str = "codewind-pfe-pvc";

/// One of the two workloads deployed for a workspace.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Component {
    /// The Codewind process front end (PFE).
    Pfe,
    /// The performance dashboard that accompanies PFE.
    Performance,
}

// === impl Component ===

impl Component {
    pub const ALL: [Self; 2] = [Self::Pfe, Self::Performance];

    /// The prefix of every resource name for this component.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Pfe => "codewind",
            Self::Performance => "codewind-performance",
        }
    }

    /// The value of the `app` label.
    pub fn app(self) -> &'static str {
        match self {
            Self::Pfe => "codewind-pfe",
            Self::Performance => "codewind-performance",
        }
    }

    pub fn port(self) -> u16 {
        match self {
            Self::Pfe => 9191,
            Self::Performance => 9095,
        }
    }

    /// The deployment, service and container name for the given workspace.
    pub fn name(self, workspace_id: &str) -> String {
        format!("{}-{}", self.prefix(), workspace_id)
    }

    pub fn labels(self, workspace_id: &str) -> Map {
        [
            (APP_LABEL.to_string(), self.app().to_string()),
            (WORKSPACE_LABEL.to_string(), workspace_id.to_string()),
        ]
        .into_iter()
        .collect()
    }

    /// Selects exactly the objects labeled by [`Component::labels`].
    pub fn selector(self, workspace_id: &str) -> Selector {
        Selector::from_map(self.labels(workspace_id))
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.app())
    }
}
