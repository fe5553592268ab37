use std::fmt;

/// The API group served only by clusters that expose services through Routes.
pub const ROUTE_API_GROUP: &str = "route.openshift.io";

/// Determines which kind of object exposes PFE outside the cluster.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Platform {
    /// An OpenShift 3.x cluster, exposed through a `Route`.
    Legacy,
    /// Any other cluster, exposed through an `Ingress`.
    Standard,
}

/// What was learned about the cluster before assembling resources.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClusterInfo {
    pub platform: Platform,

    /// Storage class for the PFE claim. `None` uses the cluster default.
    pub storage_class: Option<String>,
}

// === impl Platform ===

impl Platform {
    pub fn from_api_groups<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if groups.into_iter().any(|g| g.as_ref() == ROUTE_API_GROUP) {
            Self::Legacy
        } else {
            Self::Standard
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => f.write_str("legacy"),
            Self::Standard => f.write_str("standard"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_group_means_legacy() {
        let groups = ["apps", "route.openshift.io", "networking.k8s.io"];
        assert_eq!(Platform::from_api_groups(groups), Platform::Legacy);
    }

    #[test]
    fn otherwise_standard() {
        let groups = vec!["apps".to_string(), "networking.k8s.io".to_string()];
        assert_eq!(Platform::from_api_groups(&groups), Platform::Standard);
        assert_eq!(
            Platform::from_api_groups(Vec::<String>::new()),
            Platform::Standard
        );
        // Only an exact group name counts.
        assert_eq!(
            Platform::from_api_groups(["route.openshift.io.example.com"]),
            Platform::Standard
        );
    }
}
