use crate::component::Component;

pub const DEFAULT_PFE_IMAGE: &str = "eclipse/codewind-pfe-amd64";
pub const DEFAULT_PERFORMANCE_IMAGE: &str = "eclipse/codewind-performance-amd64";
pub const DEFAULT_TAG: &str = "latest";

/// Container image references for both Codewind components.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Images {
    pub pfe: String,
    pub performance: String,
}

// === impl Images ===

impl Images {
    /// Builds `image:tag` references, substituting the defaults for any blank
    /// image or tag.
    pub fn new(
        pfe_image: &str,
        pfe_tag: &str,
        performance_image: &str,
        performance_tag: &str,
    ) -> Self {
        Self {
            pfe: reference(pfe_image, DEFAULT_PFE_IMAGE, pfe_tag),
            performance: reference(
                performance_image,
                DEFAULT_PERFORMANCE_IMAGE,
                performance_tag,
            ),
        }
    }

    pub fn get(&self, component: Component) -> &str {
        match component {
            Component::Pfe => &self.pfe,
            Component::Performance => &self.performance,
        }
    }
}

impl Default for Images {
    fn default() -> Self {
        Self::new(
            DEFAULT_PFE_IMAGE,
            DEFAULT_TAG,
            DEFAULT_PERFORMANCE_IMAGE,
            DEFAULT_TAG,
        )
    }
}

fn reference(image: &str, default_image: &str, tag: &str) -> String {
    let image = match image.trim() {
        "" => default_image,
        image => image,
    };
    let tag = match tag.trim() {
        "" => DEFAULT_TAG,
        tag => tag,
    };
    format!("{image}:{tag}")
}
