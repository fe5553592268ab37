use std::{collections::BTreeMap, fmt};

pub type Map = BTreeMap<String, String>;

/// Selects objects whose labels contain every key/value pair of the selector.
///
/// The same selector is rendered into `labelSelector` query strings when
/// listing resources and evaluated in-process against label maps, so that the
/// labels written on an object and the selector used to find it again are
/// produced from one value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selector {
    match_labels: Map,
}

// === Selector ===

impl Selector {
    pub fn from_map(match_labels: Map) -> Self {
        Self { match_labels }
    }

    pub fn matches(&self, labels: &Map) -> bool {
        for (k, v) in self.match_labels.iter() {
            if labels.get(k) != Some(v) {
                return false;
            }
        }

        true
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        for (k, v) in self.match_labels.iter() {
            write!(f, "{sep}{k}={v}")?;
            sep = ",";
        }
        Ok(())
    }
}

impl std::iter::FromIterator<(String, String)> for Selector {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self::from_map(iter.into_iter().collect())
    }
}

impl<'a> std::iter::FromIterator<(&'a str, &'a str)> for Selector {
    fn from_iter<T: IntoIterator<Item = (&'a str, &'a str)>>(iter: T) -> Self {
        Self::from_map(
            iter.into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}
