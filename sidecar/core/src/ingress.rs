use url::{Host, Url};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IngressHostError {
    #[error("Che API URL was not set")]
    Empty,

    #[error("unable to parse the Che API URL {url:?}: {source}")]
    Parse {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Che API URL {0:?} has no hostname")]
    NoHost(String),
}

/// Extracts the hostname from the Che API URL, e.g. `che.example.com` from
/// `https://che.example.com/api`.
///
/// The scheme, port and path are dropped, and domain names are lowercased
/// with internationalized names converted to punycode. The hostname becomes
/// the external name of PFE, so anything that does not yield one is an error.
pub fn derive_ingress_host(api_url: &str) -> Result<String, IngressHostError> {
    if api_url.is_empty() {
        return Err(IngressHostError::Empty);
    }

    let url = Url::parse(api_url).map_err(|source| IngressHostError::Parse {
        url: api_url.to_string(),
        source,
    })?;

    let host = match url.host() {
        Some(Host::Domain(domain)) => domain.to_string(),
        Some(Host::Ipv4(addr)) => addr.to_string(),
        Some(Host::Ipv6(addr)) => addr.to_string(),
        None => String::new(),
    };
    if host.is_empty() {
        return Err(IngressHostError::NoHost(api_url.to_string()));
    }

    Ok(host)
}
