//! Literal network endpoints
//!
//! IP addresses, hostnames and URLs found in records link to the standard
//! `ip`, `dns` and `http` types in the global scope.

use std::net::IpAddr;
use url::Url;

/// A literal endpoint as found in a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Ip(String),
    Host(String),
    Url(String),
}

/// An endpoint after validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    Ip(IpAddr),
    Host(String),
    Url { url: String, host: Option<String> },
}

impl Endpoint {
    /// Validate the literal. Unparseable values classify to nothing.
    pub fn classify(&self) -> Option<Classified> {
        match self {
            Self::Ip(raw) => raw.trim().parse::<IpAddr>().ok().map(Classified::Ip),
            Self::Host(raw) => classify_host(raw.trim()),
            Self::Url(raw) => {
                let raw = raw.trim();
                let parsed = Url::parse(raw).ok()?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return None;
                }
                let host = parsed.host_str().map(|h| h.trim_matches(|c: char| c == '[' || c == ']').to_string());
                Some(Classified::Url {
                    url: raw.to_string(),
                    host,
                })
            }
        }
    }
}

/// A hostname, or an IP literal written where a hostname was expected
pub fn classify_host(raw: &str) -> Option<Classified> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(ip) = raw.trim_matches(|c: char| c == '[' || c == ']').parse::<IpAddr>() {
        return Some(Classified::Ip(ip));
    }
    let host = raw.trim_end_matches('.');
    let valid = !host.is_empty()
        && host.len() <= 253
        && host
            .split('.')
            .all(|label| {
                !label.is_empty()
                    && label.len() <= 63
                    && label
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            });
    valid.then(|| Classified::Host(host.to_ascii_lowercase()))
}
