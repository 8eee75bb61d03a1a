//! Proxy egress rotation.
//!
//! [`ProxyPool`] holds the process-wide list of egress proxies, parsed and
//! validated once at startup. Every provider construction draws from it
//! independently and uniformly at random: no round-robin state, no
//! affinity, no health tracking. A dead proxy degrades the requests that
//! drew it; the next draw is independent.

use std::fmt;
use std::sync::Arc;

use rand::Rng;

use crate::telemetry;
use crate::{HuginnError, Result};

/// A validated proxy URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProxyEndpoint(String);

impl ProxyEndpoint {
    /// Parse and validate a proxy URL (`http://`, `https://` or `socks5://`).
    pub fn parse(url: &str) -> Result<Self> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|e| HuginnError::Configuration(format!("invalid proxy url {url:?}: {e}")))?;
        if parsed.host_str().is_none() {
            return Err(HuginnError::Configuration(format!(
                "proxy url {url:?} has no host"
            )));
        }
        Ok(Self(url.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProxyEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fixed, read-only pool of egress proxies.
///
/// Cheap to clone; clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct ProxyPool {
    endpoints: Arc<[ProxyEndpoint]>,
}

impl ProxyPool {
    /// A pool with no proxies: every draw yields direct egress.
    pub fn direct() -> Self {
        Self::default()
    }

    /// Build a pool from proxy URLs, rejecting the whole list if any entry
    /// is invalid.
    pub fn new<I, S>(urls: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let endpoints = urls
            .into_iter()
            .map(|u| ProxyEndpoint::parse(u.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            endpoints: endpoints.into(),
        })
    }

    /// Build a pool from a JSON-encoded list of URLs, the format of the
    /// `HUGINN_PROXIES` environment variable.
    pub fn from_json(raw: &str) -> Result<Self> {
        let urls: Vec<String> = serde_json::from_str(raw).map_err(|e| {
            HuginnError::Configuration(format!("proxy list must be a JSON array of urls: {e}"))
        })?;
        Self::new(urls)
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn endpoints(&self) -> &[ProxyEndpoint] {
        &self.endpoints
    }

    /// Draw one proxy uniformly at random, or `None` for direct egress when
    /// the pool is empty.
    pub fn select(&self) -> Option<ProxyEndpoint> {
        if self.endpoints.is_empty() {
            metrics::counter!(telemetry::PROXY_SELECTIONS_TOTAL, "egress" => "direct").increment(1);
            return None;
        }
        let index = rand::rng().random_range(0..self.endpoints.len());
        metrics::counter!(telemetry::PROXY_SELECTIONS_TOTAL, "egress" => "proxied").increment(1);
        Some(self.endpoints[index].clone())
    }
}
