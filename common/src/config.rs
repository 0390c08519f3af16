use std::num::NonZeroUsize;
use std::time::Duration;

use crate::network::probe::{Scheme, split_host_port};

/// Settings for a single run, built once by the frontend from its arguments.
#[derive(Debug, Clone)]
pub struct Config {
    /// Value pinned as the `Host` header and, for HTTPS, as the TLS server name.
    pub host_header: String,
    pub scheme: Scheme,
    /// Request path, always starting with `/`.
    pub path: String,
    /// Overrides the scheme's default port.
    pub port: Option<u16>,
    /// Per-probe timeout. `None` leaves the HTTP client defaults in place.
    pub timeout: Option<Duration>,
    /// Upper bound on in-flight resolution and probe tasks.
    ///
    /// `None` spawns one task per item with no cap.
    pub concurrency: Option<NonZeroUsize>,
}

impl Config {
    pub fn new(host_header: impl Into<String>) -> Self {
        Self {
            host_header: host_header.into(),
            scheme: Scheme::default(),
            path: String::from("/"),
            port: None,
            timeout: None,
            concurrency: None,
        }
    }

    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.path = normalize_path(path);
        self
    }

    pub fn with_port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_concurrency(mut self, concurrency: Option<NonZeroUsize>) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// The host header without any `:port` or IPv6 brackets.
    pub fn host_name(&self) -> &str {
        split_host_port(&self.host_header).0
    }

    /// Port the probes connect to.
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.scheme.default_port())
    }
}

/// Makes sure the path is absolute, so `healthz` and `/healthz` mean the same.
pub fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
