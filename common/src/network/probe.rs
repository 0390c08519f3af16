use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::config::Config;
use crate::error::CheckError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One HTTP request to send: which address to connect to and what virtual
/// host to ask it for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    pub addr: IpAddr,
    pub host: String,
    pub path: String,
    pub scheme: Scheme,
    pub port: u16,
}

impl ProbeRequest {
    pub fn new(addr: IpAddr, cfg: &Config) -> Self {
        Self {
            addr,
            host: cfg.host_header.clone(),
            path: cfg.path.clone(),
            scheme: cfg.scheme,
            port: cfg.effective_port(),
        }
    }

    /// Where the TCP connection goes.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.addr, self.port)
    }

    /// URL naming the resolved address directly, e.g. `http://[2001:db8::1]/healthz`.
    pub fn address_url(&self) -> String {
        self.url_for(&url_host(&self.addr.to_string()))
    }

    /// URL naming the virtual host, e.g. `https://svc.example/healthz`.
    ///
    /// Any port in the host header is left out; the connection port is always
    /// [`ProbeRequest::port`].
    pub fn host_url(&self) -> String {
        self.url_for(&url_host(self.host_name()))
    }

    /// The host header without its port and without IPv6 brackets.
    pub fn host_name(&self) -> &str {
        split_host_port(&self.host).0
    }

    /// `true` when the host header carries its own `:port`.
    pub fn host_has_port(&self) -> bool {
        split_host_port(&self.host).1.is_some()
    }

    /// `true` when the pinned host is itself an IP literal rather than a DNS name.
    pub fn host_is_literal(&self) -> bool {
        self.host_name().parse::<IpAddr>().is_ok()
    }

    fn url_for(&self, host: &str) -> String {
        if self.port == self.scheme.default_port() {
            format!("{}://{}{}", self.scheme, host, self.path)
        } else {
            format!("{}://{}:{}{}", self.scheme, host, self.port, self.path)
        }
    }
}

/// Splits `name:port`, `[v6]` and `[v6]:port`. A bare IPv6 literal has no port.
pub(crate) fn split_host_port(host: &str) -> (&str, Option<u16>) {
    if let Some(rest) = host.strip_prefix('[') {
        if let Some((inner, tail)) = rest.split_once(']') {
            let port = tail.strip_prefix(':').and_then(|p| p.parse().ok());
            return (inner, port);
        }
        return (host, None);
    }

    match host.rsplit_once(':') {
        Some((name, port)) if !name.contains(':') => match port.parse() {
            Ok(port) => (name, Some(port)),
            Err(_) => (host, None),
        },
        _ => (host, None),
    }
}

/// Brackets IPv6 literals so they can sit in the authority part of a URL.
fn url_host(host: &str) -> String {
    match host.parse::<IpAddr>() {
        Ok(IpAddr::V6(v6)) => format!("[{v6}]"),
        _ => host.to_string(),
    }
}

/// Status line of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub code: u16,
    pub reason: Option<String>,
}

impl Status {
    pub fn new(code: u16, reason: Option<&str>) -> Self {
        Self {
            code,
            reason: reason.map(str::to_string),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == 200
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            Some(reason) => write!(f, "{} {}", self.code, reason),
            None => write!(f, "{}", self.code),
        }
    }
}

/// Outcome of exactly one [`ProbeRequest`].
#[derive(Debug)]
pub struct ProbeResult {
    pub addr: IpAddr,
    pub outcome: Result<Status, CheckError>,
}

impl ProbeResult {
    pub fn status(&self) -> Option<&Status> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&CheckError> {
        self.outcome.as_ref().err()
    }
}
