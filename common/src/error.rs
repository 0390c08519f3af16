use std::error::Error as StdError;
use std::net::IpAddr;

use thiserror::Error;

pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Failures that can happen while checking a set of targets.
#[derive(Debug, Error)]
pub enum CheckError {
    /// DNS lookup for a target failed or came back empty.
    #[error("failed to resolve {target}")]
    Resolution {
        target: String,
        #[source]
        source: std::io::Error,
    },
    /// The URL or the HTTP client could not be put together.
    #[error("failed to prepare HTTP request for {addr}")]
    RequestBuild {
        addr: IpAddr,
        #[source]
        source: BoxError,
    },
    /// Connection, TLS or transport failure during the exchange.
    #[error("HTTP request to {addr} failed")]
    RequestExecution {
        addr: IpAddr,
        #[source]
        source: BoxError,
    },
}

impl CheckError {
    pub fn request_build(addr: IpAddr, source: impl Into<BoxError>) -> Self {
        Self::RequestBuild {
            addr,
            source: source.into(),
        }
    }

    pub fn request_execution(addr: IpAddr, source: impl Into<BoxError>) -> Self {
        Self::RequestExecution {
            addr,
            source: source.into(),
        }
    }

    /// Renders the error followed by its whole source chain, one cause per `: `.
    pub fn chain(&self) -> String {
        let mut out = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            out.push_str(": ");
            out.push_str(&cause.to_string());
            source = cause.source();
        }
        out
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetParseError {
    #[error("target must not be empty")]
    Empty,
    #[error("invalid target: {0}")]
    Invalid(String),
}
