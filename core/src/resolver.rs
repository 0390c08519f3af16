//! Target resolution.
//!
//! Literal addresses pass straight through. Names go to a [`Lookup`], which by
//! default is the operating system resolver ([`SystemLookup`]).

use std::io;
use std::net::IpAddr;

use async_trait::async_trait;
use checklb_common::error::CheckError;
use checklb_common::network::target::Target;
use tracing::debug;

/// Name-to-address lookup used for [`Target::Name`].
#[async_trait]
pub trait Lookup: Send + Sync {
    /// Returns every address the name maps to, in whatever order the
    /// underlying mechanism produces them.
    async fn lookup(&self, name: &str) -> io::Result<Vec<IpAddr>>;
}

/// Looks names up through the platform resolver (`getaddrinfo` and friends).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLookup;

#[async_trait]
impl Lookup for SystemLookup {
    async fn lookup(&self, name: &str) -> io::Result<Vec<IpAddr>> {
        let addrs = tokio::net::lookup_host((name, 0)).await?;
        Ok(addrs.map(|socket_addr| socket_addr.ip()).collect())
    }
}

/// Resolves one target to the addresses it denotes.
///
/// A successful lookup with no addresses counts as a failure.
pub async fn resolve(target: &Target, lookup: &dyn Lookup) -> Result<Vec<IpAddr>, CheckError> {
    let name = match target {
        Target::Addr(addr) => return Ok(vec![*addr]),
        Target::Name(name) => name,
    };

    debug!(name = %name, "looking up");
    let addrs = lookup
        .lookup(name)
        .await
        .map_err(|source| CheckError::Resolution {
            target: name.clone(),
            source,
        })?;

    if addrs.is_empty() {
        return Err(CheckError::Resolution {
            target: name.clone(),
            source: io::Error::new(io::ErrorKind::NotFound, "no addresses returned"),
        });
    }

    debug!(name = %name, count = addrs.len(), "resolved");
    Ok(addrs)
}
