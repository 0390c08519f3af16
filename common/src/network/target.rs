//! # Probe Target Model
//!
//! A target is what the user typed on the command line:
//! * A literal IPv4 or IPv6 address (`203.0.113.5`, `2001:db8::1`, `[2001:db8::1]`).
//! * A DNS name that still has to be resolved (`backend-1.internal`).

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use crate::error::TargetParseError;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    /// Already an address, resolves to itself.
    Addr(IpAddr),
    /// Needs a DNS lookup.
    Name(String),
}

impl FromStr for Target {
    type Err = TargetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TargetParseError::Empty);
        }

        if let Some(addr) = parse_host(s) {
            return Ok(Target::Addr(addr));
        }

        if is_valid_hostname(s) {
            return Ok(Target::Name(s.to_string()));
        }

        Err(TargetParseError::Invalid(s.to_string()))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Addr(addr) => write!(f, "{addr}"),
            Target::Name(name) => f.write_str(name),
        }
    }
}

/// Parses a bare or bracketed IP literal.
fn parse_host(s: &str) -> Option<IpAddr> {
    let unbracketed = s
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(s);
    unbracketed.parse::<IpAddr>().ok()
}

/// Loose hostname check: dot separated labels of letters, digits, `-` and `_`,
/// with an optional trailing dot.
fn is_valid_hostname(s: &str) -> bool {
    let s = s.strip_suffix('.').unwrap_or(s);
    if s.is_empty() || s.len() > 253 {
        return false;
    }

    s.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    })
}
