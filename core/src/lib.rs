//! The probing engine behind `checklb`.
//!
//! A run is two fan-out stages joined by a barrier:
//!
//! 1. [`resolver`] turns every target into addresses, one task per target.
//! 2. [`prober`] sends one HTTP(S) request per address, one task per address,
//!    with the `Host` header and TLS server name pinned to the virtual host.
//!
//! [`pipeline::Pipeline`] wires the stages together and streams each
//! [`ProbeResult`](checklb_common::network::probe::ProbeResult) into a
//! [`reporter::Reporter`] as soon as it is available.

pub mod pipeline;
pub mod prober;
pub mod reporter;
pub mod resolver;
