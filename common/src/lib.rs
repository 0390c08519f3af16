//! Shared data model for `checklb`.
//!
//! Everything here is plain data: parsed targets, probe requests and results,
//! the run configuration and the error taxonomy. The pipeline itself lives in
//! `checklb-core`.

pub mod config;
pub mod error;
pub mod network;
