use std::net::IpAddr;
use std::time::Duration;

use checklb_common::config::Config;
use checklb_common::error::CheckError;
use checklb_common::network::probe::ProbeResult;
use checklb_core::pipeline::Summary;
use checklb_core::reporter::Reporter;
use colored::*;
use tracing::{error, info, warn};

use crate::terminal::format;

/// Writes probe lines to stdout as they arrive; failures go to the log on stderr.
pub struct TerminalReporter;

impl Reporter for TerminalReporter {
    fn resolved(&mut self, addrs: &[IpAddr]) {
        if addrs.is_empty() {
            warn!("No addresses left to probe");
        } else {
            info!("Probing {} address(es)", addrs.len());
        }
    }

    fn resolution_failed(&mut self, error: &CheckError) {
        error!("{}", error.chain());
    }

    fn report(&mut self, result: ProbeResult) {
        if let Some(line) = format::render(&result) {
            println!("{line}");
        } else if let Some(e) = result.error() {
            error!("{}", e.chain());
        }
    }
}

pub fn starting(cfg: &Config, target_count: usize) {
    let targets = match target_count {
        0 => cfg.host_header.bold().to_string(),
        n => format!("{} target(s)", n.to_string().bold()),
    };
    info!(
        "Checking {} on {} via {}",
        cfg.host_header.green(),
        targets,
        format!("{}:{}", cfg.scheme, cfg.effective_port()).yellow()
    );
}

pub fn summary(summary: &Summary, elapsed: Duration) {
    let total_time: ColoredString = format!("{:.2}s", elapsed.as_secs_f64()).bold().yellow();
    let responses: ColoredString = format!("{} response(s)", summary.responses).bold().green();

    info!(
        "Done: {responses} from {} address(es) in {total_time}, {} not 200",
        summary.resolved, summary.non_ok
    );

    let failures = summary.resolution_failures + summary.probe_failures;
    if failures > 0 {
        warn!(
            "{} failure(s): {} target(s) did not resolve, {} probe(s) failed",
            failures.to_string().red().bold(),
            summary.resolution_failures,
            summary.probe_failures
        );
    }
}
