//! The resolve-then-probe pipeline.
//!
//! Both stages fan out one tokio task per item. The resolution stage is a
//! barrier: probing only starts once every target has been resolved (or has
//! failed). Probe results are pushed through an mpsc channel and handed to the
//! [`Reporter`] while the remaining probes are still in flight.
//!
//! Failures never abort the run. They are reported alongside the successful
//! results and counted in the returned [`Summary`].

use std::io;
use std::net::IpAddr;
use std::sync::Arc;

use checklb_common::config::Config;
use checklb_common::error::CheckError;
use checklb_common::network::probe::{ProbeRequest, ProbeResult};
use checklb_common::network::target::Target;
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore, mpsc};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::prober;
use crate::reporter::Reporter;
use crate::resolver::{self, Lookup, SystemLookup};

/// Counters describing how a run went.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub targets: usize,
    pub resolved: usize,
    /// Probes that got an HTTP response, whatever the status.
    pub responses: usize,
    /// Responses whose status was not `200`.
    pub non_ok: usize,
    pub resolution_failures: usize,
    pub probe_failures: usize,
}

impl Summary {
    /// `true` when every target resolved and every probe got a response.
    ///
    /// Non-200 statuses do not count against success.
    pub fn is_success(&self) -> bool {
        self.resolution_failures == 0 && self.probe_failures == 0
    }

    fn record(&mut self, result: &ProbeResult) {
        match result.status() {
            Some(status) => {
                self.responses += 1;
                if !status.is_ok() {
                    self.non_ok += 1;
                }
            }
            None => self.probe_failures += 1,
        }
    }
}

pub struct Pipeline {
    cfg: Arc<Config>,
    lookup: Arc<dyn Lookup>,
    limiter: Option<Arc<Semaphore>>,
}

impl Pipeline {
    pub fn new(cfg: Config) -> Self {
        let limiter = cfg
            .concurrency
            .map(|limit| Arc::new(Semaphore::new(limit.get())));
        Self {
            cfg: Arc::new(cfg),
            lookup: Arc::new(SystemLookup),
            limiter,
        }
    }

    /// Replaces the system resolver used for DNS names.
    pub fn with_lookup(mut self, lookup: impl Lookup + 'static) -> Self {
        self.lookup = Arc::new(lookup);
        self
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Resolves `targets`, probes every resulting address and streams each
    /// result into `reporter`.
    ///
    /// With no targets the host header itself is resolved.
    pub async fn run<R: Reporter>(&self, targets: Vec<Target>, mut reporter: R) -> Summary {
        let targets = if targets.is_empty() {
            vec![self.host_as_target()]
        } else {
            targets
        };

        let mut summary = Summary {
            targets: targets.len(),
            ..Summary::default()
        };

        let (addrs, failures) = self.resolve_all(targets).await;
        summary.resolved = addrs.len();
        summary.resolution_failures = failures.len();
        for failure in &failures {
            reporter.resolution_failed(failure);
        }
        reporter.resolved(&addrs);
        info!(
            "{} address(es) to probe, {} target(s) failed to resolve",
            addrs.len(),
            failures.len()
        );

        self.probe_all(addrs, &mut reporter, &mut summary).await;
        summary
    }

    fn host_as_target(&self) -> Target {
        let name = self.cfg.host_name();
        name.parse().unwrap_or_else(|_| Target::Name(name.to_string()))
    }

    async fn resolve_all(&self, targets: Vec<Target>) -> (Vec<IpAddr>, Vec<CheckError>) {
        let resolved: Arc<Mutex<Vec<IpAddr>>> = Arc::new(Mutex::new(Vec::new()));
        let mut handles: Vec<(Target, JoinHandle<Result<(), CheckError>>)> =
            Vec::with_capacity(targets.len());

        for target in targets {
            let lookup = Arc::clone(&self.lookup);
            let resolved = Arc::clone(&resolved);
            let limiter = self.limiter.clone();
            let task_target = target.clone();

            let handle = tokio::spawn(async move {
                let _permit = acquire(limiter).await;
                let addrs = resolver::resolve(&task_target, lookup.as_ref()).await?;
                resolved.lock().await.extend(addrs);
                Ok(())
            });
            handles.push((target, handle));
        }

        let mut failures = Vec::new();
        for (target, handle) in handles {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => failures.push(e),
                Err(join_error) => {
                    error!("Resolution task for {target} died: {join_error}");
                    failures.push(CheckError::Resolution {
                        target: target.to_string(),
                        source: io::Error::other(join_error.to_string()),
                    });
                }
            }
        }

        let addrs = std::mem::take(&mut *resolved.lock().await);
        (addrs, failures)
    }

    async fn probe_all<R: Reporter>(
        &self,
        addrs: Vec<IpAddr>,
        reporter: &mut R,
        summary: &mut Summary,
    ) {
        let (tx, mut rx) = mpsc::unbounded_channel::<ProbeResult>();
        let mut handles: Vec<(IpAddr, JoinHandle<()>)> = Vec::with_capacity(addrs.len());

        for addr in addrs {
            let request = ProbeRequest::new(addr, &self.cfg);
            let timeout = self.cfg.timeout;
            let limiter = self.limiter.clone();
            let tx = tx.clone();

            let handle = tokio::spawn(async move {
                let _permit = acquire(limiter).await;
                let result = prober::probe(&request, timeout).await;
                // The receiver only goes away once every sender is gone.
                let _ = tx.send(result);
            });
            handles.push((addr, handle));
        }
        drop(tx);

        // Closes once the last probe task drops its sender.
        while let Some(result) = rx.recv().await {
            summary.record(&result);
            reporter.report(result);
        }

        for (addr, handle) in handles {
            if let Err(join_error) = handle.await {
                error!("Probe task for {addr} died: {join_error}");
                let result = ProbeResult {
                    addr,
                    outcome: Err(CheckError::request_execution(addr, join_error.to_string())),
                };
                summary.record(&result);
                reporter.report(result);
            }
        }
    }
}

async fn acquire(limiter: Option<Arc<Semaphore>>) -> Option<OwnedSemaphorePermit> {
    match limiter {
        Some(semaphore) => semaphore.acquire_owned().await.ok(),
        None => None,
    }
}
