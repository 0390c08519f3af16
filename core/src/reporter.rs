use std::net::IpAddr;

use checklb_common::error::CheckError;
use checklb_common::network::probe::ProbeResult;

/// Sink for everything a run produces, in the order it happens.
///
/// Implementations only render; they cannot influence the pipeline.
pub trait Reporter {
    /// Called once, after every target has been resolved.
    fn resolved(&mut self, _addrs: &[IpAddr]) {}

    /// Called for every target whose resolution failed.
    fn resolution_failed(&mut self, _error: &CheckError) {}

    /// Called once per probe, in completion order.
    fn report(&mut self, result: ProbeResult);
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn resolved(&mut self, addrs: &[IpAddr]) {
        (**self).resolved(addrs)
    }

    fn resolution_failed(&mut self, error: &CheckError) {
        (**self).resolution_failed(error)
    }

    fn report(&mut self, result: ProbeResult) {
        (**self).report(result)
    }
}

/// Keeps every result in arrival order.
impl Reporter for Vec<ProbeResult> {
    fn report(&mut self, result: ProbeResult) {
        self.push(result);
    }
}
