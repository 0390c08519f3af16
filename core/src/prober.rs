//! HTTP(S) probing of a single resolved address.
//!
//! Every probe builds its own client. The connection always goes to the
//! resolved address while the request itself is addressed to the virtual host:
//!
//! * For a DNS host name the client's resolution of that name is pinned to the
//!   address, so the `Host` header, the TLS server name and certificate
//!   verification all use the host name. A `:port` in the host header is
//!   kept in the `Host` header only.
//! * For an IP literal host the request goes to the address URL with the
//!   host header sent verbatim.

use std::time::Duration;

use checklb_common::error::CheckError;
use checklb_common::network::probe::{ProbeRequest, ProbeResult, Status};
use reqwest::header::{HOST, HeaderValue};
use reqwest::redirect::Policy;
use reqwest::{Client, Response, Url};
use tracing::debug;

/// Sends `request` and waits for the status line. Never fails: errors end up
/// in the returned [`ProbeResult`].
pub async fn probe(request: &ProbeRequest, timeout: Option<Duration>) -> ProbeResult {
    let outcome = execute(request, timeout).await;
    match &outcome {
        Ok(status) => debug!(addr = %request.addr, %status, "probe finished"),
        Err(e) => debug!(addr = %request.addr, error = %e.chain(), "probe failed"),
    }
    ProbeResult {
        addr: request.addr,
        outcome,
    }
}

async fn execute(request: &ProbeRequest, timeout: Option<Duration>) -> Result<Status, CheckError> {
    let addr = request.addr;
    let prepared = prepare(request, timeout)?;

    let mut builder = prepared.client.get(prepared.url);
    if prepared.explicit_host {
        let host = HeaderValue::from_str(&request.host)
            .map_err(|e| CheckError::request_build(addr, e))?;
        builder = builder.header(HOST, host);
    }

    let mut response = builder
        .send()
        .await
        .map_err(|e| CheckError::request_execution(addr, e))?;

    let status = response.status();
    drain(&mut response, request).await;

    Ok(Status::new(status.as_u16(), status.canonical_reason()))
}

struct Prepared {
    client: Client,
    url: Url,
    /// Send the host header verbatim instead of letting the client derive it
    /// from the URL.
    explicit_host: bool,
}

fn prepare(request: &ProbeRequest, timeout: Option<Duration>) -> Result<Prepared, CheckError> {
    let addr = request.addr;
    let mut builder = Client::builder().no_proxy().redirect(Policy::none());

    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    let (url, explicit_host) = match pinned_url(request)? {
        Some((url, domain)) => {
            // Keyed on the parsed domain, which is what the client looks up.
            builder = builder.resolve(&domain, request.socket_addr());
            (url, request.host_has_port())
        }
        None => (parse_url(request, &request.address_url())?, true),
    };

    let client = builder
        .build()
        .map_err(|e| CheckError::request_build(addr, e))?;

    Ok(Prepared {
        client,
        url,
        explicit_host,
    })
}

/// The virtual host URL and its normalized domain, or `None` when the host is
/// not a domain name once parsed and the address URL has to be used instead.
fn pinned_url(request: &ProbeRequest) -> Result<Option<(Url, String)>, CheckError> {
    if request.host_is_literal() {
        return Ok(None);
    }

    let url = parse_url(request, &request.host_url())?;
    let domain = match url.domain() {
        Some(domain) => domain.to_string(),
        None => return Ok(None),
    };
    Ok(Some((url, domain)))
}

fn parse_url(request: &ProbeRequest, url: &str) -> Result<Url, CheckError> {
    Url::parse(url).map_err(|e| CheckError::request_build(request.addr, e))
}

/// Reads the body to the end so the connection is released cleanly.
async fn drain(response: &mut Response, request: &ProbeRequest) {
    loop {
        match response.chunk().await {
            Ok(Some(_)) => {}
            Ok(None) => break,
            Err(e) => {
                debug!(addr = %request.addr, error = %e, "body read interrupted");
                break;
            }
        }
    }
}
