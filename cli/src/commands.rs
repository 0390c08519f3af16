use std::num::NonZeroUsize;
use std::time::Duration;

use checklb_common::config::Config;
use checklb_common::network::probe::Scheme;
use checklb_common::network::target::Target;
use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
#[command(name = "checklb", version)]
#[command(about = "Send an HTTP request to a number of targets.")]
#[command(long_about = "Send an HTTP request to a number of targets.

A target can be an IP address or a domain name. Domain names are resolved and \
every address they point to is probed. If no target is given, the host header \
itself is resolved and used as target.

Every request carries the given host header, and for HTTPS the same name is \
sent as TLS server name, so each backend behind a load balancer can be checked \
for the virtual host it is supposed to serve.")]
pub struct CommandLine {
    /// Value for the Host header and TLS server name
    pub host_header: String,

    /// IP addresses or domain names to send the request to
    pub targets: Vec<Target>,

    /// Send HTTPS requests instead of plain HTTP
    #[arg(long)]
    pub https: bool,

    /// Path to request
    #[arg(long, default_value = "/")]
    pub path: String,

    /// Connect to this port instead of 80/443
    #[arg(long)]
    pub port: Option<u16>,

    /// Give up on a probe after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Maximum number of lookups and requests in flight at once
    #[arg(long, value_name = "N")]
    pub concurrency: Option<NonZeroUsize>,

    /// Show more log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn scheme(&self) -> Scheme {
        if self.https { Scheme::Https } else { Scheme::Http }
    }

    pub fn config(&self) -> Config {
        Config::new(self.host_header.as_str())
            .with_scheme(self.scheme())
            .with_path(&self.path)
            .with_port(self.port)
            .with_timeout(self.timeout.map(Duration::from_secs))
            .with_concurrency(self.concurrency)
    }
}
