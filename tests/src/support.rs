use std::collections::HashMap;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use async_trait::async_trait;
use checklb_core::resolver::Lookup;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

pub const BACKEND_A: IpAddr = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1));
pub const BACKEND_B: IpAddr = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 2));

/// A request as seen by [`Backends`].
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub local_ip: IpAddr,
    pub request_line: String,
    pub host: Option<String>,
}

/// Minimal HTTP/1.1 server listening on every loopback address of one port.
///
/// The status it answers with depends on which local address the client
/// connected to, which lets one listener stand in for several backends.
pub struct Backends {
    pub port: u16,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl Backends {
    pub async fn start(statuses: &[(IpAddr, &'static str)]) -> anyhow::Result<Self> {
        Self::start_on(IpAddr::V4(Ipv4Addr::UNSPECIFIED), statuses).await
    }

    /// Listens on `bind` only, so connections to any other address are refused.
    pub async fn start_on(bind: IpAddr, statuses: &[(IpAddr, &'static str)]) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(SocketAddr::new(bind, 0)).await?;
        let port = listener.local_addr()?.port();
        let seen: Arc<Mutex<Vec<SeenRequest>>> = Arc::new(Mutex::new(Vec::new()));
        let statuses: Arc<HashMap<IpAddr, &'static str>> =
            Arc::new(statuses.iter().copied().collect());

        let seen_ref = Arc::clone(&seen);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let seen = Arc::clone(&seen_ref);
                let statuses = Arc::clone(&statuses);
                tokio::spawn(async move {
                    let _ = serve(stream, &statuses, &seen).await;
                });
            }
        });

        Ok(Self { port, seen })
    }

    pub async fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().await.clone()
    }
}

async fn serve(
    mut stream: TcpStream,
    statuses: &HashMap<IpAddr, &'static str>,
    seen: &Mutex<Vec<SeenRequest>>,
) -> anyhow::Result<()> {
    let local_ip = stream.local_addr()?.ip();
    let head = read_head(&mut stream).await?;

    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default().to_string();
    let host = lines.find_map(|line| {
        let (name, value) = line.split_once(':')?;
        name.eq_ignore_ascii_case("host")
            .then(|| value.trim().to_string())
    });
    seen.lock().await.push(SeenRequest {
        local_ip,
        request_line,
        host,
    });

    let status = statuses.get(&local_ip).copied().unwrap_or("200 OK");
    let body = "hello from the backend\n";
    let response = format!(
        "HTTP/1.1 {status}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await?;
    Ok(())
}

async fn read_head(stream: &mut TcpStream) -> io::Result<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Port nothing listens on.
pub async fn closed_port() -> anyhow::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    Ok(listener.local_addr()?.port())
}

/// In-memory DNS.
#[derive(Default, Clone)]
pub struct StaticLookup {
    records: HashMap<String, Vec<IpAddr>>,
}

impl StaticLookup {
    pub fn with(mut self, name: &str, addrs: &[IpAddr]) -> Self {
        self.records.insert(name.to_string(), addrs.to_vec());
        self
    }
}

#[async_trait]
impl Lookup for StaticLookup {
    async fn lookup(&self, name: &str) -> io::Result<Vec<IpAddr>> {
        self.records
            .get(name)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{name}: NXDOMAIN")))
    }
}
