//! Shared test utilities: a canned HTTP data service and a recording sink.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use nokeyfinance::Result;
use nokeyfinance::config::ApiConfig;
use nokeyfinance::export::DownloadSink;
use nokeyfinance::service::HttpDataService;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub const THREE_ROWS: &str = include_str!("../fixtures/ohlcv_aapl_three_rows.json");
pub const EMPTY: &str = include_str!("../fixtures/ohlcv_empty.json");
pub const UNORDERED: &str = include_str!("../fixtures/ohlcv_unordered.json");
pub const UNKNOWN_TICKER: &str = include_str!("../fixtures/error_unknown_ticker.json");

/// One canned reply.
#[derive(Clone, Debug)]
pub struct Route {
    /// Request path, without the query string.
    pub path: &'static str,
    /// Substring the query string must contain, if any.
    pub query_contains: Option<&'static str>,
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl Route {
    pub fn new(path: &'static str, status: u16, body: &str) -> Self {
        Self {
            path,
            query_contains: None,
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn when_query(mut self, needle: &'static str) -> Self {
        self.query_contains = Some(needle);
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A local HTTP server answering from a fixed route table.
pub struct CannedServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl CannedServer {
    /// Starts serving `routes` on an ephemeral port.
    pub async fn start(routes: Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test listener");
        let addr = listener.local_addr().expect("listener has no address");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let routes = Arc::new(routes);

        let seen = Arc::clone(&requests);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let routes = Arc::clone(&routes);
                let seen = Arc::clone(&seen);
                tokio::spawn(async move {
                    let _ = answer(stream, &routes, &seen).await;
                });
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    /// Request targets (path plus query) received so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("request log poisoned").clone()
    }

    /// An HTTP client pointed at this server.
    pub fn client(&self) -> HttpDataService {
        client_for(&self.base_url)
    }
}

pub fn client_for(base_url: &str) -> HttpDataService {
    HttpDataService::new(&ApiConfig {
        base_url: base_url.to_string(),
        timeout: Duration::from_secs(5),
    })
    .expect("failed to build client")
}

/// A base URL nothing is listening on.
pub async fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let addr = listener.local_addr().expect("listener has no address");
    drop(listener);
    format!("http://{addr}")
}

async fn answer(
    mut stream: TcpStream,
    routes: &[Route],
    seen: &Mutex<Vec<String>>,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let head = String::from_utf8_lossy(&buf);
    let target = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    seen.lock().expect("request log poisoned").push(target.clone());

    let (path, query) = target.split_once('?').unwrap_or((target.as_str(), ""));
    let route = routes.iter().find(|r| {
        r.path == path && r.query_contains.is_none_or(|needle| query.contains(needle))
    });

    let (status, body, delay) = match route {
        Some(r) => (r.status, r.body.clone(), r.delay),
        None => (404, r#"{"detail":"Not Found"}"#.to_string(), Duration::ZERO),
    };
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let response = format!(
        "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        reason(status),
        body.len()
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        _ => "Unknown",
    }
}

/// [`DownloadSink`] that keeps every saved artifact in memory.
#[derive(Default)]
pub struct RecordingSink {
    saved: Mutex<Vec<(String, Vec<u8>)>>,
}

impl RecordingSink {
    pub fn saved(&self) -> Vec<(String, Vec<u8>)> {
        self.saved.lock().expect("sink poisoned").clone()
    }
}

impl DownloadSink for RecordingSink {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        self.saved
            .lock()
            .expect("sink poisoned")
            .push((filename.to_string(), bytes.to_vec()));
        Ok(PathBuf::from("/memory").join(filename))
    }
}
