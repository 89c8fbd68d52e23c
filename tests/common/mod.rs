//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use solver_gateway::config::{BackendDescriptor, GatewayConfig, SolverRoute};
use solver_gateway::http::ServerError;
use solver_gateway::net::ConnectionRegistry;
use solver_gateway::{GatewayServer, Shutdown, ShutdownOutcome};

/// Valid 4x4 solve request.
pub const SOLVE_BODY: &str =
    r#"{"zone_height":2,"zone_length":2,"board":[[1,0,0,0],[0,0,3,0],[0,4,0,0],[0,0,0,2]]}"#;

/// How the mock solver answers one path.
#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: u16,
    pub reason: &'static str,
    pub body: String,
    pub delay: Duration,
}

impl MockReply {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            reason: "OK",
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    pub fn status(status: u16, reason: &'static str) -> Self {
        Self {
            status,
            reason,
            body: String::new(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A request seen by the mock solver.
#[derive(Debug, Clone)]
pub struct Hit {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: String,
}

pub struct MockSolver {
    pub addr: SocketAddr,
    hits: Arc<Mutex<Vec<Hit>>>,
}

impl MockSolver {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Requests received on `path`.
    pub fn hits(&self, path: &str) -> Vec<Hit> {
        self.hits
            .lock()
            .unwrap()
            .iter()
            .filter(|hit| hit.path == path)
            .cloned()
            .collect()
    }

    /// Descriptor pointing `route` at this solver's `/solver` and `/health_test` paths.
    pub fn descriptor(&self, route: SolverRoute) -> BackendDescriptor {
        BackendDescriptor {
            route,
            forward_url: self.url("/solver"),
            health_url: self.url("/health_test"),
            credential: format!("{}-key", route.name()),
        }
    }
}

/// Start a programmable mock solver; `reply` picks the answer from the request path.
pub async fn start_programmable_backend<F>(reply: F) -> MockSolver
where
    F: Fn(&str) -> MockReply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(Mutex::new(Vec::new()));
    let reply = Arc::new(reply);

    let recorded = hits.clone();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let reply = reply.clone();
            let recorded = recorded.clone();
            tokio::spawn(async move {
                let (head, body) = read_message(&mut socket).await;
                let mut lines = head.lines();
                let mut request_line = lines.next().unwrap_or_default().split_whitespace();
                let method = request_line.next().unwrap_or_default().to_string();
                let path = request_line.next().unwrap_or_default().to_string();
                let authorization = lines
                    .filter_map(|line| line.split_once(':'))
                    .find(|(k, _)| k.trim().eq_ignore_ascii_case("authorization"))
                    .map(|(_, v)| v.trim().to_string());

                let answer = reply(&path);
                recorded.lock().unwrap().push(Hit {
                    method,
                    path,
                    authorization,
                    body,
                });

                tokio::time::sleep(answer.delay).await;
                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    answer.status,
                    answer.reason,
                    answer.body.len(),
                    answer.body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    MockSolver { addr, hits }
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// A running gateway.
pub struct Gateway {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub registry: ConnectionRegistry,
    pub task: JoinHandle<Result<ShutdownOutcome, ServerError>>,
}

impl Gateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Trigger shutdown and wait for the drain to finish.
    pub async fn stop(self) -> ShutdownOutcome {
        self.shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(10), self.task)
            .await
            .expect("gateway stopped in time")
            .expect("gateway task did not panic")
            .expect("gateway ran without error")
    }
}

/// Config listening on an ephemeral port with the given routes.
pub fn config_with(routes: Vec<BackendDescriptor>) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.host = "127.0.0.1".into();
    config.listener.port = 0;
    config.timeouts.probe_secs = 2;
    config.timeouts.forward_secs = 5;
    config.routes = routes;
    config
}

pub async fn start_gateway(config: GatewayConfig) -> Gateway {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = GatewayServer::new(config);
    let registry = server.registry();
    let task = tokio::spawn(server.run(listener, shutdown.wait()));
    Gateway {
        addr,
        shutdown,
        registry,
        task,
    }
}

/// Status line and body as seen on the wire.
#[derive(Debug)]
pub struct RawResponse {
    pub status: u16,
    pub reason: String,
    pub body: String,
}

/// Send one GET over a fresh connection and read the whole response.
///
/// reqwest does not expose reason phrases, so status text checks go through here.
pub async fn send_raw(addr: SocketAddr, path: &str, content_type: Option<&str>, body: &str) -> RawResponse {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let mut request = format!(
        "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\nContent-Length: {}\r\n",
        path,
        addr,
        body.len()
    );
    if let Some(content_type) = content_type {
        request.push_str(&format!("Content-Type: {}\r\n", content_type));
    }
    request.push_str("\r\n");
    request.push_str(body);
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();
    let text = String::from_utf8_lossy(&raw).into_owned();
    let (head, body) = text.split_once("\r\n\r\n").unwrap_or((text.as_str(), ""));
    let status_line = head.lines().next().unwrap_or_default();
    let mut parts = status_line.splitn(3, ' ');
    let _version = parts.next();
    let status = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);
    let reason = parts.next().unwrap_or_default().to_string();

    RawResponse {
        status,
        reason,
        body: body.to_string(),
    }
}

/// Read one HTTP/1.1 message head plus its Content-Length body.
async fn read_message(socket: &mut TcpStream) -> (String, String) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let head_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break buf.len(),
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buf[head_end..].to_vec();
    while body.len() < content_length {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => body.extend_from_slice(&chunk[..n]),
        }
    }

    (head, String::from_utf8_lossy(&body).into_owned())
}
