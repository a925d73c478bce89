use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use crate::error::{AppError, AppResult};

pub(crate) const MOCK_BODY: &[u8] = b"hello world";

/// A request as seen by the mock responder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SeenRequest {
    pub method: String,
    pub target: String,
    pub body: String,
}

/// Minimal HTTP/1.1 responder: one request per connection, fixed body, status
/// picked from the request target.
pub(crate) struct MockServer {
    pub addr: SocketAddr,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
    handle: JoinHandle<()>,
}

impl MockServer {
    pub(crate) async fn start(status_for: fn(&str) -> u16) -> AppResult<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_for_task = Arc::clone(&seen);

        let handle = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let seen = Arc::clone(&seen_for_task);
                tokio::spawn(async move {
                    drop(handle_connection(stream, status_for, seen).await);
                });
            }
        });

        Ok(Self { addr, seen, handle })
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub(crate) fn seen(&self) -> AppResult<Vec<SeenRequest>> {
        self.seen
            .lock()
            .map(|guard| guard.clone())
            .map_err(|err| AppError::validation(format!("mock lock poisoned: {}", err)))
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Address of a port nobody listens on.
pub(crate) fn refused_addr() -> AppResult<SocketAddr> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(addr)
}

pub(crate) fn always_ok(_target: &str) -> u16 {
    200
}

async fn handle_connection(
    mut stream: TcpStream,
    status_for: fn(&str) -> u16,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
) -> std::io::Result<()> {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; 1024];
    let head_end = loop {
        if let Some(pos) = buffer.windows(4).position(|window| window == b"\r\n\r\n") {
            break pos;
        }
        let read = stream.read(&mut chunk).await?;
        if read == 0 {
            return Ok(());
        }
        buffer.extend_from_slice(chunk.get(..read).unwrap_or_default());
    };

    let head = String::from_utf8_lossy(buffer.get(..head_end).unwrap_or_default()).into_owned();
    let mut lines = head.lines();
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_owned();
    let target = request_line.next().unwrap_or_default().to_owned();
    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buffer
        .get(head_end.saturating_add(4)..)
        .map(<[u8]>::to_vec)
        .unwrap_or_default();
    while body.len() < content_length {
        let read = stream.read(&mut chunk).await?;
        if read == 0 {
            break;
        }
        body.extend_from_slice(chunk.get(..read).unwrap_or_default());
    }

    let status = status_for(&target);
    if let Ok(mut guard) = seen.lock() {
        guard.push(SeenRequest {
            method,
            target,
            body: String::from_utf8_lossy(&body).into_owned(),
        });
    }

    let head = format!(
        "HTTP/1.1 {} Mock\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        MOCK_BODY.len()
    );
    stream.write_all(head.as_bytes()).await?;
    stream.write_all(MOCK_BODY).await?;
    stream.shutdown().await?;
    Ok(())
}
