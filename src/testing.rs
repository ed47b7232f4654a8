//! Minimal HTTP stub server for exercising the client against canned
//! responses. Each connection is answered with the next response in the list
//! (repeating the last one) and the request is recorded for assertions.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: String,
    pub body: String,
}

pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

pub async fn stub_server(responses: Vec<(u16, String)>) -> StubServer {
    stub_server_with_delay(responses, Duration::ZERO).await
}

/// Like [`stub_server`], but waits `delay` before answering each request.
/// Used to hold a response open long enough for concurrent callers to pile up.
pub async fn stub_server_with_delay(responses: Vec<(u16, String)>, delay: Duration) -> StubServer {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let base_url = format!("http://{}", listener.local_addr().expect("stub addr"));
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&requests);

    tokio::spawn(async move {
        let mut served = 0usize;
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let (status, body) = responses
                .get(served)
                .or_else(|| responses.last())
                .cloned()
                .unwrap_or((200, String::new()));
            served += 1;

            let Some(request) = read_request(&mut socket).await else {
                continue;
            };
            recorded.lock().unwrap().push(request);

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let reason = match status {
                200 => "OK",
                201 => "Created",
                _ => "Stub",
            };
            let response = format!(
                "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len(),
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    StubServer { base_url, requests }
}

async fn read_request(socket: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..end]).to_string();
            let content_length = headers
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    if name.eq_ignore_ascii_case("content-length") {
                        value.trim().parse::<usize>().ok()
                    } else {
                        None
                    }
                })
                .unwrap_or(0);

            if buf.len() >= end + 4 + content_length {
                let request_line = headers.lines().next()?;
                let mut parts = request_line.split_whitespace();
                let method = parts.next()?.to_string();
                let path = parts.next()?.to_string();
                let body =
                    String::from_utf8_lossy(&buf[end + 4..end + 4 + content_length]).to_string();
                return Some(RecordedRequest {
                    method,
                    path,
                    headers,
                    body,
                });
            }
        }

        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}
