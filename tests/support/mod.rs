//! A one-shot HTTP server on a loopback port, for tests that need the real
//! reqwest transport on the wire.
#![allow(dead_code)]

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// One request as the server received it.
#[derive(Debug)]
pub struct CapturedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Accept a single connection, capture its request and answer with `status`
/// and a JSON `body`. Returns the base URL and a handle yielding the capture.
pub async fn serve_once(status: u16, body: &'static str) -> (String, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind(("127.0.0.1", 0))
        .await
        .expect("bind loopback listener");
    let addr = listener.local_addr().expect("listener address");

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept connection");
        let captured = read_request(&mut stream).await;

        let response = format!(
            "HTTP/1.1 {} OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream
            .write_all(response.as_bytes())
            .await
            .expect("write response");
        let _ = stream.shutdown().await;

        captured
    });

    (format!("http://{}", addr), handle)
}

async fn read_request(stream: &mut TcpStream) -> CapturedRequest {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        if let Some(pos) = find(&buffer, b"\r\n\r\n") {
            break pos;
        }
        let n = stream.read(&mut chunk).await.expect("read request head");
        assert!(n > 0, "connection closed before headers were complete");
        buffer.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buffer[..head_end]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default().to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect();

    let mut captured = CapturedRequest {
        request_line,
        headers,
        body: buffer[head_end + 4..].to_vec(),
    };

    if let Some(length) = captured.header("Content-Length") {
        let length: usize = length.parse().expect("numeric Content-Length");
        while captured.body.len() < length {
            let n = stream.read(&mut chunk).await.expect("read request body");
            assert!(n > 0, "connection closed before body was complete");
            captured.body.extend_from_slice(&chunk[..n]);
        }
    } else if captured
        .header("Transfer-Encoding")
        .is_some_and(|te| te.eq_ignore_ascii_case("chunked"))
    {
        while find(&captured.body, b"0\r\n\r\n").is_none() {
            let n = stream.read(&mut chunk).await.expect("read chunked body");
            assert!(n > 0, "connection closed before last chunk");
            captured.body.extend_from_slice(&chunk[..n]);
        }
        captured.body = decode_chunked(&captured.body);
    }

    captured
}

fn decode_chunked(raw: &[u8]) -> Vec<u8> {
    let mut decoded = Vec::new();
    let mut rest = raw;
    while let Some(line_end) = find(rest, b"\r\n") {
        let size_line = String::from_utf8_lossy(&rest[..line_end]).to_string();
        let size = usize::from_str_radix(size_line.trim(), 16).expect("chunk size");
        if size == 0 {
            break;
        }
        let start = line_end + 2;
        decoded.extend_from_slice(&rest[start..start + size]);
        rest = &rest[start + size + 2..];
    }
    decoded
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// A real transport that ignores any proxy settings in the environment.
pub fn loopback_transport() -> qqbot_media_sender::sender::ReqwestTransport {
    let client = reqwest::Client::builder()
        .no_proxy()
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .expect("build reqwest client");
    qqbot_media_sender::sender::ReqwestTransport::from_client(client)
}
