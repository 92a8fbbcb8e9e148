//! Loopback HTTP stub for exercising the blocking clients.
//!
//! Each [`StubServer`] runs an axum app on its own tokio runtime thread,
//! answers every request with a fixed status and JSON body, and records the
//! first request it receives.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use std::net::SocketAddr;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How long [`StubServer::received`] waits for the client's request.
const RECEIVE_TIMEOUT: Duration = Duration::from_secs(10);

struct Reply {
    status: StatusCode,
    body: String,
    delay: Duration,
    requests: Mutex<Sender<String>>,
}

pub struct StubServer {
    pub url: String,
    requests: Receiver<String>,
}

impl StubServer {
    /// Answer with `status` and `body` immediately.
    pub fn respond(status: u16, body: &str) -> Self {
        Self::spawn(status, body, Duration::ZERO)
    }

    /// Answer after `delay`, for client timeout tests.
    pub fn respond_after(delay: Duration, status: u16, body: &str) -> Self {
        Self::spawn(status, body, delay)
    }

    fn spawn(status: u16, body: &str, delay: Duration) -> Self {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind stub server");
        listener.set_nonblocking(true).expect("non-blocking listener");
        let addr: SocketAddr = listener.local_addr().expect("stub address");

        let (tx, rx) = mpsc::channel();
        let reply = Arc::new(Reply {
            status: StatusCode::from_u16(status).expect("valid status code"),
            body: body.to_string(),
            delay,
            requests: Mutex::new(tx),
        });

        // Detached: the runtime lives until the test process exits.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("stub runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).expect("tokio listener");
                let app = Router::new().fallback(record_and_reply).with_state(reply);
                axum::serve(listener, app).await.expect("stub server");
            });
        });

        Self {
            url: format!("http://{}", addr),
            requests: rx,
        }
    }

    /// Request line, headers and body of the first request, as text.
    ///
    /// Panics when no complete request arrived, so a truncated upload fails
    /// the test instead of reaching its assertions.
    pub fn received(self) -> String {
        self.requests
            .recv_timeout(RECEIVE_TIMEOUT)
            .expect("stub server received no complete request")
    }
}

async fn record_and_reply(
    State(reply): State<Arc<Reply>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mut request = format!("{} {} HTTP/1.1\r\n", method, uri);
    for (name, value) in &headers {
        request.push_str(&format!("{}: {}\r\n", name, value.to_str().unwrap_or("<binary>")));
    }
    request.push_str("\r\n");
    request.push_str(&String::from_utf8_lossy(&body));

    if let Ok(sender) = reply.requests.lock() {
        // Receiver is gone once the test has read its request.
        sender.send(request).ok();
    }

    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }

    (
        reply.status,
        [(header::CONTENT_TYPE, "application/json")],
        reply.body.clone(),
    )
        .into_response()
}

/// Address with nothing listening on it.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("address");
    drop(listener);
    format!("http://{}", addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::{Shutdown, TcpStream};

    fn send_raw(url: &str, raw: &[u8]) -> String {
        let addr = url.trim_start_matches("http://");
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.write_all(raw).unwrap();
        stream.shutdown(Shutdown::Write).unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).ok();
        response
    }

    #[test]
    fn test_records_complete_request() {
        let server = StubServer::respond(201, r#"{"ok": true}"#);
        let response = send_raw(
            &server.url,
            b"POST /detect HTTP/1.1\r\nHost: stub\r\nContent-Length: 5\r\n\r\nhello",
        );

        assert!(response.starts_with("HTTP/1.1 201"));
        assert!(response.contains(r#"{"ok": true}"#));
        let received = server.received();
        assert!(received.starts_with("POST /detect HTTP/1.1"));
        assert!(received.ends_with("\r\n\r\nhello"));
    }

    #[test]
    #[should_panic(expected = "no complete request")]
    fn test_truncated_body_is_not_recorded() {
        let server = StubServer::respond(200, "{}");
        send_raw(
            &server.url,
            b"POST /detect HTTP/1.1\r\nHost: stub\r\nContent-Length: 100\r\n\r\nshort",
        );
        server.received();
    }
}
