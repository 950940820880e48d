//! Scripted in-process transport for unit tests.

use std::sync::Mutex;
use std::time::Duration;

use serde_json::Value;

use super::transport::{HttpRequest, Method, RawResponse, Transport, TransportError};

struct Route {
    method: Method,
    /// Matched against the end of the URL path (or path + query when it contains '?').
    suffix: String,
    response: RawResponse,
}

/// Answers requests from a route table and records everything it saw.
/// Unknown routes fail like a refused connection.
#[derive(Default)]
pub(crate) struct MockTransport {
    routes: Mutex<Vec<Route>>,
    seen: Mutex<Vec<HttpRequest>>,
    delay: Mutex<Option<Duration>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Sleep this long inside every request (lets concurrent callers overlap).
    pub(crate) fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub(crate) fn on(&self, method: Method, suffix: &str, status: u32, body: Value) {
        let body = serde_json::to_vec(&body).unwrap();
        self.push(method, suffix, status, Some("application/json"), body);
    }

    pub(crate) fn on_raw(
        &self,
        method: Method,
        suffix: &str,
        status: u32,
        content_type: Option<&str>,
        body: &str,
    ) {
        self.push(method, suffix, status, content_type, body.as_bytes().to_vec());
    }

    fn push(&self, method: Method, suffix: &str, status: u32, content_type: Option<&str>, body: Vec<u8>) {
        self.routes.lock().unwrap().push(Route {
            method,
            suffix: suffix.to_string(),
            response: RawResponse {
                status,
                content_type: content_type.map(str::to_string),
                body,
            },
        });
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.seen.lock().unwrap().clone()
    }

    /// Number of requests whose method matches and whose path ends with `suffix`.
    pub(crate) fn count(&self, method: Method, suffix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && matches(&r.url, suffix))
            .count()
    }
}

fn matches(url: &str, suffix: &str) -> bool {
    let Ok(parsed) = url::Url::parse(url) else {
        return false;
    };
    if suffix.contains('?') {
        let full = match parsed.query() {
            Some(q) => format!("{}?{}", parsed.path(), q),
            None => parsed.path().to_string(),
        };
        full.ends_with(suffix)
    } else {
        parsed.path().ends_with(suffix)
    }
}

impl Transport for MockTransport {
    fn execute(&self, request: &HttpRequest) -> Result<RawResponse, TransportError> {
        self.seen.lock().unwrap().push(request.clone());
        if let Some(d) = *self.delay.lock().unwrap() {
            std::thread::sleep(d);
        }
        let routes = self.routes.lock().unwrap();
        // Later registrations win so a test can override an earlier answer.
        routes
            .iter()
            .rev()
            .find(|r| r.method == request.method && matches(&request.url, &r.suffix))
            .map(|r| r.response.clone())
            .ok_or_else(|| TransportError(format!("connection refused: {}", request.url)))
    }
}
