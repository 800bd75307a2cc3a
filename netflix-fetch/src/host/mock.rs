//! Scripted in-memory transport.
//!
//! Responses are served in the order they were queued and every request is
//! recorded, so tests can assert on exactly what went over the wire.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use super::http::{HttpRequest, HttpResponse, Transport};
use crate::error::TransportError;

/// A [`Transport`] that replays queued responses.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, String>>>,
    requests: Mutex<Vec<HttpRequest>>,
    cookies: Mutex<Option<String>>,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockTransport {
    /// Creates an empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response with a text body.
    pub fn push_response(&self, status: u16, body: impl Into<String>) -> &Self {
        locked(&self.responses).push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    /// Queues a 200 response with a JSON body.
    pub fn push_json(&self, body: &Value) -> &Self {
        self.push_response(200, body.to_string())
    }

    /// Queues a transport failure.
    pub fn push_failure(&self, message: impl Into<String>) -> &Self {
        locked(&self.responses).push_back(Err(message.into()));
        self
    }

    /// Returns every request sent so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        locked(&self.requests).clone()
    }

    /// Number of requests sent so far.
    pub fn request_count(&self) -> usize {
        locked(&self.requests).len()
    }

    /// Number of queued responses not yet consumed.
    pub fn remaining(&self) -> usize {
        locked(&self.responses).len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.clone();
        locked(&self.requests).push(request);
        match locked(&self.responses).pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(TransportError::Other(message)),
            None => Err(TransportError::Other(format!("no response queued for {url}"))),
        }
    }

    fn import_cookies(&self, cookies: &str) -> Result<(), TransportError> {
        *locked(&self.cookies) = Some(cookies.to_string());
        Ok(())
    }

    fn export_cookies(&self) -> Option<String> {
        locked(&self.cookies).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_in_order_and_records() {
        let mock = MockTransport::new();
        mock.push_response(200, "first").push_failure("down");

        let first = mock.send(HttpRequest::get("https://a.test/1")).await.unwrap();
        assert_eq!(first.body, "first");
        assert!(mock.send(HttpRequest::get("https://a.test/2")).await.is_err());
        assert!(mock.send(HttpRequest::get("https://a.test/3")).await.is_err());

        assert_eq!(mock.request_count(), 3);
        assert_eq!(mock.requests()[1].url, "https://a.test/2");
        assert_eq!(mock.remaining(), 0);
    }
}
