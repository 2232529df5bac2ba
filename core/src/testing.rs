//! In-memory transport for unit tests: records every request and replays
//! queued responses in order.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::http::{HttpRequest, HttpResponse, Transport, TransportError};

#[derive(Default)]
struct Inner {
    responses: VecDeque<Result<HttpResponse, TransportError>>,
    requests: Vec<HttpRequest>,
}

#[derive(Clone, Default)]
pub(crate) struct RecordingTransport {
    inner: Arc<Mutex<Inner>>,
}

impl RecordingTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&self, result: Result<HttpResponse, TransportError>) {
        self.inner.lock().unwrap().responses.push_back(result);
    }

    pub(crate) fn push_response(&self, status: u16, body: &str) {
        self.push(Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body: body.as_bytes().to_vec(),
        }));
    }

    /// Queue a 200 whose body is `{"meta": ..., "response": <response>}`.
    pub(crate) fn push_json(&self, response: Value) {
        let body = serde_json::json!({
            "meta": {"status": 200, "msg": "OK"},
            "response": response,
        });
        self.push_response(200, &body.to_string());
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.inner.lock().unwrap().requests.clone()
    }

    pub(crate) fn last_request(&self) -> Option<HttpRequest> {
        self.inner.lock().unwrap().requests.last().cloned()
    }
}

impl Transport for RecordingTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.push(request.clone());
        inner
            .responses
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::new("no response queued")))
    }
}
