//! Request construction and execution for the Tumblr API.
//!
//! # Design
//! `Client` holds the configuration and a shared handle to the host's
//! `Transport`. Each call is split the same way: a `build_*` method produces
//! a plain-data `HttpRequest`, and `execute` hands it to the transport and
//! interprets the status code. Endpoint modules (`dashboard`, `likes`,
//! `blog`, `followers`, `user`) add their methods to `Client` on top of
//! `get` and `post`.
//!
//! `Client` is cheap to clone. Pages keep a clone so they can fetch their
//! successors without borrowing from the caller.

use std::fmt;
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::params::Params;
use crate::response::Response;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Client {
    pub fn new(config: ClientConfig, transport: impl Transport + 'static) -> Self {
        Self::with_shared_transport(config, Arc::new(transport))
    }

    pub fn with_shared_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn build_get(&self, path: &str, params: &Params) -> HttpRequest {
        self.build_with_query(HttpMethod::Get, path, params)
    }

    pub fn build_put(&self, path: &str, params: &Params) -> HttpRequest {
        self.build_with_query(HttpMethod::Put, path, params)
    }

    pub fn build_delete(&self, path: &str, params: &Params) -> HttpRequest {
        self.build_with_query(HttpMethod::Delete, path, params)
    }

    /// POST parameters travel form-encoded in the body, not in the query.
    pub fn build_post(&self, path: &str, form: &Params) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Post,
            url: self.config.endpoint(path),
            query: Params::new(),
            headers: vec![("content-type".to_string(), FORM_CONTENT_TYPE.to_string())],
            body: Some(form.encode()),
        }
    }

    fn build_with_query(&self, method: HttpMethod, path: &str, params: &Params) -> HttpRequest {
        let mut query = params.clone();
        if let Some(api_key) = self.config.api_key() {
            if !query.contains("api_key") {
                query.set("api_key", api_key);
            }
        }
        HttpRequest {
            method,
            url: self.config.endpoint(path),
            query,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(&self, path: &str, params: &Params) -> Result<Response, ApiError> {
        self.execute(&self.build_get(path, params))
    }

    pub fn post(&self, path: &str, form: &Params) -> Result<Response, ApiError> {
        self.execute(&self.build_post(path, form))
    }

    pub fn put(&self, path: &str, params: &Params) -> Result<Response, ApiError> {
        self.execute(&self.build_put(path, params))
    }

    pub fn delete(&self, path: &str, params: &Params) -> Result<Response, ApiError> {
        self.execute(&self.build_delete(path, params))
    }

    /// Send `request` through the transport. Transport failures and
    /// statuses outside 2xx/3xx come back as errors; anything else becomes
    /// a `Response`.
    pub fn execute(&self, request: &HttpRequest) -> Result<Response, ApiError> {
        log::debug!("{} {}", request.method.as_str(), request.uri());
        let response = self.transport.send(request)?;
        log::debug!(
            "{} {} -> {} ({} bytes)",
            request.method.as_str(),
            request.url,
            response.status,
            response.body.len()
        );
        check_status(&response)?;
        Ok(Response::new(response.body, response.headers))
    }
}

/// Map statuses outside 2xx/3xx to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if (200..400).contains(&response.status) {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::Http {
        status: response.status,
        message: error_message(&response.body),
    })
}

/// Prefer the envelope's `meta.msg`; fall back to the raw body text.
fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value["meta"]["msg"].as_str().map(str::to_string))
        .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned())
}
