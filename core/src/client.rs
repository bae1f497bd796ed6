//! Request helper and resource operations for the todo API.
//!
//! # Design
//! `TodoClient` holds an immutable `ClientConfig` and a `Transport`. Every
//! operation goes through `request`, which is split into three steps:
//! `build_request` (pure), `Transport::execute` (I/O) and `parse_response`
//! (pure). The pure halves are public so hosts that do their own I/O can use
//! them directly.

use std::fmt::Display;

use serde_json::Value;
use tracing::debug;

use crate::config::{Behavior, ClientConfig, BASE_URL_VAR};
use crate::error::ClientError;
use crate::http::{merge_headers, HttpMethod, HttpRequest, HttpResponse, RequestOptions};
use crate::transport::{Transport, UreqTransport};

const TODOS_PATH: &str = "/api/todos";

/// Maximum number of characters of a non-JSON error body kept in the message.
pub const EXCERPT_CHARS: usize = 200;

/// Stateless client for the todo API.
///
/// Payloads and results are opaque JSON: whatever the backend returns is
/// handed back unchanged. A `None` result means the server answered
/// 204 No Content.
#[derive(Debug, Clone)]
pub struct TodoClient<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
}

impl TodoClient<UreqTransport> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<T> TodoClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Append `path` to the base URL. `path` is expected to start with `/`.
    pub fn join(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url())
    }

    /// Resolve `path` and `options` into a request without sending it.
    pub fn build_request(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<HttpRequest, ClientError> {
        if self.config.behavior().require_base_url && self.config.base_url().is_empty() {
            return Err(ClientError::ConfigMissing { var: BASE_URL_VAR });
        }
        Ok(HttpRequest {
            method: options.method,
            url: self.join(path),
            headers: merge_headers(&options.headers),
            body: options.body,
        })
    }

    /// Interpret a response: non-2xx becomes `ClientError::Http`, 204 becomes
    /// `None`, anything else must be a JSON body.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Option<Value>, ClientError> {
        if !response.is_success() {
            let message = resolve_error_message(&response, self.config.behavior());
            return Err(ClientError::Http {
                status: response.status,
                message,
            });
        }
        if response.status == 204 {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&response.body)?))
    }
}

impl<T: Transport> TodoClient<T> {
    /// Send one request to `path` and interpret the response.
    pub fn request(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Option<Value>, ClientError> {
        let request = self.build_request(path, options)?;
        debug!(method = %request.method, url = %request.url, "sending request");
        let response = self.transport.execute(&request)?;
        debug!(status = response.status, url = %request.url, "received response");
        self.parse_response(response)
    }

    pub fn get_todos(&self) -> Result<Option<Value>, ClientError> {
        self.request(TODOS_PATH, RequestOptions::default())
    }

    pub fn create_todo(&self, payload: &Value) -> Result<Option<Value>, ClientError> {
        let options = RequestOptions::new(HttpMethod::Post).with_body(payload.to_string());
        self.request(TODOS_PATH, options)
    }

    pub fn update_todo(
        &self,
        id: impl Display,
        payload: &Value,
    ) -> Result<Option<Value>, ClientError> {
        let options = RequestOptions::new(HttpMethod::Put).with_body(payload.to_string());
        self.request(&format!("{TODOS_PATH}/{id}"), options)
    }

    pub fn toggle_completed(&self, id: impl Display) -> Result<Option<Value>, ClientError> {
        self.request(
            &format!("{TODOS_PATH}/{id}/toggle-completed"),
            RequestOptions::new(HttpMethod::Patch),
        )
    }

    pub fn toggle_important(&self, id: impl Display) -> Result<Option<Value>, ClientError> {
        self.request(
            &format!("{TODOS_PATH}/{id}/toggle-important"),
            RequestOptions::new(HttpMethod::Patch),
        )
    }

    pub fn delete_todo(&self, id: impl Display) -> Result<Option<Value>, ClientError> {
        self.request(
            &format!("{TODOS_PATH}/{id}"),
            RequestOptions::new(HttpMethod::Delete),
        )
    }
}

/// Pick the user-facing message for a failed response.
///
/// Precedence: JSON `message`, then JSON `error` (when enabled), then the
/// status line. A body that is not JSON contributes an excerpt (when enabled);
/// a body that fails to parse never hides the failure itself.
fn resolve_error_message(response: &HttpResponse, behavior: Behavior) -> String {
    let status_line = format!("{} {}", response.status, response.status_text)
        .trim_end()
        .to_string();

    match serde_json::from_str::<Value>(&response.body) {
        Ok(body) => message_field(&body, "message")
            .or_else(|| {
                behavior
                    .error_field_fallback
                    .then(|| message_field(&body, "error"))
                    .flatten()
            })
            .unwrap_or(status_line),
        Err(_) => {
            let text = response.body.trim();
            if behavior.raw_text_excerpt && !text.is_empty() {
                let excerpt: String = text.chars().take(EXCERPT_CHARS).collect();
                format!("{status_line}: {excerpt}")
            } else {
                status_line
            }
        }
    }
}

/// Read `field` from a JSON error body, skipping falsy values.
fn message_field(body: &Value, field: &str) -> Option<String> {
    match body.get(field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Null | Value::Bool(false) | Value::String(_) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}
