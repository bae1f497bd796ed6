//! Blocking HTTP client for the todo list backend.
//!
//! # Overview
//! Builds URLs against a configured base address, sends JSON requests,
//! unwraps JSON or empty responses, and turns every failure into a
//! `ClientError` with a message fit for display.
//!
//! # Design
//! - `ClientConfig` is built once at program entry and injected; the client
//!   never reads the environment on its own.
//! - `TodoClient` is stateless apart from its config. Request building and
//!   response parsing are pure; `Transport` is the only I/O seam.
//! - Payloads and results are pass-through `serde_json::Value`. The typed
//!   models in `types` are optional helpers for consumers.
//! - `Behavior` toggles the stricter checks independently.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::TodoClient;
pub use config::{Behavior, ClientConfig, BASE_URL_VAR};
pub use error::{ClientError, ErrorKind};
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestOptions};
pub use transport::{Transport, UreqTransport};
pub use types::{CreateTodo, Todo, UpdateTodo};
