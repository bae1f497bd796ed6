//! Client configuration: the backend base URL and behavior toggles.

use std::env;

/// Environment variable holding the backend base URL.
pub const BASE_URL_VAR: &str = "TODO_BACKEND_BASE_URL";

/// Independent switches for the stricter client behaviors.
///
/// `Behavior::strict()` turns all of them on and is the default.
/// `Behavior::lenient()` turns all of them off: an empty base URL is joined
/// as is, trailing slashes are kept, only the `message` field of an error
/// body is used and unparseable error bodies are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Behavior {
    /// Fail with `ConfigMissing` before any I/O when the base URL is empty.
    pub require_base_url: bool,
    /// Remove trailing `/` from the base URL.
    pub strip_trailing_slash: bool,
    /// Use the `error` field of a JSON error body when `message` is absent.
    pub error_field_fallback: bool,
    /// Append up to `EXCERPT_CHARS` of a non-JSON error body to the status line.
    pub raw_text_excerpt: bool,
}

impl Behavior {
    pub const fn strict() -> Self {
        Self {
            require_base_url: true,
            strip_trailing_slash: true,
            error_field_fallback: true,
            raw_text_excerpt: true,
        }
    }

    pub const fn lenient() -> Self {
        Self {
            require_base_url: false,
            strip_trailing_slash: false,
            error_field_fallback: false,
            raw_text_excerpt: false,
        }
    }
}

impl Default for Behavior {
    fn default() -> Self {
        Self::strict()
    }
}

/// Immutable client configuration, built once at program entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    behavior: Behavior,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self::with_behavior(base_url, Behavior::default())
    }

    pub fn with_behavior(base_url: &str, behavior: Behavior) -> Self {
        let base_url = if behavior.strip_trailing_slash {
            base_url.trim_end_matches('/')
        } else {
            base_url
        };
        Self {
            base_url: base_url.to_string(),
            behavior,
        }
    }

    /// Read the base URL from `TODO_BACKEND_BASE_URL`. An unset variable is
    /// treated as empty; whether that is an error is decided per request.
    pub fn from_env() -> Self {
        Self::from_env_with(Behavior::default())
    }

    pub fn from_env_with(behavior: Behavior) -> Self {
        let base_url = env::var(BASE_URL_VAR).unwrap_or_default();
        Self::with_behavior(&base_url, behavior)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn behavior(&self) -> Behavior {
        self.behavior
    }
}
