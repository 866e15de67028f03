//! Transport seam between the client facade and the network.
//!
//! The facade only ever talks to a [`Transport`]. [`HttpTransport`] is the reqwest
//! implementation used in production; [`MockTransport`] replays queued answers and
//! records every call for tests.

mod http;
pub mod mock;

pub use http::{HttpTransport, REFRESH_PATH};
pub use mock::{MockTransport, RecordedCall};

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::error::Result;

/// How requests are authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    /// No credentials
    Anonymous,
    /// Static API token
    Token,
    /// Access/refresh token pair; the access token can be renewed
    Jwt,
}

/// Credentials held by a transport.
#[derive(Clone, PartialEq, Eq)]
pub enum Authorization {
    Anonymous,
    Token(String),
    Jwt { access: String, refresh: String },
}

impl Authorization {
    pub fn method(&self) -> AuthMethod {
        match self {
            Authorization::Anonymous => AuthMethod::Anonymous,
            Authorization::Token(_) => AuthMethod::Token,
            Authorization::Jwt { .. } => AuthMethod::Jwt,
        }
    }

    /// Value of the `Authorization` header, if any.
    pub fn header(&self) -> Option<String> {
        match self {
            Authorization::Anonymous => None,
            Authorization::Token(token) => Some(format!("Token {}", token)),
            Authorization::Jwt { access, .. } => Some(format!("Bearer {}", access)),
        }
    }
}

impl std::fmt::Debug for Authorization {
    // Credentials never end up in logs.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Authorization::Anonymous => f.write_str("Anonymous"),
            Authorization::Token(_) => f.write_str("Token(***)"),
            Authorization::Jwt { .. } => f.write_str("Jwt { access: ***, refresh: *** }"),
        }
    }
}

/// Narrow JSON-over-HTTP interface consumed by the client facade.
///
/// Paths are relative to the API root (`/papers/`). Non-2xx answers surface as
/// [`ClientError::Http`](crate::error::ClientError::Http) or one of its siblings.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Authentication mode, fixed for the lifetime of the transport
    fn auth_method(&self) -> AuthMethod;

    /// GET with query parameters; `timeout` overrides the default deadline.
    async fn get(
        &self,
        path: &str,
        params: &[(String, String)],
        timeout: Option<Duration>,
    ) -> Result<Value>;

    async fn post(&self, path: &str, data: &Value) -> Result<Value>;

    async fn patch(&self, path: &str, data: &Value) -> Result<Value>;

    async fn delete(&self, path: &str) -> Result<()>;

    /// Exchange the refresh credential for a new access credential.
    async fn refresh(&self) -> Result<()>;
}
