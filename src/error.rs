//! Error taxonomy shared by every layer of the client.
//!
//! Every public operation either returns a fully populated value or one of the
//! [`ClientError`] kinds below. Local failures (configuration, validation) and
//! remote failures (HTTP status, timeout, rate limit) never convert into each other.

use serde_json::{Map, Value};
use std::fmt;

/// Boxed error used as the wrapped cause of configuration failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Convenience result alias used throughout the crate.
pub type Result<T, E = ClientError> = std::result::Result<T, E>;

/// Top-level error returned by the client, transport and configuration layers.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Local configuration could not be read, written, parsed or updated
    #[error(transparent)]
    InvalidConfiguration(#[from] InvalidConfiguration),

    /// A payload did not match the shape of a model
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The server answered with a non-2xx status
    #[error(transparent)]
    Http(#[from] HttpClientError),

    /// The request deadline was exceeded before a response arrived
    #[error("HttpClientTimeout(Timeout exceeded)")]
    Timeout,

    /// The server rejected the request because a rate limit was hit
    #[error(transparent)]
    RateLimited(#[from] RateLimitExceeded),

    /// A payload could not be encoded or decoded at the wire boundary
    #[error(transparent)]
    Serialization(#[from] SerializationError),
}

impl ClientError {
    /// HTTP-equivalent status code, when the error kind has one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Validation(err) => Some(err.status_code()),
            ClientError::Http(err) => Some(err.status),
            ClientError::RateLimited(err) => Some(err.response.status),
            ClientError::InvalidConfiguration(_)
            | ClientError::Timeout
            | ClientError::Serialization(_) => None,
        }
    }

    /// Whether this error belongs to the HTTP family (status, timeout, rate limit).
    pub fn is_http(&self) -> bool {
        matches!(
            self,
            ClientError::Http(_) | ClientError::Timeout | ClientError::RateLimited(_)
        )
    }

    /// Whether the server rejected the credentials (HTTP 401).
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Http(err) if err.status == 401)
    }
}

// ========== CONFIGURATION ==========

/// Configuration operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOp {
    Get,
    Set,
    Load,
    Save,
}

impl fmt::Display for ConfigOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            ConfigOp::Get => "getting",
            ConfigOp::Set => "setting",
            ConfigOp::Load => "loading",
            ConfigOp::Save => "saving",
        };
        f.write_str(verb)
    }
}

/// Local configuration read/write/parse failure.
#[derive(Debug, thiserror::Error)]
#[error("InvalidConfiguration({message})")]
pub struct InvalidConfiguration {
    /// Operation that failed
    pub operation: ConfigOp,
    /// Offending key, if known
    pub key: Option<String>,
    /// Offending value, if known
    pub value: Option<String>,
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl InvalidConfiguration {
    /// Build an error whose message is derived from the operation, key, value and cause.
    pub fn new(
        operation: ConfigOp,
        key: Option<String>,
        value: Option<String>,
        source: Option<BoxError>,
    ) -> Self {
        let cause = source
            .as_ref()
            .map(|e| format!(" {}", e))
            .unwrap_or_default();
        let message = match (&key, &value) {
            (None, None) => format!("Configuration {} error.{}", operation, cause),
            (None, Some(value)) => format!("Invalid {} value '{}'.{}", operation, value, cause),
            (Some(key), None) => format!("Error {} key='{}'.{}", operation, key, cause),
            (Some(key), Some(value)) => format!(
                "Error {} key='{}' value='{}'.{}",
                operation, key, value, cause
            ),
        };
        Self {
            operation,
            key,
            value,
            message,
            source,
        }
    }

    /// Build an error with an explicit message.
    pub fn with_message(operation: ConfigOp, message: impl Into<String>) -> Self {
        Self {
            operation,
            key: None,
            value: None,
            message: message.into(),
            source: None,
        }
    }

    /// Human-readable description
    pub fn message(&self) -> &str {
        &self.message
    }
}

// ========== VALIDATION ==========

/// One field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Dotted location of the field (`results.2.paper.title`); `__root__` for the payload itself
    pub loc: String,
    /// Why the field was rejected
    pub msg: String,
}

impl FieldError {
    pub fn new(loc: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            loc: loc.into(),
            msg: msg.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.loc, self.msg)
    }
}

/// Payload shape mismatch against a model, carrying every failing field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("ValidationError(400: Request validation error. {})", join_errors(.errors))]
pub struct ValidationError {
    errors: Vec<FieldError>,
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    /// Shorthand for a single failing field.
    pub fn single(loc: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::new(vec![FieldError::new(loc, msg)])
    }

    /// Every field that failed, in schema order
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// HTTP-equivalent status of a validation failure
    pub fn status_code(&self) -> u16 {
        400
    }
}

// ========== HTTP ==========

/// Non-2xx response from the transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("HttpClientError({status}: {message})")]
pub struct HttpClientError {
    /// Response status code (500 when no response was received)
    pub status: u16,
    /// Error description
    pub message: String,
    /// Raw response body, when a response was received
    pub body: Option<String>,
}

impl HttpClientError {
    pub fn new(status: u16, message: impl Into<String>, body: Option<String>) -> Self {
        Self {
            status,
            message: message.into(),
            body,
        }
    }

    /// Parse the raw body as a JSON object; empty map when absent or unparseable.
    pub fn data(&self) -> Map<String, Value> {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_str::<Value>(body).ok())
            .and_then(|value| match value {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .unwrap_or_default()
    }
}

/// Rate limit exceeded, with the limits reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "HttpRateLimitExceeded(limit={}, remaining={}, reset={}s, retry={}s)",
    show(.limit),
    show(.remaining),
    show(.reset),
    show(.retry)
)]
pub struct RateLimitExceeded {
    /// Requests allowed in the current window
    pub limit: Option<u64>,
    /// Requests left in the current window
    pub remaining: Option<u64>,
    /// Seconds until the window resets
    pub reset: Option<u64>,
    /// Seconds to wait before retrying
    pub retry: Option<u64>,
    /// The rejected response
    pub response: HttpClientError,
}

fn show(value: &Option<u64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "?".to_string())
}

// ========== SERIALIZATION ==========

/// A payload could not be encoded or decoded at the wire boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("SerializationError({message})")]
pub struct SerializationError {
    pub message: String,
}

impl From<serde_json::Error> for SerializationError {
    fn from(err: serde_json::Error) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Serialization(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_configuration_messages() {
        let err = InvalidConfiguration::new(ConfigOp::Get, None, None, None);
        assert_eq!(err.message(), "Configuration getting error.");

        let err = InvalidConfiguration::new(
            ConfigOp::Set,
            Some("general.debug".to_string()),
            Some("maybe".to_string()),
            Some("not a bool".into()),
        );
        assert_eq!(
            err.message(),
            "Error setting key='general.debug' value='maybe'. not a bool"
        );
        assert!(std::error::Error::source(&err).is_some());

        let err = InvalidConfiguration::new(ConfigOp::Save, None, Some("x".to_string()), None);
        assert_eq!(err.message(), "Invalid saving value 'x'.");
    }

    #[test]
    fn test_http_error_data() {
        let err = HttpClientError::new(400, "Bad request", Some(r#"{"detail":"nope"}"#.into()));
        assert_eq!(err.data().get("detail"), Some(&Value::from("nope")));

        let err = HttpClientError::new(502, "Bad gateway", Some("<html>".into()));
        assert!(err.data().is_empty());

        let err = HttpClientError::new(500, "No response", None);
        assert!(err.data().is_empty());
    }

    #[test]
    fn test_status_codes_and_family() {
        let validation: ClientError = ValidationError::single("id", "field required").into();
        assert_eq!(validation.status_code(), Some(400));
        assert!(!validation.is_http());

        let unauthorized: ClientError = HttpClientError::new(401, "Unauthorized", None).into();
        assert!(unauthorized.is_unauthorized());
        assert!(unauthorized.is_http());

        assert!(ClientError::Timeout.is_http());
        assert_eq!(ClientError::Timeout.status_code(), None);

        let limited: ClientError = RateLimitExceeded {
            limit: Some(100),
            remaining: Some(0),
            reset: Some(30),
            retry: None,
            response: HttpClientError::new(429, "Too Many Requests", None),
        }
        .into();
        assert_eq!(limited.status_code(), Some(429));
        assert!(!limited.is_unauthorized());
        assert_eq!(
            limited.to_string(),
            "HttpRateLimitExceeded(limit=100, remaining=0, reset=30s, retry=?s)"
        );
    }

    #[test]
    fn test_validation_error_display_lists_fields() {
        let err = ValidationError::new(vec![
            FieldError::new("id", "field required"),
            FieldError::new("stars", "value is not a valid integer"),
        ]);
        let text = err.to_string();
        assert!(text.contains("id: field required"));
        assert!(text.contains("stars: value is not a valid integer"));
        assert_eq!(err.errors().len(), 2);
    }
}
