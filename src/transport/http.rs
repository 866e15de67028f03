//! reqwest-backed transport.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::{Method, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use crate::error::{ClientError, HttpClientError, RateLimitExceeded, Result};
use crate::transport::{AuthMethod, Authorization, Transport};

/// Endpoint exchanging a refresh token for a new access token.
pub const REFRESH_PATH: &str = "/auth/token/refresh/";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct RefreshedTokens {
    access: String,
    #[serde(default)]
    refresh: Option<String>,
}

/// JSON API transport over reqwest.
///
/// The credential pair lives behind a [`RwLock`] because a token refresh replaces
/// it while other requests may be reading it.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    method: AuthMethod,
    auth: RwLock<Authorization>,
}

impl HttpTransport {
    /// Create a transport rooted at `base_url` (e.g. `https://sotagents.com/api/v1`).
    pub fn new(base_url: impl Into<String>, auth: Authorization) -> Result<Self> {
        Self::with_user_agent(
            base_url,
            auth,
            concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")),
        )
    }

    /// Create a transport with a custom user agent.
    pub fn with_user_agent(
        base_url: impl Into<String>,
        auth: Authorization,
        user_agent: &str,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| {
                HttpClientError::new(500, format!("Failed to create HTTP client: {}", e), None)
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            method: auth.method(),
            auth: RwLock::new(auth),
        })
    }

    /// API root every path is resolved against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current credentials, including any token obtained through [`Transport::refresh`].
    pub async fn authorization(&self) -> Authorization {
        self.auth.read().await.clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        params: &[(String, String)],
        body: Option<&Value>,
        timeout: Option<Duration>,
    ) -> Result<Value> {
        let url = self.url(path);
        debug!(method = %method, url = %url, "API request");

        let mut request = self.client.request(method, &url);
        if !params.is_empty() {
            request = request.query(params);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        if let Some(header) = self.auth.read().await.header() {
            request = request.header(AUTHORIZATION, header);
        }

        let response = request.send().await.map_err(map_send_error)?;
        decode(response).await
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn auth_method(&self) -> AuthMethod {
        self.method
    }

    async fn get(
        &self,
        path: &str,
        params: &[(String, String)],
        timeout: Option<Duration>,
    ) -> Result<Value> {
        self.send(Method::GET, path, params, None, timeout).await
    }

    async fn post(&self, path: &str, data: &Value) -> Result<Value> {
        self.send(Method::POST, path, &[], Some(data), None).await
    }

    async fn patch(&self, path: &str, data: &Value) -> Result<Value> {
        self.send(Method::PATCH, path, &[], Some(data), None).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.send(Method::DELETE, path, &[], None, None).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn refresh(&self) -> Result<()> {
        let refresh = match &*self.auth.read().await {
            Authorization::Jwt { refresh, .. } => refresh.clone(),
            _ => {
                return Err(
                    HttpClientError::new(401, "No refresh token available", None).into(),
                )
            }
        };

        info!("Refreshing access token");
        let response = self
            .client
            .post(self.url(REFRESH_PATH))
            .json(&json!({ "refresh": refresh }))
            .send()
            .await
            .map_err(map_send_error)?;
        let tokens: RefreshedTokens = serde_json::from_value(decode(response).await?)?;

        let mut auth = self.auth.write().await;
        if let Authorization::Jwt { access, refresh } = &mut *auth {
            *access = tokens.access;
            if let Some(rotated) = tokens.refresh {
                *refresh = rotated;
            }
        }
        debug!("Access token refreshed");
        Ok(())
    }
}

fn map_send_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout
    } else {
        HttpClientError::new(500, err.to_string(), None).into()
    }
}

async fn decode(response: Response) -> Result<Value> {
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.text().await.map_err(map_send_error)?;

    if status.is_success() {
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        return Ok(serde_json::from_str(&body)?);
    }

    let message = error_message(status, &body);
    debug!(status = status.as_u16(), message = %message, "API error");
    let error = HttpClientError::new(status.as_u16(), message, Some(body));

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(RateLimitExceeded {
            limit: header_u64(&headers, "x-ratelimit-limit"),
            remaining: header_u64(&headers, "x-ratelimit-remaining"),
            reset: header_u64(&headers, "x-ratelimit-reset"),
            retry: header_u64(&headers, "retry-after"),
            response: error,
        }
        .into());
    }
    Err(error.into())
}

/// DRF puts the human-readable reason in `detail`.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("detail").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        })
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_detail() {
        assert_eq!(
            error_message(StatusCode::NOT_FOUND, r#"{"detail": "Not found."}"#),
            "Not found."
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "<html>"),
            "Bad Gateway"
        );
    }

    #[test]
    fn test_url_joins_paths() {
        let transport =
            HttpTransport::new("https://sotagents.com/api/v1/", Authorization::Anonymous).unwrap();
        assert_eq!(
            transport.url("/papers/"),
            "https://sotagents.com/api/v1/papers/"
        );
        assert_eq!(transport.base_url(), "https://sotagents.com/api/v1");
    }
}
