//! Mock transport for testing purposes.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::{ClientError, HttpClientError, Result};
use crate::transport::{AuthMethod, Transport};

/// One call received by a [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub path: String,
    pub params: Vec<(String, String)>,
    pub timeout: Option<Duration>,
    pub body: Option<Value>,
}

impl RecordedCall {
    /// Value of a query parameter.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A transport that answers from queues and records every call.
///
/// Requests pop the next queued response; an empty queue answers 500. Refreshes
/// pop the next queued refresh outcome and succeed when none is queued.
#[derive(Debug)]
pub struct MockTransport {
    auth_method: AuthMethod,
    responses: Mutex<VecDeque<Result<Value>>>,
    refreshes: Mutex<VecDeque<Result<()>>>,
    calls: Mutex<Vec<RecordedCall>>,
    refresh_count: Mutex<usize>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new(AuthMethod::Anonymous)
    }
}

impl MockTransport {
    /// Create a new mock transport using the given authentication mode.
    pub fn new(auth_method: AuthMethod) -> Self {
        Self {
            auth_method,
            responses: Mutex::new(VecDeque::new()),
            refreshes: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            refresh_count: Mutex::new(0),
        }
    }

    /// Queue a successful response.
    pub fn push_response(&self, value: Value) -> &Self {
        self.responses.lock().unwrap().push_back(Ok(value));
        self
    }

    /// Queue a failed response.
    pub fn push_error(&self, error: impl Into<ClientError>) -> &Self {
        self.responses.lock().unwrap().push_back(Err(error.into()));
        self
    }

    /// Queue the outcome of the next refresh.
    pub fn push_refresh(&self, outcome: Result<()>) -> &Self {
        self.refreshes.lock().unwrap().push_back(outcome);
        self
    }

    /// Every request received so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Most recent request.
    pub fn last_call(&self) -> Option<RecordedCall> {
        self.calls.lock().unwrap().last().cloned()
    }

    /// Number of refreshes performed.
    pub fn refresh_count(&self) -> usize {
        *self.refresh_count.lock().unwrap()
    }

    fn answer(
        &self,
        method: &'static str,
        path: &str,
        params: &[(String, String)],
        timeout: Option<Duration>,
        body: Option<&Value>,
    ) -> Result<Value> {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            path: path.to_string(),
            params: params.to_vec(),
            timeout,
            body: body.cloned(),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(HttpClientError::new(500, "No mock response queued", None).into())
            })
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn auth_method(&self) -> AuthMethod {
        self.auth_method
    }

    async fn get(
        &self,
        path: &str,
        params: &[(String, String)],
        timeout: Option<Duration>,
    ) -> Result<Value> {
        self.answer("GET", path, params, timeout, None)
    }

    async fn post(&self, path: &str, data: &Value) -> Result<Value> {
        self.answer("POST", path, &[], None, Some(data))
    }

    async fn patch(&self, path: &str, data: &Value) -> Result<Value> {
        self.answer("PATCH", path, &[], None, Some(data))
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.answer("DELETE", path, &[], None, None).map(|_| ())
    }

    async fn refresh(&self) -> Result<()> {
        *self.refresh_count.lock().unwrap() += 1;
        self.refreshes.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}
