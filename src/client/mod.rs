//! Client facade over the sotagents API.
//!
//! [`Client`] exposes one async method per API operation. Every method builds its
//! path and parameters, calls the [`Transport`], applies the [`AuthRetry`] policy on
//! a 401 and validates the answer into a typed model or [`Page`].
//!
//! ```no_run
//! use sotagents::client::{Client, Pagination, PaperFilter};
//! use sotagents::config::Config;
//!
//! # async fn run() -> sotagents::error::Result<()> {
//! let client = Client::from_config(&Config::default(), None)?;
//! let papers = client
//!     .paper_list(&PaperFilter::new().q("attention"), Pagination::default())
//!     .await?;
//! for paper in papers {
//!     println!("{}", paper.title);
//! }
//! # Ok(())
//! # }
//! ```

mod conferences;
mod datasets;
mod evaluations;
mod papers;
mod params;
mod repositories;
mod retry;
mod tasks;

pub use params::{
    AreaFilter, AuthorFilter, ConferenceFilter, DatasetFilter, Filter, MethodFilter, Pagination,
    PaperFilter, Params, RepositoryFilter, SearchFilter, TaskFilter, SEARCH_TIMEOUT,
};
pub use retry::AuthRetry;

use serde_json::Value;
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::config::Config;
use crate::error::Result;
use crate::models::{Model, Page};
use crate::transport::{HttpTransport, Transport};

/// Typed client for the sotagents API.
#[derive(Debug, Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    retry: AuthRetry,
}

impl Client {
    /// Create a client over any transport. The retry policy follows the transport's
    /// authentication mode.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let retry = AuthRetry::for_method(transport.auth_method());
        Self { transport, retry }
    }

    /// Create an HTTP client from the configuration.
    ///
    /// An explicit `token` selects static token authentication. Otherwise a stored
    /// access/refresh pair selects refreshable authentication, and without either the
    /// client is anonymous.
    pub fn from_config(config: &Config, token: Option<String>) -> Result<Self> {
        let transport = HttpTransport::new(config.api_url(), config.authorization(token))?;
        Ok(Self::new(Arc::new(transport)))
    }

    /// Retry policy in effect
    pub fn auth_retry(&self) -> AuthRetry {
        self.retry
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    async fn get_value(
        &self,
        path: &str,
        params: &[(String, String)],
        timeout: Option<Duration>,
    ) -> Result<Value> {
        let transport = self.transport.as_ref();
        self.retry
            .run(transport, move || transport.get(path, params, timeout))
            .await
    }

    #[instrument(skip(self), fields(path = %path))]
    async fn fetch<T: Model>(&self, path: &str) -> Result<T> {
        let value = self.get_value(path, &[], None).await?;
        Ok(T::from_value(value)?)
    }

    #[instrument(skip(self, params), fields(path = %path))]
    async fn fetch_page<T: Model>(
        &self,
        path: &str,
        params: Params,
        timeout: Option<Duration>,
    ) -> Result<Page<T>> {
        let value = self.get_value(path, &params, timeout).await?;
        Ok(Page::from_response(value)?)
    }

    /// Unfiltered listing of a sub-resource.
    async fn fetch_listing<T: Model>(&self, path: &str, pagination: Pagination) -> Result<Page<T>> {
        self.fetch_page(path, pagination.params(), None).await
    }

    /// Filtered listing; full-text filters request the longer deadline.
    async fn fetch_filtered<T: Model>(
        &self,
        path: &str,
        filter: &impl Filter,
        pagination: Pagination,
    ) -> Result<Page<T>> {
        self.fetch_page(path, params::listing(filter, pagination), filter.timeout())
            .await
    }

    #[instrument(skip(self, payload), fields(path = %path))]
    async fn create<T: Model>(&self, path: &str, payload: Value) -> Result<T> {
        let transport = self.transport.as_ref();
        let data = &payload;
        let value = self
            .retry
            .run(transport, move || transport.post(path, data))
            .await?;
        Ok(T::from_value(value)?)
    }

    #[instrument(skip(self, payload), fields(path = %path))]
    async fn modify<T: Model>(&self, path: &str, payload: Value) -> Result<T> {
        let transport = self.transport.as_ref();
        let data = &payload;
        let value = self
            .retry
            .run(transport, move || transport.patch(path, data))
            .await?;
        Ok(T::from_value(value)?)
    }

    #[instrument(skip(self), fields(path = %path))]
    async fn remove(&self, path: &str) -> Result<()> {
        let transport = self.transport.as_ref();
        self.retry
            .run(transport, move || transport.delete(path))
            .await
    }
}

/// Percent-encode an identifier used as a path segment.
fn seg(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{AuthMethod, MockTransport};

    #[test]
    fn test_policy_follows_auth_method() {
        let client = Client::new(Arc::new(MockTransport::new(AuthMethod::Jwt)));
        assert_eq!(client.auth_retry(), AuthRetry::RefreshOnce);

        let client = Client::new(Arc::new(MockTransport::new(AuthMethod::Token)));
        assert_eq!(client.auth_retry(), AuthRetry::Never);
    }

    #[test]
    fn test_from_config_selects_authorization() {
        let mut config = Config::default();
        let client = Client::from_config(&config, None).unwrap();
        assert_eq!(client.auth_retry(), AuthRetry::Never);

        config.token_access = Some("access".into());
        config.token_refresh = Some("refresh".into());
        let client = Client::from_config(&config, None).unwrap();
        assert_eq!(client.transport().auth_method(), AuthMethod::Jwt);

        let client = Client::from_config(&config, Some("static".into())).unwrap();
        assert_eq!(client.transport().auth_method(), AuthMethod::Token);
    }

    #[test]
    fn test_path_segments_are_encoded() {
        assert_eq!(seg("a b/c"), "a%20b%2Fc");
        assert_eq!(
            seg("attention-is-all-you-need"),
            "attention-is-all-you-need"
        );
    }
}
