//! Single refresh-and-retry on authentication failure.

use std::future::Future;
use tracing::{debug, warn};

use crate::error::Result;
use crate::transport::{AuthMethod, Transport};

/// What to do when the server answers 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRetry {
    /// Surface the error as is
    Never,
    /// Refresh the access token once, then retry the call once
    RefreshOnce,
}

impl AuthRetry {
    /// Policy matching an authentication mode; only token pairs can be refreshed.
    pub fn for_method(method: AuthMethod) -> Self {
        match method {
            AuthMethod::Jwt => AuthRetry::RefreshOnce,
            AuthMethod::Anonymous | AuthMethod::Token => AuthRetry::Never,
        }
    }

    /// Run `call`, applying the policy to a 401 answer.
    ///
    /// When the refresh fails, or the retried call is rejected with 401 again, the
    /// error of the first attempt is returned.
    pub async fn run<T, F, Fut>(&self, transport: &dyn Transport, call: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let err = match call().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if *self == AuthRetry::Never || !err.is_unauthorized() {
            return Err(err);
        }

        if let Err(refresh_err) = transport.refresh().await {
            warn!(error = %refresh_err, "Failed to refresh token");
            return Err(err);
        }

        debug!("Retrying request with refreshed token");
        match call().await {
            Ok(value) => Ok(value),
            Err(retry_err) if retry_err.is_unauthorized() => Err(err),
            Err(retry_err) => Err(retry_err),
        }
    }
}
