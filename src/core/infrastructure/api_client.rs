//! Internal HTTP client shared by every upstream fetcher.

use crate::{
    config::ClientConfig,
    core::{
        domain::{
            error::{OpenStackError, OpenStackResult},
            model::{
                openstack_auth::OpenStackAuth, openstack_connection::OpenStackConnection,
                service_endpoints::ServiceKind,
            },
            value_object::{OpenStackUrl, ProjectId},
        },
        infrastructure::token_manager::TokenManager,
    },
};
use governor::DefaultDirectRateLimiter;
use reqwest::{Client, StatusCode, header::ACCEPT};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Header carrying the token on every authenticated call.
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Internal HTTP client that attaches the identity token to each request and
/// classifies upstream failures.
///
/// Calls are bounded by a semaphore (`max_concurrent_requests`) and, when
/// configured, by a token-bucket rate limiter. Both are shared by every
/// invocation made through the same client. A `401 Unauthorized` from any
/// service drops the token that was used; the call itself is not retried.
#[derive(Debug)]
pub struct ApiClient {
    http_client: Client,
    connection: Arc<OpenStackConnection>,
    tokens: Arc<TokenManager>,
    config: Arc<ClientConfig>,
    rate_limiter: Option<Arc<DefaultDirectRateLimiter>>,
    permits: Arc<Semaphore>,
}

impl ApiClient {
    /// Creates a new `ApiClient`. No token is obtained until the first call.
    ///
    /// # Errors
    /// Returns `OpenStackError::Validation` for an unusable `config` and
    /// `OpenStackError::Unexpected` if the HTTP client cannot be built.
    pub fn new(connection: OpenStackConnection, config: ClientConfig) -> OpenStackResult<Self> {
        config.validate()?;

        let http_client = Client::builder()
            .danger_accept_invalid_certs(!connection.verify_ssl())
            .timeout(connection.request_timeout())
            .build()
            .map_err(|e| OpenStackError::Unexpected(format!("Failed to build HTTP client: {}", e)))?;

        let rate_limiter = config
            .rate_limit
            .map(|rl| rl.quota())
            .transpose()?
            .map(|quota| Arc::new(DefaultDirectRateLimiter::direct(quota)));

        let connection = Arc::new(connection);
        let tokens = Arc::new(TokenManager::new(
            http_client.clone(),
            Arc::clone(&connection),
            config.token_lifetime,
            config.expiry_margin,
        ));

        Ok(Self {
            http_client,
            permits: Arc::new(Semaphore::new(config.max_concurrent_requests)),
            connection,
            tokens,
            config: Arc::new(config),
            rate_limiter,
        })
    }

    /// Returns a reference to the underlying connection details.
    pub fn connection(&self) -> &OpenStackConnection {
        &self.connection
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// Returns a valid token scoped to `project`, exchanging credentials if needed.
    ///
    /// # Errors
    /// Returns `OpenStackError::Authentication` if the identity exchange fails.
    pub async fn authenticate(&self, project: &ProjectId) -> OpenStackResult<OpenStackAuth> {
        self.tokens.ensure_token(project).await
    }

    /// Base URL of `kind`: the token's catalog entry when catalog routing is
    /// enabled and the catalog lists the service, the configured endpoint otherwise.
    pub fn service_url(&self, auth: &OpenStackAuth, kind: ServiceKind) -> OpenStackUrl {
        if self.config.use_service_catalog {
            if let Some(url) = auth.catalog().url_for(kind) {
                return url.clone();
            }
            tracing::debug!(service = %kind, "no catalog entry, using configured endpoint");
        }
        self.connection.endpoints().get(kind).clone()
    }

    /// Performs an authenticated GET request and decodes the JSON body.
    ///
    /// `what` names the resource in error messages, e.g. `"server abc-123"`.
    ///
    /// # Errors
    /// - `OpenStackError::NotFound` for a 404
    /// - `OpenStackError::Upstream` for any other non-2xx status (with the
    ///   truncated body) and for timeouts (without a status)
    /// - `OpenStackError::Unexpected` for other transport failures and for
    ///   bodies that cannot be decoded as `T`
    pub async fn get<T>(&self, auth: &OpenStackAuth, url: &str, what: &str) -> OpenStackResult<T>
    where
        T: DeserializeOwned,
    {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| OpenStackError::Unexpected(format!("Request pool closed: {}", e)))?;

        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        tracing::debug!("GET {}", url);
        let response = self
            .http_client
            .get(url)
            .header(AUTH_TOKEN_HEADER, auth.token().as_str())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| transport_error(e, what))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.tokens.invalidate(auth.project_id(), auth.token()).await;
        }
        if status == StatusCode::NOT_FOUND {
            return Err(OpenStackError::NotFound {
                message: format!("{} not found", what),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OpenStackError::upstream(
                format!("Fetching {} failed ({})", what, status),
                Some(status.as_u16()),
                Some(body.as_str()).filter(|b| !b.trim().is_empty()),
            ));
        }

        let bytes = response.bytes().await.map_err(|e| transport_error(e, what))?;
        serde_json::from_slice::<T>(&bytes).map_err(|e| {
            OpenStackError::Unexpected(format!("Failed to parse {}: {}", what, e))
        })
    }
}

fn transport_error(error: reqwest::Error, what: &str) -> OpenStackError {
    if error.is_timeout() {
        OpenStackError::upstream(format!("Fetching {} timed out", what), None, None)
    } else {
        OpenStackError::Unexpected(format!("HTTP request for {} failed: {}", what, error))
    }
}
