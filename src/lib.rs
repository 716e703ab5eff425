//! An async client that describes one OpenStack server by aggregating the
//! identity, compute, networking, block storage and image APIs.

mod aggregation;
mod auth;
mod config;
mod core;
mod resources;

pub use crate::config::{ClientConfig, RateLimitConfig, ServerGroupLookup};
pub use crate::core::domain::error::{
    ErrorBody, ErrorEnvelope, MAX_BODY_LENGTH, OpenStackError, OpenStackResult, ValidationError,
};
pub use crate::core::domain::model::{
    diagnostic::{Diagnostic, FetchStage},
    invocation::{GetServerRequest, InvocationOutcome},
    server_details::{
        FlavorSummary, ImageSummary, InterfaceSummary, ProjectSummary, RawPayloads,
        ServerDetails, ServerGroupSummary, ServerReport, VolumeSummary,
    },
    service_endpoints::ServiceKind,
};
pub use crate::core::domain::value_object::{
    InstanceId, OpenStackHost, OpenStackPassword, OpenStackUrl, OpenStackUsername, ProjectId,
    UserDomain,
};
use crate::{
    aggregation::{ServerAggregator, normalize},
    config::{DEFAULT_REQUEST_TIMEOUT, EnvSettings},
    core::{
        domain::model::{
            openstack_connection::OpenStackConnection, service_endpoints::ServiceEndpoints,
        },
        infrastructure::api_client::ApiClient,
    },
};
use std::sync::Arc;
use std::time::Duration;

/// A client for describing OpenStack servers
///
/// One client owns one credential set and one token cache; it can serve
/// any number of concurrent lookups.
///
/// # Examples
///
/// ```no_run
/// use openstack_inspector::{GetServerRequest, OpenStackClient, OpenStackResult};
///
/// #[tokio::main]
/// async fn main() -> OpenStackResult<()> {
///     let client = OpenStackClient::builder()
///         .host("controller.example.com")?
///         .credentials("admin", "password", "8a9f7c0e2b4d4f0c9e1a3b5c7d9e1f20")?
///         .secure(true)
///         .build()?;
///
///     let server = client.get_server("abc-123", None).await?;
///     println!("{} is {}", server.name, server.status);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct OpenStackClient {
    api_client: Arc<ApiClient>,
    aggregator: ServerAggregator<ApiClient>,
}

/// Builder for OpenStackClient configuration
#[derive(Debug)]
pub struct OpenStackClientBuilder {
    host: Option<OpenStackHost>,
    username: Option<OpenStackUsername>,
    password: Option<OpenStackPassword>,
    project_id: Option<ProjectId>,
    user_domain: UserDomain,
    secure: bool,
    verify_ssl: bool,
    request_timeout: Duration,
    endpoint_overrides: Vec<(ServiceKind, OpenStackUrl)>,
    config: ClientConfig,
}

impl Default for OpenStackClientBuilder {
    fn default() -> Self {
        Self {
            host: None,
            username: None,
            password: None,
            project_id: None,
            user_domain: UserDomain::default(),
            secure: false,
            verify_ssl: false,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            endpoint_overrides: Vec::new(),
            config: ClientConfig::default(),
        }
    }
}

impl OpenStackClientBuilder {
    /// Starts from the `OS_*` environment variables.
    ///
    /// # Errors
    /// Returns `OpenStackError::Validation` naming every missing required
    /// variable, or describing the first invalid one.
    pub fn from_env() -> OpenStackResult<Self> {
        Self::from_settings(EnvSettings::from_env()?)
    }

    pub(crate) fn from_settings(settings: EnvSettings) -> OpenStackResult<Self> {
        let mut builder = Self::default()
            .host(settings.host)?
            .credentials(settings.username, settings.password, settings.project_id)?
            .user_domain(settings.user_domain)?
            .verify_ssl(settings.verify_ssl);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.request_timeout(timeout);
        }
        Ok(builder)
    }

    pub fn host(mut self, host: impl Into<String>) -> OpenStackResult<Self> {
        self.host = Some(OpenStackHost::new(host)?);
        Ok(self)
    }

    /// Sets the user credentials and the default project of every lookup.
    pub fn credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
        project_id: impl Into<String>,
    ) -> OpenStackResult<Self> {
        self.username = Some(OpenStackUsername::new(username)?);
        self.password = Some(OpenStackPassword::new(password)?);
        self.project_id = Some(ProjectId::new(project_id.into())?);
        Ok(self)
    }

    pub fn user_domain(mut self, user_domain: impl Into<String>) -> OpenStackResult<Self> {
        self.user_domain = UserDomain::new(user_domain.into())?;
        Ok(self)
    }

    /// Use https for the endpoints derived from the host.
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Verify TLS certificates (off by default, for self-signed lab clouds).
    pub fn verify_ssl(mut self, verify_ssl: bool) -> Self {
        self.verify_ssl = verify_ssl;
        self
    }

    /// Timeout applied to each upstream call.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Replaces the endpoint derived from the host for one service.
    pub fn endpoint(mut self, kind: ServiceKind, url: impl AsRef<str>) -> OpenStackResult<Self> {
        let url = OpenStackUrl::new(url)?;
        self.endpoint_overrides.retain(|(existing, _)| *existing != kind);
        self.endpoint_overrides.push((kind, url));
        Ok(self)
    }

    pub fn identity_url(self, url: impl AsRef<str>) -> OpenStackResult<Self> {
        self.endpoint(ServiceKind::Identity, url)
    }

    pub fn compute_url(self, url: impl AsRef<str>) -> OpenStackResult<Self> {
        self.endpoint(ServiceKind::Compute, url)
    }

    pub fn network_url(self, url: impl AsRef<str>) -> OpenStackResult<Self> {
        self.endpoint(ServiceKind::Network, url)
    }

    pub fn volume_url(self, url: impl AsRef<str>) -> OpenStackResult<Self> {
        self.endpoint(ServiceKind::Volume, url)
    }

    pub fn image_url(self, url: impl AsRef<str>) -> OpenStackResult<Self> {
        self.endpoint(ServiceKind::Image, url)
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the client. No network call is made.
    ///
    /// # Errors
    /// Returns `OpenStackError::Validation` when the host or credentials are
    /// missing, the timeout is zero, or `config` is unusable.
    pub fn build(self) -> OpenStackResult<OpenStackClient> {
        let host = self.host.ok_or_else(|| required("host"))?;
        let username = self.username.ok_or_else(|| required("username"))?;
        let password = self.password.ok_or_else(|| required("password"))?;
        let project_id = self.project_id.ok_or_else(|| required("project_id"))?;

        if self.request_timeout.is_zero() {
            return Err(ValidationError::Field {
                field: "request_timeout".to_string(),
                message: "Request timeout must be greater than zero".to_string(),
            }
            .into());
        }

        let mut endpoints = ServiceEndpoints::for_host(&host, self.secure)?;
        for (kind, url) in self.endpoint_overrides {
            endpoints.set(kind, url);
        }

        let connection = OpenStackConnection::new(
            host,
            username,
            password,
            project_id,
            self.user_domain,
            self.verify_ssl,
            self.request_timeout,
            endpoints,
        );

        let config = Arc::new(self.config.clone());
        let api_client = Arc::new(ApiClient::new(connection, self.config)?);
        let aggregator = ServerAggregator::new(Arc::clone(&api_client), config);

        Ok(OpenStackClient {
            api_client,
            aggregator,
        })
    }
}

fn required(field: &str) -> OpenStackError {
    ValidationError::Field {
        field: field.to_string(),
        message: format!("{} is required", field),
    }
    .into()
}

impl OpenStackClient {
    /// Creates a new builder for OpenStackClient configuration
    pub fn builder() -> OpenStackClientBuilder {
        OpenStackClientBuilder::default()
    }

    /// The project used when a request names none.
    pub fn default_project(&self) -> &ProjectId {
        self.api_client.connection().project_id()
    }

    /// Obtains a token for `project_id` (the default project when `None`)
    /// unless a valid one is already cached.
    ///
    /// # Errors
    ///
    /// This method will return an error if:
    /// - `project_id` is not a valid identifier
    /// - The credentials are rejected
    /// - The identity service is unreachable or times out
    pub async fn login(&self, project_id: Option<&str>) -> OpenStackResult<()> {
        let project = self.resolve_project(project_id)?;
        self.api_client.authenticate(&project).await?;
        Ok(())
    }

    /// Returns true if an unexpired token is cached for `project_id`
    pub async fn is_authenticated(&self, project_id: Option<&str>) -> bool {
        match self.resolve_project(project_id) {
            Ok(project) => self.api_client.tokens().cached(&project).await.is_some(),
            Err(_) => false,
        }
    }

    /// Describes one server together with the optional lookups that failed.
    ///
    /// # Errors
    ///
    /// - `OpenStackError::Validation` for a blank or malformed `instance_id`
    ///   or `project_id`; nothing is sent in that case
    /// - `OpenStackError::Authentication` when no token can be obtained
    /// - `OpenStackError::NotFound` when compute does not know the instance
    /// - `OpenStackError::Upstream` or `OpenStackError::Unexpected` when the
    ///   compute lookup fails otherwise
    pub async fn inspect(&self, request: &GetServerRequest) -> OpenStackResult<ServerReport> {
        let request = request.validate(self.default_project())?;
        let bundle = self.aggregator.aggregate(&request).await?;
        let server = normalize(&bundle);
        tracing::info!(
            instance_id = %server.instance_id,
            diagnostics = bundle.diagnostics.len(),
            "server described"
        );
        Ok(ServerReport {
            server,
            diagnostics: bundle.diagnostics,
        })
    }

    /// Describes one server.
    ///
    /// # Errors
    /// See [`OpenStackClient::inspect`].
    pub async fn get_server(
        &self,
        instance_id: &str,
        project_id: Option<&str>,
    ) -> OpenStackResult<ServerDetails> {
        let mut request = GetServerRequest::new(instance_id);
        request.project_id = project_id.map(str::to_string);
        Ok(self.inspect(&request).await?.server)
    }

    /// Host-facing entry point: always yields either the record or the
    /// structured error.
    pub async fn invoke(&self, request: &GetServerRequest) -> InvocationOutcome {
        let result = self.inspect(request).await.map(|report| report.server);
        if let Err(e) = &result {
            tracing::warn!(
                instance_id = %request.instance_id.trim(),
                error_type = e.kind(),
                "lookup failed: {}",
                e
            );
        }
        InvocationOutcome::from(result)
    }

    fn resolve_project(&self, project_id: Option<&str>) -> OpenStackResult<ProjectId> {
        match project_id.map(str::trim).filter(|p| !p.is_empty()) {
            Some(project) => Ok(ProjectId::new(project)?),
            None => Ok(self.default_project().clone()),
        }
    }
}
