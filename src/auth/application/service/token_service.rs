use crate::{
    auth::application::{
        request::token_request::TokenRequest,
        response::token_response::{TokenBody, TokenResponse},
    },
    core::domain::{
        error::{OpenStackError, OpenStackResult, truncate_body},
        model::{
            openstack_auth::OpenStackAuth, openstack_connection::OpenStackConnection,
            service_catalog::ServiceCatalog, service_endpoints::ServiceKind,
        },
        value_object::{OpenStackToken, ProjectId},
    },
};
use chrono::{DateTime, Utc};
use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use std::time::Duration;

/// Header carrying the issued token in a Keystone response.
pub const SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";

/// Performs the Keystone password exchange for one project scope.
#[derive(Debug, Clone)]
pub struct TokenService {
    default_headers: HeaderMap,
}

impl TokenService {
    pub fn new() -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Self { default_headers }
    }

    /// Exchanges the connection's credentials for a token scoped to `project_id`.
    ///
    /// # Errors
    ///
    /// Every failure is an `OpenStackError::Authentication`:
    /// - Keystone answers with a non-2xx status (the status is kept)
    /// - Keystone is unreachable or does not answer within the request timeout
    /// - The response carries no usable `X-Subject-Token`
    pub async fn execute(
        &self,
        client: &Client,
        connection: &OpenStackConnection,
        project_id: &ProjectId,
        fallback_lifetime: Duration,
    ) -> OpenStackResult<OpenStackAuth> {
        let url = connection
            .endpoints()
            .get(ServiceKind::Identity)
            .join("auth/tokens");
        let request = TokenRequest::password(
            connection.username().as_str(),
            connection.password().as_str(),
            connection.user_domain().as_str(),
            project_id.as_str(),
        );

        tracing::debug!(project_id = %project_id, "POST {}", url);
        let response = client
            .post(&url)
            .headers(self.default_headers.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let reason = if e.is_timeout() {
                    "timed out"
                } else {
                    "unreachable"
                };
                OpenStackError::authentication(
                    format!("Identity service {}: {}", reason, e),
                    None,
                )
            })?;

        let status = response.status();
        if status.is_success() {
            return self
                .handle_successful_exchange(response, project_id, fallback_lifetime)
                .await;
        }

        let body = response.text().await.unwrap_or_default();
        let message = match status {
            StatusCode::UNAUTHORIZED => "Invalid credentials provided".to_string(),
            StatusCode::FORBIDDEN => format!("User is not authorized for project {}", project_id),
            StatusCode::NOT_FOUND => "Identity endpoint not found".to_string(),
            _ => format!("Keystone auth failed: {}", status),
        };
        tracing::debug!(status = status.as_u16(), "identity exchange rejected: {}", truncate_body(&body));
        Err(OpenStackError::authentication(message, Some(status.as_u16())))
    }

    async fn handle_successful_exchange(
        &self,
        response: reqwest::Response,
        project_id: &ProjectId,
        fallback_lifetime: Duration,
    ) -> OpenStackResult<OpenStackAuth> {
        let status = response.status().as_u16();
        let token = response
            .headers()
            .get(SUBJECT_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                OpenStackError::authentication(
                    "Missing X-Subject-Token in Keystone response",
                    Some(status),
                )
            })?;

        // The body only enriches the session; a token without it is still usable.
        let body = match response.text().await {
            Ok(text) => serde_json::from_str::<TokenResponse>(&text)
                .map(|parsed| parsed.token)
                .unwrap_or_else(|e| {
                    tracing::debug!("ignoring undecodable token body: {}", e);
                    TokenBody::default()
                }),
            Err(e) => {
                tracing::debug!("failed to read token body: {}", e);
                TokenBody::default()
            }
        };

        let expires_at = body
            .expires_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|at| at.with_timezone(&Utc))
            .unwrap_or_else(|| Utc::now() + fallback_duration(fallback_lifetime));

        let token = OpenStackToken::new(token, expires_at).map_err(|e| {
            OpenStackError::authentication(format!("Keystone returned an unusable token: {}", e), Some(status))
        })?;

        let project_name = body
            .project
            .filter(|project| project.id.as_deref() == Some(project_id.as_str()))
            .and_then(|project| project.name);
        let catalog = ServiceCatalog::from_entries(&body.catalog);

        tracing::info!(project_id = %project_id, expires_at = %expires_at, "obtained identity token");
        Ok(OpenStackAuth::new(token, project_id.clone(), project_name, catalog))
    }
}

fn fallback_duration(lifetime: Duration) -> chrono::Duration {
    chrono::Duration::from_std(lifetime).unwrap_or_else(|_| chrono::Duration::hours(1))
}

impl Default for TokenService {
    fn default() -> Self {
        Self::new()
    }
}
