//! Per-project cache of identity tokens.

use crate::{
    auth::application::service::token_service::TokenService,
    core::domain::{
        error::OpenStackResult,
        model::{openstack_auth::OpenStackAuth, openstack_connection::OpenStackConnection},
        value_object::{OpenStackToken, ProjectId},
    },
};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// The token slot of one project scope.
type Slot = Arc<Mutex<Option<OpenStackAuth>>>;

/// Owns the tokens of one credential set, one per project scope.
///
/// Each project has its own slot, locked for the whole identity exchange:
/// concurrent callers of one project wait for the exchange in flight and
/// reuse its result, while other projects are not held up. The map of
/// slots is only locked long enough to find or create a slot.
#[derive(Debug)]
pub struct TokenManager {
    http_client: Client,
    connection: Arc<OpenStackConnection>,
    service: TokenService,
    token_lifetime: Duration,
    expiry_margin: Duration,
    sessions: Mutex<HashMap<ProjectId, Slot>>,
}

impl TokenManager {
    pub fn new(
        http_client: Client,
        connection: Arc<OpenStackConnection>,
        token_lifetime: Duration,
        expiry_margin: Duration,
    ) -> Self {
        Self {
            http_client,
            connection,
            service: TokenService::new(),
            token_lifetime,
            expiry_margin,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    async fn slot(&self, project: &ProjectId) -> Slot {
        let mut sessions = self.sessions.lock().await;
        Arc::clone(sessions.entry(project.clone()).or_default())
    }

    async fn existing_slot(&self, project: &ProjectId) -> Option<Slot> {
        self.sessions.lock().await.get(project).cloned()
    }

    /// Returns the cached token for `project` if it is still valid, otherwise
    /// performs one identity exchange and caches its result.
    ///
    /// # Errors
    /// Returns `OpenStackError::Authentication` when the exchange fails. The
    /// cache is left as it was.
    pub async fn ensure_token(&self, project: &ProjectId) -> OpenStackResult<OpenStackAuth> {
        let slot = self.slot(project).await;
        let mut cached = slot.lock().await;
        if let Some(auth) = cached.as_ref() {
            if !auth.token().is_expired(self.expiry_margin) {
                return Ok(auth.clone());
            }
            tracing::debug!(project_id = %project, "cached token expired");
        }

        let auth = self
            .service
            .execute(
                &self.http_client,
                &self.connection,
                project,
                self.token_lifetime,
            )
            .await?;
        *cached = Some(auth.clone());
        Ok(auth)
    }

    /// The cached, unexpired token for `project`, without any exchange.
    ///
    /// Waits for an exchange of `project` that is in flight.
    pub async fn cached(&self, project: &ProjectId) -> Option<OpenStackAuth> {
        let slot = self.existing_slot(project).await?;
        let cached = slot.lock().await;
        cached
            .as_ref()
            .filter(|auth| !auth.token().is_expired(self.expiry_margin))
            .cloned()
    }

    /// Drops the cached token for `project` if it is still `token`. A token
    /// refreshed meanwhile by another caller is kept.
    pub async fn invalidate(&self, project: &ProjectId, token: &OpenStackToken) {
        let Some(slot) = self.existing_slot(project).await else {
            return;
        };
        let mut cached = slot.lock().await;
        if cached
            .as_ref()
            .is_some_and(|auth| auth.token().as_str() == token.as_str())
        {
            tracing::info!(project_id = %project, "dropping rejected token");
            *cached = None;
        }
    }

    #[cfg(test)]
    pub(crate) async fn set_auth(&self, auth: OpenStackAuth) {
        let slot = self.slot(auth.project_id()).await;
        *slot.lock().await = Some(auth);
    }
}
