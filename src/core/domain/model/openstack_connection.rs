use crate::core::domain::{
    model::service_endpoints::ServiceEndpoints,
    value_object::{OpenStackHost, OpenStackPassword, OpenStackUsername, ProjectId, UserDomain},
};
use std::time::Duration;

/// Credentials and transport settings of one client. Immutable once built.
#[derive(Debug, Clone)]
pub struct OpenStackConnection {
    host: OpenStackHost,
    username: OpenStackUsername,
    password: OpenStackPassword,
    project_id: ProjectId,
    user_domain: UserDomain,
    verify_ssl: bool,
    request_timeout: Duration,
    endpoints: ServiceEndpoints,
}

impl OpenStackConnection {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        host: OpenStackHost,
        username: OpenStackUsername,
        password: OpenStackPassword,
        project_id: ProjectId,
        user_domain: UserDomain,
        verify_ssl: bool,
        request_timeout: Duration,
        endpoints: ServiceEndpoints,
    ) -> Self {
        Self {
            host,
            username,
            password,
            project_id,
            user_domain,
            verify_ssl,
            request_timeout,
            endpoints,
        }
    }

    pub fn host(&self) -> &OpenStackHost {
        &self.host
    }

    pub fn username(&self) -> &OpenStackUsername {
        &self.username
    }

    pub fn password(&self) -> &OpenStackPassword {
        &self.password
    }

    /// The project used when a request does not name one.
    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    pub fn user_domain(&self) -> &UserDomain {
        &self.user_domain
    }

    pub fn verify_ssl(&self) -> bool {
        self.verify_ssl
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn endpoints(&self) -> &ServiceEndpoints {
        &self.endpoints
    }
}
