use crate::core::domain::{
    model::service_catalog::ServiceCatalog,
    value_object::{OpenStackToken, ProjectId},
};

/// A project-scoped session: the token, the scope it was issued for and the
/// catalog Keystone returned with it.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenStackAuth {
    token: OpenStackToken,
    project_id: ProjectId,
    project_name: Option<String>,
    catalog: ServiceCatalog,
}

impl OpenStackAuth {
    pub fn new(
        token: OpenStackToken,
        project_id: ProjectId,
        project_name: Option<String>,
        catalog: ServiceCatalog,
    ) -> Self {
        Self {
            token,
            project_id,
            project_name,
            catalog,
        }
    }

    pub fn token(&self) -> &OpenStackToken {
        &self.token
    }

    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    /// Project name as reported in the token body, if any.
    pub fn project_name(&self) -> Option<&str> {
        self.project_name.as_deref()
    }

    pub fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }
}
