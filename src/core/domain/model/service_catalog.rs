use crate::{
    auth::application::response::token_response::CatalogEntry,
    core::domain::{model::service_endpoints::ServiceKind, value_object::OpenStackUrl},
};
use std::collections::HashMap;

/// Public endpoint per service type, as advertised by Keystone with a token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceCatalog {
    endpoints: HashMap<String, OpenStackUrl>,
}

impl ServiceCatalog {
    /// Keeps the `public` interface of every entry; entries without a valid
    /// public URL are skipped.
    pub fn from_entries(entries: &[CatalogEntry]) -> Self {
        let endpoints = entries
            .iter()
            .filter_map(|entry| {
                let endpoint = entry
                    .endpoints
                    .iter()
                    .find(|endpoint| endpoint.interface.eq_ignore_ascii_case("public"))?;
                let url = OpenStackUrl::new(&endpoint.url).ok()?;
                Some((entry.service_type.clone(), url))
            })
            .collect();
        Self { endpoints }
    }

    #[must_use]
    pub fn url_for(&self, kind: ServiceKind) -> Option<&OpenStackUrl> {
        kind.catalog_types()
            .iter()
            .find_map(|service_type| self.endpoints.get(*service_type))
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
