use crate::core::domain::model::{
    diagnostic::Diagnostic,
    flavor::Flavor,
    image::Image,
    port::{InterfaceAttachment, Port},
    server::Server,
    server_group::ServerGroup,
    volume::Volume,
};
use serde_json::Value;
use std::collections::BTreeMap;

/// Everything gathered for one instance, before normalization.
///
/// Optional sections that could not be fetched are left empty; the reason
/// is in `diagnostics`.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerBundle {
    /// Id reported by compute, or the requested one when compute omits it.
    pub instance_id: String,
    /// Owning project of the server, or the requested project.
    pub project_id: String,
    pub project_name: Option<String>,
    pub server: Server,
    /// The compute record exactly as received.
    pub raw: Value,
    /// Looked-up flavor, only when the embedded one lacks sizes.
    pub flavor: Option<Flavor>,
    pub interfaces: Vec<InterfaceAttachment>,
    /// Port details keyed by port id.
    pub ports: BTreeMap<String, Port>,
    pub volumes: Vec<Volume>,
    pub image: Option<Image>,
    pub server_group: Option<ServerGroup>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ServerBundle {
    /// A bundle holding only the compute record.
    #[cfg(test)]
    pub(crate) fn new(
        instance_id: impl Into<String>,
        project_id: impl Into<String>,
        server: Server,
        raw: Value,
    ) -> Self {
        Self {
            instance_id: instance_id.into(),
            project_id: project_id.into(),
            project_name: None,
            server,
            raw,
            flavor: None,
            interfaces: Vec::new(),
            ports: BTreeMap::new(),
            volumes: Vec::new(),
            image: None,
            server_group: None,
            diagnostics: Vec::new(),
        }
    }
}
