//! Base URLs of the five upstream services.

use crate::core::domain::{
    error::ValidationError,
    value_object::{OpenStackHost, OpenStackUrl},
};
use std::fmt;

/// One of the upstream API surfaces the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    Identity,
    Compute,
    Network,
    Volume,
    Image,
}

impl ServiceKind {
    /// Service types under which the service appears in a Keystone catalog.
    #[must_use]
    pub fn catalog_types(self) -> &'static [&'static str] {
        match self {
            Self::Identity => &["identity"],
            Self::Compute => &["compute"],
            Self::Network => &["network"],
            Self::Volume => &["volumev3", "block-storage", "volume"],
            Self::Image => &["image"],
        }
    }

    /// Port and version path of the conventional single-host deployment.
    fn default_location(self) -> (u16, &'static str) {
        match self {
            Self::Identity => (5000, "v3"),
            Self::Compute => (8774, "v2.1"),
            Self::Network => (9696, "v2.0"),
            Self::Volume => (8776, "v3"),
            Self::Image => (9292, "v2"),
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Identity => "identity",
            Self::Compute => "compute",
            Self::Network => "network",
            Self::Volume => "volume",
            Self::Image => "image",
        };
        f.write_str(name)
    }
}

/// Configured base URL for every service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoints {
    identity: OpenStackUrl,
    compute: OpenStackUrl,
    network: OpenStackUrl,
    volume: OpenStackUrl,
    image: OpenStackUrl,
}

impl ServiceEndpoints {
    /// Derives every endpoint from a single controller host using the fixed
    /// ports of a default deployment (Keystone on 5000, Nova on 8774, ...).
    pub fn for_host(host: &OpenStackHost, secure: bool) -> Result<Self, ValidationError> {
        let scheme = if secure { "https" } else { "http" };
        let authority = if host.as_str().contains(':') {
            format!("[{}]", host.as_str())
        } else {
            host.as_str().to_string()
        };
        let url = |kind: ServiceKind| {
            let (port, version) = kind.default_location();
            OpenStackUrl::new(format!("{}://{}:{}/{}", scheme, authority, port, version))
        };

        Ok(Self {
            identity: url(ServiceKind::Identity)?,
            compute: url(ServiceKind::Compute)?,
            network: url(ServiceKind::Network)?,
            volume: url(ServiceKind::Volume)?,
            image: url(ServiceKind::Image)?,
        })
    }

    #[must_use]
    pub fn get(&self, kind: ServiceKind) -> &OpenStackUrl {
        match kind {
            ServiceKind::Identity => &self.identity,
            ServiceKind::Compute => &self.compute,
            ServiceKind::Network => &self.network,
            ServiceKind::Volume => &self.volume,
            ServiceKind::Image => &self.image,
        }
    }

    pub fn set(&mut self, kind: ServiceKind, url: OpenStackUrl) {
        let slot = match kind {
            ServiceKind::Identity => &mut self.identity,
            ServiceKind::Compute => &mut self.compute,
            ServiceKind::Network => &mut self.network,
            ServiceKind::Volume => &mut self.volume,
            ServiceKind::Image => &mut self.image,
        };
        *slot = url;
    }
}
