pub mod diagnostic;
pub mod flavor;
pub mod image;
pub mod invocation;
pub mod openstack_auth;
pub mod openstack_connection;
pub mod port;
pub mod project;
pub mod server;
pub mod server_details;
pub mod server_group;
pub mod service_catalog;
pub mod service_endpoints;
pub mod volume;
