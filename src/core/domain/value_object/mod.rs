mod identifier;
mod openstack_host;
mod openstack_password;
mod openstack_token;
mod openstack_url;
mod openstack_username;
pub(crate) mod serde_helpers;

pub use identifier::{InstanceId, ProjectId, UserDomain};
pub use openstack_host::OpenStackHost;
pub use openstack_password::OpenStackPassword;
pub use openstack_token::OpenStackToken;
pub use openstack_url::OpenStackUrl;
pub use openstack_username::OpenStackUsername;
