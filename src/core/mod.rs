pub mod client;
pub mod connectivity;
pub mod request_builder;
pub mod resolver;

pub use crate::domain::model::{HostKind, PortalAddress, ResolverEvent};
pub use crate::domain::ports::{HttpTransport, ResolverObserver};
pub use crate::utils::error::Result;
