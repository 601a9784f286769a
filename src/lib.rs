pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{Cli, Command};

pub use adapters::{ReqwestTransport, TracingObserver};
pub use config::{PortalSettings, PRIMARY_PORTAL_ADDRESS};
pub use core::{
    client::{PortalApiClient, RequestOptions},
    connectivity::test_connectivity,
    request_builder::PortalRequestBuilder,
    resolver::PortalAddressResolver,
};
pub use domain::model::{HostKind, PortalAddress};
pub use utils::error::{PortalError, Result};
