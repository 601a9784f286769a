use crate::domain::model::{HttpRequest, HttpResponse, ResolverEvent};
use crate::utils::error::Result;
use async_trait::async_trait;

/// HTTP collaborator. Transport failures are `Err`; any status code, including
/// non-2xx, comes back as `Ok`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

pub trait ResolverObserver: Send + Sync {
    fn on_event(&self, event: &ResolverEvent);
}
