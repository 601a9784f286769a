use crate::config::PortalSettings;
use crate::domain::model::{
    HttpMethod, HttpRequest, HttpResponse, PortalMetadata, RequestPlan,
};
use crate::domain::ports::HttpTransport;
use crate::utils::error::{PortalError, Result};
use std::collections::BTreeMap;

/// Per-request overrides for [`PortalApiClient::make_request`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub method: Option<HttpMethod>,
    pub headers: BTreeMap<String, String>,
    pub body: Option<serde_json::Value>,
    pub timeout_ms: Option<u64>,
}

impl RequestOptions {
    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

pub fn status_message(status_code: u16) -> Option<&'static str> {
    match status_code {
        200 => Some("Portal is accessible"),
        403 => Some("Access forbidden to portal"),
        404 => Some("Portal endpoint not found"),
        500 => Some("Portal server error"),
        503 => Some("Portal service unavailable"),
        _ => None,
    }
}

pub struct PortalApiClient<T: HttpTransport> {
    transport: T,
    settings: PortalSettings,
}

impl<T: HttpTransport> PortalApiClient<T> {
    pub fn new(transport: T, settings: PortalSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    pub fn settings(&self) -> &PortalSettings {
        &self.settings
    }

    pub fn portal_url(&self) -> &str {
        self.settings.primary_address()
    }

    pub fn portal_domain(&self) -> &str {
        self.settings.designated_host()
    }

    /// Base URL and endpoint joined verbatim.
    pub fn build_endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.settings.base_url(), endpoint)
    }

    fn merged_headers(&self, overrides: &BTreeMap<String, String>) -> BTreeMap<String, String> {
        let mut headers = self.settings.api.headers.clone();
        headers.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        headers
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = request.method;
        let url = request.url.clone();

        match self.transport.send(request).await {
            Ok(response) => {
                tracing::debug!("{} {} -> {}", method, url, response.status_code);
                Ok(response)
            }
            Err(e) => {
                tracing::error!("❌ Request to {} failed: {}", url, e);
                Err(e)
            }
        }
    }

    /// Any status code is passed through; only transport failures are errors.
    pub async fn make_request(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<HttpResponse> {
        let request = HttpRequest {
            method: options.method.unwrap_or(HttpMethod::Get),
            url: self.build_endpoint_url(endpoint),
            headers: self.merged_headers(&options.headers),
            body: options.body,
            timeout_ms: options.timeout_ms.unwrap_or(self.settings.api.timeout_ms),
        };
        self.send(request).await
    }

    async fn fetch_json(&self, endpoint: &str) -> Result<serde_json::Value> {
        let response = self.make_request(endpoint, RequestOptions::default()).await?;

        if !response.is_success() {
            let url = self.build_endpoint_url(endpoint);
            tracing::warn!(
                "⚠️ {} returned {} ({})",
                url,
                response.status_code,
                status_message(response.status_code).unwrap_or("unexpected status")
            );
            return Err(PortalError::UnexpectedStatus {
                status: response.status_code,
                url,
            });
        }

        response.into_json()
    }

    pub async fn get_applications(&self) -> Result<serde_json::Value> {
        self.fetch_json(&self.settings.api.endpoints.applications).await
    }

    pub async fn get_users(&self) -> Result<serde_json::Value> {
        self.fetch_json(&self.settings.api.endpoints.users).await
    }

    pub async fn get_groups(&self) -> Result<serde_json::Value> {
        self.fetch_json(&self.settings.api.endpoints.groups).await
    }

    pub async fn get_sessions(&self) -> Result<serde_json::Value> {
        self.fetch_json(&self.settings.api.endpoints.sessions).await
    }

    /// HEAD against the primary address. Transport failures read as inaccessible.
    pub async fn validate_accessibility(&self) -> bool {
        let request = HttpRequest {
            method: HttpMethod::Head,
            url: self.portal_url().to_string(),
            headers: BTreeMap::new(),
            body: None,
            timeout_ms: self.settings.api.accessibility_timeout_ms,
        };

        match self.transport.send(request).await {
            Ok(response) => {
                let accessible = response.is_success();
                if accessible {
                    tracing::info!("✅ Portal accessible: {}", self.portal_url());
                } else {
                    tracing::warn!(
                        "⚠️ Portal answered {} at {}",
                        response.status_code,
                        self.portal_url()
                    );
                }
                accessible
            }
            Err(e) => {
                tracing::warn!("⚠️ Portal not accessible: {} ({})", self.portal_url(), e);
                false
            }
        }
    }

    pub fn metadata(&self) -> PortalMetadata {
        let portal = &self.settings.portal;
        PortalMetadata {
            portal_url: portal.primary_address.clone(),
            domain: portal.designated_host.clone(),
            name: portal.name.clone(),
            description: portal.description.clone(),
            base_url: self.settings.api.base_url.clone(),
            docs_url: portal.docs_url.clone(),
            endpoints: self.settings.api.endpoints.as_map(),
        }
    }

    /// Runs the plan in order and stops at the first transport error.
    pub async fn execute(&self, plan: &RequestPlan) -> Result<Vec<HttpResponse>> {
        let headers = self.merged_headers(&plan.headers);
        let mut responses = Vec::with_capacity(plan.requests.len());

        for (index, planned) in plan.requests.iter().enumerate() {
            tracing::debug!(
                "Executing request {}/{}: {} {}",
                index + 1,
                plan.requests.len(),
                planned.method,
                planned.url
            );
            let request = HttpRequest {
                method: planned.method,
                url: planned.url.clone(),
                headers: headers.clone(),
                body: planned.body.clone(),
                timeout_ms: self.settings.api.timeout_ms,
            };
            responses.push(self.send(request).await?);
        }

        Ok(responses)
    }
}
