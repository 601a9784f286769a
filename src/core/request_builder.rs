use crate::config::PortalSettings;
use crate::domain::model::{HttpMethod, PlannedRequest, RequestPlan};
use std::collections::BTreeMap;

/// Collects requests against the portal base URL into a [`RequestPlan`].
#[derive(Debug, Clone)]
pub struct PortalRequestBuilder {
    portal_url: String,
    domain: String,
    base_url: String,
    requests: Vec<PlannedRequest>,
    headers: BTreeMap<String, String>,
}

impl PortalRequestBuilder {
    pub fn new(settings: &PortalSettings) -> Self {
        Self {
            portal_url: settings.primary_address().to_string(),
            domain: settings.designated_host().to_string(),
            base_url: settings.base_url().to_string(),
            requests: Vec::new(),
            headers: BTreeMap::new(),
        }
    }

    fn push(&mut self, method: HttpMethod, endpoint: &str, body: Option<serde_json::Value>) {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!("Planned {} {}", method, url);
        self.requests.push(PlannedRequest {
            method,
            url,
            endpoint: endpoint.to_string(),
            body,
        });
    }

    pub fn get(mut self, endpoint: &str) -> Self {
        self.push(HttpMethod::Get, endpoint, None);
        self
    }

    pub fn post(mut self, endpoint: &str, body: serde_json::Value) -> Self {
        self.push(HttpMethod::Post, endpoint, Some(body));
        self
    }

    /// Applies to every request in the plan. Last write wins.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> RequestPlan {
        tracing::debug!(
            "Built request plan with {} requests for {}",
            self.requests.len(),
            self.portal_url
        );
        RequestPlan {
            portal: self.portal_url,
            domain: self.domain,
            requests: self.requests,
            headers: self.headers,
        }
    }
}
