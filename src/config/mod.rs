#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::model::AddressRules;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The designated primary portal. Compared bit-exact by `is_designated_primary`.
pub const PRIMARY_PORTAL_ADDRESS: &str = "https://internal.awsapps.com/start";
pub const DESIGNATED_HOST: &str = "internal.awsapps.com";
pub const PARENT_DOMAIN: &str = "awsapps.com";
pub const ENTRY_PATH: &str = "/start";
pub const DEFAULT_LABEL: &str = "internal";
pub const SECURE_SCHEME: &str = "https";
pub const AUXILIARY_DOMAINS: [&str; 3] = [
    "docs.aws.amazon.com",
    "aws.amazon.com",
    "console.aws.amazon.com",
];

pub const DEFAULT_BASE_URL: &str = "https://internal.awsapps.com";
pub const DEFAULT_DOCS_URL: &str = "https://docs.aws.amazon.com/singlesignon/";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_ACCESSIBILITY_TIMEOUT_MS: u64 = 10_000;

/// Aliases that resolve to the primary address unless `[portals]` overrides them.
pub const BUILTIN_PORTAL_NAMES: [&str; 7] = [
    "main",
    "sso",
    "iam",
    "identity_center",
    "access",
    "portal",
    "default",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalSettings {
    pub portal: PortalIdentity,
    pub api: ApiSettings,
    /// Named portal overrides. Names are matched case-insensitively.
    pub portals: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalIdentity {
    pub name: String,
    pub description: String,
    pub primary_address: String,
    pub designated_host: String,
    pub parent_domain: String,
    pub entry_path: String,
    pub default_label: String,
    pub auxiliary_domains: Vec<String>,
    pub docs_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_ms: u64,
    pub accessibility_timeout_ms: u64,
    pub headers: BTreeMap<String, String>,
    pub endpoints: EndpointPaths,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointPaths {
    pub applications: String,
    pub users: String,
    pub groups: String,
    pub sessions: String,
}

impl Default for PortalIdentity {
    fn default() -> Self {
        Self {
            name: "AWS IAM Identity Center Portal".to_string(),
            description: "Primary AWS IAM Identity Center access portal".to_string(),
            primary_address: PRIMARY_PORTAL_ADDRESS.to_string(),
            designated_host: DESIGNATED_HOST.to_string(),
            parent_domain: PARENT_DOMAIN.to_string(),
            entry_path: ENTRY_PATH.to_string(),
            default_label: DEFAULT_LABEL.to_string(),
            auxiliary_domains: AUXILIARY_DOMAINS.iter().map(|d| d.to_string()).collect(),
            docs_url: DEFAULT_DOCS_URL.to_string(),
        }
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "application/json".to_string());

        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            accessibility_timeout_ms: DEFAULT_ACCESSIBILITY_TIMEOUT_MS,
            headers,
            endpoints: EndpointPaths::default(),
        }
    }
}

impl Default for EndpointPaths {
    fn default() -> Self {
        Self {
            applications: "/applications".to_string(),
            users: "/users".to_string(),
            groups: "/groups".to_string(),
            sessions: "/sessions".to_string(),
        }
    }
}

impl Default for PortalSettings {
    fn default() -> Self {
        Self {
            portal: PortalIdentity::default(),
            api: ApiSettings::default(),
            portals: BTreeMap::new(),
        }
    }
}

impl EndpointPaths {
    pub fn as_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        map.insert("applications".to_string(), self.applications.clone());
        map.insert("users".to_string(), self.users.clone());
        map.insert("groups".to_string(), self.groups.clone());
        map.insert("sessions".to_string(), self.sessions.clone());
        map
    }
}

impl PortalSettings {
    pub fn primary_address(&self) -> &str {
        &self.portal.primary_address
    }

    pub fn designated_host(&self) -> &str {
        &self.portal.designated_host
    }

    pub fn base_url(&self) -> &str {
        &self.api.base_url
    }

    /// Every domain `is_valid_portal_address` accepts, designated host first.
    pub fn allowed_domains(&self) -> Vec<&str> {
        let mut domains = vec![
            self.portal.designated_host.as_str(),
            self.portal.parent_domain.as_str(),
        ];
        domains.extend(self.portal.auxiliary_domains.iter().map(String::as_str));
        domains
    }

    pub fn address_rules(&self) -> AddressRules {
        AddressRules {
            designated_host: self.portal.designated_host.clone(),
            parent_domain: self.portal.parent_domain.clone(),
            entry_path: self.portal.entry_path.clone(),
            auxiliary_domains: self.portal.auxiliary_domains.clone(),
        }
    }

    /// Built-in aliases merged with configured ones, resolved to addresses.
    pub fn named_portals(&self) -> BTreeMap<String, String> {
        let mut named: BTreeMap<String, String> = BUILTIN_PORTAL_NAMES
            .iter()
            .map(|name| (name.to_string(), self.portal.primary_address.clone()))
            .collect();
        for (name, address) in &self.portals {
            named.insert(name.to_lowercase(), address.clone());
        }
        named
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let settings = PortalSettings::default();
        assert_eq!(settings.primary_address(), PRIMARY_PORTAL_ADDRESS);
        assert_eq!(settings.designated_host(), DESIGNATED_HOST);
        assert_eq!(settings.base_url(), DEFAULT_BASE_URL);
        assert_eq!(settings.api.timeout_ms, 30_000);
        assert_eq!(settings.api.headers.len(), 2);
        assert_eq!(
            settings.allowed_domains(),
            vec![
                "internal.awsapps.com",
                "awsapps.com",
                "docs.aws.amazon.com",
                "aws.amazon.com",
                "console.aws.amazon.com",
            ]
        );
    }

    #[test]
    fn test_named_portals_merge_overrides() {
        let mut settings = PortalSettings::default();
        settings
            .portals
            .insert("Sandbox".to_string(), "https://sandbox.awsapps.com/start".to_string());

        let named = settings.named_portals();
        assert_eq!(named.len(), BUILTIN_PORTAL_NAMES.len() + 1);
        assert_eq!(named["sso"], PRIMARY_PORTAL_ADDRESS);
        assert_eq!(named["sandbox"], "https://sandbox.awsapps.com/start");
    }
}
