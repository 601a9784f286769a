use crate::config::{
    AUXILIARY_DOMAINS, DESIGNATED_HOST, ENTRY_PATH, PARENT_DOMAIN, SECURE_SCHEME,
};
use crate::utils::error::{PortalError, Result};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;
use url::{Host, Url};

static LABEL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?$").expect("label pattern compiles")
});

static ORGANIZATION_LABEL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^d-[a-z0-9]+$").expect("organization pattern compiles"));

/// Host rules a `PortalAddress` is checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRules {
    pub designated_host: String,
    pub parent_domain: String,
    pub entry_path: String,
    pub auxiliary_domains: Vec<String>,
}

impl Default for AddressRules {
    fn default() -> Self {
        Self {
            designated_host: DESIGNATED_HOST.to_string(),
            parent_domain: PARENT_DOMAIN.to_string(),
            entry_path: ENTRY_PATH.to_string(),
            auxiliary_domains: AUXILIARY_DOMAINS.iter().map(|d| d.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostKind {
    Designated,
    /// `d-<id>` directory instances.
    Organization,
    Custom,
    Auxiliary,
}

impl fmt::Display for HostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HostKind::Designated => "designated",
            HostKind::Organization => "organization",
            HostKind::Custom => "custom",
            HostKind::Auxiliary => "auxiliary",
        };
        f.write_str(name)
    }
}

/// A validated portal address. The scheme is always `https`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PortalAddress {
    host: String,
    path: String,
    kind: HostKind,
}

pub fn is_dns_label(label: &str) -> bool {
    LABEL_PATTERN.is_match(label)
}

impl PortalAddress {
    pub fn parse(candidate: &str) -> Result<Self> {
        Self::parse_with(candidate, &AddressRules::default())
    }

    pub fn parse_with(candidate: &str, rules: &AddressRules) -> Result<Self> {
        if candidate.trim().is_empty() {
            return Err(PortalError::malformed(candidate, "address is empty"));
        }

        let url = Url::parse(candidate)
            .map_err(|e| PortalError::malformed(candidate, e.to_string()))?;

        if url.scheme() != SECURE_SCHEME {
            return Err(PortalError::malformed(
                candidate,
                format!("scheme must be {}, got {}", SECURE_SCHEME, url.scheme()),
            ));
        }
        if !url.username().is_empty() || url.password().is_some() {
            return Err(PortalError::malformed(candidate, "credentials are not allowed"));
        }
        if url.port().is_some() {
            return Err(PortalError::malformed(candidate, "explicit ports are not allowed"));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(PortalError::malformed(
                candidate,
                "query and fragment are not part of a portal address",
            ));
        }

        let host = match url.host() {
            Some(Host::Domain(domain)) => domain.to_string(),
            Some(_) => return Err(PortalError::malformed(candidate, "IP hosts are not allowed")),
            None => return Err(PortalError::malformed(candidate, "address has no host")),
        };

        let kind = classify_host(&host, rules).ok_or_else(|| {
            PortalError::malformed(candidate, format!("host '{}' is not a portal host", host))
        })?;

        let path = match kind {
            HostKind::Auxiliary => url.path().to_string(),
            _ if url.path() == rules.entry_path => rules.entry_path.clone(),
            _ => {
                return Err(PortalError::malformed(
                    candidate,
                    format!("portal hosts must use the {} path", rules.entry_path),
                ))
            }
        };

        Ok(Self { host, path, kind })
    }

    /// Strict counterpart of `build_portal_address`.
    pub fn for_label(label: &str, rules: &AddressRules) -> Result<Self> {
        if !is_dns_label(label) {
            return Err(PortalError::malformed(
                label,
                "label must be lowercase alphanumerics and hyphens, not starting or ending with a hyphen",
            ));
        }
        let host = format!("{}.{}", label, rules.parent_domain);
        let kind = classify_host(&host, rules)
            .ok_or_else(|| PortalError::malformed(label, "label does not form a portal host"))?;

        Ok(Self {
            host,
            path: rules.entry_path.clone(),
            kind,
        })
    }

    pub fn scheme(&self) -> &'static str {
        SECURE_SCHEME
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> HostKind {
        self.kind
    }

    /// The `<label>` part for hosts under the parent domain.
    pub fn label(&self) -> Option<&str> {
        match self.kind {
            HostKind::Auxiliary => None,
            _ => self.host.split('.').next(),
        }
    }
}

/// Classifies a lowercase host, or returns None when it is outside the portal family.
pub fn classify_host(host: &str, rules: &AddressRules) -> Option<HostKind> {
    if host == rules.designated_host {
        return Some(HostKind::Designated);
    }

    let parent_suffix = format!(".{}", rules.parent_domain);
    if let Some(label) = host.strip_suffix(&parent_suffix) {
        if !is_dns_label(label) {
            return None;
        }
        if ORGANIZATION_LABEL_PATTERN.is_match(label) {
            return Some(HostKind::Organization);
        }
        return Some(HostKind::Custom);
    }

    let auxiliary = rules
        .auxiliary_domains
        .iter()
        .any(|domain| host == domain || host.ends_with(&format!(".{}", domain)));
    auxiliary.then_some(HostKind::Auxiliary)
}

impl fmt::Display for PortalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", SECURE_SCHEME, self.host, self.path)
    }
}

impl TryFrom<String> for PortalAddress {
    type Error = PortalError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<PortalAddress> for String {
    fn from(address: PortalAddress) -> Self {
        address.to_string()
    }
}

impl std::str::FromStr for PortalAddress {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Diagnostics emitted by the resolver. Never affects results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolverEvent {
    Validated { candidate: String, valid: bool },
    Malformed { candidate: String, reason: String },
    Normalized { original: String, normalized: String },
    Built { label: String, address: String },
    HostExtracted { candidate: String, host: String },
    PrimaryChecked { candidate: String, is_primary: bool },
    NamedLookup { name: String, address: String, fallback: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<serde_json::Value>,
    pub timeout_ms: u64,
}

/// Tagged on the wire so a raw body that happens to be a string stays raw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ResponseBody {
    Json(serde_json::Value),
    Raw(String),
}

impl ResponseBody {
    /// Blank bodies stay raw so HEAD and 204 responses don't read as JSON.
    pub fn from_text(text: String) -> Self {
        if text.trim().is_empty() {
            return ResponseBody::Raw(text);
        }
        match serde_json::from_str(&text) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Raw(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpResponse {
    pub status_code: u16,
    pub body: ResponseBody,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn into_json(self) -> Result<serde_json::Value> {
        match self.body {
            ResponseBody::Json(value) => Ok(value),
            ResponseBody::Raw(text) => Ok(serde_json::from_str(&text)?),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestPlan {
    pub portal: String,
    pub domain: String,
    pub requests: Vec<PlannedRequest>,
    pub headers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalMetadata {
    pub portal_url: String,
    pub domain: String,
    pub name: String,
    pub description: String,
    pub base_url: String,
    pub docs_url: String,
    pub endpoints: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectivityReport {
    pub portal: String,
    pub domain: String,
    pub accessible: bool,
    pub metadata: PortalMetadata,
    pub checked_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_designated_primary() {
        let address = PortalAddress::parse("https://internal.awsapps.com/start").unwrap();
        assert_eq!(address.host(), "internal.awsapps.com");
        assert_eq!(address.path(), "/start");
        assert_eq!(address.kind(), HostKind::Designated);
        assert_eq!(address.label(), Some("internal"));
        assert_eq!(address.to_string(), "https://internal.awsapps.com/start");
    }

    #[test]
    fn test_parse_classifies_labels() {
        let org = PortalAddress::parse("https://d-12345678ab.awsapps.com/start").unwrap();
        assert_eq!(org.kind(), HostKind::Organization);

        let custom = PortalAddress::parse("https://my-org.awsapps.com/start").unwrap();
        assert_eq!(custom.kind(), HostKind::Custom);

        let docs = PortalAddress::parse("https://docs.aws.amazon.com/singlesignon/").unwrap();
        assert_eq!(docs.kind(), HostKind::Auxiliary);
        assert_eq!(docs.path(), "/singlesignon/");
        assert_eq!(docs.label(), None);
    }

    #[test]
    fn test_parse_lowercases_host() {
        let address = PortalAddress::parse("https://MyOrg.AWSAPPS.com/start").unwrap();
        assert_eq!(address.host(), "myorg.awsapps.com");
    }

    #[test]
    fn test_parse_rejects_outside_family() {
        for candidate in [
            "",
            "not a url",
            "http://internal.awsapps.com/start",
            "https://internal.awsapps.com",
            "https://internal.awsapps.com/start/",
            "https://internal.awsapps.com:8443/start",
            "https://user@internal.awsapps.com/start",
            "https://internal.awsapps.com/start?x=1",
            "https://-org.awsapps.com/start",
            "https://org-.awsapps.com/start",
            "https://a.b.awsapps.com/start",
            "https://awsapps.com/start",
            "https://example.com/start",
            "https://127.0.0.1/start",
        ] {
            let err = PortalAddress::parse(candidate).unwrap_err();
            assert!(
                matches!(err, PortalError::MalformedAddress { .. }),
                "{} should be malformed",
                candidate
            );
        }
    }

    #[test]
    fn test_for_label_is_strict() {
        let rules = AddressRules::default();
        let address = PortalAddress::for_label("myorg", &rules).unwrap();
        assert_eq!(address.to_string(), "https://myorg.awsapps.com/start");

        assert!(PortalAddress::for_label("My Org", &rules).is_err());
        assert!(PortalAddress::for_label("org/evil", &rules).is_err());
        assert!(PortalAddress::for_label("-org", &rules).is_err());
        assert!(PortalAddress::for_label("", &rules).is_err());
    }

    #[test]
    fn test_serde_uses_string_form() {
        let address = PortalAddress::parse("https://d-12345678ab.awsapps.com/start").unwrap();
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, "\"https://d-12345678ab.awsapps.com/start\"");

        let back: PortalAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);

        let bad: std::result::Result<PortalAddress, _> =
            serde_json::from_str("\"http://example.com\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_response_body_from_text() {
        assert_eq!(
            ResponseBody::from_text("{\"ok\":true}".to_string()),
            ResponseBody::Json(serde_json::json!({"ok": true}))
        );
        assert_eq!(
            ResponseBody::from_text("<html></html>".to_string()),
            ResponseBody::Raw("<html></html>".to_string())
        );
        assert_eq!(
            ResponseBody::from_text(String::new()),
            ResponseBody::Raw(String::new())
        );
    }

    #[test]
    fn test_addresses_dedupe_in_hash_sets() {
        use std::collections::HashSet;

        let addresses: HashSet<PortalAddress> = [
            "https://internal.awsapps.com/start",
            "https://internal.awsapps.com/start",
            "https://d-12345678ab.awsapps.com/start",
        ]
        .into_iter()
        .map(|candidate| PortalAddress::parse(candidate).unwrap())
        .collect();
        assert_eq!(addresses.len(), 2);

        let kinds: HashSet<HostKind> = addresses.iter().map(PortalAddress::kind).collect();
        assert!(kinds.contains(&HostKind::Designated));
        assert!(kinds.contains(&HostKind::Organization));
    }

    #[test]
    fn test_response_body_keeps_its_kind_through_serde() {
        let raw = ResponseBody::Raw("x".to_string());
        let encoded = serde_json::to_value(&raw).unwrap();
        assert_eq!(encoded, serde_json::json!({"kind": "raw", "value": "x"}));
        assert_eq!(serde_json::from_value::<ResponseBody>(encoded).unwrap(), raw);

        let json = ResponseBody::Json(serde_json::json!("x"));
        let decoded: ResponseBody =
            serde_json::from_value(serde_json::to_value(&json).unwrap()).unwrap();
        assert_eq!(decoded, json);
    }

    #[test]
    fn test_response_into_json() {
        let response = HttpResponse {
            status_code: 200,
            body: ResponseBody::Raw("plain".to_string()),
        };
        assert!(response.is_success());
        assert!(matches!(
            response.into_json(),
            Err(PortalError::Serialization(_))
        ));
    }
}
