use crate::config::{PortalSettings, SECURE_SCHEME};
use crate::domain::model::{classify_host, HostKind, PortalAddress, ResolverEvent};
use crate::domain::ports::ResolverObserver;
use crate::utils::error::Result;
use std::fmt;
use std::sync::Arc;
use url::Url;

/// Validates, normalizes and builds portal addresses.
///
/// Every operation is a pure function of its input and the settings the
/// resolver was constructed with. Malformed candidates come back as `false`
/// or `None`; only [`PortalAddressResolver::parse_address`] returns the error.
#[derive(Clone, Default)]
pub struct PortalAddressResolver {
    settings: PortalSettings,
    observer: Option<Arc<dyn ResolverObserver>>,
}

impl fmt::Debug for PortalAddressResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortalAddressResolver")
            .field("settings", &self.settings)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl PortalAddressResolver {
    pub fn new(settings: PortalSettings) -> Self {
        Self {
            settings,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ResolverObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn settings(&self) -> &PortalSettings {
        &self.settings
    }

    pub fn primary_address(&self) -> &str {
        self.settings.primary_address()
    }

    fn emit(&self, event: ResolverEvent) {
        if let Some(observer) = &self.observer {
            observer.on_event(&event);
        }
    }

    /// True when `candidate` parses as an absolute URL whose host is on the
    /// allow-list, either exactly or as a subdomain. The scheme is not checked.
    pub fn is_valid_portal_address(&self, candidate: &str) -> bool {
        if candidate.is_empty() {
            self.emit(ResolverEvent::Malformed {
                candidate: String::new(),
                reason: "no address provided".to_string(),
            });
            return false;
        }

        let url = match Url::parse(candidate) {
            Ok(url) => url,
            Err(e) => {
                self.emit(ResolverEvent::Malformed {
                    candidate: candidate.to_string(),
                    reason: e.to_string(),
                });
                return false;
            }
        };

        let valid = url
            .host_str()
            .map(|host| self.host_is_allowed(&host.to_ascii_lowercase()))
            .unwrap_or(false);

        self.emit(ResolverEvent::Validated {
            candidate: candidate.to_string(),
            valid,
        });
        valid
    }

    fn host_is_allowed(&self, host: &str) -> bool {
        self.settings
            .allowed_domains()
            .into_iter()
            .any(|domain| host == domain || host.ends_with(&format!(".{}", domain)))
    }

    /// `https://<label>.<parent domain><entry path>`. The label is not checked.
    pub fn build_portal_address(&self, label: Option<&str>) -> String {
        let portal = &self.settings.portal;
        let label = label.unwrap_or(&portal.default_label);
        let address = format!(
            "{}://{}.{}{}",
            SECURE_SCHEME, label, portal.parent_domain, portal.entry_path
        );

        self.emit(ResolverEvent::Built {
            label: label.to_string(),
            address: address.clone(),
        });
        address
    }

    /// Total and idempotent. Blank input yields the primary address.
    pub fn normalize_portal_address(&self, candidate: Option<&str>) -> String {
        let original = candidate.unwrap_or_default();
        let trimmed = original.trim();

        let normalized = if trimmed.is_empty() {
            self.settings.primary_address().to_string()
        } else {
            self.normalize_non_empty(trimmed)
        };

        self.emit(ResolverEvent::Normalized {
            original: original.to_string(),
            normalized: normalized.clone(),
        });
        normalized
    }

    fn normalize_non_empty(&self, trimmed: &str) -> String {
        let (mut normalized, scheme_end) = match http_scheme_len(trimmed) {
            Some(len) => (trimmed.to_string(), len),
            None => {
                let prefix = format!("{}://", SECURE_SCHEME);
                (format!("{}{}", prefix, trimmed), prefix.len())
            }
        };

        let rest = &normalized[scheme_end..];
        let authority_end = scheme_end + rest.find(['/', '?', '#']).unwrap_or(rest.len());
        let path_end = authority_end
            + normalized[authority_end..]
                .find(['?', '#'])
                .unwrap_or(normalized.len() - authority_end);

        let host = lexical_host(&normalized[scheme_end..authority_end]).to_ascii_lowercase();
        let portal = &self.settings.portal;
        let path = &normalized[authority_end..path_end];

        if host.contains(portal.parent_domain.as_str()) && !path.ends_with(&portal.entry_path) {
            let insertion = if path.ends_with('/') {
                portal.entry_path.trim_start_matches('/')
            } else {
                portal.entry_path.as_str()
            };
            normalized.insert_str(path_end, insertion);
        }

        normalized
    }

    /// Hostname of an absolute URL, or None when it cannot be parsed or has no host.
    pub fn extract_host(&self, candidate: &str) -> Option<String> {
        let host = match Url::parse(candidate) {
            Ok(url) => url.host_str().map(str::to_string),
            Err(e) => {
                self.emit(ResolverEvent::Malformed {
                    candidate: candidate.to_string(),
                    reason: e.to_string(),
                });
                return None;
            }
        };

        match &host {
            Some(host) => self.emit(ResolverEvent::HostExtracted {
                candidate: candidate.to_string(),
                host: host.clone(),
            }),
            None => self.emit(ResolverEvent::Malformed {
                candidate: candidate.to_string(),
                reason: "address has no host".to_string(),
            }),
        }
        host
    }

    /// Exact, case-sensitive comparison with the primary address. A trailing
    /// slash or an uppercase scheme is enough to make this false.
    pub fn is_designated_primary(&self, candidate: &str) -> bool {
        let is_primary = candidate == self.settings.primary_address();
        self.emit(ResolverEvent::PrimaryChecked {
            candidate: candidate.to_string(),
            is_primary,
        });
        is_primary
    }

    /// Named portal lookup; unknown names fall back to the primary address.
    pub fn portal_address_for(&self, name: &str) -> String {
        let wanted = name.trim().to_lowercase();
        let named = self.settings.named_portals();

        let (address, fallback) = match named.get(&wanted) {
            Some(address) => (address.clone(), false),
            None => (self.settings.primary_address().to_string(), true),
        };

        self.emit(ResolverEvent::NamedLookup {
            name: name.to_string(),
            address: address.clone(),
            fallback,
        });
        address
    }

    /// Hosts compare case-insensitively, like DNS names.
    pub fn is_valid_portal_domain(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        let portal = &self.settings.portal;
        host == portal.designated_host || host.ends_with(&format!(".{}", portal.parent_domain))
    }

    pub fn is_internal_domain(&self, host: &str) -> bool {
        host.eq_ignore_ascii_case(&self.settings.portal.designated_host)
    }

    /// Classifies by host alone, so `https://org.awsapps.com` is `Custom` even
    /// without the entry path.
    pub fn classify(&self, candidate: &str) -> Option<HostKind> {
        let host = self.extract_host(candidate)?;
        classify_host(&host.to_ascii_lowercase(), &self.settings.address_rules())
    }

    pub fn parse_address(&self, candidate: &str) -> Result<PortalAddress> {
        let parsed = PortalAddress::parse_with(candidate, &self.settings.address_rules());
        if let Err(e) = &parsed {
            self.emit(ResolverEvent::Malformed {
                candidate: candidate.to_string(),
                reason: e.to_string(),
            });
        }
        parsed
    }
}

fn http_scheme_len(candidate: &str) -> Option<usize> {
    ["https://", "http://"].into_iter().find_map(|prefix| {
        candidate
            .get(..prefix.len())
            .filter(|head| head.eq_ignore_ascii_case(prefix))
            .map(|_| prefix.len())
    })
}

/// Host part of an authority, without userinfo or port. No validation.
fn lexical_host(authority: &str) -> &str {
    let host_port = authority.rsplit('@').next().unwrap_or(authority);
    if host_port.starts_with('[') {
        return host_port
            .find(']')
            .map(|end| &host_port[..=end])
            .unwrap_or(host_port);
    }
    host_port.split(':').next().unwrap_or(host_port)
}
