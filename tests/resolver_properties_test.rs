use portal_resolver::{HostKind, PortalAddressResolver, PRIMARY_PORTAL_ADDRESS};

const CORPUS: &[&str] = &[
    "",
    "   ",
    "internal.awsapps.com",
    "internal.awsapps.com/start",
    "internal.awsapps.com/start/",
    "https://internal.awsapps.com/start",
    "https://internal.awsapps.com/start/",
    "http://internal.awsapps.com",
    "HTTPS://Internal.AWSAPPS.com",
    "d-12345678ab.awsapps.com",
    "d-12345678ab.awsapps.com/",
    "myorg.awsapps.com?next=/home",
    "myorg.awsapps.com#section",
    "myorg.awsapps.com/start?x=1#y",
    "user:secret@myorg.awsapps.com:443",
    "ftp://myorg.awsapps.com",
    "docs.aws.amazon.com/singlesignon/",
    "https://console.aws.amazon.com",
    "example.com/?next=awsapps.com",
    "not a url",
    "https://",
    "//",
    "?",
    "#",
    "ünïcödé.awsapps.com",
    "https://[::1]:8080/awsapps.com",
];

#[test]
fn test_builds_default_and_labelled_addresses() {
    let resolver = PortalAddressResolver::default();
    assert_eq!(
        resolver.build_portal_address(None),
        "https://internal.awsapps.com/start"
    );
    assert_eq!(
        resolver.build_portal_address(Some("myorg")),
        "https://myorg.awsapps.com/start"
    );
}

#[test]
fn test_normalizes_documented_inputs() {
    let resolver = PortalAddressResolver::default();
    assert_eq!(
        resolver.normalize_portal_address(Some("internal.awsapps.com/start")),
        "https://internal.awsapps.com/start"
    );
    assert_eq!(
        resolver.normalize_portal_address(Some("")),
        "https://internal.awsapps.com/start"
    );
    assert_eq!(
        resolver.normalize_portal_address(Some("d-12345678ab.awsapps.com")),
        "https://d-12345678ab.awsapps.com/start"
    );
}

#[test]
fn test_normalize_is_idempotent() {
    let resolver = PortalAddressResolver::default();
    for input in CORPUS {
        let once = resolver.normalize_portal_address(Some(input));
        let twice = resolver.normalize_portal_address(Some(&once));
        assert_eq!(once, twice, "normalize is not idempotent for {:?}", input);
    }
}

#[test]
fn test_normalize_never_panics_and_keeps_a_scheme() {
    let resolver = PortalAddressResolver::default();
    for input in CORPUS {
        let normalized = resolver.normalize_portal_address(Some(input));
        let lower = normalized.to_ascii_lowercase();
        assert!(
            lower.starts_with("https://") || lower.starts_with("http://"),
            "{:?} normalized to {:?}",
            input,
            normalized
        );
    }
}

#[test]
fn test_extracts_hosts() {
    let resolver = PortalAddressResolver::default();
    assert_eq!(
        resolver.extract_host("https://internal.awsapps.com/start"),
        Some("internal.awsapps.com".to_string())
    );
    assert_eq!(resolver.extract_host("not a url"), None);
}

#[test]
fn test_designated_primary_is_format_sensitive() {
    let resolver = PortalAddressResolver::default();
    assert!(resolver.is_designated_primary("https://internal.awsapps.com/start"));
    assert!(!resolver.is_designated_primary("https://internal.awsapps.com/start/"));
}

#[test]
fn test_validity_follows_the_allow_list() {
    let resolver = PortalAddressResolver::default();

    let allowed = [
        "https://internal.awsapps.com/start",
        "https://d-12345678ab.awsapps.com/start",
        "https://awsapps.com",
        "https://deep.nested.awsapps.com/anything",
        "https://docs.aws.amazon.com/singlesignon/",
        "https://aws.amazon.com/",
        "https://console.aws.amazon.com/iam",
        "https://us-east-1.console.aws.amazon.com/",
    ];
    for candidate in allowed {
        assert!(resolver.is_valid_portal_address(candidate), "{}", candidate);
    }

    let rejected = [
        "https://example.com/start",
        "https://amazon.com/",
        "https://notawsapps.com/start",
        "https://awsapps.com.attacker.net/start",
        "https://192.168.0.1/start",
        "file:///etc/awsapps.com",
    ];
    for candidate in rejected {
        assert!(!resolver.is_valid_portal_address(candidate), "{}", candidate);
    }

    for candidate in ["", "not a url", "internal.awsapps.com/start", "://missing"] {
        assert!(!resolver.is_valid_portal_address(candidate), "{:?}", candidate);
    }
}

#[test]
fn test_normalized_labels_parse_strictly() {
    let resolver = PortalAddressResolver::default();
    for label in ["internal", "myorg", "d-12345678ab", "a", "team-42"] {
        let normalized = resolver.normalize_portal_address(Some(&format!("{}.awsapps.com", label)));
        let parsed = resolver.parse_address(&normalized).unwrap();
        assert_eq!(parsed.label(), Some(label));
        assert_eq!(parsed.to_string(), resolver.build_portal_address(Some(label)));
    }
}

#[test]
fn test_classification_of_known_forms() {
    let resolver = PortalAddressResolver::default();
    assert_eq!(resolver.classify(PRIMARY_PORTAL_ADDRESS), Some(HostKind::Designated));
    assert_eq!(
        resolver.classify("https://d-906712ab34.awsapps.com/start"),
        Some(HostKind::Organization)
    );
    assert_eq!(
        resolver.classify("https://acme-prod.awsapps.com/start"),
        Some(HostKind::Custom)
    );
    assert_eq!(
        resolver.classify("https://console.aws.amazon.com/"),
        Some(HostKind::Auxiliary)
    );
    assert_eq!(resolver.classify("https://a.b.awsapps.com/start"), None);
}

#[test]
fn test_resolver_is_shareable_across_threads() {
    let resolver = PortalAddressResolver::default();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let resolver = resolver.clone();
            std::thread::spawn(move || resolver.build_portal_address(Some(&format!("org{}", i))))
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(
            handle.join().unwrap(),
            format!("https://org{}.awsapps.com/start", i)
        );
    }
}
