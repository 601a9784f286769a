use crate::domain::model::ResolverEvent;
use crate::domain::ports::ResolverObserver;

/// Forwards resolver events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ResolverObserver for TracingObserver {
    fn on_event(&self, event: &ResolverEvent) {
        match event {
            ResolverEvent::Validated { candidate, valid: true } => {
                tracing::debug!("✓ Valid portal address: {}", candidate);
            }
            ResolverEvent::Validated { candidate, valid: false } => {
                tracing::warn!("✗ Not a portal address: {}", candidate);
            }
            ResolverEvent::Malformed { candidate, reason } => {
                tracing::warn!("✗ Malformed address '{}': {}", candidate, reason);
            }
            ResolverEvent::Normalized { original, normalized } => {
                tracing::debug!("Normalized '{}' -> {}", original, normalized);
            }
            ResolverEvent::Built { label, address } => {
                tracing::debug!("Built portal address for label '{}': {}", label, address);
            }
            ResolverEvent::HostExtracted { candidate, host } => {
                tracing::debug!("Extracted host {} from {}", host, candidate);
            }
            ResolverEvent::PrimaryChecked { candidate, is_primary } => {
                tracing::debug!("Primary check for {}: {}", candidate, is_primary);
            }
            ResolverEvent::NamedLookup {
                name,
                address,
                fallback,
            } => {
                if *fallback {
                    tracing::debug!("Unknown portal name '{}', using {}", name, address);
                } else {
                    tracing::debug!("Portal '{}' resolves to {}", name, address);
                }
            }
        }
    }
}
