//! Cookie-write capability.
//!
//! # Responsibilities
//! - Narrow cookie-write contract (append, delete)
//! - Header-backed default provider, installed lazily by the facade
//!
//! # Design Decisions
//! - Encoding beyond `name=value` pairs is the hosting layer's concern;
//!   hosts needing attributes or escaping install their own provider
//! - The default provider resolves the response-state capability from the
//!   registry it was built over, so it writes through whatever header store
//!   is current at call time

use std::sync::Arc;

use http::header::SET_COOKIE;

use crate::features::registry::{Feature, FeatureKind, FeatureRegistry};
use crate::http::headers::Headers;

/// Cookie-write capability.
pub trait ResponseCookies: Send + Sync {
    /// Append a response cookie.
    fn append(&self, name: &str, value: &str);

    /// Instruct the client to delete a cookie.
    fn delete(&self, name: &str);
}

/// Default provider: writes `Set-Cookie` headers through the exchange's
/// response-state capability.
pub struct HeaderCookies {
    features: Arc<FeatureRegistry>,
}

impl HeaderCookies {
    /// Create a provider over the exchange's registry.
    pub fn new(features: Arc<FeatureRegistry>) -> Self {
        Self { features }
    }

    fn headers(&self) -> Option<Headers> {
        match self.features.get(FeatureKind::ResponseState) {
            Some(Feature::ResponseState(state)) => Some(state.headers()),
            _ => {
                tracing::warn!("Cookie write dropped: no response-state capability");
                None
            }
        }
    }
}

impl ResponseCookies for HeaderCookies {
    fn append(&self, name: &str, value: &str) {
        if let Some(headers) = self.headers() {
            headers.append(SET_COOKIE.as_str(), &format!("{}={}; Path=/", name, value));
        }
    }

    fn delete(&self, name: &str) {
        if let Some(headers) = self.headers() {
            headers.append(
                SET_COOKIE.as_str(),
                &format!("{}=; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT", name),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::state::{InMemoryResponseState, ResponseState};

    fn exchange_registry() -> (Arc<FeatureRegistry>, Arc<InMemoryResponseState>) {
        let registry = Arc::new(FeatureRegistry::new());
        let state = Arc::new(InMemoryResponseState::new());
        registry.insert(Feature::ResponseState(state.clone()));
        (registry, state)
    }

    #[test]
    fn test_append_writes_set_cookie() {
        let (registry, state) = exchange_registry();
        let cookies = HeaderCookies::new(registry);

        cookies.append("session", "abc123");

        let values = state.headers().get_all("set-cookie");
        assert_eq!(values, vec!["session=abc123; Path=/"]);
    }

    #[test]
    fn test_delete_expires_cookie() {
        let (registry, state) = exchange_registry();
        let cookies = HeaderCookies::new(registry);

        cookies.append("session", "abc123");
        cookies.delete("session");

        let values = state.headers().get_all("set-cookie");
        assert_eq!(values.len(), 2);
        assert!(values[1].starts_with("session=;"));
        assert!(values[1].contains("Expires=Thu, 01 Jan 1970"));
    }

    #[test]
    fn test_write_without_response_state_is_dropped() {
        let registry = Arc::new(FeatureRegistry::new());
        let cookies = HeaderCookies::new(registry);
        // No response-state capability bound: nothing to write into, no panic.
        cookies.append("session", "abc123");
    }
}
