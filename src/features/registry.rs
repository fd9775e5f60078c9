//! Capability kinds and the per-exchange registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::auth::AuthHandler;
use crate::http::cookies::ResponseCookies;
use crate::http::state::ResponseState;
use crate::http::websocket::WebSocketUpgrade;

/// The closed set of capability kinds an exchange can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    /// Response state: status code, headers, body sink, header callbacks.
    ResponseState,
    /// Cookie writing.
    Cookies,
    /// Authentication negotiation handling.
    Auth,
    /// WebSocket upgrade.
    WebSocket,
}

impl FeatureKind {
    /// Stable name for diagnostics and logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKind::ResponseState => "response-state",
            FeatureKind::Cookies => "cookies",
            FeatureKind::Auth => "auth",
            FeatureKind::WebSocket => "websocket",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A capability instance behind a shared-ownership handle.
///
/// One variant per [`FeatureKind`]; the variant fixes the kind the instance
/// is registered under.
#[derive(Clone)]
pub enum Feature {
    /// See [`ResponseState`].
    ResponseState(Arc<dyn ResponseState>),
    /// See [`ResponseCookies`].
    Cookies(Arc<dyn ResponseCookies>),
    /// See [`AuthHandler`].
    Auth(Arc<dyn AuthHandler>),
    /// See [`WebSocketUpgrade`].
    WebSocket(Arc<dyn WebSocketUpgrade>),
}

impl Feature {
    /// The kind this instance is registered under.
    pub fn kind(&self) -> FeatureKind {
        match self {
            Feature::ResponseState(_) => FeatureKind::ResponseState,
            Feature::Cookies(_) => FeatureKind::Cookies,
            Feature::Auth(_) => FeatureKind::Auth,
            Feature::WebSocket(_) => FeatureKind::WebSocket,
        }
    }
}

impl fmt::Debug for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Feature").field(&self.kind()).finish()
    }
}

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(1);

/// Per-exchange store of capability bindings.
///
/// Created once per exchange, populated by the hosting layer before user code
/// runs, and mutated by any component installing a capability (including lazy
/// defaults). A kind maps to at most one instance at any time; inserting a
/// kind that is already bound replaces the prior instance.
///
/// The registry performs no cross-task coordination. The interior mutex only
/// keeps the map itself consistent; sequencing concurrent callers for the same
/// exchange is the hosting layer's obligation.
pub struct FeatureRegistry {
    id: u64,
    entries: Mutex<HashMap<FeatureKind, Feature>>,
}

impl FeatureRegistry {
    /// Create an empty registry with a process-unique identity.
    pub fn new() -> Self {
        Self {
            id: NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Process-unique identity, used by accessors to key their caches.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Install a capability, replacing any existing binding of the same kind.
    ///
    /// Returns the replaced instance, if any.
    pub fn insert(&self, feature: Feature) -> Option<Feature> {
        let kind = feature.kind();
        let replaced = self.lock().insert(kind, feature);
        tracing::trace!(kind = %kind, replaced = replaced.is_some(), "Feature installed");
        replaced
    }

    /// Remove the binding for a kind, if present.
    pub fn remove(&self, kind: FeatureKind) -> Option<Feature> {
        self.lock().remove(&kind)
    }

    /// Look up the instance bound to a kind. Never fails; absent means unset.
    pub fn get(&self, kind: FeatureKind) -> Option<Feature> {
        self.lock().get(&kind).cloned()
    }

    /// Snapshot of all bindings, for diagnostics and enumeration.
    /// Order is unspecified.
    pub fn entries(&self) -> Vec<(FeatureKind, Feature)> {
        self.lock().iter().map(|(k, v)| (*k, v.clone())).collect()
    }

    /// Number of bound kinds.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True if no capability is bound.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<FeatureKind, Feature>> {
        self.entries.lock().expect("feature registry mutex poisoned")
    }
}

impl Default for FeatureRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FeatureRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kinds: Vec<FeatureKind> = self.lock().keys().copied().collect();
        f.debug_struct("FeatureRegistry")
            .field("id", &self.id)
            .field("kinds", &kinds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::NoopAuthHandler;
    use crate::http::state::InMemoryResponseState;

    fn auth_feature() -> (Arc<dyn AuthHandler>, Feature) {
        let handler: Arc<dyn AuthHandler> = Arc::new(NoopAuthHandler);
        (handler.clone(), Feature::Auth(handler))
    }

    #[test]
    fn test_insert_then_get_returns_instance() {
        let registry = FeatureRegistry::new();
        let (handler, feature) = auth_feature();

        assert!(registry.insert(feature).is_none());

        match registry.get(FeatureKind::Auth) {
            Some(Feature::Auth(found)) => assert!(Arc::ptr_eq(&found, &handler)),
            other => panic!("expected auth feature, got {:?}", other),
        }
    }

    #[test]
    fn test_insert_replaces_prior_binding() {
        let registry = FeatureRegistry::new();
        let (first, feature) = auth_feature();
        registry.insert(feature);

        let (second, feature) = auth_feature();
        let replaced = registry.insert(feature);

        match replaced {
            Some(Feature::Auth(prior)) => assert!(Arc::ptr_eq(&prior, &first)),
            other => panic!("expected replaced auth feature, got {:?}", other),
        }
        match registry.get(FeatureKind::Auth) {
            Some(Feature::Auth(found)) => {
                assert!(Arc::ptr_eq(&found, &second));
                assert!(!Arc::ptr_eq(&found, &first));
            }
            other => panic!("expected auth feature, got {:?}", other),
        }
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_unbinds_kind() {
        let registry = FeatureRegistry::new();
        let (_, feature) = auth_feature();
        registry.insert(feature);

        assert!(registry.remove(FeatureKind::Auth).is_some());
        assert!(registry.get(FeatureKind::Auth).is_none());
        assert!(registry.remove(FeatureKind::Auth).is_none());
    }

    #[test]
    fn test_entries_snapshot() {
        let registry = FeatureRegistry::new();
        assert!(registry.is_empty());

        registry.insert(Feature::ResponseState(Arc::new(InMemoryResponseState::new())));
        let (_, feature) = auth_feature();
        registry.insert(feature);

        let entries = registry.entries();
        assert_eq!(entries.len(), 2);
        for (kind, feature) in entries {
            assert_eq!(kind, feature.kind());
        }
    }

    #[test]
    fn test_registry_identities_are_unique() {
        assert_ne!(FeatureRegistry::new().id(), FeatureRegistry::new().id());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(FeatureKind::ResponseState.to_string(), "response-state");
        assert_eq!(FeatureKind::Auth.to_string(), "auth");
    }
}
