//! Lazy, caching capability accessors.
//!
//! A [`FeatureRef`] is bound to one capability kind through a
//! [`FeatureContract`] marker type. It resolves from the registry on first
//! use, caches the binding keyed by registry identity, and can install a
//! default implementation when none is present. Absent lookups are never
//! cached: a capability installed later in the exchange's lifetime is picked
//! up by the next fetch.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::auth::AuthHandler;
use crate::features::registry::{Feature, FeatureKind, FeatureRegistry};
use crate::http::cookies::ResponseCookies;
use crate::http::state::ResponseState;
use crate::http::websocket::WebSocketUpgrade;

/// Binds a capability kind to its trait-object handle.
///
/// One marker type per [`FeatureKind`] implements this; the accessor is
/// generic over the marker rather than hand-duplicated per kind.
pub trait FeatureContract {
    /// Shared-ownership handle to an implementing instance.
    type Handle: Clone;

    /// The registry kind this contract resolves.
    const KIND: FeatureKind;

    /// Extract the handle when the stored variant matches this contract.
    fn from_feature(feature: &Feature) -> Option<Self::Handle>;

    /// Wrap a handle for installation into the registry.
    fn into_feature(handle: Self::Handle) -> Feature;
}

/// Marker for the response-state capability.
pub struct ResponseStateKind;

impl FeatureContract for ResponseStateKind {
    type Handle = Arc<dyn ResponseState>;
    const KIND: FeatureKind = FeatureKind::ResponseState;

    fn from_feature(feature: &Feature) -> Option<Self::Handle> {
        match feature {
            Feature::ResponseState(handle) => Some(handle.clone()),
            _ => None,
        }
    }

    fn into_feature(handle: Self::Handle) -> Feature {
        Feature::ResponseState(handle)
    }
}

/// Marker for the cookie capability.
pub struct CookiesKind;

impl FeatureContract for CookiesKind {
    type Handle = Arc<dyn ResponseCookies>;
    const KIND: FeatureKind = FeatureKind::Cookies;

    fn from_feature(feature: &Feature) -> Option<Self::Handle> {
        match feature {
            Feature::Cookies(handle) => Some(handle.clone()),
            _ => None,
        }
    }

    fn into_feature(handle: Self::Handle) -> Feature {
        Feature::Cookies(handle)
    }
}

/// Marker for the authentication-handler capability.
pub struct AuthKind;

impl FeatureContract for AuthKind {
    type Handle = Arc<dyn AuthHandler>;
    const KIND: FeatureKind = FeatureKind::Auth;

    fn from_feature(feature: &Feature) -> Option<Self::Handle> {
        match feature {
            Feature::Auth(handle) => Some(handle.clone()),
            _ => None,
        }
    }

    fn into_feature(handle: Self::Handle) -> Feature {
        Feature::Auth(handle)
    }
}

/// Marker for the WebSocket-upgrade capability.
pub struct WebSocketKind;

impl FeatureContract for WebSocketKind {
    type Handle = Arc<dyn WebSocketUpgrade>;
    const KIND: FeatureKind = FeatureKind::WebSocket;

    fn from_feature(feature: &Feature) -> Option<Self::Handle> {
        match feature {
            Feature::WebSocket(handle) => Some(handle.clone()),
            _ => None,
        }
    }

    fn into_feature(handle: Self::Handle) -> Feature {
        Feature::WebSocket(handle)
    }
}

/// Caching resolver bound to one capability kind.
///
/// The cache is keyed by registry identity: a handle fetched from one
/// registry is never served for a different one, so a facade accidentally
/// reused across exchanges re-resolves instead of leaking state.
pub struct FeatureRef<C: FeatureContract> {
    cached: Option<(u64, C::Handle)>,
    _contract: PhantomData<C>,
}

impl<C: FeatureContract> FeatureRef<C> {
    /// Create an accessor with an empty cache.
    pub fn new() -> Self {
        Self {
            cached: None,
            _contract: PhantomData,
        }
    }

    /// Resolve the capability, consulting the cache first.
    ///
    /// Returns the cached handle when the cache was filled from this exact
    /// registry. On a miss the registry is queried; a hit is cached, an
    /// absent binding is returned as `None` without caching so a later
    /// install is observed by the next call.
    pub fn fetch(&mut self, registry: &FeatureRegistry) -> Option<C::Handle> {
        if let Some((id, handle)) = &self.cached {
            if *id == registry.id() {
                tracing::trace!(kind = %C::KIND, "Feature cache hit");
                return Some(handle.clone());
            }
        }

        let handle = registry
            .get(C::KIND)
            .and_then(|feature| C::from_feature(&feature));
        if let Some(handle) = &handle {
            self.cached = Some((registry.id(), handle.clone()));
        }
        handle
    }

    /// Resolve the capability, installing a factory-built default if absent.
    ///
    /// After this returns, the registry holds a binding for the kind.
    /// Idempotent: a second call returns the cached handle without invoking
    /// the factory again.
    pub fn fetch_or_install(
        &mut self,
        registry: &FeatureRegistry,
        factory: impl FnOnce() -> C::Handle,
    ) -> C::Handle {
        if let Some(handle) = self.fetch(registry) {
            return handle;
        }

        let handle = factory();
        registry.insert(C::into_feature(handle.clone()));
        self.cached = Some((registry.id(), handle.clone()));
        tracing::debug!(kind = %C::KIND, "Installed default feature");
        handle
    }
}

impl<C: FeatureContract> Default for FeatureRef<C> {
    fn default() -> Self {
        Self::new()
    }
}
