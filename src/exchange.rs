//! Per-request exchange context.

use std::sync::Arc;

use crate::features::registry::{Feature, FeatureRegistry};
use crate::http::response::Response;
use crate::http::state::InMemoryResponseState;

/// One HTTP exchange: the capability registry and the response facade built
/// alongside it. Created by the hosting layer when a request arrives,
/// discarded when the exchange ends.
pub struct Exchange {
    features: Arc<FeatureRegistry>,
    response: Response,
}

impl Exchange {
    /// Exchange over a fresh registry seeded with an in-memory response
    /// state. Suitable for tests and in-process hosts.
    pub fn new() -> Self {
        let features = Arc::new(FeatureRegistry::new());
        features.insert(Feature::ResponseState(Arc::new(InMemoryResponseState::new())));
        Self::with_features(features)
    }

    /// Exchange over a registry the hosting layer has already populated.
    pub fn with_features(features: Arc<FeatureRegistry>) -> Self {
        Self {
            response: Response::new(features.clone()),
            features,
        }
    }

    /// The exchange's capability registry.
    pub fn features(&self) -> &Arc<FeatureRegistry> {
        &self.features
    }

    /// The response facade.
    pub fn response(&mut self) -> &mut Response {
        &mut self.response
    }
}

impl Default for Exchange {
    fn default() -> Self {
        Self::new()
    }
}
