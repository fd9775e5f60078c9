//! Shared utilities for integration testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use http_exchange::auth::{AuthHandler, ChallengeMessage, SignInMessage, SignOutMessage};
use http_exchange::{Exchange, Feature, FeatureRegistry, InMemoryResponseState};

/// A scripted authentication handler: acknowledges a fixed scheme set on
/// every message and counts invocations.
pub struct ScriptedHandler {
    accepts: Vec<String>,
    pub challenges: AtomicU32,
    pub sign_ins: AtomicU32,
    pub sign_outs: AtomicU32,
    /// Property-bag entries observed on the last challenge.
    pub seen_properties: Mutex<Vec<(String, String)>>,
}

impl ScriptedHandler {
    pub fn new(accepts: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            accepts: accepts.iter().map(|s| s.to_string()).collect(),
            challenges: AtomicU32::new(0),
            sign_ins: AtomicU32::new(0),
            sign_outs: AtomicU32::new(0),
            seen_properties: Mutex::new(Vec::new()),
        })
    }

    pub fn challenge_count(&self) -> u32 {
        self.challenges.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> u32 {
        self.challenges.load(Ordering::SeqCst)
            + self.sign_ins.load(Ordering::SeqCst)
            + self.sign_outs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthHandler for ScriptedHandler {
    async fn challenge(&self, message: &mut ChallengeMessage) {
        self.challenges.fetch_add(1, Ordering::SeqCst);
        let mut seen = self.seen_properties.lock().unwrap();
        seen.clear();
        for (key, value) in message.properties().entries() {
            seen.push((key.clone(), value.clone()));
        }
        drop(seen);
        for scheme in &self.accepts {
            message.accept(scheme.clone());
        }
    }

    async fn sign_in(&self, message: &mut SignInMessage) {
        self.sign_ins.fetch_add(1, Ordering::SeqCst);
        for scheme in &self.accepts {
            message.accept(scheme.clone());
        }
    }

    async fn sign_out(&self, message: &mut SignOutMessage) {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
        for scheme in &self.accepts {
            message.accept(scheme.clone());
        }
    }
}

/// Build an exchange the way a hosting layer would: response state plus the
/// given authentication handler, pre-installed before user code runs.
pub fn host_exchange(handler: Arc<ScriptedHandler>) -> Exchange {
    let features = Arc::new(FeatureRegistry::new());
    features.insert(Feature::ResponseState(Arc::new(InMemoryResponseState::new())));
    features.insert(Feature::Auth(handler));
    Exchange::with_features(features)
}
