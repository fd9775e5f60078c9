//! Negotiation message payloads.
//!
//! Challenge, sign-in, and sign-out share one shape: a requested scheme set
//! (for sign-in, derived from the identities), an optional property bag, and
//! an accepted set that starts empty and grows only through handler
//! acknowledgment. Each message is built for a single negotiation call,
//! consumed synchronously by the handler, and inspected once afterwards.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Opaque key/value bag a caller passes through to the handler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthProperties {
    entries: HashMap<String, String>,
}

impl AuthProperties {
    /// Empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for a key, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Insert or replace a value. Returns the prior value, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    /// All entries.
    pub fn entries(&self) -> &HashMap<String, String> {
        &self.entries
    }

    /// True if the bag holds nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<HashMap<String, String>> for AuthProperties {
    fn from(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }
}

/// An authenticated (or to-be-authenticated) identity.
///
/// The scheme label names the authentication mechanism that produced or
/// should process the identity; claims are opaque to this layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    scheme: String,
    claims: HashMap<String, String>,
}

impl Identity {
    /// Identity for a scheme, with no claims.
    pub fn new(scheme: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            claims: HashMap::new(),
        }
    }

    /// Builder-style claim attachment.
    pub fn with_claim(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.claims.insert(name.into(), value.into());
        self
    }

    /// The scheme label.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The claim set.
    pub fn claims(&self) -> &HashMap<String, String> {
        &self.claims
    }
}

/// Requested − accepted, in first-request order, duplicates collapsed.
fn missing<'a>(requested: impl Iterator<Item = &'a str>, accepted: &HashSet<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    requested
        .filter(|scheme| !accepted.contains(*scheme) && seen.insert(scheme.to_string()))
        .map(str::to_string)
        .collect()
}

/// Challenge negotiation message.
#[derive(Debug)]
pub struct ChallengeMessage {
    schemes: Vec<String>,
    properties: AuthProperties,
    accepted: HashSet<String>,
}

impl ChallengeMessage {
    /// Build a message for the requested schemes.
    pub fn new(schemes: Vec<String>, properties: AuthProperties) -> Self {
        Self {
            schemes,
            properties,
            accepted: HashSet::new(),
        }
    }

    /// The requested schemes, in request order.
    pub fn schemes(&self) -> &[String] {
        &self.schemes
    }

    /// The caller's property bag.
    pub fn properties(&self) -> &AuthProperties {
        &self.properties
    }

    /// Record that the handler acted on a scheme.
    pub fn accept(&mut self, scheme: impl Into<String>) {
        self.accepted.insert(scheme.into());
    }

    /// Schemes acknowledged so far.
    pub fn accepted(&self) -> &HashSet<String> {
        &self.accepted
    }

    /// Requested schemes the handler has not acknowledged.
    pub fn unacknowledged(&self) -> Vec<String> {
        missing(self.schemes.iter().map(String::as_str), &self.accepted)
    }
}

/// Sign-in negotiation message.
///
/// The requested scheme set is derived from each identity's scheme label.
#[derive(Debug)]
pub struct SignInMessage {
    identities: Vec<Identity>,
    properties: AuthProperties,
    accepted: HashSet<String>,
}

impl SignInMessage {
    /// Build a message for the identities to sign in.
    pub fn new(identities: Vec<Identity>, properties: AuthProperties) -> Self {
        Self {
            identities,
            properties,
            accepted: HashSet::new(),
        }
    }

    /// The identities to sign in.
    pub fn identities(&self) -> &[Identity] {
        &self.identities
    }

    /// The caller's property bag.
    pub fn properties(&self) -> &AuthProperties {
        &self.properties
    }

    /// Record that the handler acted on a scheme.
    pub fn accept(&mut self, scheme: impl Into<String>) {
        self.accepted.insert(scheme.into());
    }

    /// Schemes acknowledged so far.
    pub fn accepted(&self) -> &HashSet<String> {
        &self.accepted
    }

    /// Identity schemes the handler has not acknowledged.
    pub fn unacknowledged(&self) -> Vec<String> {
        missing(self.identities.iter().map(Identity::scheme), &self.accepted)
    }
}

/// Sign-out negotiation message. Carries no property bag.
#[derive(Debug)]
pub struct SignOutMessage {
    schemes: Vec<String>,
    accepted: HashSet<String>,
}

impl SignOutMessage {
    /// Build a message for the schemes to sign out of.
    pub fn new(schemes: Vec<String>) -> Self {
        Self {
            schemes,
            accepted: HashSet::new(),
        }
    }

    /// The requested schemes, in request order.
    pub fn schemes(&self) -> &[String] {
        &self.schemes
    }

    /// Record that the handler acted on a scheme.
    pub fn accept(&mut self, scheme: impl Into<String>) {
        self.accepted.insert(scheme.into());
    }

    /// Schemes acknowledged so far.
    pub fn accepted(&self) -> &HashSet<String> {
        &self.accepted
    }

    /// Requested schemes the handler has not acknowledged.
    pub fn unacknowledged(&self) -> Vec<String> {
        missing(self.schemes.iter().map(String::as_str), &self.accepted)
    }
}
