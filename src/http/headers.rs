//! Live header-dictionary view.
//!
//! # Responsibilities
//! - Case-insensitive get/set/append/remove over a shared header store
//! - Single- and multi-valued access
//! - Content-Length parse/format helpers
//!
//! # Design Decisions
//! - Every view wraps the same store; mutations through any view are
//!   immediately visible to the capability and to other views (no snapshots)
//! - Invalid header names or values are dropped with a warning instead of
//!   failing the caller; the set/append return value reports the outcome

use std::sync::{Arc, Mutex, MutexGuard};

use http::header::{HeaderName, CONTENT_LENGTH};
use http::{HeaderMap, HeaderValue};

/// A live, shared view over a response's header store.
///
/// Cloning the view clones the handle, not the headers.
#[derive(Clone)]
pub struct Headers {
    store: Arc<Mutex<HeaderMap>>,
}

impl Headers {
    /// Create a view over a fresh, empty store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(Mutex::new(HeaderMap::new())),
        }
    }

    /// Create a view over an existing shared store.
    pub fn from_shared(store: Arc<Mutex<HeaderMap>>) -> Self {
        Self { store }
    }

    /// First value for a name, if present and valid UTF-8.
    pub fn get(&self, name: &str) -> Option<String> {
        self.lock()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    }

    /// All values for a name, in insertion order.
    pub fn get_all(&self, name: &str) -> Vec<String> {
        self.lock()
            .get_all(name)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_string)
            .collect()
    }

    /// Replace all values for a name with a single value.
    ///
    /// Returns false (and leaves the store untouched) if the name or value
    /// is not a legal header.
    pub fn set(&self, name: &str, value: &str) -> bool {
        match Self::parse(name, value) {
            Some((name, value)) => {
                self.lock().insert(name, value);
                true
            }
            None => false,
        }
    }

    /// Add a value for a name, keeping existing values.
    pub fn append(&self, name: &str, value: &str) -> bool {
        match Self::parse(name, value) {
            Some((name, value)) => {
                self.lock().append(name, value);
                true
            }
            None => false,
        }
    }

    /// Remove every value for a name. Returns true if anything was removed.
    pub fn remove(&self, name: &str) -> bool {
        self.lock().remove(name).is_some()
    }

    /// True if at least one value is present for the name.
    pub fn contains(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    /// Number of values across all names.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True if no header is set.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Snapshot of all (name, value) pairs; multi-valued names repeat.
    pub fn entries(&self) -> Vec<(String, String)> {
        self.lock()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect()
    }

    /// Parsed Content-Length. Absent or non-numeric values read as `None`.
    pub fn content_length(&self) -> Option<u64> {
        self.get(CONTENT_LENGTH.as_str())
            .and_then(|value| value.trim().parse().ok())
    }

    /// Set or clear Content-Length. `None` removes the header.
    pub fn set_content_length(&self, length: Option<u64>) {
        match length {
            Some(length) => {
                self.set(CONTENT_LENGTH.as_str(), &length.to_string());
            }
            None => {
                self.remove(CONTENT_LENGTH.as_str());
            }
        }
    }

    fn parse(name: &str, value: &str) -> Option<(HeaderName, HeaderValue)> {
        let parsed_name = match HeaderName::from_bytes(name.as_bytes()) {
            Ok(parsed) => parsed,
            Err(_) => {
                tracing::warn!(name = %name, "Invalid header name dropped");
                return None;
            }
        };
        let parsed_value = match HeaderValue::from_str(value) {
            Ok(parsed) => parsed,
            Err(_) => {
                tracing::warn!(name = %name, "Invalid header value dropped");
                return None;
            }
        };
        Some((parsed_name, parsed_value))
    }

    fn lock(&self) -> MutexGuard<'_, HeaderMap> {
        self.store.lock().expect("header store mutex poisoned")
    }
}

impl Default for Headers {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Headers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Headers").field("len", &self.len()).finish()
    }
}
