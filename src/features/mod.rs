//! Per-exchange capability registry.
//!
//! # Responsibilities
//! - Map capability kinds to implementing instances for one HTTP exchange
//! - Resolve capabilities lazily and cache the binding per consumer
//! - Install default implementations on first use where a kind supports it
//!
//! # Resolution Flow
//!
//! ```text
//! Facade method ──▶ FeatureRef::fetch ──▶ cache hit? ──▶ return handle
//!                        │                    │
//!                        │                 cache miss
//!                        ▼                    ▼
//!                  FeatureRegistry::get(kind) ──▶ cache (registry id, handle)
//! ```
//!
//! # Design Decisions
//! - Closed `FeatureKind` enum instead of a type-keyed map; one contract per kind
//! - Absent lookups are never cached, so capabilities installed later are found
//! - Accessor caches are keyed by registry identity to survive accidental reuse
//!   of a facade against a different exchange
//! - No internal concurrency control beyond map consistency; an exchange is
//!   owned by one logical request flow

pub mod reference;
pub mod registry;

pub use reference::{
    AuthKind, CookiesKind, FeatureContract, FeatureRef, ResponseStateKind, WebSocketKind,
};
pub use registry::{Feature, FeatureKind, FeatureRegistry};
