//! Per-exchange HTTP capability layer.
//!
//! Lets request-processing code depend on *capabilities* of an HTTP exchange
//! (response state, cookies, authentication handling, WebSocket upgrade)
//! without depending on a concrete server implementation.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────┐
//!                    │                    EXCHANGE                       │
//!                    │                                                   │
//!   user code        │  ┌──────────┐      ┌────────────┐               │
//!   ────────────────▶│  │ Response │─────▶│ FeatureRef │ (cached)       │
//!                    │  │  facade  │      └─────┬──────┘               │
//!                    │  └──────────┘            │ resolve               │
//!                    │                          ▼                       │
//!                    │               ┌──────────────────┐               │
//!                    │               │ FeatureRegistry  │               │
//!                    │               │  kind → instance │               │
//!                    │               └───────┬──────────┘               │
//!                    │                       │                          │
//!                    │    ┌──────────┬───────┴─────┬────────────┐       │
//!                    │    ▼          ▼             ▼            ▼       │
//!                    │ response-  cookies        auth       websocket   │
//!                    │  state    (lazy default) (lazy no-op) (host)     │
//!                    └──────────────────────────────────────────────────┘
//!                                        ▲
//!                        hosting layer populates before user code runs
//! ```
//!
//! The facade resolves each capability through a lazy, per-registry-identity
//! cached accessor; the authentication operations additionally run a
//! negotiation protocol in which the handler must acknowledge every
//! requested scheme.

// Capability model
pub mod features;

// Response surface and capability contracts
pub mod http;

// Authentication negotiation
pub mod auth;

// Cross-cutting concerns
pub mod error;
pub mod exchange;

pub use auth::{AuthHandler, AuthProperties, Identity, NoopAuthHandler};
pub use error::{NegotiationError, NegotiationResult};
pub use exchange::Exchange;
pub use features::{Feature, FeatureKind, FeatureRef, FeatureRegistry};
pub use self::http::{Headers, InMemoryResponseState, Response, ResponseState};
