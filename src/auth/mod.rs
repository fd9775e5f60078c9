//! Authentication negotiation protocol.
//!
//! # Responsibilities
//! - Carry challenge / sign-in / sign-out requests to the handler capability
//! - Record which schemes the handler acknowledged
//! - Define the handler contract and the no-op default
//!
//! # Negotiation Flow
//! ```text
//! caller ──▶ facade: validate ──▶ prepare (401 for challenge)
//!                 │
//!                 ▼
//!          handler capability (lazy no-op default)
//!                 │  acknowledges schemes on the message
//!                 ▼
//!          facade: verify requested − accepted == ∅
//! ```
//!
//! # Design Decisions
//! - Verification is one-directional: only requested-but-unacknowledged
//!   schemes are errors; extra acknowledgments pass
//! - Handlers are infallible at this boundary; their output channel is the
//!   accepted set and whatever they do to the exchange
//! - Status changes made during prepare are not rolled back on failure

pub mod handler;
pub mod message;

pub use handler::{AuthHandler, NoopAuthHandler};
pub use message::{AuthProperties, ChallengeMessage, Identity, SignInMessage, SignOutMessage};
