//! HTTP response surface and capability contracts.
//!
//! # Data Flow
//! ```text
//! user code
//!     → response.rs (facade: status, headers, body, cookies, auth ops)
//!     → features layer resolves the capability
//!     → state.rs / cookies.rs / websocket.rs contract implementations
//!     → hosting layer serializes to the wire
//! ```

pub mod cookies;
pub mod headers;
pub mod response;
pub mod state;
pub mod websocket;

pub use cookies::{HeaderCookies, ResponseCookies};
pub use headers::Headers;
pub use response::Response;
pub use state::{BodySink, BoxedSink, InMemoryResponseState, ResponseState};
pub use websocket::{AcceptOptions, UpgradedIo, WebSocketUpgrade};
