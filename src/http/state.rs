//! Response-state capability.
//!
//! # Responsibilities
//! - Carry status code, header store, and the body sink for one exchange
//! - Register before-headers-sent callbacks with the provider
//! - Provide an in-memory implementation for hosts and tests
//!
//! # Design Decisions
//! - The body sink lives behind an async mutex so a write can hold it across
//!   suspension without blocking the runtime
//! - Callbacks fire LIFO, each at most once; firing is a provider operation,
//!   not part of the capability contract

use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Arc, Mutex};

use http::{HeaderMap, StatusCode};
use tokio::io::AsyncWrite;

use crate::http::headers::Headers;

/// Boxed body stream a response writes into.
pub type BoxedSink = Box<dyn AsyncWrite + Send + Unpin>;

/// Shared handle to the body stream.
///
/// The async mutex lets a writer suspend mid-write while the handle stays
/// cloneable for later writers.
pub type BodySink = Arc<tokio::sync::Mutex<BoxedSink>>;

/// Callback invoked just before response headers are serialized.
/// State travels by closure capture.
pub type SendingHeadersCallback = Box<dyn FnOnce() + Send>;

/// Response-state capability: the mutable surface of an in-flight response.
///
/// Providers supply interior mutability; all methods take `&self` so the
/// instance can be shared behind an `Arc`.
pub trait ResponseState: Send + Sync {
    /// Current status code.
    fn status(&self) -> StatusCode;

    /// Replace the status code.
    fn set_status(&self, status: StatusCode);

    /// Live view over the response's header store. Not a snapshot.
    fn headers(&self) -> Headers;

    /// Handle to the current body stream.
    fn body(&self) -> BodySink;

    /// Replace the body stream. Handles obtained earlier keep the old one.
    fn set_body(&self, sink: BoxedSink);

    /// Register a callback to run before headers are sent.
    fn on_sending_headers(&self, callback: SendingHeadersCallback);
}

/// In-memory response state.
///
/// Fresh instances report status 200, an empty header store, and a body sink
/// that discards writes until the host installs a real stream.
pub struct InMemoryResponseState {
    status: AtomicU16,
    headers: Arc<Mutex<HeaderMap>>,
    body: Mutex<BodySink>,
    callbacks: Mutex<Vec<SendingHeadersCallback>>,
}

impl InMemoryResponseState {
    /// Create a fresh response state.
    pub fn new() -> Self {
        let sink: BoxedSink = Box::new(tokio::io::sink());
        Self {
            status: AtomicU16::new(StatusCode::OK.as_u16()),
            headers: Arc::new(Mutex::new(HeaderMap::new())),
            body: Mutex::new(Arc::new(tokio::sync::Mutex::new(sink))),
            callbacks: Mutex::new(Vec::new()),
        }
    }

    /// Run all registered before-headers-sent callbacks, most recent first.
    ///
    /// Hosts call this once, right before serializing headers to the wire.
    /// Each callback runs at most once; the list is left empty.
    pub fn fire_sending_headers(&self) {
        let mut callbacks = self
            .callbacks
            .lock()
            .expect("sending-headers callback mutex poisoned");
        let drained: Vec<SendingHeadersCallback> = callbacks.drain(..).collect();
        drop(callbacks);

        tracing::trace!(count = drained.len(), "Firing sending-headers callbacks");
        for callback in drained.into_iter().rev() {
            callback();
        }
    }
}

impl ResponseState for InMemoryResponseState {
    fn status(&self) -> StatusCode {
        // Only valid codes are ever stored; fall back defensively anyway.
        StatusCode::from_u16(self.status.load(Ordering::Relaxed)).unwrap_or(StatusCode::OK)
    }

    fn set_status(&self, status: StatusCode) {
        self.status.store(status.as_u16(), Ordering::Relaxed);
    }

    fn headers(&self) -> Headers {
        Headers::from_shared(self.headers.clone())
    }

    fn body(&self) -> BodySink {
        self.body.lock().expect("body sink mutex poisoned").clone()
    }

    fn set_body(&self, sink: BoxedSink) {
        *self.body.lock().expect("body sink mutex poisoned") =
            Arc::new(tokio::sync::Mutex::new(sink));
    }

    fn on_sending_headers(&self, callback: SendingHeadersCallback) {
        self.callbacks
            .lock()
            .expect("sending-headers callback mutex poisoned")
            .push(callback);
    }
}

impl Default for InMemoryResponseState {
    fn default() -> Self {
        Self::new()
    }
}
