//! Response facade.
//!
//! # Responsibilities
//! - Present a stable, capability-agnostic response surface to user code
//! - Resolve every capability through a cached accessor; hold no response
//!   state of its own
//! - Drive the authentication negotiation protocol (validate → prepare →
//!   dispatch → verify)
//!
//! # Design Decisions
//! - Methods take `&mut self`: accessor caches fill on first use, and an
//!   exchange belongs to one logical request flow
//! - The cookie and auth capabilities are installed lazily with defaults;
//!   response state must be installed by the host (methods panic otherwise)

use std::io;
use std::sync::Arc;

use bytes::Bytes;
use http::header::{CONTENT_TYPE, LOCATION};
use http::StatusCode;
use tokio::io::AsyncWriteExt;

use crate::auth::{
    AuthHandler, AuthProperties, ChallengeMessage, Identity, NoopAuthHandler, SignInMessage,
    SignOutMessage,
};
use crate::error::{NegotiationError, NegotiationResult};
use crate::features::reference::{AuthKind, CookiesKind, FeatureRef, ResponseStateKind};
use crate::features::registry::FeatureRegistry;
use crate::http::cookies::{HeaderCookies, ResponseCookies};
use crate::http::headers::Headers;
use crate::http::state::{BodySink, BoxedSink, ResponseState};

/// The response surface of one HTTP exchange.
///
/// Every method delegates to a capability resolved from the exchange's
/// registry; the facade only caches the resolution.
pub struct Response {
    features: Arc<FeatureRegistry>,
    state: FeatureRef<ResponseStateKind>,
    cookies: FeatureRef<CookiesKind>,
    auth: FeatureRef<AuthKind>,
}

impl Response {
    /// Build a facade over an exchange's registry.
    pub fn new(features: Arc<FeatureRegistry>) -> Self {
        Self {
            features,
            state: FeatureRef::new(),
            cookies: FeatureRef::new(),
            auth: FeatureRef::new(),
        }
    }

    /// Current status code.
    pub fn status(&mut self) -> StatusCode {
        self.state().status()
    }

    /// Replace the status code.
    pub fn set_status(&mut self, status: StatusCode) {
        self.state().set_status(status);
    }

    /// Live view over the response headers. Mutations are immediately
    /// visible to the underlying capability.
    pub fn headers(&mut self) -> Headers {
        self.state().headers()
    }

    /// Handle to the body stream.
    pub fn body(&mut self) -> BodySink {
        self.state().body()
    }

    /// Replace the body stream.
    pub fn set_body(&mut self, sink: BoxedSink) {
        self.state().set_body(sink);
    }

    /// The Content-Type header, if set.
    pub fn content_type(&mut self) -> Option<String> {
        self.headers().get(CONTENT_TYPE.as_str())
    }

    /// Set the Content-Type header. A blank value removes the header
    /// instead of storing an empty one.
    pub fn set_content_type(&mut self, value: &str) {
        let headers = self.headers();
        if value.trim().is_empty() {
            headers.remove(CONTENT_TYPE.as_str());
        } else {
            headers.set(CONTENT_TYPE.as_str(), value);
        }
    }

    /// Parsed Content-Length, if present and numeric.
    pub fn content_length(&mut self) -> Option<u64> {
        self.headers().content_length()
    }

    /// Set or clear Content-Length. `None` removes the header.
    pub fn set_content_length(&mut self, length: Option<u64>) {
        self.headers().set_content_length(length);
    }

    /// Redirect to `location`: 301 when permanent, 302 otherwise.
    /// The location is passed through unvalidated.
    pub fn redirect(&mut self, location: &str, permanent: bool) {
        let state = self.state();
        state.set_status(if permanent {
            StatusCode::MOVED_PERMANENTLY
        } else {
            StatusCode::FOUND
        });
        state.headers().set(LOCATION.as_str(), location);
    }

    /// Register a callback to run before headers are sent.
    pub fn on_sending_headers(&mut self, callback: impl FnOnce() + Send + 'static) {
        self.state().on_sending_headers(Box::new(callback));
    }

    /// Write text to the body as UTF-8. Suspends while the underlying sink
    /// writes; the outcome is propagated unchanged.
    pub async fn write(&mut self, text: &str) -> io::Result<()> {
        self.write_bytes(Bytes::copy_from_slice(text.as_bytes()))
            .await
    }

    /// Write raw bytes to the body.
    pub async fn write_bytes(&mut self, data: Bytes) -> io::Result<()> {
        let sink = self.state().body();
        let mut sink = sink.lock().await;
        sink.write_all(&data).await
    }

    /// Cookie-write capability, installing the header-backed provider on
    /// first use.
    pub fn cookies(&mut self) -> Arc<dyn ResponseCookies> {
        let features = self.features.clone();
        self.cookies
            .fetch_or_install(&self.features, || Arc::new(HeaderCookies::new(features)))
    }

    /// Issue an authentication challenge for the requested schemes.
    ///
    /// Sets status 401 before dispatching to the handler capability; the
    /// 401 persists even when verification fails. `None` schemes fail with
    /// [`NegotiationError::MissingSchemes`] before any handler runs.
    pub async fn challenge(
        &mut self,
        schemes: Option<Vec<String>>,
        properties: Option<AuthProperties>,
    ) -> NegotiationResult<()> {
        let schemes = schemes.ok_or(NegotiationError::MissingSchemes)?;

        self.state().set_status(StatusCode::UNAUTHORIZED);
        let handler = self.auth_handler();

        let mut message = ChallengeMessage::new(schemes, properties.unwrap_or_default());
        tracing::debug!(schemes = ?message.schemes(), "Dispatching authentication challenge");
        handler.challenge(&mut message).await;

        Self::verify(message.unacknowledged())
    }

    /// Sign the given identities in. The requested scheme set is derived
    /// from each identity's scheme label. Status is left untouched.
    pub async fn sign_in(
        &mut self,
        identities: Option<Vec<Identity>>,
        properties: Option<AuthProperties>,
    ) -> NegotiationResult<()> {
        let identities = identities.ok_or(NegotiationError::MissingIdentities)?;
        let handler = self.auth_handler();

        let mut message = SignInMessage::new(identities, properties.unwrap_or_default());
        tracing::debug!(identities = message.identities().len(), "Dispatching sign-in");
        handler.sign_in(&mut message).await;

        Self::verify(message.unacknowledged())
    }

    /// Sign out of the requested schemes. Status is left untouched.
    pub async fn sign_out(&mut self, schemes: Option<Vec<String>>) -> NegotiationResult<()> {
        let schemes = schemes.ok_or(NegotiationError::MissingSchemes)?;
        let handler = self.auth_handler();

        let mut message = SignOutMessage::new(schemes);
        tracing::debug!(schemes = ?message.schemes(), "Dispatching sign-out");
        handler.sign_out(&mut message).await;

        Self::verify(message.unacknowledged())
    }

    fn verify(unacknowledged: Vec<String>) -> NegotiationResult<()> {
        if unacknowledged.is_empty() {
            Ok(())
        } else {
            tracing::warn!(schemes = ?unacknowledged, "Authentication schemes were not accepted");
            Err(NegotiationError::NotAccepted {
                schemes: unacknowledged,
            })
        }
    }

    fn auth_handler(&mut self) -> Arc<dyn AuthHandler> {
        self.auth
            .fetch_or_install(&self.features, || Arc::new(NoopAuthHandler))
    }

    /// Panics if the host never installed a response-state capability;
    /// that binding is the hosting layer's obligation.
    fn state(&mut self) -> Arc<dyn ResponseState> {
        self.state
            .fetch(&self.features)
            .expect("response-state capability not installed")
    }
}

impl std::fmt::Debug for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Response")
            .field("features", &self.features)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::registry::Feature;
    use crate::http::state::InMemoryResponseState;
    use tokio::io::AsyncReadExt;

    fn response() -> Response {
        let features = Arc::new(FeatureRegistry::new());
        features.insert(Feature::ResponseState(Arc::new(InMemoryResponseState::new())));
        Response::new(features)
    }

    #[test]
    fn test_redirect_permanent() {
        let mut response = response();
        response.redirect("/x", true);

        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers().get("location").as_deref(), Some("/x"));
    }

    #[test]
    fn test_redirect_temporary() {
        let mut response = response();
        response.redirect("/x", false);

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers().get("location").as_deref(), Some("/x"));
    }

    #[test]
    fn test_content_type_roundtrip() {
        let mut response = response();
        response.set_content_type("application/json");
        assert_eq!(response.content_type().as_deref(), Some("application/json"));
    }

    #[test]
    fn test_blank_content_type_removes_header() {
        let mut response = response();
        response.set_content_type("text/plain");

        response.set_content_type("");
        assert!(response.content_type().is_none());
        assert!(!response.headers().contains("content-type"));

        response.set_content_type("text/plain");
        response.set_content_type("   ");
        assert!(response.content_type().is_none());
    }

    #[test]
    fn test_content_length_delegates_to_headers() {
        let mut response = response();
        response.set_content_length(Some(7));
        assert_eq!(response.content_length(), Some(7));

        response.set_content_length(None);
        assert!(response.content_length().is_none());
    }

    #[tokio::test]
    async fn test_write_encodes_utf8_through_sink() {
        let mut response = response();
        let (client, mut server) = tokio::io::duplex(64);
        response.set_body(Box::new(client));

        response.write("grüß dich").await.unwrap();

        let expected = "grüß dich".as_bytes();
        let mut buffer = vec![0u8; expected.len()];
        server.read_exact(&mut buffer).await.unwrap();
        assert_eq!(buffer, expected);
    }

    #[test]
    fn test_cookies_installed_once() {
        let mut response = response();
        let first = response.cookies();
        let second = response.cookies();
        assert!(Arc::ptr_eq(&first, &second));

        assert!(response
            .features
            .get(crate::features::registry::FeatureKind::Cookies)
            .is_some());
    }
}
