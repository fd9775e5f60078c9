//! Authentication-handler capability.

use async_trait::async_trait;

use crate::auth::message::{ChallengeMessage, SignInMessage, SignOutMessage};

/// Authentication-handler capability.
///
/// A handler inspects the message's requested schemes, performs whatever
/// protocol work it supports, and acknowledges each scheme it acted on via
/// the message's accepted set. Schemes a handler does not support are
/// legitimately left unacknowledged; the facade turns the gap into an error
/// after dispatch. All methods default to doing nothing, so an implementor
/// picks the operations it supports.
#[async_trait]
pub trait AuthHandler: Send + Sync {
    /// Process an authentication challenge.
    async fn challenge(&self, message: &mut ChallengeMessage) {
        let _ = message;
    }

    /// Process a sign-in request.
    async fn sign_in(&self, message: &mut SignInMessage) {
        let _ = message;
    }

    /// Process a sign-out request.
    async fn sign_out(&self, message: &mut SignOutMessage) {
        let _ = message;
    }
}

/// Handler installed when an exchange has none: takes no action and
/// acknowledges nothing, so any non-empty request fails verification.
pub struct NoopAuthHandler;

#[async_trait]
impl AuthHandler for NoopAuthHandler {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::message::AuthProperties;

    #[tokio::test]
    async fn test_noop_acknowledges_nothing() {
        let handler = NoopAuthHandler;

        let mut challenge = ChallengeMessage::new(vec!["A".into()], AuthProperties::new());
        handler.challenge(&mut challenge).await;
        assert_eq!(challenge.unacknowledged(), vec!["A"]);

        let mut sign_out = SignOutMessage::new(vec!["A".into()]);
        handler.sign_out(&mut sign_out).await;
        assert_eq!(sign_out.unacknowledged(), vec!["A"]);
    }
}
