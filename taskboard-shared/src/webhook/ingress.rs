/// Two-mode webhook ingress
///
/// Whether deliveries are authenticated is decided once, at startup, from
/// configuration. The two modes are distinct variants rather than a branch
/// inside the verifier, so deployments and tests can see exactly which trust
/// level is in force:
///
/// - [`WebhookIngress::Verified`]: signature verification with the endpoint
///   secret; unverifiable deliveries are rejected and never parsed.
/// - [`WebhookIngress::Trusting`]: parses the body without any authenticity
///   check. Local development only; the server logs a warning at startup
///   when this mode is selected.

use axum::http::HeaderMap;
use tracing::debug;

use crate::billing::event::WebhookEnvelope;
use super::signature::{SignatureError, WebhookSecret};

/// Error type for webhook ingress
#[derive(Debug, thiserror::Error)]
pub enum IngressError {
    /// Signature verification failed; the event was not processed
    #[error(transparent)]
    Signature(#[from] SignatureError),

    /// The body is not a valid event envelope
    #[error("Malformed webhook payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Webhook ingress strategy, selected at startup
pub enum WebhookIngress {
    /// Deliveries must carry a valid signature
    Verified(WebhookSecret),

    /// Deliveries are trusted as-is (local development only)
    Trusting,
}

impl WebhookIngress {
    /// Builds the ingress from an optional configured endpoint secret
    ///
    /// A present secret selects [`WebhookIngress::Verified`]; absence selects
    /// [`WebhookIngress::Trusting`].
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::InvalidSecret`] if a secret is configured
    /// but cannot be decoded.
    pub fn from_secret(secret: Option<&str>) -> Result<Self, SignatureError> {
        match secret {
            Some(s) => Ok(WebhookIngress::Verified(WebhookSecret::parse(s)?)),
            None => Ok(WebhookIngress::Trusting),
        }
    }

    /// Whether deliveries are authenticated
    pub fn is_verified(&self) -> bool {
        matches!(self, WebhookIngress::Verified(_))
    }

    /// Verifies (in `Verified` mode) and parses a delivery
    ///
    /// # Errors
    ///
    /// - [`IngressError::Signature`] when verification fails; the body is
    ///   never parsed in that case
    /// - [`IngressError::Malformed`] when the body is not a valid envelope
    pub fn receive(
        &self,
        headers: &HeaderMap,
        body: &[u8],
    ) -> Result<WebhookEnvelope, IngressError> {
        if let WebhookIngress::Verified(secret) = self {
            secret.verify(headers, body)?;
            debug!("Webhook signature verified");
        }

        let envelope: WebhookEnvelope = serde_json::from_slice(body)?;
        Ok(envelope)
    }
}
