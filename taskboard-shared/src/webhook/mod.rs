/// Webhook ingress
///
/// Inbound subscription events from the identity provider arrive as signed
/// HTTP deliveries. This module verifies their authenticity and decodes them
/// into [`crate::billing::event::SubscriptionEvent`].
///
/// # Modules
///
/// - [`signature`]: HMAC-SHA256 verification of the provider's signature
///   headers (the Svix scheme Clerk webhooks use)
/// - [`ingress`]: the two-mode ingress (`Verified` vs `Trusting`) and
///   envelope parsing
///
/// # Example
///
/// ```
/// use taskboard_shared::webhook::ingress::WebhookIngress;
/// use axum::http::HeaderMap;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let ingress = WebhookIngress::Trusting;
/// let body = br#"{"type": "subscription.paused", "data": {}}"#;
/// let envelope = ingress.receive(&HeaderMap::new(), body)?;
/// assert_eq!(envelope.event_type, "subscription.paused");
/// # Ok(())
/// # }
/// ```

pub mod ingress;
pub mod signature;
