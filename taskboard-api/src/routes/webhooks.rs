/// Clerk webhook endpoint
///
/// Listens for subscription lifecycle events and adjusts the organization's
/// member limit at Clerk accordingly:
///
/// - `subscription.created` / `subscription.updated`: unlimited members
///   while an active pro-tier item is present, free-tier limit otherwise
/// - `subscription.deleted` / `subscription.cancelled`: free-tier limit
/// - anything else: acknowledged and ignored
///
/// # Endpoint
///
/// `POST /api/webhooks/clerk`
///
/// Deliveries are verified against the configured endpoint secret before any
/// parsing; with no secret configured the server runs in the trusting
/// development mode and accepts bodies as-is.
///
/// Every processed delivery — including ignored event types — answers
/// `{"received": true}`, so the sender does not redeliver events this system
/// chooses not to handle. A failed provider push answers 502; redelivery is
/// the sender's decision, and reapplying the same event is safe because the
/// policy is pure and the limit push is a plain overwrite.

use crate::app::AppState;
use crate::error::ApiResult;
use axum::{extract::State, http::HeaderMap, Json};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use taskboard_shared::billing::event::SubscriptionEvent;

/// Webhook acknowledgement body
#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookAck {
    /// Always true for any processed (including ignored) delivery
    pub received: bool,
}

/// Clerk webhook handler
///
/// Verifies, parses, computes the target limit, and pushes it to Clerk.
///
/// # Errors
///
/// - 400 on signature failure or a malformed body
/// - 502 when the limit push to Clerk fails (logged, not retried)
pub async fn clerk_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<WebhookAck>> {
    let msg_id = headers
        .get("svix-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("<unsigned>")
        .to_string();

    let envelope = state.ingress.receive(&headers, &body)?;
    let event_type = envelope.event_type.clone();

    let Some(event) = SubscriptionEvent::from_envelope(envelope) else {
        tracing::debug!(%event_type, %msg_id, "Ignoring unrecognized webhook event type");
        return Ok(Json(WebhookAck { received: true }));
    };

    match state.policy.target_limit(&event) {
        Some(update) => {
            tracing::info!(
                %event_type,
                %msg_id,
                org_id = %update.org_id,
                limit = update.limit,
                "Applying subscription event"
            );
            state.limits.apply(&update).await?;
        }
        None => {
            tracing::debug!(%event_type, %msg_id, "Subscription event without organization; no action");
        }
    }

    Ok(Json(WebhookAck { received: true }))
}
