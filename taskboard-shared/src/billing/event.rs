/// Subscription event envelope and typed event
///
/// The provider's webhook body looks like:
///
/// ```json
/// {
///   "type": "subscription.created",
///   "data": {
///     "payer": {"organization_id": "org_1"},
///     "items": [{"plan": {"slug": "pro_tier"}, "status": "active"}]
///   }
/// }
/// ```
///
/// [`WebhookEnvelope`] mirrors that wire shape loosely (every field inside
/// `data` is optional, so unrelated event families still parse), and
/// [`SubscriptionEvent`] is the typed form the policy consumes. Event types
/// outside the four subscription lifecycle ones yield no
/// `SubscriptionEvent` — the ingress stays forward-compatible with events it
/// does not understand.

use serde::Deserialize;

/// Raw webhook envelope as delivered by the provider
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEnvelope {
    /// Event type, e.g. `subscription.created`
    #[serde(rename = "type")]
    pub event_type: String,

    /// Event payload
    #[serde(default)]
    pub data: EnvelopeData,
}

/// The `data` object of a subscription event
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvelopeData {
    /// Who pays for the subscription
    #[serde(default)]
    pub payer: Option<EnvelopePayer>,

    /// Subscription line items
    #[serde(default)]
    pub items: Vec<EnvelopeItem>,
}

/// The paying entity of a subscription
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvelopePayer {
    /// Organization the subscription belongs to
    #[serde(default)]
    pub organization_id: Option<String>,
}

/// A single subscription line item
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvelopeItem {
    /// The plan this item is on
    #[serde(default)]
    pub plan: Option<EnvelopePlan>,

    /// Item status, e.g. `active`
    #[serde(default)]
    pub status: Option<String>,
}

/// Plan reference inside a line item
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvelopePlan {
    /// Plan slug, e.g. `pro_tier`
    #[serde(default)]
    pub slug: Option<String>,
}

/// Subscription lifecycle event kinds this system reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionEventKind {
    /// A subscription was started
    Created,

    /// A subscription's plan or items changed
    Updated,

    /// A subscription was removed
    Deleted,

    /// A subscription was cancelled
    Cancelled,
}

impl SubscriptionEventKind {
    /// Maps a wire event type to a kind
    ///
    /// Returns `None` for event types this system does not handle.
    pub fn from_event_type(event_type: &str) -> Option<Self> {
        match event_type {
            "subscription.created" => Some(SubscriptionEventKind::Created),
            "subscription.updated" => Some(SubscriptionEventKind::Updated),
            "subscription.deleted" => Some(SubscriptionEventKind::Deleted),
            "subscription.cancelled" => Some(SubscriptionEventKind::Cancelled),
            _ => None,
        }
    }
}

/// A subscription line item in typed form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionItem {
    /// Plan slug, empty when the wire item carried none
    pub plan_slug: String,

    /// Item status, empty when the wire item carried none
    pub status: String,
}

/// A typed subscription event, consumed immediately and discarded
#[derive(Debug, Clone)]
pub struct SubscriptionEvent {
    /// What happened to the subscription
    pub kind: SubscriptionEventKind,

    /// The organization the subscription belongs to, when present
    pub organization_id: Option<String>,

    /// Line items in delivery order
    pub items: Vec<SubscriptionItem>,
}

impl SubscriptionEvent {
    /// Converts a parsed envelope into a typed event
    ///
    /// Returns `None` when the event type is not a subscription lifecycle
    /// event; such deliveries are acknowledged but otherwise ignored.
    pub fn from_envelope(envelope: WebhookEnvelope) -> Option<Self> {
        let kind = SubscriptionEventKind::from_event_type(&envelope.event_type)?;

        let organization_id = envelope
            .data
            .payer
            .and_then(|p| p.organization_id)
            .filter(|id| !id.is_empty());

        let items = envelope
            .data
            .items
            .into_iter()
            .map(|item| SubscriptionItem {
                plan_slug: item.plan.and_then(|p| p.slug).unwrap_or_default(),
                status: item.status.unwrap_or_default(),
            })
            .collect();

        Some(Self {
            kind,
            organization_id,
            items,
        })
    }
}
