/// Entitlement policy
///
/// Pure mapping from a subscription event to the member limit the
/// organization should have. No I/O happens here; the policy's output is a
/// [`LimitUpdate`] the synchronizer applies.
///
/// # Rules
///
/// - `created` / `updated`: an active pro-tier item grants
///   [`UNLIMITED_MEMBERS`]; anything else falls back to the free-tier limit.
/// - `deleted` / `cancelled`: the free-tier limit, unconditionally —
///   whichever plan ended, the organization is downgraded.
/// - No organization id on the event: no update can be targeted, so none is
///   produced.
///
/// Because the mapping is a pure function of the event, a redelivered
/// duplicate computes the same target limit; pushing it again is a no-op
/// overwrite at the provider.

use super::event::{SubscriptionEvent, SubscriptionEventKind};

/// Sentinel member limit standing in for "no enforced cap"
pub const UNLIMITED_MEMBERS: i64 = 1_000_000;

/// A target member limit for one organization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitUpdate {
    /// Organization to update
    pub org_id: String,

    /// The member limit the organization should have
    pub limit: i64,
}

/// Maps subscription events to target member limits
#[derive(Debug, Clone)]
pub struct EntitlementPolicy {
    /// Plan slug that grants unlimited members
    pub pro_tier_slug: String,

    /// Member limit for organizations without an active pro subscription
    pub free_tier_limit: i64,
}

impl EntitlementPolicy {
    /// Creates a policy from configuration
    pub fn new(pro_tier_slug: impl Into<String>, free_tier_limit: i64) -> Self {
        Self {
            pro_tier_slug: pro_tier_slug.into(),
            free_tier_limit,
        }
    }

    /// Whether any line item is an active pro-tier subscription
    fn has_active_pro_plan(&self, event: &SubscriptionEvent) -> bool {
        event
            .items
            .iter()
            .any(|item| item.plan_slug == self.pro_tier_slug && item.status == "active")
    }

    /// Computes the member limit an event calls for
    ///
    /// Returns `None` when the event carries no organization id; there is
    /// nothing to target in that case.
    pub fn target_limit(&self, event: &SubscriptionEvent) -> Option<LimitUpdate> {
        let org_id = event.organization_id.clone()?;

        let limit = match event.kind {
            SubscriptionEventKind::Created | SubscriptionEventKind::Updated => {
                if self.has_active_pro_plan(event) {
                    UNLIMITED_MEMBERS
                } else {
                    self.free_tier_limit
                }
            }
            SubscriptionEventKind::Deleted | SubscriptionEventKind::Cancelled => {
                self.free_tier_limit
            }
        };

        Some(LimitUpdate { org_id, limit })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::event::SubscriptionItem;

    fn policy() -> EntitlementPolicy {
        EntitlementPolicy::new("pro_tier", 2)
    }

    fn event(
        kind: SubscriptionEventKind,
        org: Option<&str>,
        items: Vec<(&str, &str)>,
    ) -> SubscriptionEvent {
        SubscriptionEvent {
            kind,
            organization_id: org.map(str::to_string),
            items: items
                .into_iter()
                .map(|(slug, status)| SubscriptionItem {
                    plan_slug: slug.to_string(),
                    status: status.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_active_pro_plan_grants_unlimited() {
        let e = event(
            SubscriptionEventKind::Created,
            Some("org_1"),
            vec![("pro_tier", "active")],
        );

        assert_eq!(
            policy().target_limit(&e),
            Some(LimitUpdate {
                org_id: "org_1".to_string(),
                limit: UNLIMITED_MEMBERS,
            })
        );
    }

    #[test]
    fn test_inactive_pro_plan_falls_back_to_free_tier() {
        let e = event(
            SubscriptionEventKind::Updated,
            Some("org_1"),
            vec![("pro_tier", "canceled"), ("free", "active")],
        );

        assert_eq!(policy().target_limit(&e).unwrap().limit, 2);
    }

    #[test]
    fn test_no_items_falls_back_to_free_tier() {
        let e = event(SubscriptionEventKind::Created, Some("org_1"), vec![]);
        assert_eq!(policy().target_limit(&e).unwrap().limit, 2);
    }

    #[test]
    fn test_subscription_end_downgrades_regardless_of_items() {
        // Even an "active" pro item on a deleted/cancelled event downgrades.
        for kind in [
            SubscriptionEventKind::Deleted,
            SubscriptionEventKind::Cancelled,
        ] {
            let e = event(kind, Some("org_1"), vec![("pro_tier", "active")]);
            assert_eq!(policy().target_limit(&e).unwrap().limit, 2);
        }
    }

    #[test]
    fn test_missing_organization_produces_no_update() {
        let e = event(
            SubscriptionEventKind::Created,
            None,
            vec![("pro_tier", "active")],
        );
        assert_eq!(policy().target_limit(&e), None);
    }

    #[test]
    fn test_policy_is_idempotent() {
        let e = event(
            SubscriptionEventKind::Updated,
            Some("org_1"),
            vec![("pro_tier", "active")],
        );

        let first = policy().target_limit(&e);
        let second = policy().target_limit(&e);
        assert_eq!(first, second);
    }
}
