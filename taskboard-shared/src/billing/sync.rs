/// Organization limit synchronizer
///
/// Applies a [`LimitUpdate`] by pushing it to the external provider. The
/// synchronizer keeps no local state and never reads the provider's value
/// back: every push is a last-write-wins overwrite of the organization's
/// member-limit field. If two events for the same organization arrive out of
/// order, the one processed last wins — a known ordering weakness of this
/// design, accepted and documented rather than papered over.
///
/// Delivery to the provider is at-most-once per webhook call; failures
/// surface as [`ProviderError`] and are not retried here.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::policy::LimitUpdate;

/// Error type for provider calls
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP request could not be completed
    #[error("Provider request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-success status
    #[error("Provider returned unexpected status: {status}")]
    UnexpectedStatus {
        /// The HTTP status the provider answered with
        status: reqwest::StatusCode,
    },
}

/// Write access to per-organization member limits at the provider
///
/// The single implementation in production is [`crate::clerk::ClerkClient`];
/// tests substitute a recording mock.
#[async_trait]
pub trait MemberLimits: Send + Sync {
    /// Sets an organization's member limit to exactly `limit`
    async fn set_member_limit(&self, org_id: &str, limit: i64) -> Result<(), ProviderError>;
}

/// Stateless pusher of limit updates to the provider
#[derive(Clone)]
pub struct LimitSynchronizer {
    provider: Arc<dyn MemberLimits>,
}

impl LimitSynchronizer {
    /// Creates a synchronizer over a provider client
    pub fn new(provider: Arc<dyn MemberLimits>) -> Self {
        Self { provider }
    }

    /// Pushes one limit update to the provider
    ///
    /// # Errors
    ///
    /// Propagates the provider failure without retrying; the webhook sender
    /// owns any retry policy.
    pub async fn apply(&self, update: &LimitUpdate) -> Result<(), ProviderError> {
        self.provider
            .set_member_limit(&update.org_id, update.limit)
            .await?;

        info!(
            org_id = %update.org_id,
            limit = update.limit,
            "Organization member limit synchronized"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every limit push instead of calling a provider
    #[derive(Default)]
    struct RecordingLimits {
        calls: Mutex<Vec<(String, i64)>>,
    }

    #[async_trait]
    impl MemberLimits for RecordingLimits {
        async fn set_member_limit(&self, org_id: &str, limit: i64) -> Result<(), ProviderError> {
            self.calls
                .lock()
                .unwrap()
                .push((org_id.to_string(), limit));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_apply_pushes_exact_limit() {
        let recorder = Arc::new(RecordingLimits::default());
        let sync = LimitSynchronizer::new(recorder.clone());

        sync.apply(&LimitUpdate {
            org_id: "org_1".to_string(),
            limit: 1_000_000,
        })
        .await
        .unwrap();

        let calls = recorder.calls.lock().unwrap();
        assert_eq!(calls.as_slice(), &[("org_1".to_string(), 1_000_000)]);
    }

    #[tokio::test]
    async fn test_apply_is_a_plain_overwrite() {
        let recorder = Arc::new(RecordingLimits::default());
        let sync = LimitSynchronizer::new(recorder.clone());

        let update = LimitUpdate {
            org_id: "org_1".to_string(),
            limit: 2,
        };
        sync.apply(&update).await.unwrap();
        sync.apply(&update).await.unwrap();

        // Two deliveries, two identical pushes; no dedup, no local state.
        let calls = recorder.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], calls[1]);
    }
}
