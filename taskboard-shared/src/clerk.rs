/// Clerk backend API client
///
/// Clerk owns authentication, organizations, and membership limits; this
/// system only ever writes one field — an organization's
/// `max_allowed_memberships` — via
/// `PATCH /v1/organizations/{organization_id}`.
///
/// The client implements [`MemberLimits`], the seam the limit synchronizer
/// pushes through, so tests can substitute a mock without touching the
/// network.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::clerk::ClerkClient;
/// use taskboard_shared::billing::sync::MemberLimits;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let clerk = ClerkClient::new("sk_test_...")?;
/// clerk.set_member_limit("org_1", 1_000_000).await?;
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::billing::sync::{MemberLimits, ProviderError};

const DEFAULT_BASE_URL: &str = "https://api.clerk.com/v1";

/// HTTP client for the Clerk backend API
#[derive(Clone)]
pub struct ClerkClient {
    http: reqwest::Client,
    secret_key: String,
    base_url: String,
}

impl ClerkClient {
    /// Creates a client against the production Clerk API
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(secret_key: impl Into<String>) -> Result<Self, ProviderError> {
        Self::with_base_url(secret_key, DEFAULT_BASE_URL)
    }

    /// Creates a client against a custom base URL (tests, proxies)
    pub fn with_base_url(
        secret_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            secret_key: secret_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl MemberLimits for ClerkClient {
    async fn set_member_limit(&self, org_id: &str, limit: i64) -> Result<(), ProviderError> {
        let url = format!("{}/organizations/{}", self.base_url, org_id);

        debug!(org_id, limit, "Updating organization member limit at Clerk");

        let response = self
            .http
            .patch(&url)
            .bearer_auth(&self.secret_key)
            .json(&json!({ "max_allowed_memberships": limit }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::UnexpectedStatus { status });
        }

        Ok(())
    }
}

impl std::fmt::Debug for ClerkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the secret key.
        f.debug_struct("ClerkClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ClerkClient::with_base_url("sk_test", "http://localhost:9000/v1/").unwrap();
        assert_eq!(client.base_url, "http://localhost:9000/v1");
    }

    #[test]
    fn test_debug_hides_secret() {
        let client = ClerkClient::new("sk_live_secret").unwrap();
        let rendered = format!("{:?}", client);
        assert!(!rendered.contains("sk_live_secret"));
    }
}
