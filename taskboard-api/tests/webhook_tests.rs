/// Webhook ingress and entitlement tests
///
/// These drive the full delivery path: signature check, envelope parsing,
/// the subscription → member-limit policy, and the push to the provider
/// (recorded by a test double). No database is involved.

mod common;

use axum::http::{HeaderMap, HeaderValue, StatusCode};
use common::TestContext;
use taskboard_shared::billing::policy::UNLIMITED_MEMBERS;

const FREE_TIER_LIMIT: i64 = 2;

#[tokio::test]
async fn test_active_pro_subscription_lifts_member_limit() {
    let ctx = TestContext::new().unwrap();

    let payload = common::subscription_payload("subscription.created", "org_1", "pro_tier", "active");
    let request = common::webhook_request(HeaderMap::new(), payload);

    let (status, body) = ctx.send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["received"], true);
    assert_eq!(
        ctx.limits.recorded(),
        vec![("org_1".to_string(), UNLIMITED_MEMBERS)]
    );
}

#[tokio::test]
async fn test_updated_subscription_without_active_pro_reverts_to_free_limit() {
    let ctx = TestContext::new().unwrap();

    let payload =
        common::subscription_payload("subscription.updated", "org_1", "pro_tier", "canceled");
    let (status, _) = ctx.send(common::webhook_request(HeaderMap::new(), payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        ctx.limits.recorded(),
        vec![("org_1".to_string(), FREE_TIER_LIMIT)]
    );
}

#[tokio::test]
async fn test_deleted_subscription_reverts_to_free_limit_regardless_of_items() {
    let ctx = TestContext::new().unwrap();

    // Items may still look active in a deletion event; the limit drops anyway.
    let payload =
        common::subscription_payload("subscription.deleted", "org_7", "pro_tier", "active");
    let (status, _) = ctx.send(common::webhook_request(HeaderMap::new(), payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        ctx.limits.recorded(),
        vec![("org_7".to_string(), FREE_TIER_LIMIT)]
    );
}

#[tokio::test]
async fn test_cancelled_subscription_reverts_to_free_limit() {
    let ctx = TestContext::new().unwrap();

    let payload =
        common::subscription_payload("subscription.cancelled", "org_1", "pro_tier", "active");
    let (status, _) = ctx.send(common::webhook_request(HeaderMap::new(), payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        ctx.limits.recorded(),
        vec![("org_1".to_string(), FREE_TIER_LIMIT)]
    );
}

#[tokio::test]
async fn test_non_pro_plan_gets_free_limit() {
    let ctx = TestContext::new().unwrap();

    let payload =
        common::subscription_payload("subscription.created", "org_1", "starter", "active");
    let (status, _) = ctx.send(common::webhook_request(HeaderMap::new(), payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        ctx.limits.recorded(),
        vec![("org_1".to_string(), FREE_TIER_LIMIT)]
    );
}

#[tokio::test]
async fn test_unrecognized_event_type_is_acknowledged_and_ignored() {
    let ctx = TestContext::new().unwrap();

    let payload =
        common::subscription_payload("subscription.paused", "org_1", "pro_tier", "active");
    let (status, body) = ctx.send(common::webhook_request(HeaderMap::new(), payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["received"], true);
    assert!(ctx.limits.recorded().is_empty());
}

#[tokio::test]
async fn test_event_without_organization_is_acknowledged_without_push() {
    let ctx = TestContext::new().unwrap();

    let payload = serde_json::json!({
        "type": "subscription.created",
        "data": {
            "items": [{ "plan": { "slug": "pro_tier" }, "status": "active" }]
        }
    })
    .to_string()
    .into_bytes();

    let (status, body) = ctx.send(common::webhook_request(HeaderMap::new(), payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["received"], true);
    assert!(ctx.limits.recorded().is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_400() {
    let ctx = TestContext::new().unwrap();

    let request = common::webhook_request(HeaderMap::new(), b"{not json".to_vec());

    let (status, body) = ctx.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
    assert!(ctx.limits.recorded().is_empty());
}

#[tokio::test]
async fn test_provider_failure_is_502_and_generic() {
    let ctx = TestContext::new().unwrap();
    ctx.limits.set_failing(true);

    let payload = common::subscription_payload("subscription.created", "org_1", "pro_tier", "active");
    let (status, body) = ctx.send(common::webhook_request(HeaderMap::new(), payload)).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "external_service_error");
    // The body never carries provider details.
    assert_eq!(body["message"], "Upstream provider call failed");
}

#[tokio::test]
async fn test_verified_mode_accepts_signed_delivery() {
    let ctx = TestContext::verified().unwrap();

    let payload = common::subscription_payload("subscription.created", "org_1", "pro_tier", "active");
    let headers = common::signed_headers("msg_1", &payload);

    let (status, body) = ctx.send(common::webhook_request(headers, payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["received"], true);
    assert_eq!(
        ctx.limits.recorded(),
        vec![("org_1".to_string(), UNLIMITED_MEMBERS)]
    );
}

#[tokio::test]
async fn test_verified_mode_rejects_tampered_body() {
    let ctx = TestContext::verified().unwrap();

    let payload = common::subscription_payload("subscription.created", "org_1", "pro_tier", "active");
    let headers = common::signed_headers("msg_1", &payload);

    // Swap the organization after signing.
    let tampered =
        common::subscription_payload("subscription.created", "org_evil", "pro_tier", "active");

    let (status, body) = ctx.send(common::webhook_request(headers, tampered)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_signature");
    assert!(ctx.limits.recorded().is_empty());
}

#[tokio::test]
async fn test_verified_mode_rejects_unsigned_delivery() {
    let ctx = TestContext::verified().unwrap();

    let payload = common::subscription_payload("subscription.created", "org_1", "pro_tier", "active");
    let (status, body) = ctx.send(common::webhook_request(HeaderMap::new(), payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_signature");
    assert!(ctx.limits.recorded().is_empty());
}

#[tokio::test]
async fn test_verified_mode_rejects_stale_timestamp() {
    let ctx = TestContext::verified().unwrap();

    let payload = common::subscription_payload("subscription.created", "org_1", "pro_tier", "active");

    let secret =
        taskboard_shared::webhook::signature::WebhookSecret::parse(common::WEBHOOK_SECRET).unwrap();
    let old = chrono::Utc::now().timestamp() - 3600;
    let signature = secret.sign("msg_old", old, &payload);

    let mut headers = HeaderMap::new();
    headers.insert("svix-id", HeaderValue::from_static("msg_old"));
    headers.insert(
        "svix-timestamp",
        HeaderValue::from_str(&old.to_string()).unwrap(),
    );
    headers.insert("svix-signature", HeaderValue::from_str(&signature).unwrap());

    let (status, _) = ctx.send(common::webhook_request(headers, payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(ctx.limits.recorded().is_empty());
}

#[tokio::test]
async fn test_redelivery_applies_the_same_limit_again() {
    let ctx = TestContext::new().unwrap();

    let payload = common::subscription_payload("subscription.created", "org_1", "pro_tier", "active");

    for _ in 0..2 {
        let (status, _) = ctx
            .send(common::webhook_request(HeaderMap::new(), payload.clone()))
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    // The push is a plain overwrite, so replaying a delivery is harmless.
    assert_eq!(
        ctx.limits.recorded(),
        vec![
            ("org_1".to_string(), UNLIMITED_MEMBERS),
            ("org_1".to_string(), UNLIMITED_MEMBERS),
        ]
    );
}
