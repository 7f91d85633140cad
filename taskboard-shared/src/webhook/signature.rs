/// Webhook signature verification
///
/// The identity provider delivers webhooks through Svix, which signs every
/// delivery with HMAC-SHA256. Three headers carry the metadata:
///
/// - `svix-id`: unique message id
/// - `svix-timestamp`: Unix seconds at send time
/// - `svix-signature`: space-separated list of `v1,<base64 signature>`
///
/// The signed content is `{id}.{timestamp}.{raw body}` and the key is the
/// base64-decoded remainder of the `whsec_`-prefixed endpoint secret.
/// Verification accepts if any `v1` entry matches; the comparison goes
/// through [`hmac::Mac::verify_slice`], which is constant-time.
///
/// Deliveries older (or newer) than five minutes are rejected to bound
/// replay windows.

use axum::http::HeaderMap;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Maximum allowed clock skew between delivery and verification, in seconds
const TIMESTAMP_TOLERANCE_SECONDS: i64 = 300;

/// Error type for signature verification
///
/// All variants surface to the caller as a 400; the distinctions exist for
/// logs and tests only.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    /// A required signature header is absent
    #[error("Missing webhook header: {0}")]
    MissingHeader(&'static str),

    /// A signature header could not be parsed
    #[error("Malformed webhook header: {0}")]
    MalformedHeader(&'static str),

    /// The delivery timestamp is outside the tolerance window
    #[error("Webhook timestamp outside tolerance window")]
    StaleTimestamp,

    /// The configured endpoint secret is not valid base64
    #[error("Webhook secret is not valid base64")]
    InvalidSecret,

    /// No signature entry matched the computed one
    #[error("Webhook signature mismatch")]
    Mismatch,
}

/// A configured webhook endpoint secret
///
/// Wraps the decoded HMAC key; the `whsec_` prefix the provider dashboard
/// shows is stripped before decoding.
#[derive(Clone)]
pub struct WebhookSecret {
    key: Vec<u8>,
}

impl WebhookSecret {
    /// Parses an endpoint secret of the form `whsec_<base64 key>`
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::InvalidSecret`] if the key part is not
    /// valid base64.
    pub fn parse(secret: &str) -> Result<Self, SignatureError> {
        let encoded = secret.strip_prefix("whsec_").unwrap_or(secret);
        let key = BASE64
            .decode(encoded)
            .map_err(|_| SignatureError::InvalidSecret)?;

        Ok(Self { key })
    }

    /// Signs a delivery the way the provider does
    ///
    /// Used by tests to produce valid deliveries; verification recomputes
    /// exactly this value.
    pub fn sign(&self, msg_id: &str, timestamp: i64, payload: &[u8]) -> String {
        let mut mac =
            HmacSha256::new_from_slice(&self.key).expect("HMAC can take key of any size");
        mac.update(msg_id.as_bytes());
        mac.update(b".");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);

        format!("v1,{}", BASE64.encode(mac.finalize().into_bytes()))
    }

    /// Verifies a delivery's signature headers against the raw body
    ///
    /// # Errors
    ///
    /// Any failure means the event must not be processed:
    /// missing/malformed headers, a stale timestamp, or no matching
    /// signature entry.
    pub fn verify(&self, headers: &HeaderMap, payload: &[u8]) -> Result<(), SignatureError> {
        let msg_id = header_str(headers, "svix-id")?;
        let timestamp_raw = header_str(headers, "svix-timestamp")?;
        let signatures = header_str(headers, "svix-signature")?;

        let timestamp: i64 = timestamp_raw
            .parse()
            .map_err(|_| SignatureError::MalformedHeader("svix-timestamp"))?;

        let now = Utc::now().timestamp();
        if (now - timestamp).abs() > TIMESTAMP_TOLERANCE_SECONDS {
            return Err(SignatureError::StaleTimestamp);
        }

        // The header may carry several versioned entries; any v1 match accepts.
        for entry in signatures.split_whitespace() {
            let Some(candidate) = entry.strip_prefix("v1,") else {
                continue;
            };
            let Ok(candidate) = BASE64.decode(candidate) else {
                continue;
            };

            let mut mac =
                HmacSha256::new_from_slice(&self.key).expect("HMAC can take key of any size");
            mac.update(msg_id.as_bytes());
            mac.update(b".");
            mac.update(timestamp.to_string().as_bytes());
            mac.update(b".");
            mac.update(payload);

            if mac.verify_slice(&candidate).is_ok() {
                return Ok(());
            }
        }

        Err(SignatureError::Mismatch)
    }
}

impl std::fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        f.debug_struct("WebhookSecret").finish_non_exhaustive()
    }
}

fn header_str<'a>(
    headers: &'a HeaderMap,
    name: &'static str,
) -> Result<&'a str, SignatureError> {
    headers
        .get(name)
        .ok_or(SignatureError::MissingHeader(name))?
        .to_str()
        .map_err(|_| SignatureError::MalformedHeader(name))
}
