//! Stripe webhook signature verification and subscription status mapping.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::CoreError;
use crate::plans::Plan;

type HmacSha256 = Hmac<Sha256>;

/// Maximum age of a signed webhook payload, in seconds.
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Local subscription status values (must match `ck_subscriptions_status`).
pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_PAST_DUE: &str = "past_due";
pub const STATUS_CANCELED: &str = "canceled";
pub const STATUS_INCOMPLETE: &str = "incomplete";

// ---------------------------------------------------------------------------
// Signatures
// ---------------------------------------------------------------------------

/// Verify a `Stripe-Signature` header against the raw request body.
///
/// The header has the form `t=<unix>,v1=<hex>[,v1=<hex>...]`. The signed
/// message is `"{t}.{payload}"`. Any matching `v1` entry is accepted as long
/// as `t` is within [`SIGNATURE_TOLERANCE_SECS`] of `now`.
pub fn verify_stripe_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    now: i64,
) -> Result<(), CoreError> {
    let mut timestamp: Option<i64> = None;
    let mut signatures: Vec<&str> = Vec::new();

    for item in header.split(',') {
        match item.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse().ok(),
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp
        .ok_or_else(|| CoreError::Unauthorized("Stripe signature is missing a timestamp".into()))?;
    if signatures.is_empty() {
        return Err(CoreError::Unauthorized(
            "Stripe signature has no v1 entries".into(),
        ));
    }
    if (now - timestamp).abs() > SIGNATURE_TOLERANCE_SECS {
        return Err(CoreError::Unauthorized(
            "Stripe signature timestamp is outside the tolerance window".into(),
        ));
    }

    let matched = signatures.iter().any(|sig| {
        let Ok(expected) = hex::decode(sig) else {
            return false;
        };
        signing_mac(secret, timestamp, payload)
            .verify_slice(&expected)
            .is_ok()
    });

    if matched {
        Ok(())
    } else {
        Err(CoreError::Unauthorized(
            "Stripe signature does not match".into(),
        ))
    }
}

/// Produce a `Stripe-Signature` header value for `payload`.
///
/// Mirrors what Stripe sends; used to exercise the webhook endpoint.
pub fn sign_stripe_payload(payload: &[u8], secret: &str, timestamp: i64) -> String {
    let mac = signing_mac(secret, timestamp, payload);
    format!(
        "t={timestamp},v1={}",
        hex::encode(mac.finalize().into_bytes())
    )
}

fn signing_mac(secret: &str, timestamp: i64, payload: &[u8]) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    mac
}

// ---------------------------------------------------------------------------
// Status mapping
// ---------------------------------------------------------------------------

/// Map a Stripe subscription status onto the local status vocabulary.
pub fn map_stripe_status(stripe_status: &str) -> &'static str {
    match stripe_status {
        "active" | "trialing" => STATUS_ACTIVE,
        "past_due" | "unpaid" => STATUS_PAST_DUE,
        "canceled" | "incomplete_expired" => STATUS_CANCELED,
        _ => STATUS_INCOMPLETE,
    }
}

/// Plan a user should be on given their local subscription status.
///
/// Past-due subscriptions keep their paid plan until Stripe cancels them.
pub fn plan_for_status(status: &str) -> Plan {
    match status {
        STATUS_ACTIVE | STATUS_PAST_DUE => Plan::Pro,
        _ => Plan::Free,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";
    const NOW: i64 = 1_790_000_000;

    fn accepts(body: &[u8], header: &str, now: i64) -> bool {
        verify_stripe_signature(body, header, SECRET, now).is_ok()
    }

    #[test]
    fn signed_payload_verifies() {
        let body = br#"{"type":"invoice.paid"}"#;
        let header = sign_stripe_payload(body, SECRET, NOW);
        assert!(accepts(body, &header, NOW + 10));
    }

    #[test]
    fn any_matching_v1_is_accepted() {
        let body = b"{}";
        let good = sign_stripe_payload(body, SECRET, NOW);
        let v1 = good.split("v1=").nth(1).unwrap();
        let header = format!("t={NOW},v1=deadbeef,v1={v1}");
        assert!(accepts(body, &header, NOW));
    }

    #[test]
    fn modified_body_is_rejected() {
        let header = sign_stripe_payload(b"original", SECRET, NOW);
        assert!(!accepts(b"modified", &header, NOW));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let header = sign_stripe_payload(b"body", "whsec_other", NOW);
        assert!(!accepts(b"body", &header, NOW));
    }

    #[test]
    fn stale_timestamp_is_rejected() {
        let header = sign_stripe_payload(b"body", SECRET, NOW);
        let later = NOW + SIGNATURE_TOLERANCE_SECS + 1;
        assert!(!accepts(b"body", &header, later));
    }

    #[test]
    fn malformed_headers_are_rejected() {
        assert!(!accepts(b"body", "", NOW));
        assert!(!accepts(b"body", "v1=abcd", NOW));
        assert!(!accepts(b"body", &format!("t={NOW}"), NOW));
    }

    #[test]
    fn stripe_statuses_map_to_local_vocabulary() {
        assert_eq!(map_stripe_status("trialing"), STATUS_ACTIVE);
        assert_eq!(map_stripe_status("unpaid"), STATUS_PAST_DUE);
        assert_eq!(map_stripe_status("incomplete_expired"), STATUS_CANCELED);
        assert_eq!(map_stripe_status("paused"), STATUS_INCOMPLETE);
    }

    #[test]
    fn plan_follows_status() {
        assert_eq!(plan_for_status(STATUS_ACTIVE), Plan::Pro);
        assert_eq!(plan_for_status(STATUS_PAST_DUE), Plan::Pro);
        assert_eq!(plan_for_status(STATUS_CANCELED), Plan::Free);
    }
}
