//! HMAC-SHA256 signature checks for checkout callbacks and webhooks.
//!
//! Checkout: `hex(hmac_sha256(key_secret, "{order_id}|{payment_id}"))`.
//! Webhooks: `hex(hmac_sha256(webhook_secret, raw_body))` in the
//! `X-Razorpay-Signature` header.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn mac_for(secret: &str, message: &[u8]) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(message);
    Some(mac)
}

/// Hex signature for `message` under `secret`.
pub fn sign(secret: &str, message: &[u8]) -> String {
    match mac_for(secret, message) {
        Some(mac) => hex::encode(mac.finalize().into_bytes()),
        None => String::new(),
    }
}

/// Constant-time check of a hex signature.
pub fn verify(secret: &str, message: &[u8], signature_hex: &str) -> bool {
    let Ok(expected) = hex::decode(signature_hex.trim()) else {
        return false;
    };
    match mac_for(secret, message) {
        Some(mac) => mac.verify_slice(&expected).is_ok(),
        None => false,
    }
}

/// Signature the checkout widget hands back after a successful payment.
pub fn sign_payment(order_id: &str, payment_id: &str, key_secret: &str) -> String {
    sign(key_secret, format!("{}|{}", order_id, payment_id).as_bytes())
}

pub fn verify_payment_signature(
    order_id: &str,
    payment_id: &str,
    signature: &str,
    key_secret: &str,
) -> bool {
    verify(
        key_secret,
        format!("{}|{}", order_id, payment_id).as_bytes(),
        signature,
    )
}

pub fn verify_webhook_signature(body: &[u8], signature: &str, webhook_secret: &str) -> bool {
    verify(webhook_secret, body, signature)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc4231_case_2() {
        // RFC 4231 test case 2
        let sig = sign("Jefe", b"what do ya want for nothing?");
        assert_eq!(
            sig,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_payment_signature_roundtrip() {
        let sig = sign_payment("order_ABC", "pay_XYZ", "secret");
        assert!(verify_payment_signature("order_ABC", "pay_XYZ", &sig, "secret"));
    }

    #[test]
    fn test_payment_signature_wrong_secret() {
        let sig = sign_payment("order_ABC", "pay_XYZ", "secret");
        assert!(!verify_payment_signature("order_ABC", "pay_XYZ", &sig, "other"));
    }

    #[test]
    fn test_payment_signature_swapped_ids() {
        let sig = sign_payment("order_ABC", "pay_XYZ", "secret");
        assert!(!verify_payment_signature("pay_XYZ", "order_ABC", &sig, "secret"));
    }

    #[test]
    fn test_webhook_signature_tampered_body() {
        let body = br#"{"event":"payment.captured"}"#;
        let sig = sign("whsec", body);
        assert!(verify_webhook_signature(body, &sig, "whsec"));
        assert!(!verify_webhook_signature(
            br#"{"event":"payment.failed"}"#,
            &sig,
            "whsec"
        ));
    }

    #[test]
    fn test_non_hex_signature_rejected() {
        assert!(!verify("secret", b"msg", "not-hex"));
        assert!(!verify("secret", b"msg", ""));
    }
}
