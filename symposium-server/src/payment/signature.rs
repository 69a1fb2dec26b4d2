//! HMAC-SHA256 signatures used by the Razorpay checkout and webhooks

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Hex-encoded HMAC-SHA256 of `payload` under `secret`
pub fn sign(secret: &str, payload: &[u8]) -> String {
    // HMAC accepts keys of any length
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time check of a hex signature against HMAC-SHA256(secret, payload)
pub fn verify(secret: &str, payload: &[u8], signature_hex: &str) -> bool {
    let Ok(sig_bytes) = hex::decode(signature_hex.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(payload);
    mac.verify_slice(&sig_bytes).is_ok()
}

/// Payload signed by checkout: `"{order_id}|{payment_id}"`
pub fn payment_payload(order_id: &str, payment_id: &str) -> String {
    format!("{order_id}|{payment_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vector() {
        // RFC 4231 test case 2
        assert_eq!(
            sign("Jefe", b"what do ya want for nothing?"),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_verify_roundtrip_and_tamper() {
        let body = br#"{"event":"payment.captured"}"#;
        let sig = sign("whsec", body);
        assert!(verify("whsec", body, &sig));
        assert!(verify("whsec", body, &sig.to_uppercase()));
        assert!(!verify("other", body, &sig));
        assert!(!verify("whsec", br#"{"event":"payment.failed"}"#, &sig));
        assert!(!verify("whsec", body, "not-hex"));
        assert!(!verify("whsec", body, ""));
    }

    fn flip_hex_digit(sig: &str, index: usize) -> String {
        sig.char_indices()
            .map(|(i, c)| match (i == index, c) {
                (false, c) => c,
                (true, '0') => '1',
                (true, _) => '0',
            })
            .collect()
    }

    #[test]
    fn test_only_exact_mac_of_body_verifies() {
        let bodies: [&[u8]; 5] = [
            b"",
            b"{}",
            br#"{"event":"payment.captured","payload":{}}"#,
            &[0x00, 0xff, 0x7f, 0x80, 0x0a, 0x00],
            &[0xde; 1024],
        ];

        for (n, body) in bodies.iter().enumerate() {
            let sig = sign("whsec", body);
            assert_eq!(sig.len(), 64);
            assert!(verify("whsec", body, &sig), "body {n}");

            for i in 0..sig.len() {
                assert!(!verify("whsec", body, &flip_hex_digit(&sig, i)), "body {n} digit {i}");
            }

            assert!(!verify("whsec", body, &sig[..62]), "body {n} one byte short");
            assert!(!verify("whsec", body, &sig[..63]), "body {n} odd length");
            assert!(!verify("whsec", body, &sig[..32]), "body {n} half length");
            assert!(!verify("whsec", body, &format!("{sig}00")), "body {n} extended");

            for (m, other) in bodies.iter().enumerate().filter(|(m, _)| *m != n) {
                let other_sig = sign("whsec", other);
                assert!(!verify("whsec", body, &other_sig), "body {n} with mac of {m}");
            }
            assert!(!verify("other", body, &sig), "body {n} wrong secret");
        }
    }

    #[test]
    fn test_payment_payload_format() {
        assert_eq!(payment_payload("order_1", "pay_2"), "order_1|pay_2");
    }
}
