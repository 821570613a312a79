use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Payment sub-record status on an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentState {
    Created,
    Verified,
}

/// Verifies gateway callback signatures with a pre-shared secret.
///
/// The gateway signs `"{order_id}|{payment_id}"` with HMAC-SHA256 and sends
/// the hex digest alongside the callback. The secret is injected at
/// construction so the verifier is testable without ambient configuration.
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: String,
}

impl SignatureVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Recomputes the expected digest and compares it against the supplied
    /// hex signature. Comparison happens in constant time via `verify_slice`.
    pub fn verify(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        let Ok(supplied) = hex::decode(signature) else {
            return false;
        };

        let mut mac = match HmacSha256::new_from_slice(self.secret.as_bytes()) {
            Ok(mac) => mac,
            Err(e) => {
                tracing::error!("Invalid HMAC secret: {}", e);
                return false;
            }
        };
        mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
        mac.verify_slice(&supplied).is_ok()
    }

    /// Produces the hex signature the gateway would send for the given pair.
    pub fn sign(&self, order_id: &str, payment_id: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}
