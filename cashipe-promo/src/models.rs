use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Discount semantics of a promo code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PromoType {
    Percent,
    Fixed,
}

/// A discount code record. Codes are stored case-normalized to uppercase.
///
/// `min_order_value` is persisted and surfaced in check responses but never
/// enforced by any pricing call site; tightening that is a product decision,
/// not a storage one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Promo {
    pub id: Uuid,
    pub code: String,
    #[serde(rename = "type")]
    pub promo_type: PromoType,
    pub amount: f64,
    pub active: bool,
    pub min_order_value: Option<i64>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Promo {
    pub fn new(code: &str, promo_type: PromoType, amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            code: normalize_code(code),
            promo_type,
            amount,
            active: true,
            min_order_value: None,
            expires_at: None,
            created_at: Utc::now(),
        }
    }

    /// True when the expiry timestamp, if any, is in the past.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(expiry) if expiry < now)
    }

    /// Discount for a given base amount, in whole rupees.
    pub fn discount_for(&self, base_amount: i64) -> i64 {
        match self.promo_type {
            PromoType::Percent => (base_amount as f64 * self.amount / 100.0).round() as i64,
            PromoType::Fixed => self.amount.round() as i64,
        }
    }
}

/// Trim and uppercase, the canonical stored form of a code.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}
