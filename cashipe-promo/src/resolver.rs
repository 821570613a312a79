use crate::models::{normalize_code, Promo};
use crate::repository::{PromoRepository, PromoStoreError};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Outcome of resolving a promo code against a base amount.
#[derive(Debug, Clone)]
pub struct PromoResolution {
    pub valid: bool,
    pub discount: i64,
    pub promo: Option<Promo>,
}

impl PromoResolution {
    fn invalid() -> Self {
        Self {
            valid: false,
            discount: 0,
            promo: None,
        }
    }
}

/// Resolves promo codes: normalization, active lookup, expiry check,
/// discount computation.
#[derive(Clone)]
pub struct PromoResolver {
    repo: Arc<dyn PromoRepository>,
}

impl PromoResolver {
    pub fn new(repo: Arc<dyn PromoRepository>) -> Self {
        Self { repo }
    }

    pub async fn resolve(
        &self,
        code: &str,
        base_amount: i64,
    ) -> Result<PromoResolution, PromoStoreError> {
        self.resolve_at(code, base_amount, Utc::now()).await
    }

    /// Resolution against an explicit clock. Idempotent: the same code and
    /// base amount at the same instant always yield the same discount.
    pub async fn resolve_at(
        &self,
        code: &str,
        base_amount: i64,
        now: DateTime<Utc>,
    ) -> Result<PromoResolution, PromoStoreError> {
        let normalized = normalize_code(code);
        let Some(promo) = self.repo.find_active(&normalized).await? else {
            return Ok(PromoResolution::invalid());
        };

        if promo.is_expired(now) {
            return Ok(PromoResolution::invalid());
        }

        let discount = promo.discount_for(base_amount);
        Ok(PromoResolution {
            valid: true,
            discount,
            promo: Some(promo),
        })
    }

    /// Fail-open variant for pricing flows: lookup failures degrade to the
    /// no-promo price instead of aborting the quote.
    pub async fn resolve_for_pricing(&self, code: &str, base_amount: i64) -> PromoResolution {
        match self.resolve(code, base_amount).await {
            Ok(resolution) => resolution,
            Err(e) => {
                tracing::warn!("Promo lookup failed, continuing without promo: {}", e);
                PromoResolution::invalid()
            }
        }
    }
}
