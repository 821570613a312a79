use crate::models::Promo;
use async_trait::async_trait;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum PromoStoreError {
    #[error("Promo code already exists: {0}")]
    DuplicateCode(String),

    #[error("Promo store error: {0}")]
    Backend(String),
}

/// Repository trait for promo records. The resolver only reads; the admin
/// surface uses the full CRUD set.
#[async_trait]
pub trait PromoRepository: Send + Sync {
    /// Lookup by normalized code, restricted to active records.
    async fn find_active(&self, code: &str) -> Result<Option<Promo>, PromoStoreError>;

    async fn create(&self, promo: &Promo) -> Result<Promo, PromoStoreError>;

    /// Newest first.
    async fn list(&self) -> Result<Vec<Promo>, PromoStoreError>;

    /// Returns the updated record, or None when the id does not exist.
    async fn update(&self, id: Uuid, promo: &Promo) -> Result<Option<Promo>, PromoStoreError>;

    /// Returns false when the id does not exist.
    async fn delete(&self, id: Uuid) -> Result<bool, PromoStoreError>;
}
