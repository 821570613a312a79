use crate::device::DeviceCatalogEntry;
use crate::quote::Quote;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository trait for catalog reference data. Read-only from the core's
/// perspective; entries are seeded by an out-of-scope admin process.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Exact lookup on the unique (category, brand, model) triple.
    async fn find_device(
        &self,
        category: &str,
        brand: &str,
        model: &str,
    ) -> Result<Option<DeviceCatalogEntry>, Box<dyn std::error::Error + Send + Sync>>;

    async fn list_devices(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<DeviceCatalogEntry>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Repository trait for immutable quote records.
#[async_trait]
pub trait QuoteRepository: Send + Sync {
    async fn save_quote(
        &self,
        quote: &Quote,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>>;
}
