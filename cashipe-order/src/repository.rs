use crate::models::Order;
use async_trait::async_trait;
use uuid::Uuid;

/// Persistence seam for orders.
///
/// Every user-facing accessor takes the owner alongside the id, so a handler
/// cannot accidentally fetch or mutate another user's order. The one
/// exception is the payment-gateway webhook path, which only knows the
/// provider's order id.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn create(&self, order: &Order) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn find(
        &self,
        id: Uuid,
        owner: &str,
    ) -> Result<Option<Order>, Box<dyn std::error::Error + Send + Sync>>;

    async fn list(&self, owner: &str)
        -> Result<Vec<Order>, Box<dyn std::error::Error + Send + Sync>>;

    /// Persists the full order state. Returns false when no row matched the
    /// (id, owner) pair.
    async fn update(
        &self,
        id: Uuid,
        owner: &str,
        order: &Order,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;

    /// Webhook-only lookup by the gateway's own order id. Callers must treat
    /// the result as unowned and only apply payment-verification mutations.
    async fn find_by_payment_order(
        &self,
        provider_order_id: &str,
    ) -> Result<Option<Order>, Box<dyn std::error::Error + Send + Sync>>;

    /// Webhook-only write paired with `find_by_payment_order`.
    async fn update_unowned(
        &self,
        id: Uuid,
        order: &Order,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;
}
