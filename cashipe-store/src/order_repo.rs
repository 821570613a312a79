use async_trait::async_trait;
use cashipe_order::{Order, OrderRepository};
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

/// Orders persist as scalar columns for the fields we filter on, with the
/// variable-shape sub-records (items, payment, payout, timeline, documents)
/// stored as JSONB.
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    order_type: String,
    user_id: String,
    category: Option<String>,
    brand: Option<String>,
    model: Option<String>,
    storage: Option<String>,
    condition: Option<String>,
    items: Value,
    price: i64,
    address: Option<String>,
    pickup_at: Option<DateTime<Utc>>,
    status: String,
    payment: Option<Value>,
    payout: Option<Value>,
    timeline: Value,
    documents: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

const ORDER_COLUMNS: &str = "id, order_type, user_id, category, brand, model, storage, condition, \
    items, price, address, pickup_at, status, payment, payout, timeline, documents, \
    created_at, updated_at";

impl OrderRow {
    fn into_order(self) -> Result<Order, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Order {
            id: self.id,
            order_type: serde_json::from_value(Value::String(self.order_type))?,
            user_id: self.user_id,
            category: self.category,
            brand: self.brand,
            model: self.model,
            storage: self.storage,
            condition: self.condition,
            items: serde_json::from_value(self.items)?,
            price: self.price,
            address: self.address,
            pickup_at: self.pickup_at,
            status: serde_json::from_value(Value::String(self.status))?,
            payment: self.payment.map(serde_json::from_value).transpose()?,
            payout: self.payout.map(serde_json::from_value).transpose()?,
            timeline: serde_json::from_value(self.timeline)?,
            documents: serde_json::from_value(self.documents)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create(&self, order: &Order) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            "INSERT INTO orders (id, order_type, user_id, category, brand, model, storage, \
             condition, items, price, address, pickup_at, status, payment, payout, timeline, \
             documents, payment_order_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)",
        )
        .bind(order.id)
        .bind(order.order_type.as_str())
        .bind(&order.user_id)
        .bind(&order.category)
        .bind(&order.brand)
        .bind(&order.model)
        .bind(&order.storage)
        .bind(&order.condition)
        .bind(serde_json::to_value(&order.items)?)
        .bind(order.price)
        .bind(&order.address)
        .bind(order.pickup_at)
        .bind(order.status.as_str())
        .bind(order.payment.as_ref().map(serde_json::to_value).transpose()?)
        .bind(order.payout.as_ref().map(serde_json::to_value).transpose()?)
        .bind(serde_json::to_value(&order.timeline)?)
        .bind(serde_json::to_value(&order.documents)?)
        .bind(order.payment.as_ref().and_then(|p| p.order_id.clone()))
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(
        &self,
        id: Uuid,
        owner: &str,
    ) -> Result<Option<Order>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        row.map(OrderRow::into_order).transpose()
    }

    async fn list(
        &self,
        owner: &str,
    ) -> Result<Vec<Order>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }

    async fn update(
        &self,
        id: Uuid,
        owner: &str,
        order: &Order,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let result = sqlx::query(
            "UPDATE orders SET status = $1, price = $2, address = $3, pickup_at = $4, \
             items = $5, payment = $6, payout = $7, timeline = $8, documents = $9, \
             payment_order_id = $10, updated_at = $11 \
             WHERE id = $12 AND user_id = $13",
        )
        .bind(order.status.as_str())
        .bind(order.price)
        .bind(&order.address)
        .bind(order.pickup_at)
        .bind(serde_json::to_value(&order.items)?)
        .bind(order.payment.as_ref().map(serde_json::to_value).transpose()?)
        .bind(order.payout.as_ref().map(serde_json::to_value).transpose()?)
        .bind(serde_json::to_value(&order.timeline)?)
        .bind(serde_json::to_value(&order.documents)?)
        .bind(order.payment.as_ref().and_then(|p| p.order_id.clone()))
        .bind(order.updated_at)
        .bind(id)
        .bind(owner)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_payment_order(
        &self,
        provider_order_id: &str,
    ) -> Result<Option<Order>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE payment_order_id = $1"
        ))
        .bind(provider_order_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(OrderRow::into_order).transpose()
    }

    async fn update_unowned(
        &self,
        id: Uuid,
        order: &Order,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let result = sqlx::query(
            "UPDATE orders SET status = $1, payment = $2, timeline = $3, updated_at = $4 \
             WHERE id = $5",
        )
        .bind(order.status.as_str())
        .bind(order.payment.as_ref().map(serde_json::to_value).transpose()?)
        .bind(serde_json::to_value(&order.timeline)?)
        .bind(order.updated_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
