use cashipe_core::payment::PaymentState;
use cashipe_shared::pii::Masked;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Sell,
    Purchase,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Sell => "sell",
            OrderType::Purchase => "purchase",
        }
    }
}

/// Order status in the lifecycle.
///
/// The enumeration is advisory: no operation checks the prior status before
/// mutating (see `transitions` for the seam where that could change).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Created,
    Scheduled,
    PickedUp,
    Inspected,
    Paid,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "created",
            OrderStatus::Scheduled => "scheduled",
            OrderStatus::PickedUp => "picked_up",
            OrderStatus::Inspected => "inspected",
            OrderStatus::Paid => "paid",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A line item on a purchase or batch-sell order. Batch-sell items carry the
/// device tuple in `metadata`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub quantity: i64,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Gateway payment sub-record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub provider: String,
    pub order_id: Option<String>,
    pub payment_id: Option<String>,
    pub signature: Option<String>,
    pub status: PaymentState,
}

impl Payment {
    /// A pending record for a freshly created gateway order.
    pub fn pending(provider: &str, provider_order_id: &str) -> Self {
        Self {
            provider: provider.to_string(),
            order_id: Some(provider_order_id.to_string()),
            payment_id: None,
            signature: None,
            status: PaymentState::Created,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PayoutKind {
    Upi,
    Bank,
    Wallet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankAccount {
    pub ifsc: String,
    pub account: Masked<String>,
    pub name: String,
}

/// Where the seller wants their money sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payout {
    pub method: PayoutKind,
    pub upi: Option<Masked<String>>,
    pub bank: Option<BankAccount>,
}

/// One entry in an order's append-only status log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub status: String,
    pub at: DateTime<Utc>,
    pub note: Option<String>,
}

/// An attached document, e.g. a generated invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    #[serde(rename = "type")]
    pub doc_type: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// A persisted transaction record: a device sell-back or a purchase.
///
/// Orders are never hard-deleted; timeline and documents only grow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub user_id: String,
    // Sell order fields
    pub category: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub storage: Option<String>,
    pub condition: Option<String>,
    // Purchase / batch-sell fields
    pub items: Vec<OrderItem>,
    // Shared
    pub price: i64,
    pub address: Option<String>,
    pub pickup_at: Option<DateTime<Utc>>,
    pub status: OrderStatus,
    pub payment: Option<Payment>,
    pub payout: Option<Payout>,
    pub timeline: Vec<TimelineEntry>,
    pub documents: Vec<DocumentRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    fn base(order_type: OrderType, user_id: String, price: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            order_type,
            user_id,
            category: None,
            brand: None,
            model: None,
            storage: None,
            condition: None,
            items: Vec::new(),
            price,
            address: None,
            pickup_at: None,
            status: OrderStatus::Created,
            payment: None,
            payout: None,
            timeline: Vec::new(),
            documents: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Single-device sell-back order, timeline seeded with its creation.
    #[allow(clippy::too_many_arguments)]
    pub fn new_sell(
        user_id: String,
        category: String,
        brand: String,
        model: String,
        storage: String,
        condition: String,
        price: i64,
        address: String,
    ) -> Self {
        let mut order = Self::base(OrderType::Sell, user_id, price);
        order.category = Some(category);
        order.brand = Some(brand);
        order.model = Some(model);
        order.storage = Some(storage);
        order.condition = Some(condition);
        order.address = Some(address);
        order.append_timeline(OrderStatus::Created, Some("Order created".to_string()));
        order
    }

    /// Batch sell-back: one record holding every device as a line item.
    pub fn new_sell_batch(user_id: String, items: Vec<OrderItem>, address: String) -> Self {
        let total: i64 = items.iter().map(|it| it.price).sum();
        let mut order = Self::base(OrderType::Sell, user_id, total);
        order.items = items;
        order.address = Some(address);
        order.append_timeline(
            OrderStatus::Created,
            Some("Batch sell order created".to_string()),
        );
        order
    }

    /// Purchase order with a pending gateway payment sub-record.
    pub fn new_purchase(
        user_id: String,
        items: Vec<OrderItem>,
        amount: i64,
        payment: Payment,
    ) -> Self {
        let mut order = Self::base(OrderType::Purchase, user_id, amount);
        order.items = items;
        order.payment = Some(payment);
        order.append_timeline(OrderStatus::Created, Some("Order created".to_string()));
        order
    }

    /// Appends to the status log. The log is append-only; nothing removes or
    /// rewrites entries.
    pub fn append_timeline(&mut self, status: OrderStatus, note: Option<String>) {
        self.timeline.push(TimelineEntry {
            status: status.as_str().to_string(),
            at: Utc::now(),
            note,
        });
        self.updated_at = Utc::now();
    }

    pub fn append_document(&mut self, document: DocumentRecord) {
        self.documents.push(document);
        self.updated_at = Utc::now();
    }

    /// Human-readable descriptor for single-device orders.
    pub fn device_summary(&self) -> String {
        format!(
            "{} {} {}",
            self.brand.as_deref().unwrap_or(""),
            self.model.as_deref().unwrap_or(""),
            self.storage.as_deref().unwrap_or("")
        )
    }
}
