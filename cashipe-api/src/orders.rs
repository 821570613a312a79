use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use cashipe_order::{invoice, Order, OrderItem};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::auth::CustomerClaims;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sell", post(create_sell_order))
        .route("/sell-batch", post(create_sell_batch_order))
        .route("/schedule", post(schedule_order))
        .route("/my", get(my_orders))
        .route("/{id}", get(get_order))
        .route("/{id}/timeline", get(get_timeline))
        .route("/{id}/invoice", post(create_invoice))
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateSellOrderRequest {
    pub category: String,
    pub brand: String,
    pub model: String,
    pub storage: String,
    pub condition: String,
    pub price: i64,
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct SellBatchItem {
    pub category: String,
    pub brand: String,
    pub model: String,
    pub storage: String,
    pub condition: String,
    pub price: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateSellBatchRequest {
    pub items: Vec<SellBatchItem>,
    pub address: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleOrderRequest {
    pub order_id: Uuid,
    pub pickup_at: DateTime<Utc>,
    pub address: String,
}

// ============================================================================
// Handlers
// ============================================================================

fn validate_address(address: &str) -> Result<(), AppError> {
    if address.len() < 6 {
        return Err(AppError::ValidationError(
            "address must be at least 6 characters".to_string(),
        ));
    }
    Ok(())
}

/// POST /v1/orders/sell
pub async fn create_sell_order(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Json(req): Json<CreateSellOrderRequest>,
) -> Result<Json<Value>, AppError> {
    if req.price <= 0 {
        return Err(AppError::ValidationError(
            "price must be positive".to_string(),
        ));
    }
    validate_address(&req.address)?;

    let order = Order::new_sell(
        claims.sub,
        req.category,
        req.brand,
        req.model,
        req.storage,
        req.condition,
        req.price,
        req.address,
    );
    state
        .order_repo
        .create(&order)
        .await
        .map_err(|e| AppError::InternalServerError(format!("Order create failed: {}", e)))?;

    Ok(Json(json!({ "order": order })))
}

/// POST /v1/orders/sell-batch
/// One order record holding every device as a line item; price is the sum of
/// item prices.
pub async fn create_sell_batch_order(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Json(req): Json<CreateSellBatchRequest>,
) -> Result<Json<Value>, AppError> {
    if req.items.is_empty() {
        return Err(AppError::ValidationError(
            "items must not be empty".to_string(),
        ));
    }
    if req.items.iter().any(|it| it.price <= 0) {
        return Err(AppError::ValidationError(
            "item prices must be positive".to_string(),
        ));
    }
    validate_address(&req.address)?;

    let items = req
        .items
        .into_iter()
        .map(|it| OrderItem {
            id: Uuid::new_v4().to_string(),
            name: format!("{} {}", it.brand, it.model),
            price: it.price,
            quantity: 1,
            metadata: json!({
                "category": it.category,
                "brand": it.brand,
                "model": it.model,
                "storage": it.storage,
                "condition": it.condition,
            }),
        })
        .collect();

    let order = Order::new_sell_batch(claims.sub, items, req.address);
    state
        .order_repo
        .create(&order)
        .await
        .map_err(|e| AppError::InternalServerError(format!("Order create failed: {}", e)))?;

    Ok(Json(json!({ "order": order })))
}

/// POST /v1/orders/schedule
/// Sets the pickup slot and address; re-applying is the reschedule path.
pub async fn schedule_order(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Json(req): Json<ScheduleOrderRequest>,
) -> Result<Json<Value>, AppError> {
    validate_address(&req.address)?;

    let mut order = find_owned(&state, req.order_id, &claims.sub).await?;
    state
        .order_manager
        .schedule(&mut order, req.pickup_at, Some(req.address))
        .map_err(|e| AppError::ConflictError(e.to_string()))?;
    persist_owned(&state, &order, &claims.sub).await?;

    Ok(Json(json!({ "order": order })))
}

/// GET /v1/orders/my
pub async fn my_orders(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
) -> Result<Json<Value>, AppError> {
    let orders = state
        .order_repo
        .list(&claims.sub)
        .await
        .map_err(|e| AppError::InternalServerError(format!("Order list failed: {}", e)))?;

    Ok(Json(json!({ "orders": orders })))
}

/// GET /v1/orders/{id}
pub async fn get_order(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let order = find_owned(&state, id, &claims.sub).await?;
    Ok(Json(json!({ "order": order })))
}

/// GET /v1/orders/{id}/timeline
pub async fn get_timeline(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let order = find_owned(&state, id, &claims.sub).await?;
    Ok(Json(json!({ "timeline": order.timeline })))
}

/// POST /v1/orders/{id}/invoice
/// Generates the textual invoice and appends it to the order's documents.
pub async fn create_invoice(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let mut order = find_owned(&state, id, &claims.sub).await?;
    let document = invoice::generate(&order);
    order.append_document(document.clone());
    persist_owned(&state, &order, &claims.sub).await?;

    Ok(Json(json!({ "document": document })))
}

// ============================================================================
// Shared lookup helpers
// ============================================================================

pub(crate) async fn find_owned(
    state: &AppState,
    id: Uuid,
    owner: &str,
) -> Result<Order, AppError> {
    state
        .order_repo
        .find(id, owner)
        .await
        .map_err(|e| AppError::InternalServerError(format!("Order lookup failed: {}", e)))?
        .ok_or_else(|| AppError::NotFoundError("Order not found".to_string()))
}

pub(crate) async fn persist_owned(
    state: &AppState,
    order: &Order,
    owner: &str,
) -> Result<(), AppError> {
    let updated = state
        .order_repo
        .update(order.id, owner, order)
        .await
        .map_err(|e| AppError::InternalServerError(format!("Order update failed: {}", e)))?;
    if !updated {
        return Err(AppError::NotFoundError("Order not found".to_string()));
    }
    Ok(())
}
