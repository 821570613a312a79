use axum::{extract::State, routing::post, Extension, Json, Router};
use cashipe_order::{Order, OrderItem, Payment, Payout};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::auth::CustomerClaims;
use crate::orders::{find_owned, persist_owned};
use crate::state::AppState;

pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/razorpay/order", post(create_gateway_order))
        .route("/payout-method", post(save_payout_method))
}

pub fn public_routes() -> Router<AppState> {
    Router::new().route("/razorpay/verify", post(verify_payment))
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GatewayOrderItem {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub quantity: i64,
}

fn default_currency() -> String {
    "INR".to_string()
}

#[derive(Debug, Deserialize)]
pub struct CreateGatewayOrderRequest {
    pub amount: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub receipt: Option<String>,
    pub items: Vec<GatewayOrderItem>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePayoutRequest {
    pub order_id: Uuid,
    pub payout: Payout,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /v1/payments/razorpay/order
/// Fabricates a provider order (no live gateway call) and persists the
/// purchase order with a pending payment sub-record. Gateway amounts are in
/// paise; order prices stay in whole rupees.
pub async fn create_gateway_order(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Json(req): Json<CreateGatewayOrderRequest>,
) -> Result<Json<Value>, AppError> {
    if req.amount <= 0 {
        return Err(AppError::ValidationError(
            "amount must be positive".to_string(),
        ));
    }
    if req.items.is_empty() {
        return Err(AppError::ValidationError(
            "items must not be empty".to_string(),
        ));
    }
    if req.items.iter().any(|it| it.quantity <= 0 || it.price < 0) {
        return Err(AppError::ValidationError(
            "item quantities must be positive and prices non-negative".to_string(),
        ));
    }

    let provider_order_id = format!("test-order-{}", Uuid::new_v4());
    let gateway_order = json!({
        "id": provider_order_id,
        "amount": cashipe_shared::money::rupees_to_paise(req.amount),
        "currency": req.currency,
        "receipt": req.receipt,
    });

    let items = req
        .items
        .into_iter()
        .map(|it| OrderItem {
            id: it.id,
            name: it.name,
            price: it.price,
            quantity: it.quantity,
            metadata: json!({}),
        })
        .collect();

    let order = Order::new_purchase(
        claims.sub,
        items,
        req.amount,
        Payment::pending("razorpay", &provider_order_id),
    );
    state
        .order_repo
        .create(&order)
        .await
        .map_err(|e| AppError::InternalServerError(format!("Order create failed: {}", e)))?;

    Ok(Json(json!({ "order": gateway_order, "dbOrder": order })))
}

/// POST /v1/payments/razorpay/verify
/// Webhook-style: looks up by the provider order id, not by caller identity.
/// An invalid signature mutates nothing.
pub async fn verify_payment(
    State(state): State<AppState>,
    Json(req): Json<VerifyPaymentRequest>,
) -> Result<Json<Value>, AppError> {
    let valid = state
        .verifier
        .verify(&req.order_id, &req.payment_id, &req.signature);

    if valid {
        let order = state
            .order_repo
            .find_by_payment_order(&req.order_id)
            .await
            .map_err(|e| AppError::InternalServerError(format!("Order lookup failed: {}", e)))?;

        if let Some(mut order) = order {
            state
                .order_manager
                .mark_paid(&mut order, &req.payment_id, &req.signature)
                .map_err(|e| AppError::ConflictError(e.to_string()))?;
            state
                .order_repo
                .update_unowned(order.id, &order)
                .await
                .map_err(|e| {
                    AppError::InternalServerError(format!("Order update failed: {}", e))
                })?;
        }
    }

    Ok(Json(json!({ "valid": valid })))
}

/// POST /v1/payments/payout-method
pub async fn save_payout_method(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Json(req): Json<SavePayoutRequest>,
) -> Result<Json<Value>, AppError> {
    let mut order = find_owned(&state, req.order_id, &claims.sub).await?;
    state.order_manager.save_payout(&mut order, req.payout);
    persist_owned(&state, &order, &claims.sub).await?;

    Ok(Json(json!({ "order": order })))
}
