use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::auth::CustomerClaims;
use crate::orders::{find_owned, persist_owned};
use crate::state::AppState;

const SLOT_HOURS: [u32; 5] = [9, 11, 13, 15, 17];
const SLOT_DAYS: i64 = 7;

pub fn public_routes() -> Router<AppState> {
    Router::new().route("/slots", get(list_slots))
}

pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/schedule", post(schedule_pickup))
        .route("/reschedule", post(schedule_pickup))
        .route("/cancel", post(cancel_pickup))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePickupRequest {
    pub order_id: Uuid,
    pub pickup_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelPickupRequest {
    pub order_id: Uuid,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /v1/pickup/slots
/// Statically generated slots: the next 7 days at fixed hours. Not
/// resource-constrained scheduling.
pub async fn list_slots() -> Json<Value> {
    let today = Utc::now().date_naive();
    let slots: Vec<String> = (0..SLOT_DAYS)
        .flat_map(|d| {
            let date = today + Duration::days(d);
            SLOT_HOURS.iter().filter_map(move |&hour| {
                date.and_hms_opt(hour, 0, 0)
                    .map(|dt| dt.and_utc().to_rfc3339_opts(SecondsFormat::Millis, true))
            })
        })
        .collect();

    Json(json!({ "slots": slots }))
}

/// POST /v1/pickup/schedule (and /reschedule — the same mutation applied
/// again)
pub async fn schedule_pickup(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Json(req): Json<SchedulePickupRequest>,
) -> Result<Json<Value>, AppError> {
    let mut order = find_owned(&state, req.order_id, &claims.sub).await?;
    state
        .order_manager
        .schedule(&mut order, req.pickup_at, None)
        .map_err(|e| AppError::ConflictError(e.to_string()))?;
    persist_owned(&state, &order, &claims.sub).await?;

    Ok(Json(json!({ "order": order })))
}

/// POST /v1/pickup/cancel
pub async fn cancel_pickup(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Json(req): Json<CancelPickupRequest>,
) -> Result<Json<Value>, AppError> {
    let mut order = find_owned(&state, req.order_id, &claims.sub).await?;
    state
        .order_manager
        .cancel(&mut order)
        .map_err(|e| AppError::ConflictError(e.to_string()))?;
    persist_owned(&state, &order, &claims.sub).await?;

    Ok(Json(json!({ "order": order })))
}
