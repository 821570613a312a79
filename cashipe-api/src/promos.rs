use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{post, put},
    Json, Router,
};
use cashipe_promo::repository::PromoStoreError;
use cashipe_promo::{normalize_code, Promo, PromoType};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

// Admin endpoints carry no auth, matching the storefront's current admin
// surface. Tightening this is tracked separately.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/check", post(check_promo))
        .route("/", post(create_promo).get(list_promos))
        .route("/{id}", put(update_promo).delete(delete_promo))
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CheckPromoRequest {
    pub code: String,
    #[allow(dead_code)]
    pub amount: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertPromoRequest {
    pub code: String,
    #[serde(rename = "type")]
    pub promo_type: PromoType,
    pub amount: f64,
    pub min_order_value: Option<i64>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl UpsertPromoRequest {
    fn into_promo(self) -> Result<Promo, AppError> {
        if self.code.trim().is_empty() {
            return Err(AppError::ValidationError("code is required".to_string()));
        }
        if self.amount < 0.0 {
            return Err(AppError::ValidationError(
                "amount must be non-negative".to_string(),
            ));
        }
        let mut promo = Promo::new(&self.code, self.promo_type, self.amount);
        promo.min_order_value = self.min_order_value;
        promo.expires_at = self.expires_at;
        Ok(promo)
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /v1/promos/check
/// Public validity check. `minOrderValue` is surfaced but not enforced
/// anywhere in pricing.
pub async fn check_promo(
    State(state): State<AppState>,
    Json(req): Json<CheckPromoRequest>,
) -> Result<axum::response::Response, AppError> {
    let normalized = normalize_code(&req.code);
    if normalized.is_empty() {
        return Err(AppError::ValidationError("code is required".to_string()));
    }

    let promo = state
        .promo_repo
        .find_active(&normalized)
        .await
        .map_err(|e| AppError::InternalServerError(format!("Promo lookup failed: {}", e)))?;

    let Some(promo) = promo else {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "valid": false, "message": "Invalid or expired promo code" })),
        )
            .into_response());
    };

    if promo.is_expired(Utc::now()) {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "valid": false, "message": "Promo expired" })),
        )
            .into_response());
    }

    Ok(Json(json!({
        "valid": true,
        "promo": {
            "code": promo.code,
            "type": promo.promo_type,
            "amount": promo.amount,
            "minOrderValue": promo.min_order_value,
        },
    }))
    .into_response())
}

/// POST /v1/promos
pub async fn create_promo(
    State(state): State<AppState>,
    Json(req): Json<UpsertPromoRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let promo = req.into_promo()?;
    let created = state.promo_repo.create(&promo).await.map_err(|e| match e {
        PromoStoreError::DuplicateCode(code) => {
            AppError::ConflictError(format!("Promo code already exists: {}", code))
        }
        other => AppError::InternalServerError(other.to_string()),
    })?;

    Ok(Json(json!({ "promo": created })))
}

/// GET /v1/promos
pub async fn list_promos(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let promos = state
        .promo_repo
        .list()
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok(Json(json!({ "promos": promos })))
}

/// PUT /v1/promos/{id}
pub async fn update_promo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpsertPromoRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let promo = req.into_promo()?;
    let updated = state
        .promo_repo
        .update(id, &promo)
        .await
        .map_err(|e| match e {
            PromoStoreError::DuplicateCode(code) => {
                AppError::ConflictError(format!("Promo code already exists: {}", code))
            }
            other => AppError::InternalServerError(other.to_string()),
        })?
        .ok_or_else(|| AppError::NotFoundError("Not found".to_string()))?;

    Ok(Json(json!({ "promo": updated })))
}

/// DELETE /v1/promos/{id}
pub async fn delete_promo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = state
        .promo_repo
        .delete(id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;
    if !deleted {
        return Err(AppError::NotFoundError("Not found".to_string()));
    }

    Ok(Json(json!({ "ok": true })))
}
