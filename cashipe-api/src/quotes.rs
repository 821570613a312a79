use axum::{extract::State, routing::post, Extension, Json, Router};
use cashipe_catalog::Quote;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::error::AppError;
use crate::middleware::auth::CustomerClaims;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", post(create_quote))
}

#[derive(Debug, Deserialize)]
pub struct CreateQuoteRequest {
    pub category: String,
    pub brand: String,
    pub model: String,
    pub storage: String,
    pub condition: String,
    pub questionnaire: Option<HashMap<String, Value>>,
}

/// POST /v1/quotes
/// Catalog-backed quote: exact device lookup, rule-engine pricing, quote
/// record persisted as immutable history.
pub async fn create_quote(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Json(req): Json<CreateQuoteRequest>,
) -> Result<Json<Value>, AppError> {
    let device = state
        .catalog_repo
        .find_device(&req.category, &req.brand, &req.model)
        .await
        .map_err(|e| AppError::InternalServerError(format!("Catalog lookup failed: {}", e)))?
        .ok_or_else(|| AppError::NotFoundError("Device not found".to_string()))?;

    let final_price = state.rule_engine.compute_price(
        device.base_price,
        &req.condition,
        &req.storage,
        req.questionnaire.as_ref(),
    );

    let quote = Quote::new(
        Some(claims.sub),
        req.category,
        req.brand,
        req.model,
        req.storage,
        req.condition,
        req.questionnaire,
        device.base_price,
        final_price,
    );

    state
        .quote_repo
        .save_quote(&quote)
        .await
        .map_err(|e| AppError::InternalServerError(format!("Quote save failed: {}", e)))?;

    Ok(Json(json!({ "quote": quote })))
}
