use axum::{extract::State, routing::post, Json, Router};
use cashipe_catalog::{
    identify_by_imei, Accessories, ConditionReport, Estimate, EstimateInput, PromoApplied,
};
use cashipe_promo::PromoType;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/quote", post(estimate_quote))
        .route("/identify", post(identify_device))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct IdentifyDeviceRequest {
    pub imei: Option<String>,
    pub serial: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateQuoteRequest {
    pub category: String,
    pub brand: String,
    pub model: String,
    pub storage: Option<String>,
    #[serde(default)]
    pub age_months: u32,
    pub promo_code: Option<String>,
    #[serde(default)]
    pub condition: ConditionReport,
    #[serde(default)]
    pub accessories: Accessories,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /v1/pricing/quote
/// Public heuristic estimate with optional fail-open promo application.
pub async fn estimate_quote(
    State(state): State<AppState>,
    Json(req): Json<EstimateQuoteRequest>,
) -> Result<Json<Estimate>, AppError> {
    if req.brand.trim().is_empty() || req.model.trim().is_empty() {
        return Err(AppError::ValidationError(
            "brand and model are required".to_string(),
        ));
    }

    let input = EstimateInput {
        brand: req.brand,
        model: req.model,
        storage: req.storage,
        age_months: req.age_months,
        condition: req.condition,
        accessories: req.accessories,
    };
    let mut estimate = state.estimator.estimate(&input);

    if let Some(code) = req.promo_code.as_deref() {
        let resolution = state
            .promo_resolver
            .resolve_for_pricing(code, estimate.breakdown.pre_promo_total)
            .await;
        if let (true, Some(promo)) = (resolution.valid, resolution.promo) {
            estimate.apply_promo(PromoApplied {
                code: promo.code.clone(),
                promo_type: match promo.promo_type {
                    PromoType::Percent => "percent".to_string(),
                    PromoType::Fixed => "fixed".to_string(),
                },
                amount: promo.amount.round() as i64,
                discount: resolution.discount,
            });
        }
    }

    Ok(Json(estimate))
}

/// POST /v1/pricing/identify
/// Stubbed IMEI/serial identification feeding the estimate form. An empty
/// imei falls back to the serial, matching the storefront's submission.
pub async fn identify_device(
    Json(req): Json<IdentifyDeviceRequest>,
) -> Result<Json<Value>, AppError> {
    let identifier = [req.imei.as_deref(), req.serial.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty());

    let Some(identifier) = identifier else {
        return Err(AppError::ValidationError(
            "imei or serial required".to_string(),
        ));
    };

    let (brand, model) = identify_by_imei(identifier);
    Ok(Json(json!({ "brand": brand, "model": model })))
}
