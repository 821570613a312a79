use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/models", get(list_models))
}

#[derive(Debug, Deserialize)]
pub struct ModelsQuery {
    pub category: Option<String>,
    pub brand: Option<String>,
}

/// GET /v1/catalog/categories
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let devices = state
        .catalog_repo
        .list_devices(None)
        .await
        .map_err(|e| AppError::InternalServerError(format!("Catalog list failed: {}", e)))?;

    let mut categories: Vec<String> = devices.into_iter().map(|d| d.category).collect();
    categories.sort();
    categories.dedup();

    Ok(Json(json!({ "categories": categories })))
}

/// GET /v1/catalog/models?category=...&brand=...
pub async fn list_models(
    State(state): State<AppState>,
    Query(query): Query<ModelsQuery>,
) -> Result<Json<Value>, AppError> {
    let (Some(category), Some(brand)) = (query.category, query.brand) else {
        return Err(AppError::ValidationError(
            "category and brand required".to_string(),
        ));
    };

    let devices = state
        .catalog_repo
        .list_devices(Some(&category))
        .await
        .map_err(|e| AppError::InternalServerError(format!("Catalog list failed: {}", e)))?;

    let models: Vec<Value> = devices
        .into_iter()
        .filter(|d| d.brand == brand)
        .map(|d| {
            json!({
                "model": d.model,
                "basePrice": d.base_price,
                "storageOptions": d.storage_options,
                "conditions": d.conditions,
                "grade": d.grade,
            })
        })
        .collect();

    Ok(Json(json!({ "models": models })))
}
