use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

/// A stored sell-back quote. Created once per pricing request and never
/// mutated; purely a historical record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub id: Uuid,
    pub user_id: Option<String>,
    pub category: String,
    pub brand: String,
    pub model: String,
    pub storage: String,
    pub condition: String,
    pub questionnaire: Option<HashMap<String, Value>>,
    pub base_price: i64,
    pub final_price: i64,
    pub promo_code: Option<String>,
    pub promo_discount: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Quote {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: Option<String>,
        category: String,
        brand: String,
        model: String,
        storage: String,
        condition: String,
        questionnaire: Option<HashMap<String, Value>>,
        base_price: i64,
        final_price: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            category,
            brand,
            model,
            storage,
            condition,
            questionnaire,
            base_price,
            final_price,
            promo_code: None,
            promo_discount: None,
            created_at: Utc::now(),
        }
    }
}
