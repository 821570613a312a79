use serde_json::Value;
use std::collections::HashMap;

/// Placeholder market trend factor, to be replaced by a market-data feed.
const MARKET_TREND_FACTOR: f64 = 1.0;

/// Fixed multiplier tables for the catalog-backed quote path.
///
/// Labels not present in a table get the identity factor, so unknown storage
/// or condition strings never fail a quote.
pub struct RuleEngine {
    storage_factors: HashMap<&'static str, f64>,
    condition_factors: HashMap<&'static str, f64>,
}

impl RuleEngine {
    pub fn new() -> Self {
        let storage_factors = HashMap::from([
            ("64 GB", 1.0),
            ("128 GB", 1.08),
            ("256 GB", 1.16),
            ("512 GB", 1.25),
        ]);
        let condition_factors = HashMap::from([
            ("Like New", 1.0),
            ("Good", 0.9),
            ("Fair", 0.78),
            ("Needs Repair", 0.5),
        ]);
        Self {
            storage_factors,
            condition_factors,
        }
    }

    pub fn storage_factor(&self, storage: &str) -> f64 {
        self.storage_factors.get(storage).copied().unwrap_or(1.0)
    }

    pub fn condition_factor(&self, condition: &str) -> f64 {
        self.condition_factors.get(condition).copied().unwrap_or(1.0)
    }

    /// Computes the final price for a catalog device.
    ///
    /// All adjustments are multiplicative and order-independent; rounding
    /// happens once at the end.
    pub fn compute_price(
        &self,
        base: i64,
        condition: &str,
        storage: &str,
        questionnaire: Option<&HashMap<String, Value>>,
    ) -> i64 {
        let mut price =
            base as f64 * self.storage_factor(storage) * self.condition_factor(condition);

        if let Some(q) = questionnaire {
            if q.get("scratches").and_then(Value::as_str) == Some("many") {
                price *= 0.93;
            }
            if q.get("dents").and_then(Value::as_str) == Some("yes") {
                price *= 0.95;
            }
            if let Some(health) = q.get("batteryHealth").and_then(as_number) {
                if health < 80.0 {
                    price *= 0.9;
                }
            }
        }

        price *= MARKET_TREND_FACTOR;
        price.round() as i64
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Questionnaire values arrive as free-form JSON; accept numbers and numeric
/// strings the way the storefront submits them.
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_labels_use_identity_factor() {
        let engine = RuleEngine::new();
        assert_eq!(engine.storage_factor("3 TB"), 1.0);
        assert_eq!(engine.condition_factor("Mint"), 1.0);
        assert_eq!(engine.compute_price(20000, "Mint", "3 TB", None), 20000);
    }

    #[test]
    fn test_factor_tables() {
        let engine = RuleEngine::new();
        assert_eq!(engine.compute_price(20000, "Like New", "64 GB", None), 20000);
        assert_eq!(engine.compute_price(20000, "Good", "128 GB", None), 19440);
        assert_eq!(engine.compute_price(20000, "Fair", "256 GB", None), 18096);
        assert_eq!(
            engine.compute_price(20000, "Needs Repair", "512 GB", None),
            12500
        );
    }

    #[test]
    fn test_questionnaire_penalties() {
        let engine = RuleEngine::new();
        let q = HashMap::from([
            ("scratches".to_string(), json!("many")),
            ("dents".to_string(), json!("yes")),
            ("batteryHealth".to_string(), json!(75)),
        ]);
        // 20000 * 0.93 * 0.95 * 0.9 = 15903
        assert_eq!(
            engine.compute_price(20000, "Like New", "64 GB", Some(&q)),
            15903
        );
    }

    #[test]
    fn test_questionnaire_numeric_strings() {
        let engine = RuleEngine::new();
        let q = HashMap::from([("batteryHealth".to_string(), json!("72"))]);
        assert_eq!(
            engine.compute_price(10000, "Like New", "64 GB", Some(&q)),
            9000
        );
    }

    #[test]
    fn test_healthy_battery_no_penalty() {
        let engine = RuleEngine::new();
        let q = HashMap::from([("batteryHealth".to_string(), json!(92))]);
        assert_eq!(
            engine.compute_price(10000, "Like New", "64 GB", Some(&q)),
            10000
        );
    }
}
