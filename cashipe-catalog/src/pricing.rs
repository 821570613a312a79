use serde::{Deserialize, Serialize};

/// Self-reported condition of the device being sold back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConditionReport {
    pub screen_cracks: bool,
    pub body_dents: bool,
    pub battery_health: f64,
    pub camera_issue: bool,
    pub face_id_issue: bool,
}

impl Default for ConditionReport {
    fn default() -> Self {
        Self {
            screen_cracks: false,
            body_dents: false,
            battery_health: 90.0,
            camera_issue: false,
            face_id_issue: false,
        }
    }
}

/// Accessories included with the device.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Accessories {
    #[serde(rename = "box")]
    pub has_box: bool,
    pub charger: bool,
    pub earphones: bool,
}

/// Inputs to the heuristic sell-back estimator.
#[derive(Debug, Clone)]
pub struct EstimateInput {
    pub brand: String,
    pub model: String,
    pub storage: Option<String>,
    pub age_months: u32,
    pub condition: ConditionReport,
    pub accessories: Accessories,
}

/// Promo details attached to a breakdown after resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromoApplied {
    pub code: String,
    #[serde(rename = "type")]
    pub promo_type: String,
    pub amount: i64,
    pub discount: i64,
}

/// Every intermediate quantity of the estimate, so callers can render a full
/// price explanation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteBreakdown {
    pub base: i64,
    pub depreciated: i64,
    pub depreciation_amount: i64,
    pub deductions: i64,
    pub bonuses: i64,
    pub pre_promo_total: i64,
    pub promo: Option<PromoApplied>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Estimate {
    pub breakdown: QuoteBreakdown,
    pub total: i64,
    pub summary: String,
}

impl Estimate {
    /// Subtracts a resolved promo discount, clamping the total at zero.
    pub fn apply_promo(&mut self, promo: PromoApplied) {
        self.total = (self.breakdown.pre_promo_total - promo.discount).max(0);
        self.breakdown.promo = Some(promo);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Base price when no catalog entry backs the request.
    pub fallback_base: i64,
    pub apple_premium: i64,
    pub samsung_premium: i64,
    /// Increment per 64 GB of storage, capped at `storage_cap`.
    pub storage_step: i64,
    pub storage_cap: i64,
    /// Depreciation saturates at this rate.
    pub max_depreciation: f64,
    pub yearly_depreciation: f64,
    pub screen_crack_deduction: i64,
    pub body_dent_deduction: i64,
    pub camera_issue_deduction: i64,
    pub face_id_deduction: i64,
    /// Per-point deduction below this battery-health threshold.
    pub battery_threshold: f64,
    pub battery_point_deduction: f64,
    pub box_bonus: i64,
    pub charger_bonus: i64,
    pub earphones_bonus: i64,
    /// Floor applied before any promo discount.
    pub min_quote: i64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            fallback_base: 10000,
            apple_premium: 15000,
            samsung_premium: 8000,
            storage_step: 1500,
            storage_cap: 5000,
            max_depreciation: 0.6,
            yearly_depreciation: 0.15,
            screen_crack_deduction: 3000,
            body_dent_deduction: 1000,
            camera_issue_deduction: 800,
            face_id_deduction: 2000,
            battery_threshold: 80.0,
            battery_point_deduction: 30.0,
            box_bonus: 300,
            charger_bonus: 500,
            earphones_bonus: 200,
            min_quote: 500,
        }
    }
}

/// Heuristic sell-back estimator for the public quote endpoint.
///
/// Unlike the catalog rule engine this path never fails: unknown brands and
/// storage labels degrade to the fallback heuristics.
pub struct QuoteEstimator {
    config: EstimatorConfig,
}

impl QuoteEstimator {
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }

    pub fn estimate(&self, input: &EstimateInput) -> Estimate {
        let cfg = &self.config;

        // Base price heuristic, stand-in for catalog-backed model pricing.
        let mut base = cfg.fallback_base;
        let brand_lower = input.brand.to_lowercase();
        if brand_lower.contains("apple") {
            base += cfg.apple_premium;
        }
        if brand_lower.contains("samsung") {
            base += cfg.samsung_premium;
        }
        if let Some(storage) = &input.storage {
            if let Some(gb) = parse_storage_gb(storage) {
                base += cfg.storage_cap.min((gb / 64) * cfg.storage_step);
            }
        }

        // Age depreciation applied to base.
        let rate = cfg
            .max_depreciation
            .min((input.age_months as f64 / 12.0) * cfg.yearly_depreciation);
        let depreciated = (base as f64 * (1.0 - rate)).round() as i64;
        let depreciation_amount = (base as f64 * rate).round() as i64;

        // Condition deductions, each independently applicable.
        let mut deductions = 0i64;
        if input.condition.screen_cracks {
            deductions += cfg.screen_crack_deduction;
        }
        if input.condition.body_dents {
            deductions += cfg.body_dent_deduction;
        }
        if input.condition.camera_issue {
            deductions += cfg.camera_issue_deduction;
        }
        if input.condition.face_id_issue {
            deductions += cfg.face_id_deduction;
        }
        let battery = input.condition.battery_health.clamp(0.0, 100.0);
        if battery < cfg.battery_threshold {
            deductions += ((cfg.battery_threshold - battery) * cfg.battery_point_deduction)
                .round() as i64;
        }

        // Accessory bonuses.
        let mut bonuses = 0i64;
        if input.accessories.has_box {
            bonuses += cfg.box_bonus;
        }
        if input.accessories.charger {
            bonuses += cfg.charger_bonus;
        }
        if input.accessories.earphones {
            bonuses += cfg.earphones_bonus;
        }

        let pre_promo_total = cfg.min_quote.max(depreciated - deductions + bonuses);

        let summary = match &input.storage {
            Some(storage) => format!("{} {} {}", input.brand, input.model, storage),
            None => format!("{} {}", input.brand, input.model),
        };

        Estimate {
            breakdown: QuoteBreakdown {
                base,
                depreciated,
                depreciation_amount,
                deductions,
                bonuses,
                pre_promo_total,
                promo: None,
            },
            total: pre_promo_total,
            summary,
        }
    }
}

impl Default for QuoteEstimator {
    fn default() -> Self {
        Self::new(EstimatorConfig::default())
    }
}

/// Extracts the numeric capacity from labels like "256 GB" or "1TB".
fn parse_storage_gb(label: &str) -> Option<i64> {
    let digits: String = label.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}
