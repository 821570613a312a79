use cashipe_catalog::repository::{CatalogRepository, QuoteRepository};
use cashipe_catalog::{QuoteEstimator, RuleEngine};
use cashipe_core::payment::SignatureVerifier;
use cashipe_order::repository::OrderRepository;
use cashipe_order::OrderManager;
use cashipe_promo::repository::PromoRepository;
use cashipe_promo::PromoResolver;
use cashipe_store::RedisClient;
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone, Copy)]
pub struct RateLimit {
    pub requests_per_window: i64,
    pub window_seconds: i64,
}

#[derive(Clone)]
pub struct AppState {
    pub catalog_repo: Arc<dyn CatalogRepository>,
    pub quote_repo: Arc<dyn QuoteRepository>,
    pub order_repo: Arc<dyn OrderRepository>,
    pub promo_repo: Arc<dyn PromoRepository>,
    pub promo_resolver: PromoResolver,
    pub estimator: Arc<QuoteEstimator>,
    pub rule_engine: Arc<RuleEngine>,
    pub order_manager: Arc<OrderManager>,
    pub verifier: Arc<SignatureVerifier>,
    // None in tests; the rate limiter fails open without it.
    pub redis: Option<Arc<RedisClient>>,
    pub auth: AuthConfig,
    pub rate_limit: RateLimit,
}
