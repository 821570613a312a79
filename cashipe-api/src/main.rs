use cashipe_api::state::{AppState, AuthConfig, RateLimit};
use cashipe_api::app;
use cashipe_catalog::{QuoteEstimator, RuleEngine};
use cashipe_core::payment::SignatureVerifier;
use cashipe_order::{OrderManager, PermissiveTransitions};
use cashipe_promo::PromoResolver;
use cashipe_store::{
    DbClient, PgCatalogRepository, PgOrderRepository, PgPromoRepository, PgQuoteRepository,
    RedisClient,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "cashipe_api=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = cashipe_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting CashiPe API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    // Redis is optional: without it the rate limiter fails open.
    let redis = match RedisClient::new(&config.redis.url).await {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            tracing::warn!("Redis unavailable, rate limiting disabled: {}", e);
            None
        }
    };

    let promo_repo = Arc::new(PgPromoRepository::new(db.pool.clone()));

    let app_state = AppState {
        catalog_repo: Arc::new(PgCatalogRepository::new(db.pool.clone())),
        quote_repo: Arc::new(PgQuoteRepository::new(db.pool.clone())),
        order_repo: Arc::new(PgOrderRepository::new(db.pool.clone())),
        promo_repo: promo_repo.clone(),
        promo_resolver: PromoResolver::new(promo_repo),
        estimator: Arc::new(QuoteEstimator::default()),
        rule_engine: Arc::new(RuleEngine::new()),
        order_manager: Arc::new(OrderManager::new(Arc::new(PermissiveTransitions))),
        verifier: Arc::new(SignatureVerifier::new(
            config.payment.razorpay_key_secret.clone(),
        )),
        redis,
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
        rate_limit: RateLimit {
            requests_per_window: config.rate_limit.requests_per_window,
            window_seconds: config.rate_limit.window_seconds,
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server error");
}
