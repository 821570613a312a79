use axum::{
    extract::State,
    http::Method,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod catalog;
pub mod error;
pub mod middleware;
pub mod orders;
pub mod payments;
pub mod pickup;
pub mod pricing;
pub mod promos;
pub mod quotes;
pub mod state;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    // CORS Middleware
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    let public = Router::new()
        .nest("/pricing", pricing::routes())
        .nest("/catalog", catalog::routes())
        .nest("/promos", promos::routes())
        .nest("/payments", payments::public_routes())
        .nest("/pickup", pickup::public_routes());

    let protected = Router::new()
        .nest("/quotes", quotes::routes())
        .nest("/orders", orders::routes())
        .nest("/payments", payments::protected_routes())
        .nest("/pickup", pickup::protected_routes())
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::customer_auth_middleware,
        ));

    Router::new()
        .route("/health", get(health))
        .nest("/v1", public.merge(protected))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "ok": true,
        "service": "cashipe-api",
        "time": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: axum::extract::Request,
    next: axum::middleware::Next,
) -> Result<impl IntoResponse, impl IntoResponse> {
    // ConnectInfo is absent when the router is driven directly in tests;
    // without a peer address (or without Redis) the limiter stands aside.
    let Some(redis) = state.redis.as_ref() else {
        return Ok(next.run(req).await);
    };
    let Some(peer) = req
        .extensions()
        .get::<axum::extract::ConnectInfo<SocketAddr>>()
    else {
        return Ok(next.run(req).await);
    };

    let key = format!("ratelimit:{}", peer.0.ip());
    match redis
        .check_rate_limit(
            &key,
            state.rate_limit.requests_per_window,
            state.rate_limit.window_seconds,
        )
        .await
    {
        Ok(true) => Ok(next.run(req).await),
        Ok(false) => Err((
            axum::http::StatusCode::TOO_MANY_REQUESTS,
            "Rate limit exceeded",
        )),
        Err(_) => Ok(next.run(req).await), // Fail open
    }
}
