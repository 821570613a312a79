use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use async_trait::async_trait;
use cashipe_api::state::{AppState, AuthConfig, RateLimit};
use cashipe_api::{app, middleware::auth::CustomerClaims};
use cashipe_catalog::repository::{CatalogRepository, QuoteRepository};
use cashipe_catalog::{DeviceCatalogEntry, Quote, QuoteEstimator, RuleEngine};
use cashipe_core::payment::SignatureVerifier;
use cashipe_order::repository::OrderRepository;
use cashipe_order::{Order, OrderManager, PermissiveTransitions};
use cashipe_promo::repository::{PromoRepository, PromoStoreError};
use cashipe_promo::{Promo, PromoResolver, PromoType};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

const TEST_SECRET: &str = "test-jwt-secret";
const PAYMENT_SECRET: &str = "test-payment-secret";

// ============================================================================
// In-memory repositories
// ============================================================================

#[derive(Default)]
struct InMemoryCatalog {
    devices: Vec<DeviceCatalogEntry>,
}

#[async_trait]
impl CatalogRepository for InMemoryCatalog {
    async fn find_device(
        &self,
        category: &str,
        brand: &str,
        model: &str,
    ) -> Result<Option<DeviceCatalogEntry>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self
            .devices
            .iter()
            .find(|d| d.category == category && d.brand == brand && d.model == model)
            .cloned())
    }

    async fn list_devices(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<DeviceCatalogEntry>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self
            .devices
            .iter()
            .filter(|d| category.is_none_or(|c| d.category == c))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
struct InMemoryQuotes {
    quotes: Mutex<Vec<Quote>>,
}

#[async_trait]
impl QuoteRepository for InMemoryQuotes {
    async fn save_quote(
        &self,
        quote: &Quote,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>> {
        self.quotes.lock().unwrap().push(quote.clone());
        Ok(quote.id)
    }
}

#[derive(Default)]
struct InMemoryOrders {
    orders: Mutex<HashMap<Uuid, Order>>,
}

#[async_trait]
impl OrderRepository for InMemoryOrders {
    async fn create(&self, order: &Order) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.orders.lock().unwrap().insert(order.id, order.clone());
        Ok(())
    }

    async fn find(
        &self,
        id: Uuid,
        owner: &str,
    ) -> Result<Option<Order>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .get(&id)
            .filter(|o| o.user_id == owner)
            .cloned())
    }

    async fn list(
        &self,
        owner: &str,
    ) -> Result<Vec<Order>, Box<dyn std::error::Error + Send + Sync>> {
        let mut orders: Vec<Order> = self
            .orders
            .lock()
            .unwrap()
            .values()
            .filter(|o| o.user_id == owner)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn update(
        &self,
        id: Uuid,
        owner: &str,
        order: &Order,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let mut orders = self.orders.lock().unwrap();
        match orders.get(&id) {
            Some(existing) if existing.user_id == owner => {
                orders.insert(id, order.clone());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn find_by_payment_order(
        &self,
        provider_order_id: &str,
    ) -> Result<Option<Order>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .values()
            .find(|o| {
                o.payment
                    .as_ref()
                    .and_then(|p| p.order_id.as_deref())
                    .is_some_and(|oid| oid == provider_order_id)
            })
            .cloned())
    }

    async fn update_unowned(
        &self,
        id: Uuid,
        order: &Order,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let mut orders = self.orders.lock().unwrap();
        if orders.contains_key(&id) {
            orders.insert(id, order.clone());
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[derive(Default)]
struct InMemoryPromos {
    promos: Mutex<Vec<Promo>>,
}

#[async_trait]
impl PromoRepository for InMemoryPromos {
    async fn find_active(&self, code: &str) -> Result<Option<Promo>, PromoStoreError> {
        Ok(self
            .promos
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.code == code && p.active)
            .cloned())
    }

    async fn create(&self, promo: &Promo) -> Result<Promo, PromoStoreError> {
        let mut promos = self.promos.lock().unwrap();
        if promos.iter().any(|p| p.code == promo.code) {
            return Err(PromoStoreError::DuplicateCode(promo.code.clone()));
        }
        promos.push(promo.clone());
        Ok(promo.clone())
    }

    async fn list(&self) -> Result<Vec<Promo>, PromoStoreError> {
        let mut promos = self.promos.lock().unwrap().clone();
        promos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(promos)
    }

    async fn update(&self, id: Uuid, promo: &Promo) -> Result<Option<Promo>, PromoStoreError> {
        let mut promos = self.promos.lock().unwrap();
        match promos.iter_mut().find(|p| p.id == id) {
            Some(existing) => {
                let mut updated = promo.clone();
                updated.id = id;
                *existing = updated.clone();
                Ok(Some(updated))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, PromoStoreError> {
        let mut promos = self.promos.lock().unwrap();
        let before = promos.len();
        promos.retain(|p| p.id != id);
        Ok(promos.len() < before)
    }
}

// ============================================================================
// Test harness
// ============================================================================

fn build_app(devices: Vec<DeviceCatalogEntry>, promos: Vec<Promo>) -> axum::Router {
    let promo_repo = Arc::new(InMemoryPromos {
        promos: Mutex::new(promos),
    });

    let state = AppState {
        catalog_repo: Arc::new(InMemoryCatalog { devices }),
        quote_repo: Arc::new(InMemoryQuotes::default()),
        order_repo: Arc::new(InMemoryOrders::default()),
        promo_repo: promo_repo.clone(),
        promo_resolver: PromoResolver::new(promo_repo),
        estimator: Arc::new(QuoteEstimator::default()),
        rule_engine: Arc::new(RuleEngine::new()),
        order_manager: Arc::new(OrderManager::new(Arc::new(PermissiveTransitions))),
        verifier: Arc::new(SignatureVerifier::new(PAYMENT_SECRET)),
        redis: None,
        auth: AuthConfig {
            secret: TEST_SECRET.to_string(),
            expiration: 3600,
        },
        rate_limit: RateLimit {
            requests_per_window: 1000,
            window_seconds: 60,
        },
    };

    app(state)
}

fn token_for(user: &str) -> String {
    let claims = CustomerClaims {
        sub: user.to_string(),
        email: Some(format!("{}@example.com", user)),
        exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap()
}

fn post_json(uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    builder
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get_req(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn iphone_13() -> DeviceCatalogEntry {
    DeviceCatalogEntry::new("phone", "Apple", "iPhone 13", 30000)
}

// ============================================================================
// Pricing
// ============================================================================

#[tokio::test]
async fn estimate_apple_256gb_cracked_screen() {
    let app = build_app(vec![], vec![]);
    let body = json!({
        "category": "phone",
        "brand": "Apple",
        "model": "iPhone 13",
        "storage": "256 GB",
        "ageMonths": 0,
        "condition": { "screenCracks": true, "batteryHealth": 90 },
        "accessories": {},
    });

    let response = app
        .oneshot(post_json("/v1/pricing/quote", body, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["breakdown"]["base"], 30000);
    assert_eq!(body["breakdown"]["deductions"], 3000);
    assert_eq!(body["breakdown"]["prePromoTotal"], 27000);
    assert_eq!(body["total"], 27000);
    assert_eq!(body["summary"], "Apple iPhone 13 256 GB");
}

#[tokio::test]
async fn estimate_applies_percent_promo() {
    let app = build_app(vec![], vec![Promo::new("SAVE10", PromoType::Percent, 10.0)]);
    let body = json!({
        "category": "phone",
        "brand": "Apple",
        "model": "iPhone 13",
        "storage": "256 GB",
        "condition": { "screenCracks": true },
        "promoCode": "  save10 ",
    });

    let response = app
        .oneshot(post_json("/v1/pricing/quote", body, None))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["breakdown"]["promo"]["code"], "SAVE10");
    assert_eq!(body["breakdown"]["promo"]["discount"], 2700);
    assert_eq!(body["total"], 24300);
}

#[tokio::test]
async fn estimate_ignores_unknown_promo() {
    let app = build_app(vec![], vec![]);
    let body = json!({
        "category": "phone",
        "brand": "Apple",
        "model": "iPhone 13",
        "promoCode": "NOPE",
    });

    let response = app
        .oneshot(post_json("/v1/pricing/quote", body, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["breakdown"]["promo"], Value::Null);
    assert_eq!(body["total"], body["breakdown"]["prePromoTotal"]);
}

#[tokio::test]
async fn identify_maps_imei_prefixes() {
    let app = build_app(vec![], vec![]);

    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/pricing/identify",
            json!({ "imei": "351234567890123" }),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["brand"], "Apple");
    assert_eq!(body["model"], "iPhone");

    // Blank imei falls back to the serial.
    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/pricing/identify",
            json!({ "imei": "  ", "serial": "861234567890123" }),
            None,
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["brand"], "Samsung");
    assert_eq!(body["model"], "Galaxy");

    let response = app
        .oneshot(post_json("/v1/pricing/identify", json!({}), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Quotes (catalog rule engine)
// ============================================================================

#[tokio::test]
async fn quote_requires_auth() {
    let app = build_app(vec![iphone_13()], vec![]);
    let body = json!({
        "category": "phone", "brand": "Apple", "model": "iPhone 13",
        "storage": "128 GB", "condition": "Good",
    });

    let response = app.oneshot(post_json("/v1/quotes", body, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn quote_unknown_device_is_not_found() {
    let app = build_app(vec![iphone_13()], vec![]);
    let token = token_for("user-a");
    let body = json!({
        "category": "phone", "brand": "Nokia", "model": "3310",
        "storage": "64 GB", "condition": "Good",
    });

    let response = app
        .oneshot(post_json("/v1/quotes", body, Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn quote_computes_rule_engine_price() {
    let app = build_app(vec![iphone_13()], vec![]);
    let token = token_for("user-a");
    let body = json!({
        "category": "phone", "brand": "Apple", "model": "iPhone 13",
        "storage": "128 GB", "condition": "Good",
    });

    let response = app
        .oneshot(post_json("/v1/quotes", body, Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    // 30000 * 1.08 * 0.9 = 29160
    assert_eq!(body["quote"]["final_price"], 29160);
    assert_eq!(body["quote"]["base_price"], 30000);
    assert_eq!(body["quote"]["user_id"], "user-a");
}

// ============================================================================
// Orders
// ============================================================================

async fn create_sell(app: &axum::Router, token: &str) -> Value {
    let body = json!({
        "category": "phone", "brand": "Apple", "model": "iPhone 13",
        "storage": "128 GB", "condition": "Good",
        "price": 29160, "address": "221B Baker Street",
    });
    let response = app
        .clone()
        .oneshot(post_json("/v1/orders/sell", body, Some(token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

#[tokio::test]
async fn sell_order_then_schedule_grows_timeline() {
    let app = build_app(vec![], vec![]);
    let token = token_for("user-a");

    let created = create_sell(&app, &token).await;
    let order_id = created["order"]["id"].as_str().unwrap().to_string();
    assert_eq!(created["order"]["status"], "created");
    assert_eq!(created["order"]["timeline"].as_array().unwrap().len(), 1);

    let body = json!({
        "orderId": order_id,
        "pickupAt": "2025-01-01T09:00:00Z",
        "address": "221B Baker Street",
    });
    let response = app
        .clone()
        .oneshot(post_json("/v1/orders/schedule", body, Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let scheduled = body_json(response).await;
    assert_eq!(scheduled["order"]["status"], "scheduled");
    let timeline = scheduled["order"]["timeline"].as_array().unwrap();
    assert_eq!(timeline.len(), 2);
    assert_eq!(timeline[0]["status"], "created");
    assert_eq!(timeline[1]["status"], "scheduled");
    assert!(timeline[1]["note"]
        .as_str()
        .unwrap()
        .contains("2025-01-01T09:00:00"));

    // Timeline endpoint returns the same log.
    let response = app
        .oneshot(get_req(
            &format!("/v1/orders/{}/timeline", scheduled["order"]["id"].as_str().unwrap()),
            Some(&token),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["timeline"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn sell_order_rejects_short_address() {
    let app = build_app(vec![], vec![]);
    let token = token_for("user-a");
    let body = json!({
        "category": "phone", "brand": "Apple", "model": "iPhone 13",
        "storage": "128 GB", "condition": "Good",
        "price": 1000, "address": "short",
    });

    let response = app
        .oneshot(post_json("/v1/orders/sell", body, Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn batch_sell_aggregates_prices() {
    let app = build_app(vec![], vec![]);
    let token = token_for("user-a");
    let body = json!({
        "items": [
            { "category": "phone", "brand": "Apple", "model": "iPhone 12",
              "storage": "64 GB", "condition": "Good", "price": 20000 },
            { "category": "phone", "brand": "Samsung", "model": "Galaxy S21",
              "storage": "128 GB", "condition": "Fair", "price": 15000 },
        ],
        "address": "221B Baker Street",
    });

    let response = app
        .oneshot(post_json("/v1/orders/sell-batch", body, Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["order"]["price"], 35000);
    assert_eq!(body["order"]["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn orders_are_ownership_isolated() {
    let app = build_app(vec![], vec![]);
    let token_a = token_for("user-a");
    let token_b = token_for("user-b");

    let created = create_sell(&app, &token_a).await;
    let order_id = created["order"]["id"].as_str().unwrap().to_string();

    // B cannot read A's order, even with a valid id.
    let response = app
        .clone()
        .oneshot(get_req(&format!("/v1/orders/{}", order_id), Some(&token_b)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // B cannot cancel it either.
    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/pickup/cancel",
            json!({ "orderId": order_id }),
            Some(&token_b),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // And A's listing is not visible to B.
    let response = app
        .oneshot(get_req("/v1/orders/my", Some(&token_b)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["orders"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn invoice_is_appended_as_document() {
    let app = build_app(vec![], vec![]);
    let token = token_for("user-a");

    let created = create_sell(&app, &token).await;
    let order_id = created["order"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/v1/orders/{}/invoice", order_id),
            json!({}),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["document"]["type"], "invoice");
    assert!(body["document"]["url"]
        .as_str()
        .unwrap()
        .starts_with("data:text/plain;base64,"));

    let response = app
        .oneshot(get_req(&format!("/v1/orders/{}", order_id), Some(&token)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["order"]["documents"].as_array().unwrap().len(), 1);
}

// ============================================================================
// Payments
// ============================================================================

async fn create_purchase(app: &axum::Router, token: &str) -> (String, Value) {
    let body = json!({
        "amount": 1500,
        "items": [ { "id": "acc-1", "name": "USB-C Cable", "price": 1500, "quantity": 1 } ],
    });
    let response = app
        .clone()
        .oneshot(post_json("/v1/payments/razorpay/order", body, Some(token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let provider_order_id = body["order"]["id"].as_str().unwrap().to_string();
    (provider_order_id, body)
}

#[tokio::test]
async fn gateway_order_amount_is_in_paise() {
    let app = build_app(vec![], vec![]);
    let token = token_for("user-a");

    let (provider_order_id, body) = create_purchase(&app, &token).await;
    assert!(provider_order_id.starts_with("test-order-"));
    assert_eq!(body["order"]["amount"], 150000);
    assert_eq!(body["order"]["currency"], "INR");
    // The stored order keeps whole rupees.
    assert_eq!(body["dbOrder"]["price"], 1500);
    assert_eq!(body["dbOrder"]["payment"]["status"], "created");
}

#[tokio::test]
async fn valid_signature_marks_order_paid() {
    let app = build_app(vec![], vec![]);
    let token = token_for("user-a");

    let (provider_order_id, created) = create_purchase(&app, &token).await;
    let db_order_id = created["dbOrder"]["id"].as_str().unwrap().to_string();

    let verifier = SignatureVerifier::new(PAYMENT_SECRET);
    let signature = verifier.sign(&provider_order_id, "pay_123");

    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/payments/razorpay/verify",
            json!({ "order_id": provider_order_id, "payment_id": "pay_123", "signature": signature }),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["valid"], true);

    let response = app
        .oneshot(get_req(&format!("/v1/orders/{}", db_order_id), Some(&token)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["order"]["status"], "paid");
    assert_eq!(body["order"]["payment"]["status"], "verified");
    assert_eq!(body["order"]["payment"]["payment_id"], "pay_123");
    let timeline = body["order"]["timeline"].as_array().unwrap();
    assert_eq!(timeline.last().unwrap()["status"], "paid");
}

#[tokio::test]
async fn invalid_signature_mutates_nothing() {
    let app = build_app(vec![], vec![]);
    let token = token_for("user-a");

    let (provider_order_id, created) = create_purchase(&app, &token).await;
    let db_order_id = created["dbOrder"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/payments/razorpay/verify",
            json!({ "order_id": provider_order_id, "payment_id": "pay_123", "signature": "deadbeef" }),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["valid"], false);

    let response = app
        .oneshot(get_req(&format!("/v1/orders/{}", db_order_id), Some(&token)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["order"]["status"], "created");
    assert_eq!(body["order"]["payment"]["status"], "created");
}

#[tokio::test]
async fn payout_method_is_saved() {
    let app = build_app(vec![], vec![]);
    let token = token_for("user-a");

    let created = create_sell(&app, &token).await;
    let order_id = created["order"]["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(post_json(
            "/v1/payments/payout-method",
            json!({
                "orderId": order_id,
                "payout": { "method": "upi", "upi": "user@okhdfc", "bank": null },
            }),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["order"]["payout"]["method"], "upi");
    assert_eq!(body["order"]["payout"]["upi"], "user@okhdfc");
}

// ============================================================================
// Pickup
// ============================================================================

#[tokio::test]
async fn pickup_slots_cover_seven_days() {
    let app = build_app(vec![], vec![]);
    let response = app.oneshot(get_req("/v1/pickup/slots", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let slots = body["slots"].as_array().unwrap();
    assert_eq!(slots.len(), 35);
    assert!(slots[0].as_str().unwrap().contains("T09:00:00"));
}

#[tokio::test]
async fn cancel_after_schedule_is_allowed() {
    let app = build_app(vec![], vec![]);
    let token = token_for("user-a");

    let created = create_sell(&app, &token).await;
    let order_id = created["order"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/pickup/schedule",
            json!({ "orderId": order_id, "pickupAt": "2025-01-01T09:00:00Z" }),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(post_json(
            "/v1/pickup/cancel",
            json!({ "orderId": order_id }),
            Some(&token),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["order"]["status"], "cancelled");
}

// ============================================================================
// Promos
// ============================================================================

#[tokio::test]
async fn promo_admin_crud_round_trip() {
    let app = build_app(vec![], vec![]);

    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/promos/",
            json!({ "code": "  flat500 ", "type": "fixed", "amount": 500 }),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    assert_eq!(created["promo"]["code"], "FLAT500");
    let id = created["promo"]["id"].as_str().unwrap().to_string();

    // Duplicate code conflicts.
    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/promos/",
            json!({ "code": "FLAT500", "type": "fixed", "amount": 500 }),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(get_req("/v1/promos/", None))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["promos"].as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/v1/promos/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(body_json(response).await["ok"], true);
}

#[tokio::test]
async fn promo_check_reports_expiry() {
    let mut expired = Promo::new("GONE", PromoType::Percent, 20.0);
    expired.expires_at = Some(Utc::now() - Duration::days(1));
    let app = build_app(
        vec![],
        vec![Promo::new("SAVE10", PromoType::Percent, 10.0), expired],
    );

    let response = app
        .clone()
        .oneshot(post_json("/v1/promos/check", json!({ "code": "save10" }), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["valid"], true);
    assert_eq!(body["promo"]["code"], "SAVE10");

    let response = app
        .oneshot(post_json("/v1/promos/check", json!({ "code": "GONE" }), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["valid"], false);
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn catalog_models_filters_by_brand() {
    let app = build_app(
        vec![
            iphone_13(),
            DeviceCatalogEntry::new("phone", "Samsung", "Galaxy S21", 25000),
        ],
        vec![],
    );

    let response = app
        .clone()
        .oneshot(get_req("/v1/catalog/models?category=phone&brand=Apple", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let models = body["models"].as_array().unwrap();
    assert_eq!(models.len(), 1);
    assert_eq!(models[0]["model"], "iPhone 13");

    // Missing brand is a validation error.
    let response = app
        .oneshot(get_req("/v1/catalog/models?category=phone", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
