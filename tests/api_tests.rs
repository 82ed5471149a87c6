use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use quickcart::config::{AuthConfig, Config};
use quickcart::tokens::TokenService;
use serde_json::{Value, json};
use tower::ServiceExt;

const TEST_SECRET: &str = "integration-test-signing-secret-0123456789";

/// Boots the full router over an in-memory database. Migrations and seed
/// data run inside `create_app_state_from_config`, so every test starts from
/// the same catalog and the same seeded admin account.
async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.auth.jwt_secret = TEST_SECRET.to_string();

    let state = quickcart::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    quickcart::api::router(state).await
}

fn api_request(method: &str, uri: &str, token: Option<&str>, body: Option<&Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

async fn sign_up(app: &Router, name: &str, email: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(api_request(
            "POST",
            "/api/auth/register",
            None,
            Some(&json!({"name": name, "email": email, "password": password})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let json = read_json(response).await;
    json["data"]["token"].as_str().unwrap().to_string()
}

async fn sign_in(app: &Router, email: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(api_request(
            "POST",
            "/api/auth/login",
            None,
            Some(&json!({"email": email, "password": password})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = read_json(response).await;
    json["data"]["token"].as_str().unwrap().to_string()
}

/// The admin account comes from the seed migration.
async fn admin_token(app: &Router) -> String {
    sign_in(app, "admin@quickcart.dev", "changeme").await
}

fn shipping_address() -> Value {
    json!({
        "name": "Casey Shopper",
        "phone": "9876543210",
        "street": "12 Market Lane",
        "city": "Pune",
        "state": "Maharashtra",
        "zipCode": "411001"
    })
}

// ============================================================================
// System
// ============================================================================

#[tokio::test]
async fn test_root_banner() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(api_request("GET", "/", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");

    let json = read_json(response).await;
    assert_eq!(json["message"], "QuickCart API is running");
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/system/health", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = read_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["data"]["database"], true);
    assert!(json["data"]["version"].as_str().is_some_and(|v| !v.is_empty()));
}

#[tokio::test]
async fn test_metrics_endpoint_is_admin_only() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/system/metrics", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let customer = sign_up(&app, "Casey", "casey@example.com", "hunter20").await;
    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/system/metrics", Some(&customer), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let admin = admin_token(&app).await;
    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/system/metrics", Some(&admin), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_cors_for_configured_origin() {
    let app = spawn_app().await;

    // Preflight is answered by the CORS layer before auth ever runs
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/cart")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:5173"
    );
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .unwrap(),
        "true"
    );
}

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
async fn test_register_sets_session_cookie() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(api_request(
            "POST",
            "/api/auth/register",
            None,
            Some(&json!({
                "name": "Casey Shopper",
                "email": "Casey@Example.COM",
                "password": "hunter20"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("jwt="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));

    let json = read_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["user"]["email"], "casey@example.com");
    assert_eq!(json["data"]["user"]["role"], "user");
    assert!(json["data"]["user"].get("password").is_none());
    assert!(json["data"]["user"].get("passwordHash").is_none());
    assert!(json["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn test_register_rejects_duplicates_and_bad_input() {
    let app = spawn_app().await;
    sign_up(&app, "Casey", "casey@example.com", "hunter20").await;

    // Same address with different casing still collides
    let response = app
        .clone()
        .oneshot(api_request(
            "POST",
            "/api/auth/register",
            None,
            Some(&json!({
                "name": "Other Casey",
                "email": "CASEY@example.com",
                "password": "different1"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = read_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "User already exists");

    let response = app
        .clone()
        .oneshot(api_request(
            "POST",
            "/api/auth/register",
            None,
            Some(&json!({"name": "", "email": "new@example.com", "password": "hunter20"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(api_request(
            "POST",
            "/api/auth/register",
            None,
            Some(&json!({"name": "Casey", "email": "not-an-email", "password": "hunter20"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = read_json(response).await;
    assert_eq!(json["error"], "Invalid email address");

    let response = app
        .clone()
        .oneshot(api_request(
            "POST",
            "/api/auth/register",
            None,
            Some(&json!({"name": "Casey", "email": "new@example.com", "password": "short"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = read_json(response).await;
    assert_eq!(json["error"], "Password must be at least 6 characters");
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let app = spawn_app().await;
    sign_up(&app, "Casey", "casey@example.com", "hunter20").await;

    let response = app
        .clone()
        .oneshot(api_request(
            "POST",
            "/api/auth/login",
            None,
            Some(&json!({"email": "casey@example.com", "password": "wrong-pass"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = read_json(response).await;
    assert_eq!(json["error"], "Invalid email or password");

    // Unknown accounts get the same answer as wrong passwords
    let response = app
        .clone()
        .oneshot(api_request(
            "POST",
            "/api/auth/login",
            None,
            Some(&json!({"email": "nobody@example.com", "password": "whatever1"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = read_json(response).await;
    assert_eq!(json["error"], "Invalid email or password");
}

#[tokio::test]
async fn test_profile_requires_session() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/auth/profile", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = read_json(response).await;
    assert_eq!(json["error"], "Not authorized");

    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/auth/profile", Some("garbage.token.here"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // An OAuth exchange token is not a session and must not pass the gate
    let tokens = TokenService::new(&AuthConfig {
        jwt_secret: TEST_SECRET.to_string(),
        ..AuthConfig::default()
    });
    let exchange = tokens.issue_exchange(1).unwrap();
    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/auth/profile", Some(&exchange), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = sign_up(&app, "Casey", "casey@example.com", "hunter20").await;
    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/auth/profile", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["data"]["email"], "casey@example.com");
}

#[tokio::test]
async fn test_profile_accepts_cookie_auth() {
    let app = spawn_app().await;
    let token = sign_up(&app, "Casey", "casey@example.com", "hunter20").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/profile")
                .header(header::COOKIE, format!("jwt={token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["data"]["email"], "casey@example.com");
}

#[tokio::test]
async fn test_expired_session_is_rejected() {
    let app = spawn_app().await;

    let stale = TokenService::new(&AuthConfig {
        jwt_secret: TEST_SECRET.to_string(),
        session_ttl_days: -1,
        exchange_ttl_seconds: 120,
    });
    let token = stale.issue_session(1).unwrap();

    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/auth/profile", Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_profile() {
    let app = spawn_app().await;
    let token = sign_up(&app, "Casey", "casey@example.com", "hunter20").await;

    let response = app
        .clone()
        .oneshot(api_request(
            "PUT",
            "/api/auth/profile",
            Some(&token),
            Some(&json!({"name": "Casey Renamed", "phone": "9876543210"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["data"]["name"], "Casey Renamed");
    assert_eq!(json["data"]["phone"], "9876543210");

    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/auth/profile", Some(&token), None))
        .await
        .unwrap();
    let json = read_json(response).await;
    assert_eq!(json["data"]["name"], "Casey Renamed");
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(api_request("POST", "/api/auth/logout", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("jwt=;"));
    assert!(cookie.contains("Max-Age=0"));

    let json = read_json(response).await;
    assert_eq!(json["data"]["message"], "Logged out successfully");
}

// ============================================================================
// OAuth
// ============================================================================

#[tokio::test]
async fn test_google_login_redirects_when_unconfigured() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/auth/google", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "http://localhost:5173/signin?error=oauth_missing"
    );

    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/auth/google/callback?code=abc", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "http://localhost:5173/signin?error=oauth_missing"
    );
}

#[tokio::test]
async fn test_oauth_finalize_is_single_use() {
    let app = spawn_app().await;

    let tokens = TokenService::new(&AuthConfig {
        jwt_secret: TEST_SECRET.to_string(),
        ..AuthConfig::default()
    });
    // User 1 is the seeded admin account
    let temp = tokens.issue_exchange(1).unwrap();

    let response = app
        .clone()
        .oneshot(api_request(
            "GET",
            &format!("/api/auth/oauth/finalize?temp={temp}"),
            None,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("jwt="));

    let json = read_json(response).await;
    assert_eq!(json["data"]["user"]["email"], "admin@quickcart.dev");
    assert!(json["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));

    // Replaying the same exchange token must fail
    let response = app
        .clone()
        .oneshot(api_request(
            "GET",
            &format!("/api/auth/oauth/finalize?temp={temp}"),
            None,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // A session token is the wrong kind for the finalize step
    let session = tokens.issue_session(1).unwrap();
    let response = app
        .clone()
        .oneshot(api_request(
            "GET",
            &format!("/api/auth/oauth/finalize?temp={session}"),
            None,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_products_listing_defaults() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/products", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = read_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["page"], 1);
    assert_eq!(json["data"]["pages"], 1);
    assert_eq!(json["data"]["total"], 12);

    let products = json["data"]["products"].as_array().unwrap();
    assert_eq!(products.len(), 12);
    for product in products {
        assert_eq!(product["isActive"], true);
        assert!(product["price"].as_f64().is_some());
        assert!(product["stock"].as_i64().is_some());
    }
}

#[tokio::test]
async fn test_products_filters_and_sorting() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/products?category=Men", None, None))
        .await
        .unwrap();
    let json = read_json(response).await;
    let products = json["data"]["products"].as_array().unwrap();
    assert_eq!(products.len(), 2);
    for product in products {
        assert_eq!(product["category"], "Men");
    }

    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/products?search=dress", None, None))
        .await
        .unwrap();
    let json = read_json(response).await;
    let products = json["data"]["products"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["title"], "Floral Summer Dress");

    let response = app
        .clone()
        .oneshot(api_request(
            "GET",
            "/api/products?minPrice=100&maxPrice=300",
            None,
            None,
        ))
        .await
        .unwrap();
    let json = read_json(response).await;
    let products = json["data"]["products"].as_array().unwrap();
    assert_eq!(products.len(), 3);
    for product in products {
        let price = product["price"].as_f64().unwrap();
        assert!((100.0..=300.0).contains(&price));
    }

    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/products?sort=price-asc", None, None))
        .await
        .unwrap();
    let json = read_json(response).await;
    let products = json["data"]["products"].as_array().unwrap();
    let prices: Vec<f64> = products.iter().map(|p| p["price"].as_f64().unwrap()).collect();
    assert!((prices[0] - 24.99).abs() < 1e-9);
    assert!(prices.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn test_products_pagination() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/products?limit=5", None, None))
        .await
        .unwrap();
    let json = read_json(response).await;
    assert_eq!(json["data"]["products"].as_array().unwrap().len(), 5);
    assert_eq!(json["data"]["pages"], 3);
    assert_eq!(json["data"]["total"], 12);

    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/products?limit=5&page=3", None, None))
        .await
        .unwrap();
    let json = read_json(response).await;
    assert_eq!(json["data"]["page"], 3);
    assert_eq!(json["data"]["products"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_product_detail() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/products/1", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["data"]["title"], "Wireless Noise-Cancelling Headphones");
    assert!((json["data"]["price"].as_f64().unwrap() - 249.99).abs() < 1e-9);

    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/products/999", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = read_json(response).await;
    assert_eq!(json["error"], "Product not found");

    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/products/0", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_product_writes_require_admin() {
    let app = spawn_app().await;

    let new_product = json!({
        "title": "USB-C Travel Charger",
        "description": "65W charger with two ports.",
        "price": 39.99,
        "category": "Electronics",
        "image": "https://images.example.com/charger.jpg",
        "stock": 20
    });

    let response = app
        .clone()
        .oneshot(api_request("POST", "/api/products", None, Some(&new_product)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let customer = sign_up(&app, "Casey", "casey@example.com", "hunter20").await;
    let response = app
        .clone()
        .oneshot(api_request("POST", "/api/products", Some(&customer), Some(&new_product)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = read_json(response).await;
    assert_eq!(json["error"], "Access denied. Admin only.");

    let admin = admin_token(&app).await;
    let response = app
        .clone()
        .oneshot(api_request("POST", "/api/products", Some(&admin), Some(&new_product)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = read_json(response).await;
    assert_eq!(json["data"]["id"], 13);
    assert_eq!(json["data"]["title"], "USB-C Travel Charger");
    assert_eq!(json["data"]["stock"], 20);
}

#[tokio::test]
async fn test_product_create_update_delete() {
    let app = spawn_app().await;
    let admin = admin_token(&app).await;

    let response = app
        .clone()
        .oneshot(api_request(
            "POST",
            "/api/products",
            Some(&admin),
            Some(&json!({
                "title": "Gadget",
                "price": 10.0,
                "category": "Toys",
                "image": "https://images.example.com/gadget.jpg"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = read_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("Invalid category"));

    let response = app
        .clone()
        .oneshot(api_request(
            "POST",
            "/api/products",
            Some(&admin),
            Some(&json!({
                "title": "Canvas Tote Bag",
                "price": 19.99,
                "category": "Accessories",
                "image": "https://images.example.com/tote.jpg",
                "stock": 15
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = read_json(response).await;
    let id = created["data"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(api_request(
            "PUT",
            &format!("/api/products/{id}"),
            Some(&admin),
            Some(&json!({"price": 14.5, "stock": 8})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert!((json["data"]["price"].as_f64().unwrap() - 14.5).abs() < 1e-9);
    assert_eq!(json["data"]["stock"], 8);

    let response = app
        .clone()
        .oneshot(api_request("DELETE", &format!("/api/products/{id}"), Some(&admin), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["data"]["message"], "Product removed successfully");

    let response = app
        .clone()
        .oneshot(api_request("GET", &format!("/api/products/{id}"), None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
async fn test_cart_lifecycle() {
    let app = spawn_app().await;
    let token = sign_up(&app, "Casey", "casey@example.com", "hunter20").await;

    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/cart", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 0);

    let response = app
        .clone()
        .oneshot(api_request(
            "POST",
            "/api/cart/add",
            Some(&token),
            Some(&json!({"productId": 3, "quantity": 2})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    let items = json["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 2);
    assert_eq!(items[0]["product"]["id"], 3);

    // Adding the same product merges, capped at 10 per line
    let response = app
        .clone()
        .oneshot(api_request(
            "POST",
            "/api/cart/add",
            Some(&token),
            Some(&json!({"productId": 3, "quantity": 9})),
        ))
        .await
        .unwrap();
    let json = read_json(response).await;
    assert_eq!(json["data"]["items"][0]["quantity"], 10);

    let response = app
        .clone()
        .oneshot(api_request(
            "PUT",
            "/api/cart/update/3",
            Some(&token),
            Some(&json!({"quantity": 5})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["data"]["items"][0]["quantity"], 5);

    let response = app
        .clone()
        .oneshot(api_request("DELETE", "/api/cart/remove/3", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 0);

    // Removing an absent line is a no-op, not an error
    let response = app
        .clone()
        .oneshot(api_request("DELETE", "/api/cart/remove/3", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(api_request(
            "POST",
            "/api/cart/add",
            Some(&token),
            Some(&json!({"productId": 1})),
        ))
        .await
        .unwrap();
    let json = read_json(response).await;
    // Quantity defaults to 1 when omitted
    assert_eq!(json["data"]["items"][0]["quantity"], 1);

    let response = app
        .clone()
        .oneshot(api_request("DELETE", "/api/cart/clear", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["data"]["message"], "Cart cleared successfully");

    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/cart", Some(&token), None))
        .await
        .unwrap();
    let json = read_json(response).await;
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_cart_quantity_rules() {
    let app = spawn_app().await;
    let token = sign_up(&app, "Casey", "casey@example.com", "hunter20").await;

    // Product 3 is seeded with 12 in stock
    let response = app
        .clone()
        .oneshot(api_request(
            "POST",
            "/api/cart/add",
            Some(&token),
            Some(&json!({"productId": 3, "quantity": 13})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = read_json(response).await;
    assert_eq!(json["error"], "Insufficient stock");

    let response = app
        .clone()
        .oneshot(api_request(
            "POST",
            "/api/cart/add",
            Some(&token),
            Some(&json!({"productId": 3, "quantity": 0})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = read_json(response).await;
    assert_eq!(json["error"], "Quantity must be between 1 and 10");

    let response = app
        .clone()
        .oneshot(api_request(
            "POST",
            "/api/cart/add",
            Some(&token),
            Some(&json!({"productId": 999, "quantity": 1})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = read_json(response).await;
    assert_eq!(json["error"], "Product not found");

    let response = app
        .clone()
        .oneshot(api_request(
            "PUT",
            "/api/cart/update/3",
            Some(&token),
            Some(&json!({"quantity": 1})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = read_json(response).await;
    assert_eq!(json["error"], "Product not in cart");

    let response = app
        .clone()
        .oneshot(api_request(
            "POST",
            "/api/cart/add",
            Some(&token),
            Some(&json!({"productId": 3, "quantity": 2})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    for quantity in [0, 11] {
        let response = app
            .clone()
            .oneshot(api_request(
                "PUT",
                "/api/cart/update/3",
                Some(&token),
                Some(&json!({"quantity": quantity})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = read_json(response).await;
        assert_eq!(json["error"], "Quantity must be between 1 and 10");
    }
}

#[tokio::test]
async fn test_cart_sync_merges_guest_cart() {
    let app = spawn_app().await;
    let token = sign_up(&app, "Casey", "casey@example.com", "hunter20").await;

    let response = app
        .clone()
        .oneshot(api_request(
            "POST",
            "/api/cart/add",
            Some(&token),
            Some(&json!({"productId": 1, "quantity": 3})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Higher guest quantity wins, new lines append, unknown products and
    // non-positive quantities are skipped
    let response = app
        .clone()
        .oneshot(api_request(
            "POST",
            "/api/cart/sync",
            Some(&token),
            Some(&json!({"items": [
                {"productId": 1, "quantity": 5},
                {"productId": 2, "quantity": 1},
                {"productId": 999, "quantity": 2},
                {"productId": 4, "quantity": 0}
            ]})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    let items = json["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["product"]["id"], 1);
    assert_eq!(items[0]["quantity"], 5);
    assert_eq!(items[1]["product"]["id"], 2);
    assert_eq!(items[1]["quantity"], 1);

    // A lower guest quantity never shrinks the server line
    let response = app
        .clone()
        .oneshot(api_request(
            "POST",
            "/api/cart/sync",
            Some(&token),
            Some(&json!({"items": [{"productId": 1, "quantity": 2}]})),
        ))
        .await
        .unwrap();
    let json = read_json(response).await;
    assert_eq!(json["data"]["items"][0]["quantity"], 5);

    let response = app
        .clone()
        .oneshot(api_request(
            "POST",
            "/api/cart/sync",
            Some(&token),
            Some(&json!({"items": null})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = read_json(response).await;
    assert_eq!(json["error"], "Invalid cart data");
}

// ============================================================================
// Orders
// ============================================================================

#[tokio::test]
async fn test_order_placement_freezes_prices_and_stock() {
    let app = spawn_app().await;
    let token = sign_up(&app, "Casey", "casey@example.com", "hunter20").await;

    let response = app
        .clone()
        .oneshot(api_request(
            "POST",
            "/api/orders",
            Some(&token),
            Some(&json!({
                "items": [
                    {"productId": 3, "quantity": 2},
                    {"productId": 12, "quantity": 1}
                ],
                "shippingAddress": shipping_address(),
                "paymentMethod": "cash"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = read_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["status"], "pending");
    assert_eq!(json["data"]["paymentStatus"], "pending");
    assert_eq!(json["data"]["paymentMethod"], "cash");
    assert_eq!(json["data"]["shippingAddress"]["country"], "India");

    // 2 x 899.99 + 1 x 24.99
    let total = json["data"]["totalAmount"].as_f64().unwrap();
    assert!((total - 1824.97).abs() < 1e-6);

    let items = json["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["title"], "Professional DSLR Camera Kit");
    assert_eq!(items[0]["quantity"], 2);

    // Stock on product 3 went from 12 to 10
    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/products/3", None, None))
        .await
        .unwrap();
    let json = read_json(response).await;
    assert_eq!(json["data"]["stock"], 10);
}

#[tokio::test]
async fn test_order_validation() {
    let app = spawn_app().await;
    let token = sign_up(&app, "Casey", "casey@example.com", "hunter20").await;

    let response = app
        .clone()
        .oneshot(api_request(
            "POST",
            "/api/orders",
            Some(&token),
            Some(&json!({
                "items": [],
                "shippingAddress": shipping_address(),
                "paymentMethod": "cash"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = read_json(response).await;
    assert_eq!(json["error"], "Order must contain at least one item");

    let response = app
        .clone()
        .oneshot(api_request(
            "POST",
            "/api/orders",
            Some(&token),
            Some(&json!({
                "items": [{"productId": 1, "quantity": 1}],
                "shippingAddress": shipping_address(),
                "paymentMethod": "card"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = read_json(response).await;
    assert_eq!(json["error"], "Invalid payment method");

    let mut incomplete = shipping_address();
    incomplete["city"] = json!("");
    let response = app
        .clone()
        .oneshot(api_request(
            "POST",
            "/api/orders",
            Some(&token),
            Some(&json!({
                "items": [{"productId": 1, "quantity": 1}],
                "shippingAddress": incomplete,
                "paymentMethod": "cash"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = read_json(response).await;
    assert_eq!(json["error"], "Shipping address is incomplete");

    let response = app
        .clone()
        .oneshot(api_request(
            "POST",
            "/api/orders",
            Some(&token),
            Some(&json!({
                "items": [{"productId": 999, "quantity": 1}],
                "shippingAddress": shipping_address(),
                "paymentMethod": "cash"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = read_json(response).await;
    assert_eq!(json["error"], "Product not found");

    // Product 3 has 12 in stock; repeated lines for it must be summed first
    let response = app
        .clone()
        .oneshot(api_request(
            "POST",
            "/api/orders",
            Some(&token),
            Some(&json!({
                "items": [
                    {"productId": 3, "quantity": 7},
                    {"productId": 3, "quantity": 7}
                ],
                "shippingAddress": shipping_address(),
                "paymentMethod": "cash"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = read_json(response).await;
    assert_eq!(json["error"], "Insufficient stock");

    let response = app
        .clone()
        .oneshot(api_request(
            "POST",
            "/api/orders",
            Some(&token),
            Some(&json!({
                "items": [{"productId": 1, "quantity": 0}],
                "shippingAddress": shipping_address(),
                "paymentMethod": "cash"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_order_visibility_rules() {
    let app = spawn_app().await;
    let casey = sign_up(&app, "Casey", "casey@example.com", "hunter20").await;
    let robin = sign_up(&app, "Robin", "robin@example.com", "hunter20").await;

    let response = app
        .clone()
        .oneshot(api_request(
            "POST",
            "/api/orders",
            Some(&casey),
            Some(&json!({
                "items": [{"productId": 12, "quantity": 1}],
                "shippingAddress": shipping_address()
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let order_id = read_json(response).await["data"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/orders", Some(&casey), None))
        .await
        .unwrap();
    let json = read_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(api_request("GET", &format!("/api/orders/{order_id}"), Some(&casey), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Another customer cannot read it
    let response = app
        .clone()
        .oneshot(api_request("GET", &format!("/api/orders/{order_id}"), Some(&robin), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = read_json(response).await;
    assert_eq!(json["error"], "Not authorized to view this order");

    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/orders", Some(&robin), None))
        .await
        .unwrap();
    let json = read_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);

    // Admins can read any order
    let admin = admin_token(&app).await;
    let response = app
        .clone()
        .oneshot(api_request("GET", &format!("/api/orders/{order_id}"), Some(&admin), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/orders/999", Some(&casey), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = read_json(response).await;
    assert_eq!(json["error"], "Order not found");
}

#[tokio::test]
async fn test_order_status_transitions() {
    let app = spawn_app().await;
    let token = sign_up(&app, "Casey", "casey@example.com", "hunter20").await;

    let response = app
        .clone()
        .oneshot(api_request(
            "POST",
            "/api/orders",
            Some(&token),
            Some(&json!({
                "items": [{"productId": 12, "quantity": 2}],
                "shippingAddress": shipping_address(),
                "paymentMethod": "cash"
            })),
        ))
        .await
        .unwrap();
    let order_id = read_json(response).await["data"]["id"].as_i64().unwrap();

    // Customers cannot move orders through the pipeline
    let response = app
        .clone()
        .oneshot(api_request(
            "PUT",
            &format!("/api/orders/{order_id}/status"),
            Some(&token),
            Some(&json!({"status": "shipped"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let admin = admin_token(&app).await;

    let response = app
        .clone()
        .oneshot(api_request(
            "PUT",
            &format!("/api/orders/{order_id}/status"),
            Some(&admin),
            Some(&json!({"status": "express"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = read_json(response).await;
    assert_eq!(json["error"], "Invalid order status");

    let response = app
        .clone()
        .oneshot(api_request(
            "PUT",
            &format!("/api/orders/{order_id}/status"),
            Some(&admin),
            Some(&json!({"status": "shipped"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["data"]["status"], "shipped");
    assert_eq!(json["data"]["paymentStatus"], "pending");

    // Cash on delivery settles when the parcel is delivered
    let response = app
        .clone()
        .oneshot(api_request(
            "PUT",
            &format!("/api/orders/{order_id}/status"),
            Some(&admin),
            Some(&json!({"status": "delivered"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["data"]["status"], "delivered");
    assert_eq!(json["data"]["paymentStatus"], "completed");

    // Delivered is terminal
    let response = app
        .clone()
        .oneshot(api_request(
            "PUT",
            &format!("/api/orders/{order_id}/status"),
            Some(&admin),
            Some(&json!({"status": "processing"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = read_json(response).await;
    assert_eq!(json["error"], "Delivered orders cannot be updated");
}

#[tokio::test]
async fn test_admin_order_listing() {
    let app = spawn_app().await;
    let token = sign_up(&app, "Casey", "casey@example.com", "hunter20").await;

    let response = app
        .clone()
        .oneshot(api_request(
            "POST",
            "/api/orders",
            Some(&token),
            Some(&json!({
                "items": [{"productId": 12, "quantity": 1}],
                "shippingAddress": shipping_address()
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/orders/admin/all", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let admin = admin_token(&app).await;
    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/orders/admin/all", Some(&admin), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    let orders = json["data"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    // The back-office listing carries the customer summary
    assert_eq!(orders[0]["user"]["email"], "casey@example.com");
    assert_eq!(orders[0]["user"]["name"], "Casey");
}

// ============================================================================
// Wishlist
// ============================================================================

#[tokio::test]
async fn test_wishlist_set_semantics() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/wishlist", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = sign_up(&app, "Casey", "casey@example.com", "hunter20").await;

    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/wishlist", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);

    let response = app
        .clone()
        .oneshot(api_request("POST", "/api/wishlist/5", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["id"], 5);

    // Adding twice keeps a single entry
    let response = app
        .clone()
        .oneshot(api_request("POST", "/api/wishlist/5", Some(&token), None))
        .await
        .unwrap();
    let json = read_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(api_request("POST", "/api/wishlist/999", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = read_json(response).await;
    assert_eq!(json["error"], "Product not found");

    let response = app
        .clone()
        .oneshot(api_request("POST", "/api/wishlist/7", Some(&token), None))
        .await
        .unwrap();
    let json = read_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let response = app
        .clone()
        .oneshot(api_request("DELETE", "/api/wishlist/5", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    let remaining = json["data"].as_array().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["id"], 7);
}

// ============================================================================
// Admin
// ============================================================================

#[tokio::test]
async fn test_admin_dashboard_stats() {
    let app = spawn_app().await;
    let token = sign_up(&app, "Casey", "casey@example.com", "hunter20").await;

    let response = app
        .clone()
        .oneshot(api_request(
            "POST",
            "/api/orders",
            Some(&token),
            Some(&json!({
                "items": [{"productId": 12, "quantity": 2}],
                "shippingAddress": shipping_address()
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/admin/stats", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let admin = admin_token(&app).await;
    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/admin/stats", Some(&admin), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;

    // The seeded admin is not a customer
    assert_eq!(json["data"]["totalUsers"], 1);
    assert_eq!(json["data"]["totalProducts"], 12);
    assert_eq!(json["data"]["totalOrders"], 1);
    let revenue = json["data"]["totalRevenue"].as_f64().unwrap();
    assert!((revenue - 49.98).abs() < 1e-6);
    assert_eq!(json["data"]["recentOrders"].as_array().unwrap().len(), 1);

    let by_status = json["data"]["ordersByStatus"].as_array().unwrap();
    assert!(
        by_status
            .iter()
            .any(|entry| entry["status"] == "pending" && entry["count"] == 1)
    );
}

#[tokio::test]
async fn test_admin_user_listing() {
    let app = spawn_app().await;
    let customer = sign_up(&app, "Casey", "casey@example.com", "hunter20").await;
    sign_up(&app, "Robin", "robin@example.com", "hunter20").await;

    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/admin/users", Some(&customer), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let admin = admin_token(&app).await;
    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/admin/users", Some(&admin), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    // Two customers plus the seeded admin
    assert_eq!(json["data"]["totalUsers"], 3);
    assert_eq!(json["data"]["currentPage"], 1);
    assert_eq!(json["data"]["users"].as_array().unwrap().len(), 3);

    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/admin/users?search=robin", Some(&admin), None))
        .await
        .unwrap();
    let json = read_json(response).await;
    let users = json["data"]["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["email"], "robin@example.com");
}

#[tokio::test]
async fn test_admin_analytics() {
    let app = spawn_app().await;
    let token = sign_up(&app, "Casey", "casey@example.com", "hunter20").await;

    let response = app
        .clone()
        .oneshot(api_request(
            "POST",
            "/api/orders",
            Some(&token),
            Some(&json!({
                "items": [{"productId": 12, "quantity": 2}],
                "shippingAddress": shipping_address()
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let admin = admin_token(&app).await;

    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/admin/analytics/revenue", Some(&admin), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    let buckets = json["data"].as_array().unwrap();
    assert_eq!(buckets.len(), 1);
    assert!((buckets[0]["revenue"].as_f64().unwrap() - 49.98).abs() < 1e-6);
    assert_eq!(buckets[0]["orders"], 1);

    let response = app
        .clone()
        .oneshot(api_request(
            "GET",
            "/api/admin/analytics/revenue?period=day",
            Some(&admin),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(api_request("GET", "/api/admin/analytics/category", Some(&admin), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    let sales = json["data"].as_array().unwrap();
    assert_eq!(sales.len(), 1);
    assert_eq!(sales[0]["category"], "Other");
    assert!((sales[0]["revenue"].as_f64().unwrap() - 49.98).abs() < 1e-6);
    assert_eq!(sales[0]["count"], 2);
}
