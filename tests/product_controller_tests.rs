use storefront_server_lib::api::server::app;
use storefront_server_lib::api::state::AppState;
use storefront_server_lib::data::models::product::NewProduct;
use storefront_server_lib::data::models::user::UserRole;
use storefront_server_lib::data::repos::implementors::memory_repo::MemoryDatabase;
use storefront_server_lib::data::repos::traits::product_repository::ProductRepository;
use storefront_server_lib::security::jwt::JwtService;
use storefront_server_lib::services::order_service::{CartItem, OrderService};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use bigdecimal::BigDecimal;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

const SECRET: &str = "product-controller-test-secret";

fn setup() -> (MemoryDatabase, Router, JwtService) {
    let db = MemoryDatabase::new();
    let jwt = JwtService::new(SECRET, 60);
    let router = app(AppState::new(db.clone(), jwt.clone()));
    (db, router, jwt)
}

async fn create_test_product(db: &MemoryDatabase, name: &str, price: &str, stock: i32) -> i32 {
    db.add_product(NewProduct {
        name: name.to_string(),
        description: Some(format!("{name} for testing")),
        price: BigDecimal::from_str(price).unwrap(),
        stock,
        image_url: None,
    })
    .await
    .expect("Failed to add product")
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_list_and_get_products_are_public() {
    let (db, router, _) = setup();
    let hammer = create_test_product(&db, "Hammer", "10.00", 5).await;
    create_test_product(&db, "Saw", "25.50", 2).await;

    let (status, json) = send(&router, request("GET", "/api/products", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 2);

    let uri = format!("/api/products/{}", hammer);
    let (status, json) = send(&router, request("GET", &uri, None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Hammer");
    assert_eq!(json["stock"], 5);

    let (status, _) = send(&router, request("GET", "/api/products/777", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_product_requires_admin() {
    let (db, router, jwt) = setup();
    let admin = jwt.generate_token(1, UserRole::Admin).unwrap();
    let customer = jwt.generate_token(2, UserRole::Customer).unwrap();
    let body = json!({ "name": "Drill", "price": "89.99", "stock": 4 });

    let (status, _) = send(
        &router,
        request("POST", "/api/products", Some(&customer), Some(body.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&router, request("POST", "/api/products", None, Some(body.clone()))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, json) = send(
        &router,
        request("POST", "/api/products", Some(&admin), Some(body)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let id = json["id"].as_i64().unwrap() as i32;
    let product = db.get_product_by_id(id).await.unwrap().unwrap();
    assert_eq!(product.name, "Drill");
    assert_eq!(product.price, BigDecimal::from_str("89.99").unwrap());
}

#[tokio::test]
async fn test_create_product_rejects_negative_values() {
    let (_, router, jwt) = setup();
    let admin = jwt.generate_token(1, UserRole::Admin).unwrap();

    for body in [
        json!({ "name": "Drill", "price": "-1.00", "stock": 4 }),
        json!({ "name": "Drill", "price": "1.00", "stock": -4 }),
        json!({ "name": "  ", "price": "1.00", "stock": 4 }),
    ] {
        let (status, _) = send(
            &router,
            request("POST", "/api/products", Some(&admin), Some(body)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_update_product() {
    let (db, router, jwt) = setup();
    let admin = jwt.generate_token(1, UserRole::Admin).unwrap();
    let level = create_test_product(&db, "Level", "18.00", 3).await;

    let uri = format!("/api/products/{}", level);
    let (status, _) = send(
        &router,
        request("PUT", &uri, Some(&admin), Some(json!({ "price": "19.50", "stock": 7 }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let product = db.get_product_by_id(level).await.unwrap().unwrap();
    assert_eq!(product.price, BigDecimal::from_str("19.50").unwrap());
    assert_eq!(product.stock, 7);
    assert_eq!(product.name, "Level");

    let (status, _) = send(
        &router,
        request("PUT", "/api/products/999", Some(&admin), Some(json!({ "stock": 1 }))),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_product_refused_while_ordered() {
    let (db, router, jwt) = setup();
    let admin = jwt.generate_token(1, UserRole::Admin).unwrap();
    let ordered = create_test_product(&db, "Pliers", "12.00", 5).await;
    let unused = create_test_product(&db, "Clamp", "9.00", 5).await;

    OrderService::new(db.clone())
        .place_order(
            42,
            vec![CartItem {
                product_id: ordered,
                quantity: 1,
            }],
        )
        .await
        .expect("Order should succeed");

    let uri = format!("/api/products/{}", ordered);
    let (status, _) = send(&router, request("DELETE", &uri, Some(&admin), None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(db.get_product_by_id(ordered).await.unwrap().is_some());

    let uri = format!("/api/products/{}", unused);
    let customer = jwt.generate_token(2, UserRole::Customer).unwrap();
    let (status, _) = send(&router, request("DELETE", &uri, Some(&customer), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&router, request("DELETE", &uri, Some(&admin), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(db.get_product_by_id(unused).await.unwrap().is_none());

    let (status, _) = send(&router, request("DELETE", &uri, Some(&admin), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_root_and_ping() {
    let (_, router, _) = setup();

    let response = router
        .clone()
        .oneshot(request("GET", "/", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, json) = send(&router, request("GET", "/api/ping-db", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["message"].is_string());
}

#[tokio::test]
async fn test_malformed_product_bodies_are_bad_request() {
    let (db, router, jwt) = setup();
    let admin = jwt.generate_token(1, UserRole::Admin).unwrap();
    let level = create_test_product(&db, "Level", "18.00", 3).await;

    for body in [
        json!({ "name": "Drill", "price": "89.99" }),
        json!({ "price": "89.99", "stock": 4 }),
        json!({ "name": "Drill", "price": "89.99", "stock": "many" }),
        json!({ "name": "Drill", "price": "cheap", "stock": 4 }),
    ] {
        let (status, json) = send(
            &router,
            request("POST", "/api/products", Some(&admin), Some(body.clone())),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert!(json["message"].is_string());
    }

    let uri = format!("/api/products/{}", level);
    let (status, _) = send(
        &router,
        request("PUT", &uri, Some(&admin), Some(json!({ "stock": "lots" }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(db.get_all_products().await.unwrap().len(), 1);
    assert_eq!(db.get_product_by_id(level).await.unwrap().unwrap().stock, 3);
}

#[tokio::test]
async fn test_create_product_rejects_out_of_range_prices() {
    let (_, router, jwt) = setup();
    let admin = jwt.generate_token(1, UserRole::Admin).unwrap();

    for price in ["1.005", "100000000.00"] {
        let body = json!({ "name": "Drill", "price": price, "stock": 4 });
        let (status, _) = send(
            &router,
            request("POST", "/api/products", Some(&admin), Some(body)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "price {price}");
    }
}
