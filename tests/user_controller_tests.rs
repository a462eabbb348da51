use storefront_server_lib::api::server::app;
use storefront_server_lib::api::state::AppState;
use storefront_server_lib::data::models::user::UserRole;
use storefront_server_lib::data::repos::implementors::memory_repo::MemoryDatabase;
use storefront_server_lib::data::repos::traits::user_repository::UserRepository;
use storefront_server_lib::security::jwt::{AccessClaims, JwtService};
use storefront_server_lib::services::errors::UserServiceError;
use storefront_server_lib::services::user_service::UserService;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const SECRET: &str = "user-controller-test-secret";

fn setup() -> (MemoryDatabase, Router, JwtService) {
    let db = MemoryDatabase::new();
    let jwt = JwtService::new(SECRET, 60);
    let router = app(AppState::new(db.clone(), jwt.clone()));
    (db, router, jwt)
}

async fn post_json(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_register_and_login() {
    let (db, router, jwt) = setup();

    let (status, json) = post_json(
        &router,
        "/api/auth/register",
        json!({ "name": "Ana", "email": "ana@example.com", "password": "s3cret" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let user_id = json["id"].as_i64().unwrap() as i32;

    let stored = db
        .get_user_by_email("ana@example.com")
        .await
        .unwrap()
        .expect("User not stored");
    assert_ne!(stored.password_hash, "s3cret");
    assert_eq!(stored.get_role(), UserRole::Customer);

    let (status, json) = post_json(
        &router,
        "/api/auth/login",
        json!({ "email": "ana@example.com", "password": "s3cret" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["user"]["userId"], user_id);
    assert_eq!(json["user"]["role"], "customer");

    let claims: AccessClaims = jwt
        .decode_token(json["token"].as_str().unwrap())
        .expect("Token should decode");
    assert_eq!(claims.user_id(), user_id);
    assert_eq!(claims.role, UserRole::Customer);
}

#[tokio::test]
async fn test_register_duplicate_email_is_conflict() {
    let (_, router, _) = setup();
    let body = json!({ "name": "Ana", "email": "dup@example.com", "password": "pw" });

    let (first, _) = post_json(&router, "/api/auth/register", body.clone()).await;
    let (second, _) = post_json(&router, "/api/auth/register", body).await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_requires_all_fields() {
    let (_, router, _) = setup();

    let (status, _) = post_json(
        &router,
        "/api/auth/register",
        json!({ "name": "", "email": "blank@example.com", "password": "pw" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let (_, router, _) = setup();

    post_json(
        &router,
        "/api/auth/register",
        json!({ "name": "Luis", "email": "luis@example.com", "password": "right" }),
    )
    .await;

    let (wrong_password, _) = post_json(
        &router,
        "/api/auth/login",
        json!({ "email": "luis@example.com", "password": "wrong" }),
    )
    .await;
    let (unknown_email, _) = post_json(
        &router,
        "/api/auth/login",
        json!({ "email": "nobody@example.com", "password": "right" }),
    )
    .await;

    assert_eq!(wrong_password, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_service_errors() {
    let db = MemoryDatabase::new();
    let service = UserService::new(db, JwtService::new(SECRET, 60));

    service
        .register("Eva", "eva@example.com", "pw")
        .await
        .expect("Registration should succeed");

    assert_eq!(
        service.register("Eva", "eva@example.com", "pw").await,
        Err(UserServiceError::EmailTaken)
    );
    assert_eq!(
        service.login("eva@example.com", "nope").await.err(),
        Some(UserServiceError::InvalidCredentials)
    );
}

#[tokio::test]
async fn test_malformed_auth_bodies_are_bad_request() {
    let (db, router, _) = setup();

    let cases = vec![
        ("/api/auth/register", json!({ "email": "a@b.c", "password": "pw" })),
        ("/api/auth/register", json!({ "name": "Ana", "email": "a@b.c" })),
        ("/api/auth/register", json!({ "name": 7, "email": "a@b.c", "password": "pw" })),
        ("/api/auth/login", json!({ "email": "a@b.c" })),
        ("/api/auth/login", json!({ "password": "pw" })),
        ("/api/auth/login", json!([])),
    ];

    for (uri, body) in cases {
        let (status, json) = post_json(&router, uri, body.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri} {body}");
        assert!(json["message"].is_string(), "{uri} {body}");
    }

    assert!(db.get_user_by_email("a@b.c").await.unwrap().is_none());
}

#[tokio::test]
async fn test_auth_body_without_json_content_type_is_bad_request() {
    let (_, router, _) = setup();

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .body(Body::from(r#"{"email":"a@b.c","password":"pw"}"#))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
