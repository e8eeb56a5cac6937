mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{create_test_account, generate_unique_email};
use http_body_util::BodyExt;
use lacampina_api::config::cors::CorsConfig;
use lacampina_api::config::jwt::JwtConfig;
use lacampina_api::modules::profiles::model::{Profile, UserRole};
use lacampina_api::router::init_router;
use lacampina_api::state::AppState;
use lacampina_api::utils::jwt::create_refresh_token;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        access_token_expiry: 3600,
        refresh_token_expiry: 604800,
    }
}

fn setup_test_app(pool: PgPool) -> axum::Router {
    let state = AppState {
        db: pool,
        jwt_config: test_jwt_config(),
        cors_config: CorsConfig::from_env(),
    };
    init_router(state)
}

fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_success(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let email = generate_unique_email();

    let response = app
        .oneshot(json_request(
            "/api/auth/register",
            json!({
                "email": email,
                "password": "Str0ng!pw",
                "password_confirm": "Str0ng!pw",
                "first_name": "Ana",
                "last_name": "Ruiz"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    assert_eq!(body["email"], email);
    assert_eq!(body["first_name"], "Ana");
    assert_eq!(body["last_name"], "Ruiz");
    assert_eq!(body["role"], "student");
    assert!(body.get("password").is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_duplicate_email_conflict(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let email = generate_unique_email();
    let payload = json!({
        "email": email,
        "password": "Str0ng!pw",
        "password_confirm": "Str0ng!pw",
        "first_name": "Ana",
        "last_name": "Ruiz"
    });

    let first = app
        .clone()
        .oneshot(json_request("/api/auth/register", payload.clone()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .oneshot(json_request("/api/auth/register", payload))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);

    // Exactly one account/profile pair survives.
    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&pool)
        .await
        .unwrap();
    let profiles: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles WHERE email = $1")
        .bind(&email)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(users, 1);
    assert_eq!(profiles, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_password_mismatch(pool: PgPool) {
    let app = setup_test_app(pool.clone());

    let response = app
        .oneshot(json_request(
            "/api/auth/register",
            json!({
                "email": generate_unique_email(),
                "password": "Str0ng!pw",
                "password_confirm": "different1",
                "first_name": "Ana",
                "last_name": "Ruiz"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response_json(response).await;
    assert!(body["fields"]["password_confirm"].is_array());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_missing_field(pool: PgPool) {
    let app = setup_test_app(pool.clone());

    let response = app
        .oneshot(json_request(
            "/api/auth/register",
            json!({
                "email": generate_unique_email(),
                "password": "Str0ng!pw"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_leaves_no_partial_state_on_failure(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let email = generate_unique_email();

    // Short password fails validation before anything is persisted.
    let response = app
        .oneshot(json_request(
            "/api/auth/register",
            json!({
                "email": email,
                "password": "short",
                "password_confirm": "short",
                "first_name": "Ana",
                "last_name": "Ruiz"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(users, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_success(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let email = generate_unique_email();
    let password = "testpass123";
    create_test_account(&mut tx, &email, password, "student", true).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone());

    let response = app
        .oneshot(json_request(
            "/api/auth/login",
            json!({ "email": email, "password": password }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert!(body.get("access").is_some());
    assert!(body.get("refresh").is_some());
    assert_eq!(body["user"]["email"], email);
    assert_eq!(body["user"]["role"], "student");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_accepts_identifier_key(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let email = generate_unique_email();
    create_test_account(&mut tx, &email, "testpass123", "teacher", true).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone());

    let response = app
        .oneshot(json_request(
            "/api/auth/login",
            json!({ "identifier": email, "password": "testpass123" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let email = generate_unique_email();
    create_test_account(&mut tx, &email, "correctpass", "student", true).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone());

    let response = app
        .oneshot(json_request(
            "/api/auth/login",
            json!({ "email": email, "password": "wrongpassword" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_unknown_email(pool: PgPool) {
    let app = setup_test_app(pool.clone());

    let response = app
        .oneshot(json_request(
            "/api/auth/login",
            json!({ "email": "nonexistent@test.com", "password": "whatever1" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_inactive_account(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let email = generate_unique_email();
    let password = "testpass123";
    create_test_account(&mut tx, &email, password, "student", false).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone());

    let response = app
        .oneshot(json_request(
            "/api/auth/login",
            json!({ "email": email, "password": password }),
        ))
        .await
        .unwrap();

    // Same response as a wrong password: nothing reveals the account state.
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Invalid email or password");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_flow(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let email = generate_unique_email();
    let password = "testpass123";
    create_test_account(&mut tx, &email, password, "student", true).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone());

    let login = app
        .clone()
        .oneshot(json_request(
            "/api/auth/login",
            json!({ "email": email, "password": password }),
        ))
        .await
        .unwrap();
    let tokens = response_json(login).await;
    let refresh = tokens["refresh"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request("/api/auth/refresh", json!({ "refresh": refresh })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let access = body["access"].as_str().unwrap();

    // The fresh access token works as a bearer credential.
    let profile = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/auth/profile")
                .header("authorization", format!("Bearer {}", access))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(profile.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_rejects_access_token(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let email = generate_unique_email();
    let password = "testpass123";
    create_test_account(&mut tx, &email, password, "student", true).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone());

    let login = app
        .clone()
        .oneshot(json_request(
            "/api/auth/login",
            json!({ "email": email, "password": password }),
        ))
        .await
        .unwrap();
    let tokens = response_json(login).await;
    let access = tokens["access"].as_str().unwrap().to_string();

    let response = app
        .oneshot(json_request("/api/auth/refresh", json!({ "refresh": access })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_expired_token_fails_closed(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let email = generate_unique_email();
    let account = create_test_account(&mut tx, &email, "testpass123", "student", true).await;
    tx.commit().await.unwrap();

    // Mint a refresh token that expired well past the decoder's leeway.
    let expired_config = JwtConfig {
        refresh_token_expiry: -300,
        ..test_jwt_config()
    };
    let profile = Profile {
        id: account.profile_id,
        user_id: account.user_id,
        email: email.clone(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        role: UserRole::Student,
        phone: None,
        avatar_url: None,
        is_active: true,
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    };
    let expired = create_refresh_token(&profile, &expired_config).unwrap();

    let app = setup_test_app(pool.clone());
    let response = app
        .oneshot(json_request("/api/auth/refresh", json!({ "refresh": expired })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_deactivated_account_fails_closed(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let email = generate_unique_email();
    let password = "testpass123";
    let account = create_test_account(&mut tx, &email, password, "student", true).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone());

    let login = app
        .clone()
        .oneshot(json_request(
            "/api/auth/login",
            json!({ "email": email, "password": password }),
        ))
        .await
        .unwrap();
    let tokens = response_json(login).await;
    let refresh = tokens["refresh"].as_str().unwrap().to_string();

    // Soft-deactivate between issuance and exchange.
    sqlx::query("UPDATE users SET is_active = false WHERE id = $1")
        .bind(account.user_id)
        .execute(&pool)
        .await
        .unwrap();

    let response = app
        .oneshot(json_request("/api/auth/refresh", json!({ "refresh": refresh })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_garbage_token(pool: PgPool) {
    let app = setup_test_app(pool.clone());

    let response = app
        .oneshot(json_request(
            "/api/auth/refresh",
            json!({ "refresh": "not.a.token" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_then_login_then_get_profile(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let email = "a@x.com";

    let register = app
        .clone()
        .oneshot(json_request(
            "/api/auth/register",
            json!({
                "email": email,
                "password": "Str0ng!pw",
                "password_confirm": "Str0ng!pw",
                "first_name": "Ana",
                "last_name": "Ruiz"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(register.status(), StatusCode::CREATED);
    let registered = response_json(register).await;
    assert_eq!(registered["role"], "student");

    let login = app
        .clone()
        .oneshot(json_request(
            "/api/auth/login",
            json!({ "email": email, "password": "Str0ng!pw" }),
        ))
        .await
        .unwrap();
    assert_eq!(login.status(), StatusCode::OK);
    let tokens = response_json(login).await;
    let access = tokens["access"].as_str().unwrap();

    let profile = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/auth/profile")
                .header("authorization", format!("Bearer {}", access))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(profile.status(), StatusCode::OK);
    let body = response_json(profile).await;
    assert_eq!(body["email"], email);
    assert_eq!(body["first_name"], "Ana");
    assert_eq!(body["last_name"], "Ruiz");
    assert_eq!(Uuid::parse_str(body["user_id"].as_str().unwrap()).is_ok(), true);
}
