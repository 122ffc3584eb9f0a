use axum::{
    extract::FromRequestParts,
    http::{Method, Request, StatusCode, Uri, header, request::Parts},
};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use moonlight_api::{
    AppState,
    auth::{AuthUser, Claims, hash_password},
    config::{AppConfig, Env},
    models::AdminUser,
    repository::{InMemoryRepository, RepositoryState},
};
use std::sync::Arc;
use uuid::Uuid;

// --- Helper Functions ---

const TEST_JWT_SECRET: &str = "moonlight-signing-secret-for-tests";

fn create_token(admin_id: Uuid, role: &str, secret: &str, exp_offset: i64) -> String {
    let now = Utc::now().timestamp();

    let claims = Claims {
        sub: admin_id,
        role: role.to_string(),
        iat: now as usize,
        // Negative offsets produce an already-expired token.
        exp: (now + exp_offset) as usize,
    };

    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &claims, &key).unwrap()
}

fn create_app_state(env: Env, repo: RepositoryState) -> AppState {
    let mut config = AppConfig::default();
    config.env = env;
    config.jwt_secret = TEST_JWT_SECRET.to_string();

    AppState { repo, config }
}

// Seeds an admin row and returns it, so tests can mint tokens for a real id.
async fn seed_admin(repo: &RepositoryState, role: &str) -> AdminUser {
    let password_hash = hash_password("irrelevant").unwrap();
    repo.create_admin(
        format!("{}@moonlight.dev", role),
        password_hash,
        role.to_string(),
    )
    .await
    .unwrap()
}

/// Builds the request Parts the extractor is fed in each test
fn get_request_parts(method: Method, uri: Uri) -> Parts {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let (parts, _) = request.into_parts();
    parts
}

// --- Tests ---

#[tokio::test]
async fn test_auth_success_with_valid_jwt() {
    let repo: RepositoryState = Arc::new(InMemoryRepository::new());
    let admin = seed_admin(&repo, "admin").await;
    let token = create_token(admin.id, "admin", TEST_JWT_SECRET, 3600);

    let app_state = create_app_state(Env::Production, repo);

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(auth_user.is_ok());
    let user = auth_user.unwrap();
    assert_eq!(user.id, admin.id);
    assert_eq!(user.role, "admin");
    assert!(user.is_admin());
}

#[tokio::test]
async fn test_auth_failure_with_missing_header() {
    let repo: RepositoryState = Arc::new(InMemoryRepository::new());
    let app_state = create_app_state(Env::Production, repo);

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(auth_user.is_err());
    assert_eq!(auth_user.unwrap_err(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_failure_with_non_bearer_scheme() {
    let repo: RepositoryState = Arc::new(InMemoryRepository::new());
    let admin = seed_admin(&repo, "admin").await;
    let token = create_token(admin.id, "admin", TEST_JWT_SECRET, 3600);

    let app_state = create_app_state(Env::Production, repo);

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Basic {}", token)).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(auth_user.is_err());
    assert_eq!(auth_user.unwrap_err(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_failure_with_wrong_secret() {
    let repo: RepositoryState = Arc::new(InMemoryRepository::new());
    let admin = seed_admin(&repo, "admin").await;
    // Signed with a key the server does not hold.
    let token = create_token(admin.id, "admin", "some-other-secret-entirely", 3600);

    let app_state = create_app_state(Env::Production, repo);

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(auth_user.is_err());
    assert_eq!(auth_user.unwrap_err(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_failure_with_expired_jwt() {
    let repo: RepositoryState = Arc::new(InMemoryRepository::new());
    let admin = seed_admin(&repo, "admin").await;
    // Expired well past the decoder's default 60s leeway.
    let token = create_token(admin.id, "admin", TEST_JWT_SECRET, -3600);

    let app_state = create_app_state(Env::Production, repo);

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(auth_user.is_err());
    assert_eq!(auth_user.unwrap_err(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_failure_for_deleted_account() {
    let repo: RepositoryState = Arc::new(InMemoryRepository::new());
    // A structurally valid token whose subject has no row in admin_users.
    let token = create_token(Uuid::new_v4(), "admin", TEST_JWT_SECRET, 3600);

    let app_state = create_app_state(Env::Production, repo);

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(auth_user.is_err());
    assert_eq!(auth_user.unwrap_err(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_role_comes_from_database_not_claim() {
    let repo: RepositoryState = Arc::new(InMemoryRepository::new());
    let admin = seed_admin(&repo, "admin").await;
    // The claim says superadmin, the row says admin. The row wins.
    let token = create_token(admin.id, "superadmin", TEST_JWT_SECRET, 3600);

    let app_state = create_app_state(Env::Production, repo);

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(auth_user.is_ok());
    assert_eq!(auth_user.unwrap().role, "admin");
}

#[tokio::test]
async fn test_local_bypass_success() {
    let repo: RepositoryState = Arc::new(InMemoryRepository::new());
    let admin = seed_admin(&repo, "superadmin").await;

    let app_state = create_app_state(Env::Local, repo);

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::HeaderName::from_static("x-admin-id"),
        header::HeaderValue::from_str(&admin.id.to_string()).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(auth_user.is_ok());
    let user = auth_user.unwrap();
    assert_eq!(user.id, admin.id);
    assert_eq!(user.role, "superadmin");
}

#[tokio::test]
async fn test_local_bypass_disabled_in_prod() {
    let repo: RepositoryState = Arc::new(InMemoryRepository::new());
    let admin = seed_admin(&repo, "admin").await;

    let app_state = create_app_state(Env::Production, repo);

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    // The bypass header alone, no Authorization at all.
    parts.headers.insert(
        header::HeaderName::from_static("x-admin-id"),
        header::HeaderValue::from_str(&admin.id.to_string()).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(auth_user.is_err());
    assert_eq!(auth_user.unwrap_err(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_local_bypass_requires_existing_account() {
    let repo: RepositoryState = Arc::new(InMemoryRepository::new());

    let app_state = create_app_state(Env::Local, repo);

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    // Syntactically fine UUID, but no such admin row exists.
    parts.headers.insert(
        header::HeaderName::from_static("x-admin-id"),
        header::HeaderValue::from_str(&Uuid::new_v4().to_string()).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(auth_user.is_err());
    assert_eq!(auth_user.unwrap_err(), StatusCode::UNAUTHORIZED);
}
