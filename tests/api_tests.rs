use moonlight_api::{
    AppConfig, AppState, InMemoryRepository, create_router,
    auth::hash_password,
    models::{NewsletterSubscriber, Service},
    repository::RepositoryState,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
    // Shares the same Arc the router holds, so tests can seed and inspect.
    pub state: AppState,
}

async fn spawn_app() -> TestApp {
    let repo = Arc::new(InMemoryRepository::new()) as RepositoryState;
    let config = AppConfig::default();

    let state = AppState { repo, config };
    let router = create_router(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp { address, state }
}

// Seeds an admin and returns its id for the x-admin-id dev header.
async fn seed_admin(app: &TestApp) -> Uuid {
    let hash = hash_password("integration-pass").unwrap();
    let admin = app
        .state
        .repo
        .create_admin("admin@moonlight.dev".to_string(), hash, "admin".to_string())
        .await
        .expect("failed to seed admin");
    admin.id
}

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let response = client
        .get(&format!("{}/health", app.address))
        .send()
        .await
        .expect("req fail");
    assert!(response.status().is_success());
}

#[tokio::test]
async fn test_openapi_json_served() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let response = client
        .get(&format!("{}/api-docs/openapi.json", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_login_then_bearer_token_unlocks_admin_routes() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    seed_admin(&app).await;

    // Without credentials the inbox is sealed.
    let resp = client
        .get(&format!("{}/contact", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    // Login
    let resp = client
        .post(&format!("{}/auth/login", app.address))
        .json(&serde_json::json!({
            "email": "admin@moonlight.dev", "password": "integration-pass"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    let token = body["token"].as_str().expect("token missing").to_string();

    // Same route with the token attached.
    let resp = client
        .get(&format!("{}/contact", app.address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_login_rejects_bad_password() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    seed_admin(&app).await;

    let resp = client
        .post(&format!("{}/auth/login", app.address))
        .json(&serde_json::json!({
            "email": "admin@moonlight.dev", "password": "nope"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Invalid email or password.");
}

#[tokio::test]
async fn test_contact_form_validation_shape() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(&format!("{}/contact", app.address))
        .json(&serde_json::json!({
            "name": "", "email": "bad-address", "message": ""
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    let errors = body["errors"].as_array().expect("errors array missing");
    assert_eq!(errors.len(), 3);
    // Every entry names the offending field and carries a message.
    for error in errors {
        assert!(error["field"].is_string());
        assert!(error["msg"].is_string());
    }
}

#[tokio::test]
async fn test_service_lifecycle() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let admin_id = seed_admin(&app).await;

    // Create (admin, via the local dev header)
    let resp = client
        .post(&format!("{}/services", app.address))
        .header("x-admin-id", admin_id.to_string())
        .json(&serde_json::json!({
            "title": "AI Website", "features": ["Landing page", "Chat widget"],
            "price": "$2500", "monthly_price": "$99/mo", "button_label": "Get Started",
            "show_on_main_page": true
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let created: Service = resp.json().await.unwrap();

    // Public listing sees it
    let resp = client
        .get(&format!("{}/services?main_page=true", app.address))
        .send()
        .await
        .unwrap();
    let listed: Vec<Service> = resp.json().await.unwrap();
    assert_eq!(listed.len(), 1);

    // Toggle visibility off
    let resp = client
        .patch(&format!("{}/services/{}/toggle", app.address, created.id))
        .header("x-admin-id", admin_id.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let toggled: Service = resp.json().await.unwrap();
    assert!(!toggled.show_on_main_page);

    // Public main-page listing no longer sees it
    let resp = client
        .get(&format!("{}/services?main_page=true", app.address))
        .send()
        .await
        .unwrap();
    let listed: Vec<Service> = resp.json().await.unwrap();
    assert!(listed.is_empty());

    // Delete
    let resp = client
        .delete(&format!("{}/services/{}", app.address, created.id))
        .header("x-admin-id", admin_id.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Service deleted.");
}

#[tokio::test]
async fn test_toggle_unknown_service_is_404() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let admin_id = seed_admin(&app).await;

    let resp = client
        .patch(&format!(
            "{}/services/{}/toggle-popular",
            app.address,
            Uuid::new_v4()
        ))
        .header("x-admin-id", admin_id.to_string())
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Service not found.");
}

#[tokio::test]
async fn test_newsletter_lifecycle() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let admin_id = seed_admin(&app).await;

    // Public subscribe on POST /newsletters
    let resp = client
        .post(&format!("{}/newsletters", app.address))
        .json(&serde_json::json!({ "email": "reader@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let subscriber: NewsletterSubscriber = resp.json().await.unwrap();

    // Duplicate subscribe conflicts
    let resp = client
        .post(&format!("{}/newsletters", app.address))
        .json(&serde_json::json!({ "email": "Reader@Example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);

    // Admin GET on the same path lists the one row
    let resp = client
        .get(&format!("{}/newsletters", app.address))
        .header("x-admin-id", admin_id.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let listed: Vec<NewsletterSubscriber> = resp.json().await.unwrap();
    assert_eq!(listed.len(), 1);

    // Single delete
    let resp = client
        .delete(&format!("{}/newsletters/{}", app.address, subscriber.id))
        .header("x-admin-id", admin_id.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Subscription deleted.");
}

#[tokio::test]
async fn test_bulk_delete_newsletters() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let admin_id = seed_admin(&app).await;

    let a = app
        .state
        .repo
        .subscribe("a@example.com".to_string())
        .await
        .unwrap();
    let b = app
        .state
        .repo
        .subscribe("b@example.com".to_string())
        .await
        .unwrap();
    app.state
        .repo
        .subscribe("keep@example.com".to_string())
        .await
        .unwrap();

    // Bulk DELETE with an id list body on the collection path
    let resp = client
        .delete(&format!("{}/newsletters", app.address))
        .header("x-admin-id", admin_id.to_string())
        .json(&serde_json::json!({ "ids": [a.id, b.id] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "2 subscription(s) deleted.");

    assert_eq!(app.state.repo.list_subscribers(None).await.len(), 1);
}

#[tokio::test]
async fn test_admin_stats_requires_auth() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(&format!("{}/admin/stats", app.address))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
}
