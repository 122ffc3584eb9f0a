use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Modules ---

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod validation;

// Routing is split by audience: the marketing site vs. the admin console.
pub mod routes;
use auth::AuthUser;
use routes::{admin, public};

// --- Re-exports ---

// Everything main.rs (and the integration tests) needs to stand up the app.
pub use config::AppConfig;
pub use repository::{InMemoryRepository, PostgresRepository, RepositoryState};

/// ApiDoc
///
/// Collects every annotated handler and schema into one OpenAPI document.
/// Handlers opt in via `#[utoipa::path]`, payload and response types via
/// `#[derive(ToSchema)]`; anything not listed here is invisible to Swagger.
/// Served as JSON at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health, handlers::login, handlers::get_services,
        handlers::submit_contact, handlers::submit_consultation, handlers::subscribe_newsletter,
        handlers::create_service, handlers::update_service, handlers::delete_service,
        handlers::toggle_service_visibility, handlers::toggle_service_popular,
        handlers::get_contact_messages, handlers::toggle_contact_seen,
        handlers::delete_contact_message, handlers::get_consultation_requests,
        handlers::toggle_consultation_seen, handlers::delete_consultation_request,
        handlers::get_subscribers, handlers::delete_subscriber,
        handlers::bulk_delete_subscribers, handlers::get_admin_stats
    ),
    components(
        schemas(
            models::Service, models::ServiceRequest, models::ContactMessage,
            models::CreateContactRequest, models::ConsultationRequest,
            models::CreateConsultationRequest, models::NewsletterSubscriber,
            models::SubscribeRequest, models::BulkDeleteRequest, models::LoginRequest,
            models::LoginResponse, models::MessageResponse, models::FieldError,
            models::ValidationErrorResponse, models::AdminStats, models::HealthResponse,
        )
    ),
    tags(
        (name = "moonlight", description = "MoonLight marketing site API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The one shared state value cloned into every request: the repository
/// trait object plus the loaded configuration. Both halves are cheap to
/// clone (an `Arc` and a small struct) and never mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub repo: RepositoryState,
    pub config: AppConfig,
}

// FromRef lets an extractor ask for just the slice of state it needs,
// so handlers can take `State<RepositoryState>` instead of the whole bundle.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Gate for the console routes. The work all happens in the `AuthUser`
/// extractor argument: running it here means a bad or missing token is
/// turned into a 401 before any admin handler executes. On success the
/// request simply continues; per-role checks stay inside the handlers.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Builds the full service: swagger, public site endpoints, the guarded
/// console endpoints, then the outer observability and CORS layers.
pub fn create_router(state: AppState) -> Router {
    // The site and the console are served from their own origins, so the API
    // stays permissive and relies on bearer auth instead of origin checks.
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        // Interactive API docs.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Marketing site endpoints, reachable without credentials.
        .merge(public::public_routes())
        // Console endpoints behind `auth_middleware`. A few paths carry both
        // a public and a protected method (POST vs GET `/newsletters` for
        // instance); merging method routers keeps the layer scoped to the
        // admin methods only, leaving the public sibling untouched.
        .merge(
            admin::admin_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        )
        .with_state(state);

    // Outermost layers: correlation id in, traced span around the request,
    // correlation id back out on the response.
    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// Span factory for `TraceLayer`. Picks up the id that `SetRequestIdLayer`
/// stamped on the request so every log line emitted while handling it can
/// be tied back to one `req_id`.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
