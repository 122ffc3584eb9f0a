use crate::{
    AppState,
    auth::{self, AuthUser},
    error::ApiError,
    models::{
        AdminStats, BulkDeleteRequest, ConsultationRequest, ContactMessage,
        CreateConsultationRequest, CreateContactRequest, FieldError, HealthResponse, LoginRequest,
        LoginResponse, MessageResponse, NewsletterSubscriber, Service, ServiceRequest,
        SubscribeRequest, ValidationErrorResponse,
    },
    validation,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

// --- Filter Structs ---

/// ServiceFilter
///
/// Query parameters accepted by GET /services, bound through Axum's Query
/// extractor. Both the public pricing section and the console's searchable
/// table go through this one endpoint.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct ServiceFilter {
    /// Optional case-insensitive substring matched against the title or any feature.
    pub search: Option<String>,
    /// When true, only services flagged for the public pricing section are returned.
    pub main_page: Option<bool>,
}

/// InboxFilter
///
/// Shared query parameters for the admin inbox listings (contact messages,
/// consultation requests, newsletter subscribers).
#[derive(Deserialize, utoipa::IntoParams)]
pub struct InboxFilter {
    /// Optional case-insensitive substring over the record's identifying fields.
    pub search: Option<String>,
}

// --- Helpers ---

/// Runs a validation routine and converts a non-empty result into the 400 response.
fn check<T>(payload: &T, validate: fn(&T) -> Vec<FieldError>) -> Result<(), ApiError> {
    let errors = validate(payload);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

// --- Public Handlers ---

/// health
///
/// [Public Route] Liveness probe for container orchestration and uptime checks.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// login
///
/// [Public Route] Verifies admin credentials and issues the signed JWT the
/// console stores for subsequent requests.
///
/// *Security*: Unknown email and wrong password produce the identical 401 body,
/// so the endpoint cannot be used to probe which admin accounts exist.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 400, description = "Missing fields", body = ValidationErrorResponse),
        (status = 401, description = "Bad credentials", body = MessageResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    check(&payload, validation::validate_login)?;

    let admin = state
        .repo
        .get_admin_by_email(payload.email.trim().to_lowercase())
        .await
        .ok_or(ApiError::InvalidCredentials)?;

    if !auth::verify_password(&payload.password, &admin.password_hash) {
        return Err(ApiError::InvalidCredentials);
    }

    let token = auth::issue_token(&state.config, &admin).map_err(ApiError::Internal)?;
    Ok(Json(LoginResponse { token }))
}

/// get_services
///
/// [Public Route] Lists services in insertion order, optionally filtered.
/// The same endpoint backs the public pricing section (`main_page=true`) and
/// the console's service manager (unfiltered or substring search).
#[utoipa::path(
    get,
    path = "/services",
    params(ServiceFilter),
    responses((status = 200, description = "List filtered services", body = [Service]))
)]
pub async fn get_services(
    State(state): State<AppState>,
    Query(filter): Query<ServiceFilter>,
) -> Json<Vec<Service>> {
    let services = state
        .repo
        .list_services(filter.search, filter.main_page.unwrap_or(false))
        .await;
    Json(services)
}

/// submit_contact
///
/// [Public Route] Accepts a contact form submission after server-side
/// validation. A failed check rejects the whole payload with one entry per
/// offending field and stores nothing.
#[utoipa::path(
    post,
    path = "/contact",
    request_body = CreateContactRequest,
    responses(
        (status = 201, description = "Message stored", body = ContactMessage),
        (status = 400, description = "Validation failed", body = ValidationErrorResponse)
    )
)]
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(payload): Json<CreateContactRequest>,
) -> Result<(StatusCode, Json<ContactMessage>), ApiError> {
    check(&payload, validation::validate_contact)?;

    let message = state
        .repo
        .create_contact(payload)
        .await
        .ok_or_else(|| ApiError::Internal("failed to store contact message".to_string()))?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// submit_consultation
///
/// [Public Route] Accepts a consultation request. The free-text
/// `other_project_type` is kept only when the catalogue choice is "Other";
/// any stale value from a previous selection is discarded.
#[utoipa::path(
    post,
    path = "/consultations",
    request_body = CreateConsultationRequest,
    responses(
        (status = 201, description = "Request stored", body = ConsultationRequest),
        (status = 400, description = "Validation failed", body = ValidationErrorResponse)
    )
)]
pub async fn submit_consultation(
    State(state): State<AppState>,
    Json(mut payload): Json<CreateConsultationRequest>,
) -> Result<(StatusCode, Json<ConsultationRequest>), ApiError> {
    check(&payload, validation::validate_consultation)?;

    if payload.project_type.trim() != "Other" {
        payload.other_project_type = None;
    }

    let consultation = state
        .repo
        .create_consultation(payload)
        .await
        .ok_or_else(|| ApiError::Internal("failed to store consultation request".to_string()))?;
    Ok((StatusCode::CREATED, Json(consultation)))
}

/// subscribe_newsletter
///
/// [Public Route] Adds an email to the newsletter list. Addresses are stored
/// trimmed and lowercased; re-subscribing an existing address answers 409
/// without creating a second row.
#[utoipa::path(
    post,
    path = "/newsletters",
    request_body = SubscribeRequest,
    responses(
        (status = 201, description = "Subscribed", body = NewsletterSubscriber),
        (status = 400, description = "Validation failed", body = ValidationErrorResponse),
        (status = 409, description = "Already subscribed", body = MessageResponse)
    )
)]
pub async fn subscribe_newsletter(
    State(state): State<AppState>,
    Json(payload): Json<SubscribeRequest>,
) -> Result<(StatusCode, Json<NewsletterSubscriber>), ApiError> {
    check(&payload, validation::validate_subscription)?;

    let email = payload.email.trim().to_lowercase();
    match state.repo.subscribe(email).await {
        Some(subscriber) => Ok((StatusCode::CREATED, Json(subscriber))),
        None => Err(ApiError::Conflict(
            "This email is already subscribed.".to_string(),
        )),
    }
}

// --- Admin Handlers (Services) ---

/// create_service
///
/// [Admin Route] Creates a service offering. Features are normalized before
/// storage: every entry trimmed, empty lines dropped.
#[utoipa::path(
    post,
    path = "/services",
    request_body = ServiceRequest,
    responses(
        (status = 201, description = "Created", body = Service),
        (status = 400, description = "Validation failed", body = ValidationErrorResponse),
        (status = 403, description = "Not an admin", body = MessageResponse)
    )
)]
pub async fn create_service(
    admin: AuthUser,
    State(state): State<AppState>,
    Json(mut payload): Json<ServiceRequest>,
) -> Result<(StatusCode, Json<Service>), ApiError> {
    if !admin.is_admin() {
        return Err(ApiError::Forbidden);
    }
    check(&payload, validation::validate_service)?;
    payload.features = validation::normalize_features(&payload.features);

    let service = state
        .repo
        .create_service(payload)
        .await
        .ok_or_else(|| ApiError::Internal("failed to store service".to_string()))?;
    Ok((StatusCode::CREATED, Json(service)))
}

/// update_service
///
/// [Admin Route] Full-record replace of an existing service. The console
/// submits the complete form, so there is no partial-update path.
#[utoipa::path(
    put,
    path = "/services/{id}",
    params(("id" = Uuid, Path, description = "Service ID")),
    request_body = ServiceRequest,
    responses(
        (status = 200, description = "Updated", body = Service),
        (status = 400, description = "Validation failed", body = ValidationErrorResponse),
        (status = 404, description = "Unknown service", body = MessageResponse)
    )
)]
pub async fn update_service(
    admin: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(mut payload): Json<ServiceRequest>,
) -> Result<Json<Service>, ApiError> {
    if !admin.is_admin() {
        return Err(ApiError::Forbidden);
    }
    check(&payload, validation::validate_service)?;
    payload.features = validation::normalize_features(&payload.features);

    match state.repo.update_service(id, payload).await {
        Some(service) => Ok(Json(service)),
        None => Err(ApiError::NotFound("Service")),
    }
}

/// delete_service
///
/// [Admin Route] Removes a service from the catalogue.
#[utoipa::path(
    delete,
    path = "/services/{id}",
    params(("id" = Uuid, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Unknown service", body = MessageResponse)
    )
)]
pub async fn delete_service(
    admin: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !admin.is_admin() {
        return Err(ApiError::Forbidden);
    }
    if state.repo.delete_service(id).await {
        Ok(Json(MessageResponse {
            message: "Service deleted.".to_string(),
        }))
    } else {
        Err(ApiError::NotFound("Service"))
    }
}

/// toggle_service_visibility
///
/// [Admin Route] Flips `show_on_main_page` and returns the updated record so
/// the console can swap exactly that row in place.
#[utoipa::path(
    patch,
    path = "/services/{id}/toggle",
    params(("id" = Uuid, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Toggled", body = Service),
        (status = 404, description = "Unknown service", body = MessageResponse)
    )
)]
pub async fn toggle_service_visibility(
    admin: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Service>, ApiError> {
    if !admin.is_admin() {
        return Err(ApiError::Forbidden);
    }
    match state.repo.toggle_service_visibility(id).await {
        Some(service) => Ok(Json(service)),
        None => Err(ApiError::NotFound("Service")),
    }
}

/// toggle_service_popular
///
/// [Admin Route] Flips the `popular` highlight and returns the updated record.
#[utoipa::path(
    patch,
    path = "/services/{id}/toggle-popular",
    params(("id" = Uuid, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Toggled", body = Service),
        (status = 404, description = "Unknown service", body = MessageResponse)
    )
)]
pub async fn toggle_service_popular(
    admin: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Service>, ApiError> {
    if !admin.is_admin() {
        return Err(ApiError::Forbidden);
    }
    match state.repo.toggle_service_popular(id).await {
        Some(service) => Ok(Json(service)),
        None => Err(ApiError::NotFound("Service")),
    }
}

// --- Admin Handlers (Contact Messages) ---

/// get_contact_messages
///
/// [Admin Route] Contact inbox, newest first.
#[utoipa::path(
    get,
    path = "/contact",
    params(InboxFilter),
    responses((status = 200, description = "All messages", body = [ContactMessage]))
)]
pub async fn get_contact_messages(
    admin: AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<InboxFilter>,
) -> Result<Json<Vec<ContactMessage>>, ApiError> {
    if !admin.is_admin() {
        return Err(ApiError::Forbidden);
    }
    Ok(Json(state.repo.list_contacts(filter.search).await))
}

/// toggle_contact_seen
///
/// [Admin Route] Flips the read/unread marker on one message and returns the
/// updated record; no other row is touched.
#[utoipa::path(
    patch,
    path = "/contact/{id}/toggle-seen",
    params(("id" = Uuid, Path, description = "Message ID")),
    responses(
        (status = 200, description = "Toggled", body = ContactMessage),
        (status = 404, description = "Unknown message", body = MessageResponse)
    )
)]
pub async fn toggle_contact_seen(
    admin: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ContactMessage>, ApiError> {
    if !admin.is_admin() {
        return Err(ApiError::Forbidden);
    }
    match state.repo.toggle_contact_seen(id).await {
        Some(message) => Ok(Json(message)),
        None => Err(ApiError::NotFound("Message")),
    }
}

/// delete_contact_message
///
/// [Admin Route] Removes a contact message from the inbox.
#[utoipa::path(
    delete,
    path = "/contact/{id}",
    params(("id" = Uuid, Path, description = "Message ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Unknown message", body = MessageResponse)
    )
)]
pub async fn delete_contact_message(
    admin: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !admin.is_admin() {
        return Err(ApiError::Forbidden);
    }
    if state.repo.delete_contact(id).await {
        Ok(Json(MessageResponse {
            message: "Message deleted.".to_string(),
        }))
    } else {
        Err(ApiError::NotFound("Message"))
    }
}

// --- Admin Handlers (Consultation Requests) ---

/// get_consultation_requests
///
/// [Admin Route] Consultation inbox, newest first.
#[utoipa::path(
    get,
    path = "/consultations",
    params(InboxFilter),
    responses((status = 200, description = "All requests", body = [ConsultationRequest]))
)]
pub async fn get_consultation_requests(
    admin: AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<InboxFilter>,
) -> Result<Json<Vec<ConsultationRequest>>, ApiError> {
    if !admin.is_admin() {
        return Err(ApiError::Forbidden);
    }
    Ok(Json(state.repo.list_consultations(filter.search).await))
}

/// toggle_consultation_seen
///
/// [Admin Route] Flips the read/unread marker on one request and returns the
/// updated record.
#[utoipa::path(
    patch,
    path = "/consultations/{id}/toggle-seen",
    params(("id" = Uuid, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Toggled", body = ConsultationRequest),
        (status = 404, description = "Unknown request", body = MessageResponse)
    )
)]
pub async fn toggle_consultation_seen(
    admin: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ConsultationRequest>, ApiError> {
    if !admin.is_admin() {
        return Err(ApiError::Forbidden);
    }
    match state.repo.toggle_consultation_seen(id).await {
        Some(consultation) => Ok(Json(consultation)),
        None => Err(ApiError::NotFound("Consultation")),
    }
}

/// delete_consultation_request
///
/// [Admin Route] Removes a consultation request from the inbox.
#[utoipa::path(
    delete,
    path = "/consultations/{id}",
    params(("id" = Uuid, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Unknown request", body = MessageResponse)
    )
)]
pub async fn delete_consultation_request(
    admin: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !admin.is_admin() {
        return Err(ApiError::Forbidden);
    }
    if state.repo.delete_consultation(id).await {
        Ok(Json(MessageResponse {
            message: "Consultation deleted.".to_string(),
        }))
    } else {
        Err(ApiError::NotFound("Consultation"))
    }
}

// --- Admin Handlers (Newsletter Subscribers) ---

/// get_subscribers
///
/// [Admin Route] Newsletter list, newest first.
#[utoipa::path(
    get,
    path = "/newsletters",
    params(InboxFilter),
    responses((status = 200, description = "All subscribers", body = [NewsletterSubscriber]))
)]
pub async fn get_subscribers(
    admin: AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<InboxFilter>,
) -> Result<Json<Vec<NewsletterSubscriber>>, ApiError> {
    if !admin.is_admin() {
        return Err(ApiError::Forbidden);
    }
    Ok(Json(state.repo.list_subscribers(filter.search).await))
}

/// delete_subscriber
///
/// [Admin Route] Removes a single subscription.
#[utoipa::path(
    delete,
    path = "/newsletters/{id}",
    params(("id" = Uuid, Path, description = "Subscriber ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Unknown subscriber", body = MessageResponse)
    )
)]
pub async fn delete_subscriber(
    admin: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !admin.is_admin() {
        return Err(ApiError::Forbidden);
    }
    if state.repo.delete_subscriber(id).await {
        Ok(Json(MessageResponse {
            message: "Subscription deleted.".to_string(),
        }))
    } else {
        Err(ApiError::NotFound("Subscription"))
    }
}

/// bulk_delete_subscribers
///
/// [Admin Route] Removes every subscription in the id list and reports how
/// many rows went away. Ids that no longer exist are simply skipped, so a
/// stale selection does not fail the whole batch.
#[utoipa::path(
    delete,
    path = "/newsletters",
    request_body = BulkDeleteRequest,
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 400, description = "Empty selection", body = ValidationErrorResponse)
    )
)]
pub async fn bulk_delete_subscribers(
    admin: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<BulkDeleteRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !admin.is_admin() {
        return Err(ApiError::Forbidden);
    }
    if payload.ids.is_empty() {
        return Err(ApiError::Validation(vec![FieldError::new(
            "ids",
            "No subscriptions selected.",
        )]));
    }

    let deleted = state.repo.delete_subscribers(payload.ids).await;
    Ok(Json(MessageResponse {
        message: format!("{} subscription(s) deleted.", deleted),
    }))
}

// --- Admin Handlers (Dashboard) ---

/// get_admin_stats
///
/// [Admin Route] The dashboard's headline numbers: catalogue size, inbox
/// totals with their unseen counts, and the subscriber count.
#[utoipa::path(
    get,
    path = "/admin/stats",
    responses((status = 200, description = "Stats", body = AdminStats))
)]
pub async fn get_admin_stats(
    admin: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<AdminStats>, ApiError> {
    if !admin.is_admin() {
        return Err(ApiError::Forbidden);
    }
    Ok(Json(state.repo.get_stats().await))
}
