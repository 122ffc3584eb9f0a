use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Core Application Schemas (Mapped to Database) ---

/// Service
///
/// Represents a purchasable service offering from the `public.services` table.
/// These records drive both the public pricing section and the admin console's
/// service manager.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Service {
    pub id: Uuid,
    pub title: String,
    // Ordered bullet points rendered on the pricing card (TEXT[] column).
    pub features: Vec<String>,
    // Free-text price labels (e.g., "$5000"); formatting is a client concern.
    pub price: String,
    pub monthly_price: String,
    // Call-to-action label on the card.
    pub button_label: String,

    // Display flags the console toggles without editing the card.
    // Highlights the card as the recommended tier.
    pub popular: bool,
    // Controls whether the service appears on the public pricing section.
    pub show_on_main_page: bool,

    // TS sees ISO strings; serde and sqlx handle the DateTime conversion.
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// ContactMessage
///
/// A submission from the public contact form, stored in `public.contact_messages`.
/// Staff review these in the admin inbox and flip `seen` as they work through them.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    // Read/unread marker toggled from the admin inbox.
    pub seen: bool,
    #[ts(type = "string")]
    pub received_at: DateTime<Utc>,
}

/// ConsultationRequest
///
/// A submission from the public consultation form, stored in
/// `public.consultation_requests`. Richer than a contact message: it captures
/// the project the lead has in mind.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct ConsultationRequest {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    // One of the catalogue names in `validation::PROJECT_TYPES`.
    pub project_type: String,
    // Free-text alternative, present only when `project_type` is "Other".
    pub other_project_type: Option<String>,
    pub timeline: String,
    pub description: Option<String>,
    pub seen: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// NewsletterSubscriber
///
/// A single opted-in email from the site footer, stored in
/// `public.newsletter_subscribers`. Emails are trimmed and lowercased before
/// storage; a unique index enforces one row per address.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct NewsletterSubscriber {
    pub id: Uuid,
    pub email: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// AdminUser
///
/// Raw Database Row (Internal Use). Maps to the `public.admin_users` table and
/// never crosses the API boundary; the password hash is excluded from
/// serialization as a second line of protection.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct AdminUser {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    // The RBAC field: 'admin' or 'superadmin'.
    pub role: String,
    pub created_at: DateTime<Utc>,
}

// --- Request Payloads (Input Schemas) ---

/// LoginRequest
///
/// Input payload for the admin login endpoint (POST /auth/login).
/// The password is verified against the stored Argon2 hash and never logged.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// ServiceRequest
///
/// Input payload for creating (POST /services) or replacing (PUT /services/{id})
/// a service. The console submits the complete form either way, so updates are
/// full-record replaces rather than partial patches.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ServiceRequest {
    pub title: String,
    // Normalized before storage: every entry trimmed, empties dropped.
    pub features: Vec<String>,
    pub price: String,
    pub monthly_price: String,
    pub button_label: String,
    #[serde(default)]
    pub popular: bool,
    #[serde(default)]
    pub show_on_main_page: bool,
}

/// CreateContactRequest
///
/// Input payload for the public contact form (POST /contact).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// CreateConsultationRequest
///
/// Input payload for the public consultation form (POST /consultations).
/// `other_project_type` is required when `project_type` is "Other" and is
/// discarded otherwise.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateConsultationRequest {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    pub project_type: String,
    #[serde(default)]
    pub other_project_type: Option<String>,
    pub timeline: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// SubscribeRequest
///
/// Input payload for the footer newsletter form (POST /newsletters).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SubscribeRequest {
    pub email: String,
}

/// BulkDeleteRequest
///
/// Input payload for the bulk subscriber deletion endpoint (DELETE /newsletters).
/// Bulk deletion is deliberately wired for newsletters only.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct BulkDeleteRequest {
    pub ids: Vec<Uuid>,
}

// --- Response Schemas (Output) ---

/// LoginResponse
///
/// Output schema for a successful login. The token embeds the `usertype` claim
/// the console decodes client-side to gate admin routes.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginResponse {
    pub token: String,
}

/// MessageResponse
///
/// Generic `{"message": …}` body used by deletion endpoints and by every error
/// response that carries a single human-readable line.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct MessageResponse {
    pub message: String,
}

/// FieldError
///
/// A single failed validation check, named after the offending payload field.
/// The public forms surface `msg` next to the field; the console joins them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct FieldError {
    pub field: String,
    pub msg: String,
}

impl FieldError {
    pub fn new(field: &str, msg: &str) -> Self {
        Self {
            field: field.to_string(),
            msg: msg.to_string(),
        }
    }
}

/// ValidationErrorResponse
///
/// Output schema for a 400 validation failure: one entry per failed field,
/// accumulated across the whole payload rather than stopping at the first.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ValidationErrorResponse {
    pub errors: Vec<FieldError>,
}

/// AdminStats
///
/// Counter bundle behind GET /admin/stats, one field per dashboard tile.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AdminStats {
    pub total_services: i64,
    pub total_messages: i64,
    /// Contact messages with `seen` still false.
    pub unseen_messages: i64,
    pub total_consultations: i64,
    /// Consultation requests with `seen` still false.
    pub unseen_consultations: i64,
    pub total_subscribers: i64,
}

/// HealthResponse
///
/// Output schema for the liveness probe (GET /health).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct HealthResponse {
    pub status: String,
}
