use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

/// The console surface: service CRUD, the two lead inboxes, newsletter list
/// maintenance, and dashboard statistics. Reserved for accounts holding the
/// 'admin' or 'superadmin' role.
///
/// Authentication happens in the `auth_middleware` layer wrapped around this
/// whole router before any handler runs; each handler then checks the
/// resolved role itself, so an authenticated-but-unprivileged account still
/// gets a 403 out of every one of these endpoints.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // --- Service Management ---
        // POST /services
        // Creates a service offering for the pricing section.
        .route("/services", post(handlers::create_service))
        // PUT/DELETE /services/{id}
        // Full-record replace or removal of a single service.
        .route(
            "/services/{id}",
            put(handlers::update_service).delete(handlers::delete_service),
        )
        // PATCH /services/{id}/toggle
        // Flips `show_on_main_page` and returns the updated record.
        .route(
            "/services/{id}/toggle",
            patch(handlers::toggle_service_visibility),
        )
        // PATCH /services/{id}/toggle-popular
        // Flips the `popular` highlight and returns the updated record.
        .route(
            "/services/{id}/toggle-popular",
            patch(handlers::toggle_service_popular),
        )
        // --- Contact Inbox ---
        // GET /contact
        // Lists contact messages newest first, with optional sender search.
        .route("/contact", get(handlers::get_contact_messages))
        // DELETE /contact/{id}
        .route("/contact/{id}", delete(handlers::delete_contact_message))
        // PATCH /contact/{id}/toggle-seen
        // Read/unread marker for staff working through the inbox.
        .route(
            "/contact/{id}/toggle-seen",
            patch(handlers::toggle_contact_seen),
        )
        // --- Consultation Inbox ---
        // GET /consultations
        .route("/consultations", get(handlers::get_consultation_requests))
        // DELETE /consultations/{id}
        .route(
            "/consultations/{id}",
            delete(handlers::delete_consultation_request),
        )
        // PATCH /consultations/{id}/toggle-seen
        .route(
            "/consultations/{id}/toggle-seen",
            patch(handlers::toggle_consultation_seen),
        )
        // --- Newsletter List ---
        // GET /newsletters
        // Lists subscribers newest first.
        // DELETE /newsletters
        // Bulk removal backing the console's checkbox selection; the id list
        // travels in the request body. Bulk deletion exists for this resource only.
        .route(
            "/newsletters",
            get(handlers::get_subscribers).delete(handlers::bulk_delete_subscribers),
        )
        // DELETE /newsletters/{id}
        .route("/newsletters/{id}", delete(handlers::delete_subscriber))
        // --- Dashboard ---
        // GET /admin/stats
        // Retrieves core dashboard metrics (totals plus unseen counts for both inboxes).
        .route("/admin/stats", get(handlers::get_admin_stats))
}
