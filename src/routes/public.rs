use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Everything reachable without credentials: the public site's read path
/// (the pricing section), the three lead-capture forms, and the console's
/// login gateway.
///
/// The lead-form handlers validate server-side before storing anything, so a
/// hand-crafted request cannot bypass the checks the site's forms perform.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for uptime monitors and the load balancer.
        .route("/health", get(handlers::health))
        // POST /auth/login
        // Verifies admin credentials and issues the bearer token the console
        // attaches to every protected request.
        .route("/auth/login", post(handlers::login))
        // GET /services?search=...&main_page=...
        // Lists services in insertion order. The public pricing section passes
        // `main_page=true`; the console fetches the unfiltered list and searches
        // by title or feature substring.
        .route("/services", get(handlers::get_services))
        // POST /contact
        // Stores a contact form submission after server-side validation.
        .route("/contact", post(handlers::submit_contact))
        // POST /consultations
        // Stores a consultation request. The "Other" project type requires the
        // free-text field; the handler drops it for catalogue choices.
        .route("/consultations", post(handlers::submit_consultation))
        // POST /newsletters
        // Subscribes an email address. Duplicate addresses answer 409 without
        // creating a second row.
        .route("/newsletters", post(handlers::subscribe_newsletter))
}
