/// Route modules split by access tier, so the auth boundary lives in the
/// module tree rather than in per-route annotations: a handler registered
/// in the wrong module fails loudly in review, not silently in production.
///
/// The two tiers map directly to the product: anonymous visitors reading
/// pricing data and submitting lead forms, and console operators managing
/// the content behind a bearer token.

/// Routes accessible to all clients (pricing data, lead forms, login).
pub mod public;

/// Routes restricted to authenticated admin accounts.
/// Wrapped in the `auth_middleware` layer; the role check runs in each handler.
pub mod admin;
