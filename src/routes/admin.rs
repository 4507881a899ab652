use crate::{
    AppState,
    gate::{AccessRequirement, RouteKind},
    handlers,
    identity::VerifierState,
    pages,
};
use axum::{
    Router,
    routing::{get, put},
};

use super::guarded;

/// Admin Router Module
///
/// Back-office routes for `ADMIN` and `SUPER_ADMIN` accounts: listing moderation,
/// inquiries and dashboard counters.
pub fn admin_routes(verifier: &VerifierState) -> Router<AppState> {
    let api = Router::new()
        // GET /api/admin/stats
        .route("/api/admin/stats", get(handlers::get_admin_stats))
        // GET/POST /api/admin/properties
        // All listings regardless of status; new listings start as drafts.
        .route(
            "/api/admin/properties",
            get(handlers::get_admin_properties).post(handlers::create_property),
        )
        // PUT /api/admin/properties/{id}/status
        .route(
            "/api/admin/properties/{id}/status",
            put(handlers::update_property_status),
        )
        // GET /api/admin/inquiries
        .route("/api/admin/inquiries", get(handlers::get_admin_inquiries));

    let pages = Router::new().route("/admin", get(pages::admin_page));

    guarded(api, verifier, AccessRequirement::AdminOrAbove, RouteKind::Api).merge(guarded(
        pages,
        verifier,
        AccessRequirement::AdminOrAbove,
        RouteKind::Page,
    ))
}

/// Super-admin routes. Plain admins are refused here even though they pass the
/// group above.
pub fn super_admin_routes(verifier: &VerifierState) -> Router<AppState> {
    let api = Router::new()
        // GET /api/admin/users
        .route("/api/admin/users", get(handlers::get_users));

    let pages = Router::new().route("/admin/users", get(pages::admin_users_page));

    guarded(api, verifier, AccessRequirement::SuperAdminOnly, RouteKind::Api).merge(guarded(
        pages,
        verifier,
        AccessRequirement::SuperAdminOnly,
        RouteKind::Page,
    ))
}
