use crate::{
    AppState,
    gate::{AccessRequirement, RouteKind},
    handlers,
    identity::VerifierState,
    pages,
};
use axum::{
    Router,
    routing::{get, post},
};

use super::guarded;

/// Authenticated Router Module
///
/// The investor portal. Every route requires an active, unbanned session; the role
/// does not matter. API routes answer denials with 401/403 JSON, the portal page
/// redirects to login or the banned page.
pub fn authenticated_routes(verifier: &VerifierState) -> Router<AppState> {
    let api = Router::new()
        // GET /api/me
        .route("/api/me", get(handlers::get_me))
        // GET /api/portal/investments
        // Positions owned by the caller only.
        .route("/api/portal/investments", get(handlers::get_my_investments))
        // POST /api/portal/inquiries
        .route("/api/portal/inquiries", post(handlers::create_inquiry));

    let pages = Router::new().route("/portal", get(pages::portal_page));

    guarded(api, verifier, AccessRequirement::Authenticated, RouteKind::Api).merge(guarded(
        pages,
        verifier,
        AccessRequirement::Authenticated,
        RouteKind::Page,
    ))
}
