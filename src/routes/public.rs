use crate::{AppState, handlers, pages};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints reachable without a session. The listing handlers only ever read
/// `PUBLISHED` properties, enforced in the repository query itself.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for the load balancer.
        .route("/health", get(|| async { "ok" }))
        // GET /api/properties?city=&propertyType=&minPrice=&maxPrice=
        .route("/api/properties", get(handlers::list_properties))
        // GET /api/properties/{id}
        .route("/api/properties/{id}", get(handlers::get_property))
        // Targets of the guard's redirects. These must stay public or a denied
        // request would loop.
        .route("/auth/login", get(pages::login_page))
        .route("/auth/banned", get(pages::banned_page))
        .route("/unauthorized", get(pages::unauthorized_page))
}
