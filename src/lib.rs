use axum::{Router, extract::FromRef, http::HeaderName};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Access control core: cookie → identity → decision → guard.
pub mod client_guard;
pub mod gate;
pub mod guard;
pub mod identity;
pub mod session;

// Application services and components.
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod pages;
pub mod repository;

// Routing, segregated by access requirement (Public, Authenticated, Admin).
pub mod routes;
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use gate::{AccessRequirement, Decision, RouteKind, decide};
pub use identity::{HttpIdentityVerifier, Identity, IdentityVerifier, Role, VerifierState};
pub use repository::{PostgresRepository, RepositoryState};

/// ApiDoc
///
/// OpenAPI document for the JSON API, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_properties, handlers::get_property, handlers::get_me,
        handlers::get_my_investments, handlers::create_inquiry, handlers::get_admin_stats,
        handlers::get_admin_properties, handlers::create_property,
        handlers::update_property_status, handlers::get_admin_inquiries, handlers::get_users
    ),
    components(
        schemas(
            models::Property, models::PropertyStatus, models::Investment, models::Inquiry,
            models::UserSummary, models::CreatePropertyRequest, models::UpdatePropertyStatusRequest,
            models::CreateInquiryRequest, models::AdminDashboardStats, identity::Identity,
            identity::Role, error::ErrorBody,
        )
    ),
    tags(
        (name = "propgroup", description = "PropGroup listing, investor portal and back-office API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single shared container for the application's services and configuration.
/// Every member is built once in `main` and cloned by reference into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Data store access.
    pub repo: RepositoryState,
    /// Identity service client used by every guard.
    pub verifier: VerifierState,
    /// The loaded, immutable configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for VerifierState {
    fn from_ref(app_state: &AppState) -> VerifierState {
        app_state.verifier.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles every route group with its guard, the API docs, and the observability
/// layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(authenticated::authenticated_routes(&state.verifier))
        .merge(admin::admin_routes(&state.verifier))
        .merge(admin::super_admin_routes(&state.verifier))
        .with_state(state);

    // Outermost first: request id, then the traced span, then id propagation.
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

/// trace_span_logger
///
/// Span for one HTTP request, correlated by `x-request-id`. Never records cookies
/// or the authorization header.
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
