use crate::{
    AppState,
    error::{ApiError, ErrorBody},
    identity::Identity,
    models::{
        AdminDashboardStats, CreateInquiryRequest, CreatePropertyRequest, Inquiry, Investment,
        Property, PropertyFilter, UpdatePropertyStatusRequest, UserSummary,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

// --- Public ---

/// list_properties
///
/// [Public Route] Published listings, filtered by city, type and price range.
#[utoipa::path(
    get,
    path = "/api/properties",
    params(PropertyFilter),
    responses(
        (status = 200, description = "Published properties", body = [Property]),
        (status = 500, description = "Data store failure", body = ErrorBody)
    )
)]
pub async fn list_properties(
    State(state): State<AppState>,
    Query(filter): Query<PropertyFilter>,
) -> Result<Json<Vec<Property>>, ApiError> {
    if let (Some(min), Some(max)) = (filter.min_price, filter.max_price) {
        if min > max {
            return Err(ApiError::Validation(
                "minPrice cannot exceed maxPrice".to_string(),
            ));
        }
    }
    let properties = state.repo.list_published_properties(filter).await?;
    Ok(Json(properties))
}

/// get_property
///
/// [Public Route] One published listing. Drafts and archived listings are 404.
#[utoipa::path(
    get,
    path = "/api/properties/{id}",
    params(("id" = Uuid, Path, description = "Property ID")),
    responses(
        (status = 200, description = "Found", body = Property),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Property>, ApiError> {
    state
        .repo
        .get_published_property(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

// --- Investor portal ---

/// get_me
///
/// [Authenticated Route] The identity snapshot the gate resolved for this request.
#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Current identity", body = Identity),
        (status = 401, description = "No valid session", body = ErrorBody),
        (status = 403, description = "Account banned or inactive", body = ErrorBody)
    )
)]
pub async fn get_me(identity: Identity) -> Json<Identity> {
    Json(identity)
}

/// get_my_investments
///
/// [Authenticated Route] The caller's own investment positions.
#[utoipa::path(
    get,
    path = "/api/portal/investments",
    responses(
        (status = 200, description = "My investments", body = [Investment]),
        (status = 401, description = "No valid session", body = ErrorBody)
    )
)]
pub async fn get_my_investments(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<Investment>>, ApiError> {
    let investments = state.repo.list_investments(&identity.id).await?;
    Ok(Json(investments))
}

/// create_inquiry
///
/// [Authenticated Route] Registers interest in a published property. The owner of
/// the inquiry is always the verified caller, never a field of the payload.
#[utoipa::path(
    post,
    path = "/api/portal/inquiries",
    request_body = CreateInquiryRequest,
    responses(
        (status = 201, description = "Inquiry recorded", body = Inquiry),
        (status = 400, description = "Empty message", body = ErrorBody),
        (status = 404, description = "Property not published", body = ErrorBody)
    )
)]
pub async fn create_inquiry(
    identity: Identity,
    State(state): State<AppState>,
    Json(payload): Json<CreateInquiryRequest>,
) -> Result<(StatusCode, Json<Inquiry>), ApiError> {
    if payload.message.trim().is_empty() {
        return Err(ApiError::Validation("message is required".to_string()));
    }

    let inquiry = state
        .repo
        .create_inquiry(&identity.id, payload)
        .await?
        .ok_or(ApiError::NotFound)?;

    tracing::info!(user_id = %identity.id, inquiry_id = %inquiry.id, "inquiry created");
    Ok((StatusCode::CREATED, Json(inquiry)))
}

// --- Admin back office ---

/// get_admin_stats
///
/// [Admin Route] Dashboard counters.
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Stats", body = AdminDashboardStats),
        (status = 403, description = "Insufficient role", body = ErrorBody)
    )
)]
pub async fn get_admin_stats(
    State(state): State<AppState>,
) -> Result<Json<AdminDashboardStats>, ApiError> {
    Ok(Json(state.repo.get_stats().await?))
}

/// get_admin_properties
///
/// [Admin Route] Every listing, including drafts and archived ones.
#[utoipa::path(
    get,
    path = "/api/admin/properties",
    responses((status = 200, description = "All properties", body = [Property]))
)]
pub async fn get_admin_properties(
    State(state): State<AppState>,
) -> Result<Json<Vec<Property>>, ApiError> {
    Ok(Json(state.repo.list_all_properties().await?))
}

/// create_property
///
/// [Admin Route] Adds a listing in `DRAFT` status.
#[utoipa::path(
    post,
    path = "/api/admin/properties",
    request_body = CreatePropertyRequest,
    responses(
        (status = 201, description = "Created", body = Property),
        (status = 400, description = "Invalid payload", body = ErrorBody)
    )
)]
pub async fn create_property(
    identity: Identity,
    State(state): State<AppState>,
    Json(payload): Json<CreatePropertyRequest>,
) -> Result<(StatusCode, Json<Property>), ApiError> {
    payload.validate().map_err(ApiError::Validation)?;
    let property = state.repo.create_property(payload).await?;
    tracing::info!(admin = %identity.email, property_id = %property.id, "property created");
    Ok((StatusCode::CREATED, Json(property)))
}

/// update_property_status
///
/// [Admin Route] Publishes, unpublishes or archives a listing.
#[utoipa::path(
    put,
    path = "/api/admin/properties/{id}/status",
    params(("id" = Uuid, Path, description = "Property ID")),
    request_body = UpdatePropertyStatusRequest,
    responses(
        (status = 200, description = "Updated", body = Property),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn update_property_status(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePropertyStatusRequest>,
) -> Result<Json<Property>, ApiError> {
    let property = state
        .repo
        .set_property_status(id, payload.status)
        .await?
        .ok_or(ApiError::NotFound)?;
    tracing::info!(admin = %identity.email, property_id = %id, status = ?payload.status, "property status changed");
    Ok(Json(property))
}

/// get_admin_inquiries
///
/// [Admin Route] All investor inquiries, newest first.
#[utoipa::path(
    get,
    path = "/api/admin/inquiries",
    responses((status = 200, description = "Inquiries", body = [Inquiry]))
)]
pub async fn get_admin_inquiries(
    State(state): State<AppState>,
) -> Result<Json<Vec<Inquiry>>, ApiError> {
    Ok(Json(state.repo.list_inquiries().await?))
}

/// get_users
///
/// [Super-Admin Route] Read-only account overview. Bans and role changes happen in
/// the identity service, not here.
#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses(
        (status = 200, description = "Users", body = [UserSummary]),
        (status = 403, description = "Super-admin only", body = ErrorBody)
    )
)]
pub async fn get_users(State(state): State<AppState>) -> Result<Json<Vec<UserSummary>>, ApiError> {
    Ok(Json(state.repo.list_users().await?))
}
