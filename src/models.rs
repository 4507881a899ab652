use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::identity::Role;

// --- Core Application Schemas (Mapped to Database) ---

/// PropertyStatus
///
/// Listing lifecycle. Only `Published` properties are visible on public routes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, sqlx::Type, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "property_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum PropertyStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

/// Property
///
/// A listed real-estate asset from the `properties` table.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Property {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub city: String,
    // e.g. "APARTMENT", "HOUSE", "COMMERCIAL".
    pub property_type: String,
    // Asking price in minor currency units.
    pub price: i64,
    pub bedrooms: Option<i32>,
    pub status: PropertyStatus,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Investment
///
/// One investor position, joined with the property title for display.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Investment {
    pub id: Uuid,
    pub user_id: String,
    pub property_id: Uuid,
    pub property_title: String,
    pub amount: i64,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Inquiry
///
/// An investor's expression of interest in a property.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Inquiry {
    pub id: Uuid,
    pub user_id: String,
    pub property_id: Uuid,
    pub message: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// UserSummary
///
/// Read-only view of the `users` table for the super-admin back office. Account
/// state is owned by the identity service; this crate never writes it.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    #[ts(type = "string | null")]
    pub banned_at: Option<DateTime<Utc>>,
}

// --- Request Payloads (Input Schemas) ---

/// PropertyFilter
///
/// Query parameters accepted by the public listing (`GET /api/properties`).
#[derive(Debug, Clone, Deserialize, Default, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFilter {
    pub city: Option<String>,
    pub property_type: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
}

/// CreatePropertyRequest
///
/// Admin payload for a new listing. New listings start as `Draft`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreatePropertyRequest {
    pub title: String,
    pub description: String,
    pub city: String,
    pub property_type: String,
    pub price: i64,
    pub bedrooms: Option<i32>,
}

impl CreatePropertyRequest {
    /// Returns the first problem with the payload, if any.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title is required".to_string());
        }
        if self.city.trim().is_empty() {
            return Err("city is required".to_string());
        }
        if self.price <= 0 {
            return Err("price must be positive".to_string());
        }
        if self.bedrooms.is_some_and(|b| b < 0) {
            return Err("bedrooms cannot be negative".to_string());
        }
        Ok(())
    }
}

/// UpdatePropertyStatusRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UpdatePropertyStatusRequest {
    pub status: PropertyStatus,
}

/// CreateInquiryRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateInquiryRequest {
    pub property_id: Uuid,
    pub message: String,
}

// --- Dashboard Schemas (Output) ---

/// AdminDashboardStats
///
/// Counters for the admin dashboard (`GET /api/admin/stats`).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AdminDashboardStats {
    pub total_properties: i64,
    pub published_properties: i64,
    pub total_investments: i64,
    pub total_inquiries: i64,
}
