use crate::models::{
    AdminDashboardStats, CreateInquiryRequest, CreatePropertyRequest, Inquiry, Investment,
    Property, PropertyFilter, PropertyStatus, UserSummary,
};
use async_trait::async_trait;
use sqlx::{PgPool, query_builder::QueryBuilder};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// RepositoryError
///
/// Any failure talking to the data store. Callers decide how to surface it; nothing
/// in this layer swallows an error into an empty result.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type RepoResult<T> = Result<T, RepositoryError>;

/// Repository Trait
///
/// The persistence contract the handlers depend on. Every call happens only after
/// the access gate has allowed the request, so implementations do no access checks
/// of their own beyond the visibility rules named on each method.
///
/// **Send + Sync + async_trait** make `Arc<dyn Repository>` shareable across Axum's
/// task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Public listing ---
    // Only `PUBLISHED` rows.
    async fn list_published_properties(&self, filter: PropertyFilter) -> RepoResult<Vec<Property>>;
    async fn get_published_property(&self, id: Uuid) -> RepoResult<Option<Property>>;

    // --- Investor portal ---
    async fn list_investments(&self, user_id: &str) -> RepoResult<Vec<Investment>>;
    // Rejects (returns `None`) when the property is not published.
    async fn create_inquiry(
        &self,
        user_id: &str,
        req: CreateInquiryRequest,
    ) -> RepoResult<Option<Inquiry>>;

    // --- Admin back office ---
    async fn list_all_properties(&self) -> RepoResult<Vec<Property>>;
    async fn create_property(&self, req: CreatePropertyRequest) -> RepoResult<Property>;
    async fn set_property_status(
        &self,
        id: Uuid,
        status: PropertyStatus,
    ) -> RepoResult<Option<Property>>;
    async fn list_inquiries(&self) -> RepoResult<Vec<Inquiry>>;
    async fn get_stats(&self) -> RepoResult<AdminDashboardStats>;

    // --- Super-admin ---
    async fn list_users(&self) -> RepoResult<Vec<UserSummary>>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

const PROPERTY_COLUMNS: &str = "id, title, description, city, property_type, price, bedrooms, status, created_at, updated_at";

/// PostgresRepository
///
/// The `Repository` implementation backed by PostgreSQL.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    /// list_published_properties
    ///
    /// Builds the search with `QueryBuilder` so every filter value is a bound
    /// parameter. The `status = 'PUBLISHED'` clause is unconditional.
    async fn list_published_properties(&self, filter: PropertyFilter) -> RepoResult<Vec<Property>> {
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties WHERE status = "
        ));
        builder.push_bind(PropertyStatus::Published);

        if let Some(city) = filter.city {
            builder.push(" AND city ILIKE ");
            builder.push_bind(city);
        }
        if let Some(property_type) = filter.property_type {
            builder.push(" AND property_type = ");
            builder.push_bind(property_type);
        }
        if let Some(min) = filter.min_price {
            builder.push(" AND price >= ");
            builder.push_bind(min);
        }
        if let Some(max) = filter.max_price {
            builder.push(" AND price <= ");
            builder.push_bind(max);
        }

        builder.push(" ORDER BY created_at DESC");

        let properties = builder
            .build_query_as::<Property>()
            .fetch_all(&self.pool)
            .await?;
        Ok(properties)
    }

    async fn get_published_property(&self, id: Uuid) -> RepoResult<Option<Property>> {
        let query = format!("SELECT {PROPERTY_COLUMNS} FROM properties WHERE id = $1 AND status = $2");
        let property = sqlx::query_as::<_, Property>(&query)
            .bind(id)
            .bind(PropertyStatus::Published)
            .fetch_optional(&self.pool)
            .await?;
        Ok(property)
    }

    /// list_investments
    ///
    /// Positions owned by `user_id`, newest first, with the property title joined in.
    async fn list_investments(&self, user_id: &str) -> RepoResult<Vec<Investment>> {
        let investments = sqlx::query_as::<_, Investment>(
            r#"
            SELECT i.id, i.user_id, i.property_id, p.title AS property_title, i.amount, i.created_at
            FROM investments i
            JOIN properties p ON i.property_id = p.id
            WHERE i.user_id = $1
            ORDER BY i.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(investments)
    }

    /// create_inquiry
    ///
    /// Inserts only when the target property is published; the `INSERT ... SELECT`
    /// yields no row otherwise.
    async fn create_inquiry(
        &self,
        user_id: &str,
        req: CreateInquiryRequest,
    ) -> RepoResult<Option<Inquiry>> {
        let inquiry = sqlx::query_as::<_, Inquiry>(
            r#"
            INSERT INTO inquiries (id, user_id, property_id, message, created_at)
            SELECT $1, $2, p.id, $4, NOW()
            FROM properties p
            WHERE p.id = $3 AND p.status = $5
            RETURNING id, user_id, property_id, message, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(req.property_id)
        .bind(req.message)
        .bind(PropertyStatus::Published)
        .fetch_optional(&self.pool)
        .await?;
        Ok(inquiry)
    }

    /// list_all_properties
    ///
    /// Every listing regardless of status, drafts first.
    async fn list_all_properties(&self) -> RepoResult<Vec<Property>> {
        let query = format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties ORDER BY status ASC, created_at DESC"
        );
        let properties = sqlx::query_as::<_, Property>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(properties)
    }

    async fn create_property(&self, req: CreatePropertyRequest) -> RepoResult<Property> {
        let query = format!(
            "INSERT INTO properties (id, title, description, city, property_type, price, bedrooms, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW(), NOW()) RETURNING {PROPERTY_COLUMNS}"
        );
        let property = sqlx::query_as::<_, Property>(&query)
            .bind(Uuid::new_v4())
            .bind(req.title)
            .bind(req.description)
            .bind(req.city)
            .bind(req.property_type)
            .bind(req.price)
            .bind(req.bedrooms)
            .bind(PropertyStatus::Draft)
            .fetch_one(&self.pool)
            .await?;
        Ok(property)
    }

    async fn set_property_status(
        &self,
        id: Uuid,
        status: PropertyStatus,
    ) -> RepoResult<Option<Property>> {
        let query = format!(
            "UPDATE properties SET status = $1, updated_at = NOW() WHERE id = $2 RETURNING {PROPERTY_COLUMNS}"
        );
        let property = sqlx::query_as::<_, Property>(&query)
            .bind(status)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(property)
    }

    async fn list_inquiries(&self) -> RepoResult<Vec<Inquiry>> {
        let inquiries = sqlx::query_as::<_, Inquiry>(
            "SELECT id, user_id, property_id, message, created_at FROM inquiries ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(inquiries)
    }

    /// get_stats
    ///
    /// All dashboard counters in a single round trip.
    async fn get_stats(&self) -> RepoResult<AdminDashboardStats> {
        let (total_properties, published_properties, total_investments, total_inquiries) =
            sqlx::query_as::<_, (i64, i64, i64, i64)>(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM properties),
                    (SELECT COUNT(*) FROM properties WHERE status = $1),
                    (SELECT COUNT(*) FROM investments),
                    (SELECT COUNT(*) FROM inquiries)
                "#,
            )
            .bind(PropertyStatus::Published)
            .fetch_one(&self.pool)
            .await?;

        Ok(AdminDashboardStats {
            total_properties,
            published_properties,
            total_investments,
            total_inquiries,
        })
    }

    async fn list_users(&self) -> RepoResult<Vec<UserSummary>> {
        let users = sqlx::query_as::<_, UserSummary>(
            "SELECT id, email, role, is_active, banned_at FROM users ORDER BY email ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }
}
