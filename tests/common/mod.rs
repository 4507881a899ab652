#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use propgroup_portal::{
    AppConfig, AppState, Identity, IdentityVerifier, Role,
    identity::AuthFailure,
    models::{
        AdminDashboardStats, CreateInquiryRequest, CreatePropertyRequest, Inquiry, Investment,
        Property, PropertyFilter, PropertyStatus, UserSummary,
    },
    repository::{RepoResult, Repository, RepositoryError},
    session::Credential,
};
use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};
use uuid::Uuid;

// --- Identities ---

pub fn identity(id: &str, role: Role) -> Identity {
    Identity {
        id: id.to_string(),
        email: format!("{id}@propgroup.test"),
        role,
        is_active: true,
        banned_at: None,
    }
}

pub fn banned(id: &str, role: Role) -> Identity {
    Identity {
        banned_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        ..identity(id, role)
    }
}

// --- Mock Identity Service ---

/// Maps a cookie token straight to an identity; unknown tokens are unauthenticated.
#[derive(Default)]
pub struct StaticVerifier {
    identities: HashMap<String, Identity>,
    pub calls: AtomicUsize,
}

impl StaticVerifier {
    /// Tokens: `user`, `admin`, `super`, `banned-super`, `inactive`.
    pub fn standard() -> Self {
        let mut identities = HashMap::new();
        identities.insert("user".to_string(), identity("user-1", Role::User));
        identities.insert("admin".to_string(), identity("admin-1", Role::Admin));
        identities.insert("super".to_string(), identity("super-1", Role::SuperAdmin));
        identities.insert(
            "banned-super".to_string(),
            banned("banned-1", Role::SuperAdmin),
        );
        identities.insert(
            "inactive".to_string(),
            Identity {
                is_active: false,
                ..identity("inactive-1", Role::Admin)
            },
        );
        Self {
            identities,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityVerifier for StaticVerifier {
    async fn verify(&self, credential: Option<&Credential>) -> Result<Identity, AuthFailure> {
        let credential = credential.ok_or(AuthFailure::Unauthenticated)?;
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.identities
            .get(credential.expose())
            .cloned()
            .ok_or(AuthFailure::Unauthenticated)
    }
}

// --- Mock Repository ---

pub fn property(title: &str, status: PropertyStatus) -> Property {
    Property {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: "Two-bed flat close to the station".to_string(),
        city: "Dublin".to_string(),
        property_type: "APARTMENT".to_string(),
        price: 35_000_000,
        bedrooms: Some(2),
        status,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// In-memory repository. With `fail` set every call returns a database error.
#[derive(Default)]
pub struct MockRepo {
    pub fail: bool,
    pub properties: Vec<Property>,
    pub investments: Vec<Investment>,
    pub inquiries: Vec<Inquiry>,
    pub users: Vec<UserSummary>,
}

impl MockRepo {
    fn check(&self) -> RepoResult<()> {
        if self.fail {
            Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Repository for MockRepo {
    async fn list_published_properties(&self, filter: PropertyFilter) -> RepoResult<Vec<Property>> {
        self.check()?;
        Ok(self
            .properties
            .iter()
            .filter(|p| p.status == PropertyStatus::Published)
            .filter(|p| filter.city.as_ref().is_none_or(|c| p.city.eq_ignore_ascii_case(c)))
            .filter(|p| filter.min_price.is_none_or(|min| p.price >= min))
            .filter(|p| filter.max_price.is_none_or(|max| p.price <= max))
            .cloned()
            .collect())
    }

    async fn get_published_property(&self, id: Uuid) -> RepoResult<Option<Property>> {
        self.check()?;
        Ok(self
            .properties
            .iter()
            .find(|p| p.id == id && p.status == PropertyStatus::Published)
            .cloned())
    }

    async fn list_investments(&self, user_id: &str) -> RepoResult<Vec<Investment>> {
        self.check()?;
        Ok(self
            .investments
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_inquiry(
        &self,
        user_id: &str,
        req: CreateInquiryRequest,
    ) -> RepoResult<Option<Inquiry>> {
        self.check()?;
        let published = self
            .properties
            .iter()
            .any(|p| p.id == req.property_id && p.status == PropertyStatus::Published);
        Ok(published.then(|| Inquiry {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            property_id: req.property_id,
            message: req.message,
            created_at: Utc::now(),
        }))
    }

    async fn list_all_properties(&self) -> RepoResult<Vec<Property>> {
        self.check()?;
        Ok(self.properties.clone())
    }

    async fn create_property(&self, req: CreatePropertyRequest) -> RepoResult<Property> {
        self.check()?;
        Ok(Property {
            id: Uuid::new_v4(),
            title: req.title,
            description: req.description,
            city: req.city,
            property_type: req.property_type,
            price: req.price,
            bedrooms: req.bedrooms,
            status: PropertyStatus::Draft,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    async fn set_property_status(
        &self,
        id: Uuid,
        status: PropertyStatus,
    ) -> RepoResult<Option<Property>> {
        self.check()?;
        Ok(self
            .properties
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .map(|p| Property { status, ..p }))
    }

    async fn list_inquiries(&self) -> RepoResult<Vec<Inquiry>> {
        self.check()?;
        Ok(self.inquiries.clone())
    }

    async fn get_stats(&self) -> RepoResult<AdminDashboardStats> {
        self.check()?;
        Ok(AdminDashboardStats {
            total_properties: self.properties.len() as i64,
            published_properties: self
                .properties
                .iter()
                .filter(|p| p.status == PropertyStatus::Published)
                .count() as i64,
            total_investments: self.investments.len() as i64,
            total_inquiries: self.inquiries.len() as i64,
        })
    }

    async fn list_users(&self) -> RepoResult<Vec<UserSummary>> {
        self.check()?;
        Ok(self.users.clone())
    }
}

// --- State ---

pub fn create_test_state(repo: MockRepo, verifier: Arc<StaticVerifier>) -> AppState {
    AppState {
        repo: Arc::new(repo),
        verifier,
        config: AppConfig::default(),
    }
}
