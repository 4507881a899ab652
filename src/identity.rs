use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use axum::http::header;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::session::Credential;

/// Role
///
/// The RBAC privilege level of a principal. The derived ordering is the privilege
/// order (`User < Admin < SuperAdmin`) and is the only comparison routes rely on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS, ToSchema,
    sqlx::Type,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum Role {
    #[serde(alias = "user")]
    User,
    #[serde(alias = "admin")]
    Admin,
    #[serde(alias = "super_admin")]
    SuperAdmin,
}

/// Identity
///
/// A read-only snapshot of the principal behind a request, exactly as reported by
/// the identity service for this request. Nothing in this crate mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    #[serde(default, deserialize_with = "deserialize_banned_at")]
    #[ts(type = "string | null")]
    pub banned_at: Option<DateTime<Utc>>,
}

impl Identity {
    /// True when the account is banned or deactivated. Either flag alone blocks all
    /// gated access, whatever the role.
    pub fn is_blocked(&self) -> bool {
        self.banned_at.is_some() || !self.is_active
    }
}

// The identity service emits either full timestamps or bare dates for `bannedAt`.
fn deserialize_banned_at<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };

    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }

    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Some(naive.and_utc()))
        .ok_or_else(|| serde::de::Error::custom(format!("invalid bannedAt value: {raw}")))
}

/// AuthFailure
///
/// The only failure the verifier reports. Missing, invalid and expired credentials
/// and an unreachable identity service all collapse into this one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("unauthenticated")]
    Unauthenticated,
}

/// IdentityVerifier
///
/// Exchanges a credential for a fresh identity snapshot. Implementations must not
/// cache: a ban or role change has to be visible on the very next request.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// `None` means there was nothing to verify; implementations answer
    /// `Unauthenticated` without doing any I/O.
    async fn verify(&self, credential: Option<&Credential>) -> Result<Identity, AuthFailure>;
}

/// VerifierState
///
/// The shared handle to the verifier held in `AppState`.
pub type VerifierState = Arc<dyn IdentityVerifier>;

#[derive(Deserialize)]
struct WhoAmIResponse {
    user: Identity,
}

/// HttpIdentityVerifier
///
/// Calls the identity service's `GET /auth/me` once per verification, with the
/// credential as a bearer token. Built once at startup and shared by reference.
#[derive(Clone)]
pub struct HttpIdentityVerifier {
    client: reqwest::Client,
    me_url: String,
}

impl HttpIdentityVerifier {
    /// new
    ///
    /// Builds the HTTP client with the given request timeout. A timed-out call is
    /// reported as `Unauthenticated`, same as any other transport failure.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            me_url: format!("{}/auth/me", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl IdentityVerifier for HttpIdentityVerifier {
    async fn verify(&self, credential: Option<&Credential>) -> Result<Identity, AuthFailure> {
        let Some(credential) = credential else {
            return Err(AuthFailure::Unauthenticated);
        };

        let response = self
            .client
            .get(&self.me_url)
            .bearer_auth(credential.expose())
            .header(header::CACHE_CONTROL, "no-store")
            .send()
            .await
            .map_err(|e| {
                let timeout = e.is_timeout();
                tracing::warn!(timeout, "identity service unreachable: {}", e.without_url());
                AuthFailure::Unauthenticated
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%status, "identity service rejected credential");
            return Err(AuthFailure::Unauthenticated);
        }

        let body = response.json::<WhoAmIResponse>().await.map_err(|e| {
            tracing::warn!("identity service returned an unreadable body: {}", e.without_url());
            AuthFailure::Unauthenticated
        })?;

        Ok(body.user)
    }
}
