use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::{AuthFailure, Identity, Role};

pub const LOGIN_PATH: &str = "/auth/login";
pub const BANNED_PATH: &str = "/auth/banned";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// AccessRequirement
///
/// The minimum capability a route declares. Ordered from least to most privileged,
/// so satisfying a requirement implies satisfying every requirement below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessRequirement {
    Public,
    Authenticated,
    AdminOrAbove,
    SuperAdminOnly,
}

impl AccessRequirement {
    /// is_satisfied_by
    ///
    /// The single role comparison every route goes through. Blocked identities
    /// satisfy nothing above `Public`.
    pub fn is_satisfied_by(self, identity: &Identity) -> bool {
        if self == AccessRequirement::Public {
            return true;
        }
        if identity.is_blocked() {
            return false;
        }
        identity.role >= self.minimum_role()
    }

    fn minimum_role(self) -> Role {
        match self {
            AccessRequirement::Public | AccessRequirement::Authenticated => Role::User,
            AccessRequirement::AdminOrAbove => Role::Admin,
            AccessRequirement::SuperAdminOnly => Role::SuperAdmin,
        }
    }
}

/// Whether a denial should be rendered as a browser redirect or an API status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    Page,
    Api,
}

/// Decision
///
/// The gate's verdict for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Proceed. Carries the identity when one resolved; public routes may allow
    /// anonymous callers.
    Allow(Option<Identity>),
    RedirectTo(String),
    Reject(StatusCode),
}

impl Decision {
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow(_))
    }
}

/// Denial
///
/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Denial {
    #[error("no valid session")]
    Unauthenticated,
    #[error("account banned or inactive")]
    Banned,
    #[error("insufficient role")]
    Forbidden,
}

impl Denial {
    /// into_decision
    ///
    /// Translates the denial into the literal redirect target (pages) or status
    /// code (APIs) clients depend on.
    pub fn into_decision(self, kind: RouteKind, path: &str) -> Decision {
        match (kind, self) {
            (RouteKind::Page, Denial::Unauthenticated) => Decision::RedirectTo(login_redirect(path)),
            (RouteKind::Page, Denial::Banned) => Decision::RedirectTo(BANNED_PATH.to_string()),
            (RouteKind::Page, Denial::Forbidden) => {
                Decision::RedirectTo(UNAUTHORIZED_PATH.to_string())
            }
            (RouteKind::Api, Denial::Unauthenticated) => Decision::Reject(StatusCode::UNAUTHORIZED),
            (RouteKind::Api, Denial::Banned | Denial::Forbidden) => {
                Decision::Reject(StatusCode::FORBIDDEN)
            }
        }
    }
}

/// Login URL that returns the user to `path` after signing in.
pub fn login_redirect(path: &str) -> String {
    format!("{LOGIN_PATH}?next={path}")
}

/// decide
///
/// Evaluates a resolved (or failed) identity against a requirement. Rules apply in
/// a fixed order and the first match wins: public routes always pass, then a missing
/// identity, then ban/inactive, then role. The ban check precedes the role check, so
/// a banned super-admin is sent to the banned page rather than the unauthorized one.
///
/// Pure: the same inputs always produce the same decision.
pub fn decide(
    identity: Result<Identity, AuthFailure>,
    requirement: AccessRequirement,
    kind: RouteKind,
    path: &str,
) -> Decision {
    if requirement == AccessRequirement::Public {
        return Decision::Allow(identity.ok());
    }

    let identity = match identity {
        Ok(identity) => identity,
        Err(AuthFailure::Unauthenticated) => {
            return Denial::Unauthenticated.into_decision(kind, path);
        }
    };

    if identity.is_blocked() {
        return Denial::Banned.into_decision(kind, path);
    }

    if requirement.is_satisfied_by(&identity) {
        Decision::Allow(Some(identity))
    } else {
        Denial::Forbidden.into_decision(kind, path)
    }
}
