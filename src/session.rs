use std::fmt;

use axum::http::{HeaderMap, header};

/// Name of the cookie carrying the session credential.
pub const SESSION_COOKIE: &str = "token";

/// Credential
///
/// The opaque bearer token taken from the session cookie. It means nothing until the
/// identity service has exchanged it for an `Identity`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the outbound `Authorization` header only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// resolve_credential
///
/// Pulls the session credential out of the request's `Cookie` headers. A missing
/// cookie, an empty value, or an unreadable header all resolve to `None`; this never
/// fails and never leaves the process.
pub fn resolve_credential(headers: &HeaderMap) -> Option<Credential> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            let value = value.trim().trim_matches('"');
            (name.trim() == SESSION_COOKIE && !value.is_empty()).then(|| Credential::new(value))
        })
}
