use axum::{
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    error::{json_error, status_message},
    gate::{AccessRequirement, Decision, RouteKind, decide},
    identity::{Identity, VerifierState},
    session::resolve_credential,
};

/// GuardContext
///
/// Everything the server-side guard needs for one router group: the shared verifier
/// plus the group's static requirement and how denials are rendered.
#[derive(Clone)]
pub struct GuardContext {
    pub verifier: VerifierState,
    pub requirement: AccessRequirement,
    pub kind: RouteKind,
}

impl GuardContext {
    pub fn new(verifier: VerifierState, requirement: AccessRequirement, kind: RouteKind) -> Self {
        Self {
            verifier,
            requirement,
            kind,
        }
    }
}

impl IntoResponse for Decision {
    /// Denials render as a redirect (pages) or a bare JSON error (APIs). An `Allow`
    /// reaching this point has no handler to run and renders as an empty 204.
    fn into_response(self) -> Response {
        match self {
            Decision::RedirectTo(target) => Redirect::temporary(&target).into_response(),
            Decision::Reject(status) => json_error(status, status_message(status)),
            Decision::Allow(_) => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// evaluate
///
/// Runs the full check for one request: resolve the cookie, verify it, decide.
/// Exposed separately from the middleware so other entry points share the exact path.
pub async fn evaluate(ctx: &GuardContext, parts: &Parts) -> Decision {
    let path = parts.uri.path();

    // Under a Public requirement a verification failure never denies.
    let credential = resolve_credential(&parts.headers);
    let identity = ctx.verifier.verify(credential.as_ref()).await;
    let decision = decide(identity, ctx.requirement, ctx.kind, path);

    match &decision {
        Decision::Allow(identity) => tracing::debug!(
            requirement = ?ctx.requirement,
            kind = ?ctx.kind,
            path,
            user_id = identity.as_ref().map(|i| i.id.as_str()),
            "access allowed"
        ),
        Decision::RedirectTo(target) => tracing::info!(
            requirement = ?ctx.requirement,
            path,
            target = %target,
            "access denied, redirecting"
        ),
        Decision::Reject(status) => tracing::info!(
            requirement = ?ctx.requirement,
            path,
            status = status.as_u16(),
            "access denied"
        ),
    }

    decision
}

/// enforce
///
/// The server-evaluated guard. Runs before the handler; a denied request never
/// reaches it, so no protected output is produced before the redirect or error.
pub async fn enforce(State(ctx): State<GuardContext>, request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();

    match evaluate(&ctx, &parts).await {
        Decision::Allow(identity) => {
            if let Some(identity) = identity {
                parts.extensions.insert(identity);
            }
            next.run(Request::from_parts(parts, body)).await
        }
        denied => denied.into_response(),
    }
}

/// Identity Extractor Implementation
///
/// Lets handlers behind a non-public guard take `Identity` as an argument. If the
/// guard did not run (a wiring mistake), the request is refused rather than served.
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Identity>().cloned().ok_or_else(|| {
            tracing::error!(path = parts.uri.path(), "handler requires an identity but no guard ran");
            json_error(
                StatusCode::UNAUTHORIZED,
                status_message(StatusCode::UNAUTHORIZED),
            )
        })
    }
}
