//! Router Module Index
//!
//! Routes are grouped by the access requirement they share. Each group is wrapped
//! in its own guard layer, so a route's protection is decided by which group it is
//! registered in rather than by checks inside handlers.

use axum::{Router, middleware};

use crate::{
    AppState,
    gate::{AccessRequirement, RouteKind},
    guard::{GuardContext, enforce},
    identity::VerifierState,
};

/// Routes open to everyone (anonymous listing and the auth landing pages).
pub mod public;

/// Investor portal: any active, signed-in account.
pub mod authenticated;

/// Back office: admins, with a super-admin-only subgroup.
pub mod admin;

/// guarded
///
/// Applies the server-side guard for `requirement` to every route in `router`.
/// Uses `route_layer`, so unmatched paths still fall through to a plain 404.
pub(crate) fn guarded(
    router: Router<AppState>,
    verifier: &VerifierState,
    requirement: AccessRequirement,
    kind: RouteKind,
) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(
        GuardContext::new(verifier.clone(), requirement, kind),
        enforce,
    ))
}
