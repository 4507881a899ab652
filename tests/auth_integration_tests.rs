use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use propgroup_portal::{
    HttpIdentityVerifier, IdentityVerifier, Role, identity::AuthFailure, session::Credential,
};
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::net::TcpListener;

// --- Fake Identity Service ---

/// Headers seen by the fake `/auth/me`, one entry per call.
#[derive(Clone, Default)]
struct Seen(Arc<Mutex<Vec<(Option<String>, Option<String>)>>>);

impl Seen {
    fn calls(&self) -> Vec<(Option<String>, Option<String>)> {
        self.0.lock().unwrap().clone()
    }
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn whoami(State(seen): State<Seen>, headers: HeaderMap) -> impl IntoResponse {
    seen.0.lock().unwrap().push((
        header_value(&headers, header::AUTHORIZATION),
        header_value(&headers, header::CACHE_CONTROL),
    ));

    let token = header_value(&headers, header::AUTHORIZATION)
        .and_then(|v| v.strip_prefix("Bearer ").map(str::to_string))
        .unwrap_or_default();

    match token.as_str() {
        "good" => (
            StatusCode::OK,
            Json(json!({ "user": {
                "id": "u-1", "email": "investor@propgroup.test", "role": "ADMIN",
                "isActive": true, "bannedAt": null
            }})),
        )
            .into_response(),
        "banned" => (
            StatusCode::OK,
            Json(json!({ "user": {
                "id": "u-2", "email": "gone@propgroup.test", "role": "SUPER_ADMIN",
                "isActive": true, "bannedAt": "2024-03-01"
            }})),
        )
            .into_response(),
        "owner" => (
            StatusCode::OK,
            Json(json!({ "user": {
                "id": "u-3", "email": "x@propgroup.test", "role": "OWNER",
                "isActive": true, "bannedAt": null
            }})),
        )
            .into_response(),
        "garbage" => (StatusCode::OK, "<html>not json</html>").into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_millis(500)).await;
            StatusCode::OK.into_response()
        }
        _ => (StatusCode::UNAUTHORIZED, Json(json!({ "error": "invalid token" }))).into_response(),
    }
}

async fn spawn_identity_service() -> (String, Seen) {
    let seen = Seen::default();
    let app = Router::new()
        .route("/auth/me", get(whoami))
        .with_state(seen.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), seen)
}

fn verifier(base_url: &str) -> HttpIdentityVerifier {
    HttpIdentityVerifier::new(base_url, Duration::from_millis(200)).unwrap()
}

fn token(raw: &str) -> Credential {
    Credential::new(raw)
}

// --- Tests ---

#[tokio::test]
async fn test_valid_credential_yields_identity() {
    let (base_url, seen) = spawn_identity_service().await;

    let identity = verifier(&base_url)
        .verify(Some(&token("good")))
        .await
        .unwrap();

    assert_eq!(identity.id, "u-1");
    assert_eq!(identity.role, Role::Admin);
    assert!(!identity.is_blocked());

    let calls = seen.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0.as_deref(), Some("Bearer good"));
    assert_eq!(calls[0].1.as_deref(), Some("no-store"));
}

#[tokio::test]
async fn test_trailing_slash_in_base_url_is_tolerated() {
    let (base_url, seen) = spawn_identity_service().await;

    let result = verifier(&format!("{base_url}/"))
        .verify(Some(&token("good")))
        .await;

    assert!(result.is_ok());
    assert_eq!(seen.calls().len(), 1);
}

#[tokio::test]
async fn test_banned_identity_is_returned_not_refused() {
    // Verification reports the ban; the decision gate acts on it.
    let (base_url, _) = spawn_identity_service().await;

    let identity = verifier(&base_url)
        .verify(Some(&token("banned")))
        .await
        .unwrap();

    assert_eq!(identity.role, Role::SuperAdmin);
    assert!(identity.banned_at.is_some());
    assert!(identity.is_blocked());
}

#[tokio::test]
async fn test_rejected_credential_is_unauthenticated() {
    let (base_url, _) = spawn_identity_service().await;

    let result = verifier(&base_url).verify(Some(&token("expired"))).await;

    assert_eq!(result, Err(AuthFailure::Unauthenticated));
}

#[tokio::test]
async fn test_unreadable_body_is_unauthenticated() {
    let (base_url, _) = spawn_identity_service().await;

    let result = verifier(&base_url).verify(Some(&token("garbage"))).await;

    assert_eq!(result, Err(AuthFailure::Unauthenticated));
}

#[tokio::test]
async fn test_unknown_role_is_unauthenticated() {
    let (base_url, _) = spawn_identity_service().await;

    let result = verifier(&base_url).verify(Some(&token("owner"))).await;

    assert_eq!(result, Err(AuthFailure::Unauthenticated));
}

#[tokio::test]
async fn test_slow_identity_service_times_out() {
    let (base_url, seen) = spawn_identity_service().await;
    let verifier = HttpIdentityVerifier::new(&base_url, Duration::from_millis(100)).unwrap();

    let result = verifier.verify(Some(&token("slow"))).await;

    assert_eq!(result, Err(AuthFailure::Unauthenticated));
    assert_eq!(seen.calls().len(), 1);
}

#[tokio::test]
async fn test_unreachable_identity_service_is_unauthenticated() {
    // Reserve a port, then free it so nothing is listening there.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = verifier(&format!("http://{addr}"))
        .verify(Some(&token("good")))
        .await;

    assert_eq!(result, Err(AuthFailure::Unauthenticated));
}

#[tokio::test]
async fn test_no_credential_makes_no_call() {
    let (base_url, seen) = spawn_identity_service().await;

    let result = verifier(&base_url).verify(None).await;

    assert_eq!(result, Err(AuthFailure::Unauthenticated));
    assert!(seen.calls().is_empty());
}

#[tokio::test]
async fn test_every_verification_hits_the_service() {
    let (base_url, seen) = spawn_identity_service().await;
    let verifier = verifier(&base_url);

    for _ in 0..3 {
        verifier.verify(Some(&token("good"))).await.unwrap();
    }

    assert_eq!(seen.calls().len(), 3);
}
