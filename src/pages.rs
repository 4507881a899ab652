use axum::{extract::Query, http::Uri, response::Html};
use serde::Deserialize;

use crate::identity::Identity;

// Server-rendered pages are HTML shells only; the frontend owns their markup. What
// matters here is that guarded pages are never produced for a denied request.

fn shell(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>{title} | PropGroup</title></head>\
         <body><main data-page=\"{title}\">{body}</main></body></html>"
    ))
}

fn escape_html(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&#39;".to_string(),
            other => other.to_string(),
        })
        .collect()
}

/// True for a path on this site. Anything a browser could read as another host is
/// refused, including `//host` and `/\host` in plain or percent-encoded form.
fn is_same_site_path(next: &str) -> bool {
    if !next.starts_with('/') || next.chars().any(|c| c.is_control() || c == '\\') {
        return false;
    }

    let after_slash = next[1..].to_ascii_lowercase();
    if ["/", "%2f", "%5c"]
        .iter()
        .any(|prefix| after_slash.starts_with(prefix))
    {
        return false;
    }

    next.parse::<Uri>()
        .is_ok_and(|uri| uri.scheme().is_none() && uri.authority().is_none())
}

#[derive(Deserialize)]
pub struct LoginParams {
    next: Option<String>,
}

pub async fn login_page(Query(params): Query<LoginParams>) -> Html<String> {
    // Only same-site paths are honoured as a post-login destination.
    let next = params
        .next
        .filter(|next| is_same_site_path(next))
        .unwrap_or_else(|| "/portal".to_string());
    shell(
        "Sign in",
        &format!(
            "<form method=\"post\" action=\"/auth/login\" data-next=\"{}\"></form>",
            escape_html(&next)
        ),
    )
}

pub async fn banned_page() -> Html<String> {
    shell("Account suspended", "<p>This account has been suspended.</p>")
}

pub async fn unauthorized_page() -> Html<String> {
    shell("Unauthorized", "<p>You do not have access to this page.</p>")
}

pub async fn portal_page(identity: Identity) -> Html<String> {
    shell(
        "Investor portal",
        &format!("<p>Signed in as {}</p>", escape_html(&identity.email)),
    )
}

pub async fn admin_page(identity: Identity) -> Html<String> {
    shell(
        "Admin",
        &format!("<p>Administrator {}</p>", escape_html(&identity.email)),
    )
}

pub async fn admin_users_page(identity: Identity) -> Html<String> {
    shell(
        "User management",
        &format!("<p>Super administrator {}</p>", escape_html(&identity.email)),
    )
}
