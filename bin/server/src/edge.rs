//! Edge access filter middleware.
//!
//! Rejects requests for protected paths that carry no credential before the
//! application renders. Installed with `axum::middleware::from_fn_with_state`.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use compliance_console_session::edge::{self, EdgeDecision};
use tracing::debug;

/// Middleware state.
#[derive(Debug, Clone)]
pub struct EdgeSettings {
    access_cookie: String,
}

impl EdgeSettings {
    /// Creates settings reading the credential from `access_cookie`.
    #[must_use]
    pub fn new(access_cookie: impl Into<String>) -> Self {
        Self {
            access_cookie: access_cookie.into(),
        }
    }

    #[must_use]
    pub fn access_cookie(&self) -> &str {
        &self.access_cookie
    }
}

/// Redirects credential-less requests for protected paths to the login page.
pub async fn edge_access_filter(
    State(settings): State<EdgeSettings>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let uri = request.uri();
    let path_and_query = uri
        .path_and_query()
        .map_or_else(|| uri.path(), |pq| pq.as_str());
    let cookie = jar.get(settings.access_cookie()).map(|c| c.value());
    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let decision = edge::evaluate(
        path_and_query,
        edge::bearer_credential(cookie, authorization),
    );

    debug!(path = %request.uri().path(), ?decision, "edge access decision");

    match decision {
        EdgeDecision::Allow => next.run(request).await,
        EdgeDecision::RedirectToLogin { location } => Redirect::to(&location).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{StatusCode, header};
    use axum::middleware::from_fn_with_state;
    use axum::routing::get;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/", get(|| async { "home" }))
            .route("/assets", get(|| async { "assets" }))
            .route("/admin", get(|| async { "admin" }))
            .route("/login", get(|| async { "login" }))
            .layer(from_fn_with_state(
                EdgeSettings::new("accessToken"),
                edge_access_filter,
            ))
    }

    async fn send(request: axum::http::Request<Body>) -> Response {
        app().oneshot(request).await.expect("infallible")
    }

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .expect("location header")
    }

    #[tokio::test]
    async fn protected_path_without_credential_redirects_to_login() {
        let response = send(
            axum::http::Request::builder()
                .uri("/assets")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login?from=%2Fassets");
    }

    #[tokio::test]
    async fn redirect_preserves_query() {
        let response = send(
            axum::http::Request::builder()
                .uri("/admin?tab=users")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(location(&response), "/login?from=%2Fadmin%3Ftab%3Dusers");
    }

    #[tokio::test]
    async fn login_is_reachable_without_credential() {
        let response = send(
            axum::http::Request::builder()
                .uri("/login")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"login");
    }

    #[tokio::test]
    async fn cookie_credential_is_admitted() {
        let response = send(
            axum::http::Request::builder()
                .uri("/assets")
                .header(header::COOKIE, "theme=dark; accessToken=abc.def.ghi")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn bearer_header_is_admitted() {
        let response = send(
            axum::http::Request::builder()
                .uri("/")
                .header(header::AUTHORIZATION, "Bearer abc.def.ghi")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn empty_cookie_is_not_a_credential() {
        let response = send(
            axum::http::Request::builder()
                .uri("/admin")
                .header(header::COOKIE, "accessToken=")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }
}
