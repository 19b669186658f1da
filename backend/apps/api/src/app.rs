//! Router assembly
//!
//! `/api/*` endpoints, pages and `/healthz`, all behind the route guard.
//! CORS and request tracing are layered on in `main`.

use auth::AuthConfig;
use auth::auth_router_generic;
use auth::domain::repository::SessionAuthority;
use auth::middleware::{RouteGuardState, route_guard};
use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use std::sync::Arc;

use crate::pages::{LoginPage, pages_router};

/// Build the application router
///
/// `captcha` is the already-configured CAPTCHA router; it is mounted under
/// `/api` next to the session endpoints.
pub fn app_router<A>(
    authority: A,
    auth_config: AuthConfig,
    captcha: Router,
    login: LoginPage,
) -> Router
where
    A: SessionAuthority + Clone + Send + Sync + 'static,
{
    let guard = RouteGuardState::from_config(&auth_config);
    let pages = pages_router(
        Arc::new(authority.clone()),
        Arc::new(auth_config.clone()),
        login,
    );

    let api = Router::new()
        .merge(captcha)
        .merge(auth_router_generic(authority, auth_config));

    Router::new()
        .nest("/api", api)
        .merge(pages)
        .route("/healthz", get(healthz))
        .layer(from_fn_with_state(guard, route_guard))
}

async fn healthz() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth::domain::{IdToken, SessionClaims, SessionCookie};
    use auth::error::{AuthError, AuthResult, SessionRejection};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use captcha::CaptchaConfig;
    use std::time::Duration;
    use tower::ServiceExt;

    #[derive(Clone, Default)]
    struct StubAuthority;

    impl SessionAuthority for StubAuthority {
        async fn create_session_cookie(
            &self,
            _id_token: &IdToken,
            _valid_for: Duration,
        ) -> AuthResult<SessionCookie> {
            Err(AuthError::SessionCreation("stub".into()))
        }

        async fn verify_session_cookie(
            &self,
            cookie: &SessionCookie,
            _check_revoked: bool,
        ) -> AuthResult<SessionClaims> {
            if cookie.as_str() != "good-cookie" {
                return Err(SessionRejection::Expired.into());
            }
            Ok(SessionClaims {
                uid: "uid-1".into(),
                email: Some("ada@example.com".into()),
                email_verified: true,
                auth_time: 1_700_000_000,
                issued_at: 1_700_000_000,
                expires_at: 1_700_432_000,
                issuer: "https://session.firebase.google.com/demo".into(),
                audience: "demo".into(),
                sign_in_provider: Some("password".into()),
            })
        }
    }

    fn app() -> Router {
        let captcha = captcha::captcha_router(reqwest::Client::new(), CaptchaConfig::default());
        let login = LoginPage {
            recaptcha_site_key: "site-key".into(),
            firebase_api_key: "web-key".into(),
        };
        app_router(StubAuthority, AuthConfig::development("demo"), captcha, login)
    }

    async fn get_page(path: &str, cookie: Option<&str>) -> Response {
        let mut request = Request::builder().uri(path);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        app()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn text_of(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_healthz() {
        let response = get_page("/healthz", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(text_of(response).await, "ok");
    }

    #[tokio::test]
    async fn test_home_without_cookie_redirects() {
        let response = get_page("/", None).await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/login");
    }

    #[tokio::test]
    async fn test_home_greets_verified_user() {
        let response = get_page("/", Some("session=good-cookie")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(text_of(response).await.contains("Welcome, ada@example.com"));
    }

    #[tokio::test]
    async fn test_home_with_stale_cookie_still_renders() {
        let response = get_page("/", Some("session=stale")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = text_of(response).await;
        assert!(body.contains("<h1>Welcome</h1>"));
    }

    #[tokio::test]
    async fn test_login_with_cookie_redirects_home() {
        let response = get_page("/login", Some("session=anything")).await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/");
    }

    #[tokio::test]
    async fn test_login_page_runs_log_in_flow() {
        let response = get_page("/login", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = text_of(response).await;
        let form = r#"<form id="login-form" data-site-key="site-key" data-api-key="web-key">"#;
        assert!(body.contains(form));
        assert!(body.contains("recaptcha/enterprise.js?render=site-key"));
        assert!(body.contains(r#"name="password" type="password""#));
        assert!(body.contains("/api/captcha-check"));
        assert!(body.contains("/api/log-in"));
        assert!(body.contains(r#"action: "LOGIN""#));
    }

    #[tokio::test]
    async fn test_sign_out_is_not_guarded() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/sign-out")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(header::SET_COOKIE));
    }

    #[tokio::test]
    async fn test_me_without_cookie_is_unauthorized() {
        let response = get_page("/api/me", None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
