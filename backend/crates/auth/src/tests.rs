//! Unit tests for Auth crate

#[cfg(test)]
mod fixtures {
    use crate::domain::entity::session_claims::SessionClaims;
    use crate::domain::repository::SessionAuthority;
    use crate::domain::value_object::{id_token::IdToken, session_cookie::SessionCookie};
    use crate::error::{AuthError, AuthResult, SessionRejection};
    use crate::infra::public_keys::{KeySet, public_key_from_certificate};
    use crate::infra::service_account::ServiceAccountKey;
    use rsa::pkcs1v15::SigningKey;
    use serde_json::json;
    use sha2::Sha256;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    pub const SIGNER_KEY_PEM: &str = include_str!("testdata/signer_key.pem");
    pub const SIGNER_CERT_PEM: &str = include_str!("testdata/signer_cert.pem");
    pub const KID: &str = "k1";
    pub const PROJECT: &str = "demo-project";
    pub const NOW: i64 = 1_700_000_000;

    pub fn service_account() -> ServiceAccountKey {
        ServiceAccountKey::from_json(
            &json!({
                "type": "service_account",
                "project_id": PROJECT,
                "private_key_id": KID,
                "private_key": SIGNER_KEY_PEM,
                "client_email": "admin@demo-project.iam.gserviceaccount.com",
            })
            .to_string(),
        )
        .unwrap()
    }

    pub fn signing_key() -> SigningKey<Sha256> {
        service_account().signing_key().unwrap()
    }

    pub fn key_set() -> KeySet {
        let mut keys = KeySet::default();
        keys.insert(KID, public_key_from_certificate(SIGNER_CERT_PEM).unwrap());
        keys
    }

    pub fn session_payload() -> serde_json::Value {
        json!({
            "iss": format!("https://session.firebase.google.com/{PROJECT}"),
            "aud": PROJECT,
            "auth_time": NOW - 30,
            "user_id": "uid-123",
            "sub": "uid-123",
            "iat": NOW - 10,
            "exp": NOW + 432_000,
            "email": "user@example.com",
            "email_verified": true,
            "firebase": {
                "identities": { "email": ["user@example.com"] },
                "sign_in_provider": "password"
            }
        })
    }

    pub fn claims() -> SessionClaims {
        SessionClaims {
            uid: "uid-123".into(),
            email: Some("user@example.com".into()),
            email_verified: true,
            auth_time: NOW - 30,
            issued_at: NOW - 10,
            expires_at: NOW + 432_000,
            issuer: format!("https://session.firebase.google.com/{PROJECT}"),
            audience: PROJECT.into(),
            sign_in_provider: Some("password".into()),
        }
    }

    /// In-memory authority: `good-id-token` mints `cookie-N`, `good-cookie`
    /// verifies, everything else fails
    #[derive(Clone, Default)]
    pub struct FakeAuthority {
        pub creates: Arc<AtomicUsize>,
        pub verifies: Arc<AtomicUsize>,
        pub last_check_revoked: Arc<std::sync::Mutex<Option<bool>>>,
    }

    impl FakeAuthority {
        pub fn creates(&self) -> usize {
            self.creates.load(Ordering::SeqCst)
        }

        pub fn verifies(&self) -> usize {
            self.verifies.load(Ordering::SeqCst)
        }
    }

    impl SessionAuthority for FakeAuthority {
        async fn create_session_cookie(
            &self,
            id_token: &IdToken,
            valid_for: Duration,
        ) -> AuthResult<SessionCookie> {
            let n = self.creates.fetch_add(1, Ordering::SeqCst);
            assert_eq!(valid_for, Duration::from_secs(432_000));
            if id_token.as_str() == "good-id-token" {
                Ok(SessionCookie::parse(format!("cookie-{n}")).unwrap())
            } else {
                Err(AuthError::Provider {
                    status: 400,
                    message: "INVALID_ID_TOKEN".into(),
                })
            }
        }

        async fn verify_session_cookie(
            &self,
            cookie: &SessionCookie,
            check_revoked: bool,
        ) -> AuthResult<SessionClaims> {
            self.verifies.fetch_add(1, Ordering::SeqCst);
            *self.last_check_revoked.lock().unwrap() = Some(check_revoked);
            if cookie.as_str() == "good-cookie" {
                Ok(claims())
            } else {
                Err(SessionRejection::Expired.into())
            }
        }
    }
}

#[cfg(test)]
mod jwt_tests {
    use super::fixtures::*;
    use crate::error::SessionRejection;
    use crate::infra::jwt::{JwtHeader, sign_rs256, verify_session_jwt};
    use platform::crypto::{from_base64_url, to_base64_url};

    fn sign(payload: &serde_json::Value) -> String {
        sign_rs256(&signing_key(), Some(KID), payload).unwrap()
    }

    #[test]
    fn test_valid_session_cookie() {
        let token = sign(&session_payload());
        let verified = verify_session_jwt(&token, &key_set(), PROJECT, NOW).unwrap();
        assert_eq!(verified, claims());
    }

    #[test]
    fn test_header_shape() {
        let token = sign(&session_payload());
        let header_b64 = token.split('.').next().unwrap();
        let header: JwtHeader =
            serde_json::from_slice(&from_base64_url(header_b64).unwrap()).unwrap();
        assert_eq!(header.alg, "RS256");
        assert_eq!(header.kid.as_deref(), Some(KID));
    }

    #[test]
    fn test_wrong_audience() {
        let mut payload = session_payload();
        payload["aud"] = "other-project".into();
        assert_eq!(
            verify_session_jwt(&sign(&payload), &key_set(), PROJECT, NOW),
            Err(SessionRejection::InvalidAudience("other-project".into()))
        );
    }

    #[test]
    fn test_wrong_issuer() {
        let mut payload = session_payload();
        payload["iss"] = format!("https://securetoken.google.com/{PROJECT}").into();
        assert!(matches!(
            verify_session_jwt(&sign(&payload), &key_set(), PROJECT, NOW),
            Err(SessionRejection::InvalidIssuer(_))
        ));
    }

    #[test]
    fn test_expired() {
        let token = sign(&session_payload());
        assert_eq!(
            verify_session_jwt(&token, &key_set(), PROJECT, NOW + 432_000),
            Err(SessionRejection::Expired)
        );
    }

    #[test]
    fn test_issued_in_future() {
        let mut payload = session_payload();
        payload["iat"] = (NOW + 3600).into();
        assert_eq!(
            verify_session_jwt(&sign(&payload), &key_set(), PROJECT, NOW),
            Err(SessionRejection::IssuedInFuture)
        );
    }

    #[test]
    fn test_authenticated_in_future() {
        let mut payload = session_payload();
        payload["auth_time"] = (NOW + 3600).into();
        assert_eq!(
            verify_session_jwt(&sign(&payload), &key_set(), PROJECT, NOW),
            Err(SessionRejection::AuthenticatedInFuture)
        );

        // Inside the allowed clock skew
        payload["auth_time"] = (NOW + 30).into();
        assert!(verify_session_jwt(&sign(&payload), &key_set(), PROJECT, NOW).is_ok());
    }

    #[test]
    fn test_subject_rules() {
        let mut payload = session_payload();
        payload["sub"] = "".into();
        assert_eq!(
            verify_session_jwt(&sign(&payload), &key_set(), PROJECT, NOW),
            Err(SessionRejection::InvalidSubject)
        );

        payload["sub"] = "x".repeat(129).into();
        assert_eq!(
            verify_session_jwt(&sign(&payload), &key_set(), PROJECT, NOW),
            Err(SessionRejection::InvalidSubject)
        );
    }

    #[test]
    fn test_unknown_kid() {
        let token = sign_rs256(&signing_key(), Some("rotated-away"), &session_payload()).unwrap();
        assert_eq!(
            verify_session_jwt(&token, &key_set(), PROJECT, NOW),
            Err(SessionRejection::UnknownKeyId("rotated-away".into()))
        );
    }

    #[test]
    fn test_tampered_payload() {
        let token = sign(&session_payload());
        let parts: Vec<&str> = token.split('.').collect();

        let mut forged = session_payload();
        forged["sub"] = "someone-else".into();
        let forged_b64 = to_base64_url(forged.to_string().as_bytes());

        let tampered = format!("{}.{}.{}", parts[0], forged_b64, parts[2]);
        assert_eq!(
            verify_session_jwt(&tampered, &key_set(), PROJECT, NOW),
            Err(SessionRejection::InvalidSignature)
        );
    }

    #[test]
    fn test_alg_none_rejected() {
        let header = to_base64_url(br#"{"alg":"none","kid":"k1"}"#);
        let payload = to_base64_url(session_payload().to_string().as_bytes());
        let token = format!("{header}.{payload}.");
        assert_eq!(
            verify_session_jwt(&token, &key_set(), PROJECT, NOW),
            Err(SessionRejection::UnsupportedAlgorithm("none".into()))
        );
    }

    #[test]
    fn test_malformed() {
        for token in ["", "abc", "a.b", "a.b.c.d", "!!.??.**"] {
            assert_eq!(
                verify_session_jwt(token, &key_set(), PROJECT, NOW),
                Err(SessionRejection::Malformed),
                "token {token:?}"
            );
        }
    }
}

#[cfg(test)]
mod service_account_tests {
    use super::fixtures::*;
    use crate::infra::service_account::{ADMIN_SCOPES, AccessTokenSource, AssertionClaims};
    use platform::crypto::from_base64_url;

    #[test]
    fn test_defaults_and_redaction() {
        let key = service_account();
        assert_eq!(key.token_uri, "https://oauth2.googleapis.com/token");
        let debug = format!("{key:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("BEGIN PRIVATE KEY"));
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(crate::infra::service_account::ServiceAccountKey::from_json("{}").is_err());
    }

    #[test]
    fn test_assertion_claims() {
        let source = AccessTokenSource::new(reqwest::Client::new(), service_account()).unwrap();
        let assertion = source.assertion(NOW).unwrap();

        let payload_b64 = assertion.split('.').nth(1).unwrap();
        let claims: AssertionClaims =
            serde_json::from_slice(&from_base64_url(payload_b64).unwrap()).unwrap();

        assert_eq!(
            claims,
            AssertionClaims {
                iss: "admin@demo-project.iam.gserviceaccount.com".into(),
                scope: ADMIN_SCOPES.into(),
                aud: "https://oauth2.googleapis.com/token".into(),
                iat: NOW,
                exp: NOW + 3600,
            }
        );
    }
}

#[cfg(test)]
mod public_key_tests {
    use super::fixtures::*;
    use crate::infra::public_keys::{KeySet, PublicKeyCache};
    use std::collections::HashMap;

    #[test]
    fn test_key_set_from_certificates() {
        let certs = HashMap::from([(KID.to_string(), SIGNER_CERT_PEM.to_string())]);
        let keys = KeySet::from_certificates(&certs).unwrap();
        assert_eq!(keys.len(), 1);
        assert!(keys.get(KID).is_some());
        assert!(keys.get("missing").is_none());
    }

    #[test]
    fn test_garbage_certificate_rejected() {
        let certs = HashMap::from([(KID.to_string(), "not a certificate".to_string())]);
        assert!(KeySet::from_certificates(&certs).is_err());
    }

    #[tokio::test]
    async fn test_preloaded_cache_never_fetches() {
        let cache = PublicKeyCache::preloaded(reqwest::Client::new(), key_set());
        let first = cache.keys().await.unwrap();
        let second = cache.keys().await.unwrap();
        assert!(std::sync::Arc::ptr_eq(&first, &second));
        assert!(first.get(KID).is_some());
    }
}

#[cfg(test)]
mod provider_tests {
    use super::fixtures::*;
    use crate::domain::repository::SessionAuthority;
    use crate::domain::value_object::{id_token::IdToken, session_cookie::SessionCookie};
    use crate::error::{AuthError, SessionRejection};
    use crate::infra::identity_toolkit::{FirebaseSessionAuthority, ProviderEndpoints};
    use crate::infra::jwt::sign_rs256;
    use crate::infra::public_keys::PublicKeyCache;
    use crate::infra::service_account::AccessTokenSource;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode, Uri, header};
    use axum::response::{IntoResponse, Response};
    use axum::routing::{get, post};
    use axum::{Form, Json, Router};
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Admin call as seen by the provider: path, `Authorization`, body
    type AdminCall = (String, Option<String>, Value);

    /// Token, key and admin endpoints served from 127.0.0.1
    #[derive(Clone)]
    struct MockProvider {
        keys_cache_control: Option<&'static str>,
        token_expires_in: u64,
        users: Value,
        token_calls: Arc<AtomicUsize>,
        grant_types: Arc<Mutex<Vec<String>>>,
        key_calls: Arc<AtomicUsize>,
        admin_calls: Arc<Mutex<Vec<AdminCall>>>,
    }

    impl MockProvider {
        fn new() -> Self {
            Self {
                keys_cache_control: None,
                token_expires_in: 3600,
                users: json!([{ "localId": "uid-123", "disabled": false }]),
                token_calls: Arc::new(AtomicUsize::new(0)),
                grant_types: Arc::new(Mutex::new(Vec::new())),
                key_calls: Arc::new(AtomicUsize::new(0)),
                admin_calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// Serve in the background and return the base URL
        async fn spawn(&self) -> String {
            let app = Router::new()
                .route("/token", post(token))
                .route("/keys", get(keys))
                .route("/unavailable", get(|| async { StatusCode::SERVICE_UNAVAILABLE }))
                .fallback(admin)
                .with_state(self.clone());

            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
            format!("http://{addr}")
        }

        fn token_calls(&self) -> usize {
            self.token_calls.load(Ordering::SeqCst)
        }

        fn key_calls(&self) -> usize {
            self.key_calls.load(Ordering::SeqCst)
        }

        fn admin_calls(&self) -> Vec<AdminCall> {
            self.admin_calls.lock().unwrap().clone()
        }
    }

    async fn token(
        State(mock): State<MockProvider>,
        Form(form): Form<HashMap<String, String>>,
    ) -> Json<Value> {
        let n = mock.token_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(grant) = form.get("grant_type") {
            mock.grant_types.lock().unwrap().push(grant.clone());
        }
        Json(json!({
            "access_token": format!("at-{n}"),
            "expires_in": mock.token_expires_in,
            "token_type": "Bearer"
        }))
    }

    async fn keys(State(mock): State<MockProvider>) -> Response {
        mock.key_calls.fetch_add(1, Ordering::SeqCst);
        let body = Json(HashMap::from([(KID, SIGNER_CERT_PEM)]));
        match mock.keys_cache_control {
            Some(value) => ([(header::CACHE_CONTROL, value)], body).into_response(),
            None => body.into_response(),
        }
    }

    async fn admin(
        State(mock): State<MockProvider>,
        uri: Uri,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Response {
        let path = uri.path().to_string();
        let bearer = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        mock.admin_calls
            .lock()
            .unwrap()
            .push((path.clone(), bearer, body));

        if path.ends_with(":createSessionCookie") {
            Json(json!({ "sessionCookie": "minted-cookie" })).into_response()
        } else if path.ends_with("/accounts:lookup") {
            Json(json!({ "users": mock.users })).into_response()
        } else {
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": { "message": "NOT_FOUND" } })),
            )
                .into_response()
        }
    }

    fn authority(base: &str) -> FirebaseSessionAuthority {
        let mut credentials = service_account();
        credentials.token_uri = format!("{base}/token");
        let endpoints = ProviderEndpoints {
            identity_toolkit: base.to_string(),
            public_keys: format!("{base}/keys"),
        };
        FirebaseSessionAuthority::with_endpoints(
            reqwest::Client::new(),
            PROJECT,
            credentials,
            endpoints,
        )
        .unwrap()
    }

    /// Session cookie signed for the current clock, authenticated 5 minutes ago
    fn live_cookie() -> (SessionCookie, i64) {
        let now = chrono::Utc::now().timestamp();
        let mut payload = session_payload();
        payload["auth_time"] = json!(now - 300);
        payload["iat"] = json!(now - 10);
        payload["exp"] = json!(now + 3600);
        let jwt = sign_rs256(&signing_key(), Some(KID), &payload).unwrap();
        (SessionCookie::parse(jwt).unwrap(), now)
    }

    #[tokio::test]
    async fn test_create_session_cookie_request() {
        let mock = MockProvider::new();
        let base = mock.spawn().await;

        let cookie = authority(&base)
            .create_session_cookie(
                &IdToken::new("tok".to_string()).unwrap(),
                Duration::from_secs(432_000),
            )
            .await
            .unwrap();
        assert_eq!(cookie.as_str(), "minted-cookie");

        let calls = mock.admin_calls();
        assert_eq!(calls.len(), 1);
        let (path, bearer, body) = &calls[0];
        assert_eq!(path, &format!("/v1/projects/{PROJECT}:createSessionCookie"));
        assert_eq!(bearer.as_deref(), Some("Bearer at-0"));
        assert_eq!(body, &json!({ "idToken": "tok", "validDuration": "432000" }));
        assert_eq!(
            *mock.grant_types.lock().unwrap(),
            vec!["urn:ietf:params:oauth:grant-type:jwt-bearer".to_string()]
        );
    }

    #[tokio::test]
    async fn test_verify_with_revocation_check_looks_up_account() {
        let mock = MockProvider::new();
        let base = mock.spawn().await;
        let (cookie, _) = live_cookie();

        let claims = authority(&base)
            .verify_session_cookie(&cookie, true)
            .await
            .unwrap();
        assert_eq!(claims.uid, "uid-123");

        let calls = mock.admin_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, format!("/v1/projects/{PROJECT}/accounts:lookup"));
        assert_eq!(calls[0].2, json!({ "localId": ["uid-123"] }));
    }

    #[tokio::test]
    async fn test_verify_without_revocation_check_skips_admin_api() {
        let mock = MockProvider::new();
        let base = mock.spawn().await;
        let authority = authority(&base);
        let (cookie, _) = live_cookie();

        authority.verify_session_cookie(&cookie, false).await.unwrap();
        authority.verify_session_cookie(&cookie, false).await.unwrap();

        assert!(mock.admin_calls().is_empty());
        assert_eq!(mock.token_calls(), 0);
        assert_eq!(mock.key_calls(), 1);
    }

    #[tokio::test]
    async fn test_tokens_revoked_after_sign_in() {
        let mut mock = MockProvider::new();
        let (cookie, now) = live_cookie();
        mock.users = json!([{ "localId": "uid-123", "validSince": now.to_string() }]);
        let base = mock.spawn().await;

        let err = authority(&base)
            .verify_session_cookie(&cookie, true)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AuthError::SessionRejected(SessionRejection::Revoked)
        ));
    }

    #[tokio::test]
    async fn test_tokens_revoked_before_sign_in_pass() {
        let mut mock = MockProvider::new();
        let (cookie, now) = live_cookie();
        mock.users = json!([{ "localId": "uid-123", "validSince": (now - 3600).to_string() }]);
        let base = mock.spawn().await;

        assert!(authority(&base).verify_session_cookie(&cookie, true).await.is_ok());
    }

    #[tokio::test]
    async fn test_disabled_account_rejected() {
        let mut mock = MockProvider::new();
        mock.users = json!([{ "localId": "uid-123", "disabled": true }]);
        let base = mock.spawn().await;
        let (cookie, _) = live_cookie();

        let err = authority(&base)
            .verify_session_cookie(&cookie, true)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AuthError::SessionRejected(SessionRejection::UserDisabled)
        ));
    }

    #[tokio::test]
    async fn test_deleted_account_rejected() {
        let mut mock = MockProvider::new();
        mock.users = json!([]);
        let base = mock.spawn().await;
        let (cookie, _) = live_cookie();

        let err = authority(&base)
            .verify_session_cookie(&cookie, true)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AuthError::SessionRejected(SessionRejection::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn test_key_cache_honours_max_age() {
        let mut mock = MockProvider::new();
        mock.keys_cache_control = Some("public, max-age=0, must-revalidate");
        let base = mock.spawn().await;
        let cache = PublicKeyCache::new(reqwest::Client::new(), format!("{base}/keys"));

        assert!(cache.keys().await.unwrap().get(KID).is_some());
        cache.keys().await.unwrap();
        assert_eq!(mock.key_calls(), 2);
    }

    #[tokio::test]
    async fn test_key_cache_reuses_fresh_keys() {
        let mut mock = MockProvider::new();
        mock.keys_cache_control = Some("public, max-age=19000");
        let base = mock.spawn().await;
        let cache = PublicKeyCache::new(reqwest::Client::new(), format!("{base}/keys"));

        let first = cache.keys().await.unwrap();
        let second = cache.keys().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(mock.key_calls(), 1);
    }

    #[tokio::test]
    async fn test_key_cache_without_cache_control_uses_fallback() {
        let mock = MockProvider::new();
        let base = mock.spawn().await;
        let cache = PublicKeyCache::new(reqwest::Client::new(), format!("{base}/keys"));

        cache.keys().await.unwrap();
        cache.keys().await.unwrap();
        assert_eq!(mock.key_calls(), 1);
    }

    #[tokio::test]
    async fn test_key_fetch_failure_is_provider_error() {
        let mock = MockProvider::new();
        let base = mock.spawn().await;
        let cache = PublicKeyCache::new(reqwest::Client::new(), format!("{base}/unavailable"));

        assert!(matches!(
            cache.keys().await,
            Err(AuthError::Provider { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn test_access_token_is_cached() {
        let mock = MockProvider::new();
        let base = mock.spawn().await;
        let mut credentials = service_account();
        credentials.token_uri = format!("{base}/token");
        let source = AccessTokenSource::new(reqwest::Client::new(), credentials).unwrap();

        assert_eq!(source.access_token().await.unwrap(), "at-0");
        assert_eq!(source.access_token().await.unwrap(), "at-0");
        assert_eq!(mock.token_calls(), 1);
    }

    #[tokio::test]
    async fn test_access_token_near_expiry_is_refreshed() {
        let mut mock = MockProvider::new();
        mock.token_expires_in = 30;
        let base = mock.spawn().await;
        let mut credentials = service_account();
        credentials.token_uri = format!("{base}/token");
        let source = AccessTokenSource::new(reqwest::Client::new(), credentials).unwrap();

        assert_eq!(source.access_token().await.unwrap(), "at-0");
        assert_eq!(source.access_token().await.unwrap(), "at-1");
        assert_eq!(mock.token_calls(), 2);
    }
}

#[cfg(test)]
mod use_case_tests {
    use super::fixtures::*;
    use crate::application::config::AuthConfig;
    use crate::application::{CurrentUserUseCase, IssueSessionUseCase};
    use crate::error::AuthError;
    use std::sync::Arc;

    fn config() -> Arc<AuthConfig> {
        Arc::new(AuthConfig::new(PROJECT))
    }

    #[tokio::test]
    async fn test_current_user_without_cookie_skips_provider() {
        let fake = FakeAuthority::default();
        let use_case = CurrentUserUseCase::new(Arc::new(fake.clone()), config());

        assert_eq!(use_case.current_user(None).await, None);
        assert_eq!(use_case.current_user(Some("")).await, None);
        assert_eq!(fake.verifies(), 0);
    }

    #[tokio::test]
    async fn test_current_user_verifies_with_revocation_check() {
        let fake = FakeAuthority::default();
        let use_case = CurrentUserUseCase::new(Arc::new(fake.clone()), config());

        let user = use_case.current_user(Some("good-cookie")).await;
        assert_eq!(user.map(|c| c.uid), Some("uid-123".to_string()));
        assert_eq!(*fake.last_check_revoked.lock().unwrap(), Some(true));
    }

    #[tokio::test]
    async fn test_current_user_swallows_errors() {
        let fake = FakeAuthority::default();
        let use_case = CurrentUserUseCase::new(Arc::new(fake.clone()), config());

        assert_eq!(use_case.current_user(Some("stale-cookie")).await, None);
        assert_eq!(fake.verifies(), 1);
    }

    #[tokio::test]
    async fn test_issue_session_requires_token() {
        let fake = FakeAuthority::default();
        let use_case = IssueSessionUseCase::new(Arc::new(fake.clone()), config());

        assert!(matches!(
            use_case.execute(None).await,
            Err(AuthError::MissingIdToken)
        ));
        assert!(matches!(
            use_case.execute(Some("   ".into())).await,
            Err(AuthError::MissingIdToken)
        ));
        assert_eq!(fake.creates(), 0);
    }

    #[tokio::test]
    async fn test_issue_session_masks_provider_failure() {
        let fake = FakeAuthority::default();
        let use_case = IssueSessionUseCase::new(Arc::new(fake), config());

        let err = use_case.execute(Some("bad".into())).await.unwrap_err();
        assert!(matches!(err, AuthError::SessionCreation(_)));
        assert_eq!(err.public_message(), "Failed to create session cookie");
    }

    #[tokio::test]
    async fn test_each_log_in_mints_a_new_cookie() {
        let fake = FakeAuthority::default();
        let use_case = IssueSessionUseCase::new(Arc::new(fake), config());

        let first = use_case.execute(Some("good-id-token".into())).await.unwrap();
        let second = use_case.execute(Some("good-id-token".into())).await.unwrap();
        assert_ne!(first.set_cookie, second.set_cookie);
        assert!(first.set_cookie.starts_with("session=cookie-0;"));
    }
}

#[cfg(test)]
mod router_tests {
    use super::fixtures::*;
    use crate::application::config::AuthConfig;
    use crate::presentation::router::auth_router_generic;
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app() -> Router {
        auth_router_generic(FakeAuthority::default(), AuthConfig::new(PROJECT))
    }

    async fn send(request: Request<Body>) -> Response {
        app().oneshot(request).await.unwrap()
    }

    async fn json_of(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_log_in_sets_cookie() {
        let response = send(post_json("/log-in", json!({ "idToken": "good-id-token" }))).await;

        assert_eq!(response.status(), StatusCode::OK);
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
        assert_eq!(
            set_cookie,
            "session=cookie-0; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=432000"
        );
        assert_eq!(json_of(response).await, json!({ "message": "Logged in" }));
    }

    #[tokio::test]
    async fn test_log_in_without_content_type() {
        let response = send(
            Request::builder()
                .method("POST")
                .uri("/log-in")
                .body(Body::from(json!({ "idToken": "good-id-token" }).to_string()))
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(header::SET_COOKIE));
        assert_eq!(json_of(response).await, json!({ "message": "Logged in" }));
    }

    #[tokio::test]
    async fn test_log_in_unparseable_body_is_missing_token() {
        let response = send(
            Request::builder()
                .method("POST")
                .uri("/log-in")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_of(response).await, json!({ "error": "ID token is required" }));
    }

    #[tokio::test]
    async fn test_log_in_missing_token() {
        let response = send(post_json("/log-in", json!({}))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        assert_eq!(json_of(response).await, json!({ "error": "ID token is required" }));
    }

    #[tokio::test]
    async fn test_log_in_provider_failure() {
        let response = send(post_json("/log-in", json!({ "idToken": "expired" }))).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_of(response).await,
            json!({ "error": "Failed to create session cookie" })
        );
    }

    #[tokio::test]
    async fn test_sign_out_is_idempotent() {
        let sign_out = || {
            Request::builder()
                .method("POST")
                .uri("/sign-out")
                .body(Body::empty())
                .unwrap()
        };

        let first = send(sign_out()).await;
        let second = send(sign_out()).await;

        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(
            first.headers()[header::SET_COOKIE],
            second.headers()[header::SET_COOKIE]
        );
        assert_eq!(
            first.headers()[header::SET_COOKIE],
            "session=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=0"
        );
        assert_eq!(json_of(first).await, json!({ "message": "Logged out" }));
    }

    #[tokio::test]
    async fn test_me() {
        let anonymous = send(Request::builder().uri("/me").body(Body::empty()).unwrap()).await;
        assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_of(anonymous).await, json!({ "error": "Not authenticated" }));

        let signed_in = send(
            Request::builder()
                .uri("/me")
                .header(header::COOKIE, "theme=dark; session=good-cookie")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(signed_in.status(), StatusCode::OK);
        let body = json_of(signed_in).await;
        assert_eq!(body["uid"], "uid-123");
        assert_eq!(body["emailVerified"], true);
    }
}

#[cfg(test)]
mod guard_tests {
    use crate::application::config::AuthConfig;
    use crate::presentation::middleware::{RouteGuardState, route_guard};
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::middleware::from_fn_with_state;
    use axum::routing::get;
    use tower::ServiceExt;

    fn app() -> Router {
        let state = RouteGuardState::from_config(&AuthConfig::new("demo"));
        Router::new()
            .route("/", get(|| async { "home" }))
            .route("/dashboard", get(|| async { "dashboard" }))
            .route("/login", get(|| async { "login" }))
            .route("/api/me", get(|| async { "api" }))
            .route("/static/app.js", get(|| async { "js" }))
            .route("/logo.png", get(|| async { "png" }))
            .layer(from_fn_with_state(state, route_guard))
    }

    async fn visit(path: &str, cookie: Option<&str>) -> (StatusCode, Option<String>) {
        let mut request = Request::builder().uri(path);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let response = app()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        (response.status(), location)
    }

    #[tokio::test]
    async fn test_protected_without_cookie_redirects_to_login() {
        assert_eq!(
            visit("/", None).await,
            (StatusCode::TEMPORARY_REDIRECT, Some("/login".into()))
        );
        assert_eq!(
            visit("/dashboard", None).await,
            (StatusCode::TEMPORARY_REDIRECT, Some("/login".into()))
        );
    }

    #[tokio::test]
    async fn test_empty_cookie_counts_as_absent() {
        assert_eq!(
            visit("/dashboard", Some("session=")).await,
            (StatusCode::TEMPORARY_REDIRECT, Some("/login".into()))
        );
    }

    #[tokio::test]
    async fn test_protected_with_cookie_passes() {
        // Presence only: the value is never verified
        assert_eq!(
            visit("/dashboard", Some("session=anything")).await,
            (StatusCode::OK, None)
        );
    }

    #[tokio::test]
    async fn test_login_with_cookie_redirects_home() {
        assert_eq!(
            visit("/login", Some("session=abc")).await,
            (StatusCode::TEMPORARY_REDIRECT, Some("/".into()))
        );
    }

    #[tokio::test]
    async fn test_login_without_cookie_passes() {
        assert_eq!(visit("/login", None).await, (StatusCode::OK, None));
    }

    #[tokio::test]
    async fn test_unguarded_paths_never_redirect() {
        for path in ["/api/me", "/static/app.js", "/logo.png"] {
            assert_eq!(visit(path, None).await, (StatusCode::OK, None), "{path}");
            assert_eq!(
                visit(path, Some("session=abc")).await,
                (StatusCode::OK, None),
                "{path}"
            );
        }
    }
}
