//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request errors render through each
//! crate's `IntoResponse`.

mod app;
mod config;
mod pages;

use anyhow::Context;
use auth::infra::service_account::ServiceAccountKey;
use auth::{AuthConfig, FirebaseSessionAuthority};
use axum::http::{self, Method, header};
use captcha::{CaptchaConfig, captcha_router};
use platform::http::{HttpClientConfig, build_client};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Settings;
use crate::pages::LoginPage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,captcha=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;

    // One outbound client for both providers
    let http_client = build_client(&HttpClientConfig::default())?;

    // Session authority (admin API + public key cache)
    let credentials = ServiceAccountKey::from_file(&settings.credentials_path)
        .with_context(|| {
            format!(
                "Failed to load service account from {}",
                settings.credentials_path.display()
            )
        })?;
    let authority = FirebaseSessionAuthority::new(
        http_client.clone(),
        settings.firebase_project_id.clone(),
        credentials,
    )?;

    let mut auth_config = AuthConfig::new(settings.firebase_project_id.clone());
    auth_config.cookie.secure = settings.cookie_secure;
    if !settings.cookie_secure {
        tracing::warn!("COOKIE_SECURE is off, session cookie will be sent over plain HTTP");
    }

    // CAPTCHA check
    let captcha_config = CaptchaConfig::new(
        settings.firebase_project_id.clone(),
        settings.recaptcha_api_key.clone(),
        settings.recaptcha_site_key.clone(),
    )
    .with_threshold(settings.score_threshold);

    tracing::info!(
        project_id = %settings.firebase_project_id,
        score_threshold = settings.score_threshold.value(),
        "Providers configured"
    );

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = settings
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Login page
    let login = LoginPage {
        recaptcha_site_key: settings.recaptcha_site_key.clone(),
        firebase_api_key: settings.firebase_api_key.clone().unwrap_or_default(),
    };
    if settings.firebase_api_key.is_none() {
        tracing::warn!("FIREBASE_API_KEY is not set, the login page cannot sign users in");
    }

    // Build router
    let app = app::app_router(
        authority,
        auth_config,
        captcha_router(http_client, captcha_config),
        login,
    )
    .layer(TraceLayer::new_for_http())
    .layer(cors);

    // Start server
    let addr = settings.bind_addr;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
