//! CAPTCHA Router

use crate::application::config::CaptchaConfig;
use crate::domain::repository::RiskAssessor;
use crate::infra::recaptcha::RecaptchaEnterpriseClient;
use crate::presentation::handlers::{self, CaptchaAppState};
use axum::{Router, routing::post};
use std::sync::Arc;

/// Create the CAPTCHA router backed by reCAPTCHA Enterprise
pub fn captcha_router(http: reqwest::Client, config: CaptchaConfig) -> Router {
    let config = Arc::new(config);
    let assessor = RecaptchaEnterpriseClient::new(http, config.clone());

    let state = CaptchaAppState {
        assessor: Arc::new(assessor),
        config,
    };

    Router::new()
        .route(
            "/captcha-check",
            post(handlers::captcha_check::<RecaptchaEnterpriseClient>),
        )
        .with_state(state)
}

/// Create a generic CAPTCHA router for any assessor implementation
pub fn captcha_router_generic<A>(assessor: A, config: CaptchaConfig) -> Router
where
    A: RiskAssessor + Clone + Send + Sync + 'static,
{
    let state = CaptchaAppState {
        assessor: Arc::new(assessor),
        config: Arc::new(config),
    };

    Router::new()
        .route("/captcha-check", post(handlers::captcha_check::<A>))
        .with_state(state)
}
