//! HTTP Handlers

use crate::application::config::CaptchaConfig;
use crate::application::verify_captcha::{VerifyCaptchaInput, VerifyCaptchaUseCase};
use crate::domain::repository::RiskAssessor;
use crate::error::CaptchaResult;
use crate::presentation::dto::{CaptchaCheckRequest, MessageResponse};
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use platform::client::ClientInfo;
use std::sync::Arc;

/// Shared state for CAPTCHA handlers
#[derive(Clone)]
pub struct CaptchaAppState<A>
where
    A: RiskAssessor + Clone + Send + Sync + 'static,
{
    pub assessor: Arc<A>,
    pub config: Arc<CaptchaConfig>,
}

/// POST /api/captcha-check
///
/// The body is read as JSON whatever its `Content-Type`. An unreadable body
/// is handled like a body without a token.
pub async fn captcha_check<A>(
    State(state): State<CaptchaAppState<A>>,
    client: ClientInfo,
    body: Bytes,
) -> CaptchaResult<Json<MessageResponse>>
where
    A: RiskAssessor + Clone + Send + Sync + 'static,
{
    let req = match serde_json::from_slice::<CaptchaCheckRequest>(&body) {
        Ok(req) => req,
        Err(e) => {
            tracing::debug!(error = %e, "Unreadable captcha-check body");
            CaptchaCheckRequest::default()
        }
    };

    let use_case = VerifyCaptchaUseCase::new(state.assessor.clone(), state.config.clone());

    let input = VerifyCaptchaInput {
        token: req.recaptcha_token,
        action: req.action,
    };

    use_case.execute(input, client).await?;

    Ok(Json(MessageResponse::new("Verified")))
}
