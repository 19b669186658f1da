//! Verify CAPTCHA Use Case

use crate::application::config::CaptchaConfig;
use crate::domain::assessment::AssessmentRequest;
use crate::domain::repository::RiskAssessor;
use crate::error::{CaptchaError, CaptchaResult};
use platform::client::ClientInfo;
use std::sync::Arc;

/// Input DTO for verify captcha
#[derive(Debug, Clone, Default)]
pub struct VerifyCaptchaInput {
    pub token: Option<String>,
    pub action: Option<String>,
}

/// Output DTO for verify captcha
#[derive(Debug, Clone, PartialEq)]
pub struct VerifyCaptchaOutput {
    pub score: f64,
}

/// Verify CAPTCHA Use Case
pub struct VerifyCaptchaUseCase<A>
where
    A: RiskAssessor,
{
    assessor: Arc<A>,
    config: Arc<CaptchaConfig>,
}

impl<A> VerifyCaptchaUseCase<A>
where
    A: RiskAssessor,
{
    pub fn new(assessor: Arc<A>, config: Arc<CaptchaConfig>) -> Self {
        Self { assessor, config }
    }

    pub async fn execute(
        &self,
        input: VerifyCaptchaInput,
        client: ClientInfo,
    ) -> CaptchaResult<VerifyCaptchaOutput> {
        let token = input
            .token
            .filter(|t| !t.is_empty())
            .ok_or(CaptchaError::MissingToken)?;

        let request = AssessmentRequest {
            token,
            expected_action: input.action.unwrap_or_default(),
            client,
        };

        let assessment = self.assessor.assess(&request).await?;
        let score = assessment.verdict(&request.expected_action, self.config.score_threshold)?;

        tracing::info!(
            action = %request.expected_action,
            score,
            "reCAPTCHA verified"
        );

        Ok(VerifyCaptchaOutput { score })
    }
}
