//! reCAPTCHA Enterprise assessment client

use crate::application::config::CaptchaConfig;
use crate::domain::assessment::{Assessment, AssessmentRequest};
use crate::domain::repository::RiskAssessor;
use crate::error::{CaptchaError, CaptchaResult};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
struct CreateAssessmentBody<'a> {
    event: Event<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Event<'a> {
    token: &'a str,
    expected_action: &'a str,
    site_key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_agent: Option<&'a str>,
}

/// Risk assessor backed by the reCAPTCHA Enterprise REST API
#[derive(Clone)]
pub struct RecaptchaEnterpriseClient {
    http: reqwest::Client,
    config: Arc<CaptchaConfig>,
}

impl RecaptchaEnterpriseClient {
    pub fn new(http: reqwest::Client, config: Arc<CaptchaConfig>) -> Self {
        Self { http, config }
    }
}

impl RiskAssessor for RecaptchaEnterpriseClient {
    async fn assess(&self, request: &AssessmentRequest) -> CaptchaResult<Assessment> {
        let body = CreateAssessmentBody {
            event: Event {
                token: &request.token,
                expected_action: &request.expected_action,
                site_key: &self.config.site_key,
                user_ip_address: request.client.ip_string(),
                user_agent: request.client.user_agent.as_deref(),
            },
        };

        let url = self.config.assessments_url();
        tracing::debug!(url = %url, action = %request.expected_action, "Creating assessment");

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| e.without_url())?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(CaptchaError::Upstream(format!("HTTP {status}: {detail}")));
        }

        response
            .json::<Assessment>()
            .await
            .map_err(|e| CaptchaError::Upstream(format!("unexpected assessment body: {}", e.without_url())))
    }
}
