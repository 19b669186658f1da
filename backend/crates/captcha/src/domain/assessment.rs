//! Assessment model and verdict rules

use crate::error::{CaptchaError, CaptchaResult};
use platform::client::ClientInfo;
use serde::Deserialize;

/// Score threshold in `[0.0, 1.0]`; scores strictly below it are rejected
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreThreshold(f64);

impl ScoreThreshold {
    pub const DEFAULT: ScoreThreshold = ScoreThreshold(0.5);

    /// Returns `None` outside `[0.0, 1.0]` (and for NaN)
    pub fn new(value: f64) -> Option<Self> {
        (0.0..=1.0).contains(&value).then_some(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for ScoreThreshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// What gets sent to the assessor for one check
#[derive(Debug, Clone)]
pub struct AssessmentRequest {
    pub token: String,
    pub expected_action: String,
    pub client: ClientInfo,
}

/// Assessment returned by the risk API (the subset we read)
///
/// `tokenProperties` is required: a body without it is treated as an
/// upstream failure, not as an invalid token.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    #[serde(default)]
    pub name: Option<String>,
    pub token_properties: TokenProperties,
    #[serde(default)]
    pub risk_analysis: Option<RiskAnalysis>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenProperties {
    pub valid: bool,
    #[serde(default)]
    pub invalid_reason: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAnalysis {
    pub score: f64,
    #[serde(default)]
    pub reasons: Vec<String>,
}

impl Assessment {
    /// Apply the checks in order: validity, action, score
    ///
    /// Returns the score on acceptance. A valid token whose assessment has no
    /// risk analysis is an upstream failure.
    pub fn verdict(&self, expected_action: &str, threshold: ScoreThreshold) -> CaptchaResult<f64> {
        let props = &self.token_properties;

        if !props.valid {
            return Err(CaptchaError::InvalidToken {
                reason: props.invalid_reason.clone(),
            });
        }

        if props.action.as_deref().unwrap_or_default() != expected_action {
            return Err(CaptchaError::ActionMismatch {
                expected: expected_action.to_string(),
                actual: props.action.clone(),
            });
        }

        let score = self
            .risk_analysis
            .as_ref()
            .map(|r| r.score)
            .ok_or_else(|| CaptchaError::Upstream("assessment has no riskAnalysis".to_string()))?;

        if score < threshold.value() {
            return Err(CaptchaError::LowScore {
                score,
                threshold: threshold.value(),
            });
        }

        Ok(score)
    }
}
