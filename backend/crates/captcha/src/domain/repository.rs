//! Assessor Trait
//!
//! Interface to the external risk assessment service. Implementation is in
//! the infrastructure layer.

use crate::domain::assessment::{Assessment, AssessmentRequest};
use crate::error::CaptchaResult;

/// Risk assessment service
#[trait_variant::make(RiskAssessor: Send)]
pub trait LocalRiskAssessor {
    /// Submit one token for assessment. One outbound call, no retry.
    async fn assess(&self, request: &AssessmentRequest) -> CaptchaResult<Assessment>;
}
