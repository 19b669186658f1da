//! Sign-up, log-in and sign-out flows
//!
//! Each flow runs its steps strictly in order and stops at the first
//! failure. Every failure ends as a `FlowError` carrying the message to show.

use std::sync::Arc;

use platform::password::check_new_password;

use crate::api::{ApiReply, SessionApi};
use crate::captcha::{CaptchaAction, CaptchaTokenSource};
use crate::error::{
    CAPTCHA_LOGIN_FAILED, FlowError, FlowResult, LOG_IN_FAILED, SIGN_UP_FAILED,
};
use crate::identity::IdentityClient;

/// Shown after a successful sign-up
pub const VERIFICATION_SENT: &str = "We've sent you a verification email. Please confirm your address before logging in. Check your inbox and spam folder.";

/// Where the caller should go next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Home,
    Login,
}

impl Navigation {
    pub fn path(&self) -> &'static str {
        match self {
            Navigation::Home => "/",
            Navigation::Login => "/login",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FlowConfig {
    /// Refuse log-in while the email address is unconfirmed
    pub require_verified_email: bool,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            require_verified_email: true,
        }
    }
}

#[derive(Clone)]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Clone)]
pub struct LogInForm {
    pub email: String,
    pub password: String,
}

/// Client-side auth flows
pub struct AuthFlow<I, S, C>
where
    I: IdentityClient,
    S: SessionApi,
    C: CaptchaTokenSource,
{
    identity: Arc<I>,
    api: Arc<S>,
    captcha: Arc<C>,
    config: FlowConfig,
}

impl<I, S, C> AuthFlow<I, S, C>
where
    I: IdentityClient + Send + Sync,
    S: SessionApi + Send + Sync,
    C: CaptchaTokenSource + Send + Sync,
{
    pub fn new(identity: Arc<I>, api: Arc<S>, captcha: Arc<C>, config: FlowConfig) -> Self {
        Self {
            identity,
            api,
            captcha,
            config,
        }
    }

    /// Register an account and send the verification email
    ///
    /// Returns the message to show on success.
    pub async fn sign_up(&self, form: &SignUpForm) -> FlowResult<&'static str> {
        self.sign_up_inner(form).await.inspect_err(FlowError::log)
    }

    async fn sign_up_inner(&self, form: &SignUpForm) -> FlowResult<&'static str> {
        check_new_password(&form.password, &form.confirm_password)?;

        self.check_captcha(CaptchaAction::SignUp, SIGN_UP_FAILED)
            .await?;

        let user = self.identity.sign_up(&form.email, &form.password).await?;
        self.identity.send_email_verification(&user).await?;

        tracing::info!(uid = %user.uid, "Signed up, verification pending");
        Ok(VERIFICATION_SENT)
    }

    /// Sign in and exchange the identity token for a session cookie
    pub async fn log_in(&self, form: &LogInForm) -> FlowResult<Navigation> {
        self.log_in_inner(form).await.inspect_err(FlowError::log)
    }

    async fn log_in_inner(&self, form: &LogInForm) -> FlowResult<Navigation> {
        self.check_captcha(CaptchaAction::Login, CAPTCHA_LOGIN_FAILED)
            .await?;

        let user = self.identity.sign_in(&form.email, &form.password).await?;
        let user = self.identity.reload(&user).await?;

        if self.config.require_verified_email && !user.email_verified {
            return Err(FlowError::EmailNotVerified);
        }

        let id_token = self.identity.id_token(&user).await?;
        let reply = self.api.log_in(&id_token).await?;
        if !reply.ok() {
            return Err(FlowError::SessionRejected(server_message(
                reply,
                LOG_IN_FAILED,
            )));
        }

        tracing::info!(uid = %user.uid, "Logged in");
        Ok(Navigation::Home)
    }

    /// Clear the session cookie
    ///
    /// Only a request that cannot be sent counts as a failure.
    pub async fn sign_out(&self) -> FlowResult<Navigation> {
        match self.api.sign_out().await {
            Ok(reply) => {
                if !reply.ok() {
                    tracing::warn!(status = reply.status, "Sign-out answered with an error");
                }
                Ok(Navigation::Login)
            }
            Err(e) => {
                let err = FlowError::SignOut {
                    detail: e.to_string(),
                };
                err.log();
                Err(err)
            }
        }
    }

    async fn check_captcha(&self, action: CaptchaAction, fallback: &str) -> FlowResult<()> {
        let token = self.captcha.token(action).await?;
        let reply = self.api.captcha_check(&token, action).await?;

        if reply.ok() {
            Ok(())
        } else {
            Err(FlowError::CaptchaRejected(server_message(reply, fallback)))
        }
    }
}

/// Server's `error` field, or the fallback when there is none
fn server_message(reply: ApiReply, fallback: &str) -> String {
    reply
        .error
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}
