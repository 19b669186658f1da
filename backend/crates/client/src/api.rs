//! Auth server API
//!
//! Calls to `/api/captcha-check`, `/api/log-in` and `/api/sign-out`. The
//! HTTP implementation keeps a cookie jar so the session cookie set by
//! log-in is sent on later requests.

use serde::Deserialize;
use serde_json::json;

use platform::http::HttpClientConfig;

use crate::captcha::CaptchaAction;
use crate::error::{IdentityError, IdentityResult};

/// Server reply reduced to what the flows look at
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiReply {
    pub status: u16,
    /// `message` field of a success body
    pub message: Option<String>,
    /// `error` field of a failure body
    pub error: Option<String>,
}

impl ApiReply {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Auth server endpoints
#[trait_variant::make(SessionApi: Send)]
pub trait LocalSessionApi {
    async fn captcha_check(&self, token: &str, action: CaptchaAction) -> IdentityResult<ApiReply>;

    async fn log_in(&self, id_token: &str) -> IdentityResult<ApiReply>;

    async fn sign_out(&self) -> IdentityResult<ApiReply>;
}

#[derive(Debug, Default, Deserialize)]
struct ReplyBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Auth server client over HTTP
#[derive(Clone)]
pub struct HttpSessionApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpSessionApi {
    /// Build a client with its own cookie jar
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let config = HttpClientConfig::default();
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .cookie_store(true)
            .build()?;

        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    async fn post(
        &self,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> IdentityResult<reqwest::Response> {
        let mut request = self.http.post(self.url(path));
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        tracing::debug!(path, status = response.status().as_u16(), "Auth server replied");
        Ok(response)
    }

    /// Read a `{"message"}` / `{"error"}` body; an empty body has neither
    async fn reply(response: reqwest::Response) -> IdentityResult<ApiReply> {
        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = if text.trim().is_empty() {
            ReplyBody::default()
        } else {
            serde_json::from_str::<ReplyBody>(&text).map_err(|e| {
                IdentityError::Unexpected(format!("status {status}, unreadable body: {e}"))
            })?
        };

        Ok(ApiReply {
            status,
            message: body.message,
            error: body.error,
        })
    }
}

impl SessionApi for HttpSessionApi {
    async fn captcha_check(
        &self,
        token: &str,
        action: CaptchaAction,
    ) -> IdentityResult<ApiReply> {
        let body = json!({ "recaptchaToken": token, "action": action.as_str() });
        Self::reply(self.post("captcha-check", Some(body)).await?).await
    }

    async fn log_in(&self, id_token: &str) -> IdentityResult<ApiReply> {
        Self::reply(self.post("log-in", Some(json!({ "idToken": id_token }))).await?).await
    }

    /// Only the status is read; the flow moves on whatever the body says
    async fn sign_out(&self) -> IdentityResult<ApiReply> {
        let response = self.post("sign-out", None).await?;
        Ok(ApiReply {
            status: response.status().as_u16(),
            ..Default::default()
        })
    }
}
