//! Server-rendered pages
//!
//! Just enough HTML for the route guard to have something to protect. The
//! home page greets the verified user when the session cookie checks out.
//! The login page runs the log-in flow in the browser.

use auth::AuthConfig;
use auth::CurrentUserUseCase;
use auth::domain::repository::SessionAuthority;
use axum::Router;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Html;
use axum::routing::get;
use platform::cookie::extract_cookie;
use std::sync::Arc;

#[derive(Clone)]
pub struct PageState<A>
where
    A: SessionAuthority + Clone + Send + Sync + 'static,
{
    pub authority: Arc<A>,
    pub config: Arc<AuthConfig>,
    pub login: Arc<LoginPage>,
}

/// Keys the login page hands to the browser
#[derive(Debug, Clone, Default)]
pub struct LoginPage {
    pub recaptcha_site_key: String,
    /// Identity provider web API key
    pub firebase_api_key: String,
}

pub fn pages_router<A>(authority: Arc<A>, config: Arc<AuthConfig>, login: LoginPage) -> Router
where
    A: SessionAuthority + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(home::<A>))
        .route("/dashboard", get(dashboard))
        .route("/login", get(login_page::<A>))
        .with_state(PageState {
            authority,
            config,
            login: Arc::new(login),
        })
}

const SIGN_OUT_SCRIPT: &str = r#"<button id="sign-out">Sign out</button>
<script>
document.getElementById("sign-out").addEventListener("click", async () => {
  try {
    await fetch("/api/sign-out", { method: "POST" });
    window.location.href = "/login";
  } catch (e) {
    alert("Error logging out. Please try again.");
  }
});
</script>"#;

// CAPTCHA check, password sign-in, verified-email gate, then session cookie
const LOGIN_SCRIPT: &str = r#"<script>
const form = document.getElementById("login-form");
const errorBox = document.getElementById("login-error");
const identityUrl = (method) =>
  `https://identitytoolkit.googleapis.com/v1/accounts:${method}?key=${form.dataset.apiKey}`;
const providerMessages = {
  INVALID_LOGIN_CREDENTIALS: "Incorrect email or password.",
  INVALID_PASSWORD: "Incorrect email or password.",
  EMAIL_NOT_FOUND: "No account found with this email.",
  INVALID_EMAIL: "Please enter a valid email address.",
  TOO_MANY_ATTEMPTS_TRY_LATER: "Too many attempts. Please wait a few minutes before trying again.",
};

async function postJson(url, body) {
  const res = await fetch(url, {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify(body),
  });
  return { ok: res.ok, body: await res.json().catch(() => ({})) };
}

function captchaToken() {
  return new Promise((resolve, reject) =>
    grecaptcha.enterprise.ready(() =>
      grecaptcha.enterprise
        .execute(form.dataset.siteKey, { action: "LOGIN" })
        .then(resolve, reject)));
}

form.addEventListener("submit", async (event) => {
  event.preventDefault();
  errorBox.textContent = "";
  try {
    const check = await postJson("/api/captcha-check", {
      recaptchaToken: await captchaToken(),
      action: "LOGIN",
    });
    if (!check.ok) throw new Error(check.body.error || "reCAPTCHA verification failed");

    const signIn = await postJson(identityUrl("signInWithPassword"), {
      email: form.email.value,
      password: form.password.value,
      returnSecureToken: true,
    });
    if (!signIn.ok) {
      const code = (signIn.body.error?.message || "").split(":")[0].trim();
      throw new Error(providerMessages[code] || "An unknown error occurred");
    }

    const lookup = await postJson(identityUrl("lookup"), { idToken: signIn.body.idToken });
    if (!lookup.body.users?.[0]?.emailVerified) {
      throw new Error("Please verify your email before logging in.");
    }

    const session = await postJson("/api/log-in", { idToken: signIn.body.idToken });
    if (!session.ok) throw new Error(session.body.error || "Failed to log in");
    window.location.href = "/";
  } catch (e) {
    errorBox.textContent = e.message || "An unknown error occurred";
  }
});
</script>"#;

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>{title}</title></head>\
         <body>{body}</body></html>"
    ))
}

/// Minimal HTML escaping for text nodes
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

async fn home<A>(State(state): State<PageState<A>>, headers: HeaderMap) -> Html<String>
where
    A: SessionAuthority + Clone + Send + Sync + 'static,
{
    let cookie = extract_cookie(&headers, state.config.session_cookie_name());
    let use_case = CurrentUserUseCase::new(state.authority.clone(), state.config.clone());

    let greeting = match use_case.current_user(cookie.as_deref()).await {
        Some(user) => match user.email {
            Some(email) => format!("<h1>Welcome, {}</h1>", escape(&email)),
            None => "<h1>Welcome</h1>".to_string(),
        },
        None => "<h1>Welcome</h1>".to_string(),
    };

    page("Home", &format!("{greeting}\n{SIGN_OUT_SCRIPT}"))
}

async fn dashboard() -> Html<String> {
    page("Dashboard", &format!("<h1>Dashboard</h1>\n{SIGN_OUT_SCRIPT}"))
}

async fn login_page<A>(State(state): State<PageState<A>>) -> Html<String>
where
    A: SessionAuthority + Clone + Send + Sync + 'static,
{
    let site_key = escape(&state.login.recaptcha_site_key);
    let api_key = escape(&state.login.firebase_api_key);
    let form = format!(
        "<h1>Log in</h1>\n\
         <script src=\"https://www.google.com/recaptcha/enterprise.js?render={site_key}\"></script>\n\
         <form id=\"login-form\" data-site-key=\"{site_key}\" data-api-key=\"{api_key}\">\n\
         <label>Email <input name=\"email\" type=\"email\" autocomplete=\"email\" required></label>\n\
         <label>Password <input name=\"password\" type=\"password\" \
         autocomplete=\"current-password\" required></label>\n\
         <button type=\"submit\">Log in</button>\n\
         </form>\n\
         <p id=\"login-error\" role=\"alert\"></p>\n"
    );

    page("Log in", &format!("{form}{LOGIN_SCRIPT}"))
}
