//! Command-line auth client
//!
//! Runs the sign-up, log-in and sign-out flows against a running server.
//! CAPTCHA tokens cannot be minted headless, so one is passed in.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use kernel::error::app_error::AppError;
use client::{
    AuthFlow, FirebaseIdentityClient, FlowConfig, HttpSessionApi, LogInForm, SignUpForm,
    StaticCaptchaToken,
};
use platform::http::{HttpClientConfig, build_client};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "auth-cli", version, about = "Email/password auth client")]
struct Args {
    /// Identity provider web API key
    #[arg(long, env = "FIREBASE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Base URL of the auth server
    #[arg(long, env = "AUTH_SERVER_URL", default_value = "http://localhost:3000")]
    server: String,

    /// Identity provider base URL (for the local emulator)
    #[arg(long, env = "FIREBASE_AUTH_URL")]
    identity_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account and send the verification email
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long, env = "AUTH_PASSWORD", hide_env_values = true)]
        password: String,
        /// Defaults to the password
        #[arg(long)]
        confirm_password: Option<String>,
        /// Token minted for the SIGN_UP action
        #[arg(long, env = "RECAPTCHA_TOKEN", hide_env_values = true)]
        captcha_token: String,
    },
    /// Sign in and obtain a session cookie
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "AUTH_PASSWORD", hide_env_values = true)]
        password: String,
        /// Token minted for the LOGIN action
        #[arg(long, env = "RECAPTCHA_TOKEN", hide_env_values = true)]
        captcha_token: String,
        /// Allow accounts whose email is not confirmed yet
        #[arg(long)]
        allow_unverified: bool,
    },
    /// Clear the session cookie
    Logout,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "client=info,auth_cli=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    // Sign-out only talks to the auth server
    let api_key = match (&args.api_key, &args.command) {
        (Some(key), _) => key.clone(),
        (None, Command::Logout) => String::new(),
        (None, _) => anyhow::bail!("FIREBASE_API_KEY must be set for signup and login"),
    };

    let http = build_client(&HttpClientConfig::default())?;
    let identity = match &args.identity_url {
        Some(url) => FirebaseIdentityClient::with_base_url(http, api_key, url),
        None => FirebaseIdentityClient::new(http, api_key),
    };
    let api = HttpSessionApi::new(&args.server)?;
    tracing::debug!(server = %args.server, "Using auth server");

    let (captcha_token, require_verified_email) = match &args.command {
        Command::Signup { captcha_token, .. } => (captcha_token.clone(), true),
        Command::Login {
            captcha_token,
            allow_unverified,
            ..
        } => (captcha_token.clone(), !allow_unverified),
        Command::Logout => (String::new(), true),
    };

    let flow = AuthFlow::new(
        Arc::new(identity),
        Arc::new(api),
        Arc::new(StaticCaptchaToken::new(captcha_token)),
        FlowConfig {
            require_verified_email,
        },
    );

    let result = match args.command {
        Command::Signup {
            email,
            password,
            confirm_password,
            ..
        } => {
            let confirm_password = confirm_password.unwrap_or_else(|| password.clone());
            flow.sign_up(&SignUpForm {
                email,
                password,
                confirm_password,
            })
            .await
            .map(str::to_string)
        }
        Command::Login { email, password, .. } => flow
            .log_in(&LogInForm { email, password })
            .await
            .map(|nav| format!("Logged in. Continue at {}", nav.path())),
        Command::Logout => flow
            .sign_out()
            .await
            .map(|nav| format!("Logged out. Continue at {}", nav.path())),
    };

    match result {
        Ok(message) => {
            println!("{message}");
            Ok(())
        }
        Err(e) => {
            let err = AppError::from(e);
            tracing::debug!(status = err.status_code(), "Flow failed");
            Err(err.into())
        }
    }
}
