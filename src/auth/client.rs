//! Client for the hosted auth REST API (GoTrue-compatible).
//!
//! The service never stores credentials. It forwards sign-up, sign-in,
//! sign-out and password-reset calls, and resolves bearer tokens into the
//! [`UserId`] that scopes every event query.

use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::AppConfig;
use crate::domain::UserId;
use crate::error::AppError;

const EXISTING_ACCOUNT: &str = "An account with this email already exists. If you signed up with Google, please use \"Sign in with Google\" instead. Otherwise, please sign in or use \"Forgot Password\" to reset your password.";
const INVALID_CREDENTIALS: &str = "Invalid email or password. If you signed up with Google, please use \"Sign in with Google\" instead. Otherwise, check your credentials or use \"Forgot Password\" to reset your password.";
const UNKNOWN_EMAIL: &str = "No account found with this email address.";

/// Identity returned by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthUser {
    /// Provider-issued user id.
    #[schema(value_type = uuid::Uuid)]
    pub id: UserId,
    /// E-mail address, when known.
    #[serde(default)]
    pub email: Option<String>,
}

/// Session tokens issued on sign-in.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Session {
    /// Bearer token for subsequent requests.
    pub access_token: String,
    /// Token used to obtain a new access token.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Access token lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Token type, normally `bearer`.
    #[serde(default)]
    pub token_type: Option<String>,
    /// Signed-in user.
    #[serde(default)]
    pub user: Option<AuthUser>,
}

/// Which operation a provider error came from; selects the message mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthOp {
    SignUp,
    SignIn,
    Recover,
    Other,
}

/// Client for the auth provider.
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    site_url: String,
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RecoverRequest<'a> {
    email: &'a str,
}

impl AuthClient {
    /// Creates a client for the provider at `base_url`.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        site_url: impl Into<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            site_url: site_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Creates a client from the `AUTH_*` and `SITE_URL` settings.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.auth_url.clone(),
            config.auth_api_key.clone(),
            config.site_url.clone(),
        )
    }

    /// Resolves an access token into the current user.
    ///
    /// Returns `Ok(None)` when the provider does not accept the token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AuthUnavailable`] if the provider cannot be
    /// reached or fails.
    pub async fn get_user(&self, access_token: &str) -> Result<Option<AuthUser>, AppError> {
        let response = self
            .request(self.http.get(self.endpoint("user", &[])?))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(unavailable)?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            status if status.is_success() => {
                response.json::<AuthUser>().await.map(Some).map_err(unavailable)
            }
            _ => Err(read_failure(response, AuthOp::Other).await),
        }
    }

    /// Registers a new account with e-mail and password.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidRequest`] if e-mail or password is empty.
    /// - [`AppError::AuthRejected`] if the provider refuses, with a helpful
    ///   message for already-registered addresses.
    /// - [`AppError::AuthUnavailable`] on transport or provider failure.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AppError> {
        require_credentials(email, password)?;
        let callback = format!("{}/auth/callback", self.site_url);
        let response = self
            .request(self.http.post(self.endpoint("signup", &[("redirect_to", callback.as_str())])?))
            .json(&Credentials { email, password })
            .send()
            .await
            .map_err(unavailable)?;
        if !response.status().is_success() {
            return Err(read_failure(response, AuthOp::SignUp).await);
        }

        // Auto-confirmed projects return a session wrapping the user.
        let body: serde_json::Value = response.json().await.map_err(unavailable)?;
        let user = body.get("user").cloned().unwrap_or(body);
        let user: AuthUser = serde_json::from_value(user).map_err(unavailable)?;
        tracing::info!(user_id = %user.id, "account registered");
        Ok(user)
    }

    /// Signs in with e-mail and password.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidRequest`] if e-mail or password is empty.
    /// - [`AppError::AuthRejected`] for bad credentials.
    /// - [`AppError::AuthUnavailable`] on transport or provider failure.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AppError> {
        require_credentials(email, password)?;
        let response = self
            .request(self.http.post(self.endpoint("token", &[("grant_type", "password")])?))
            .json(&Credentials { email, password })
            .send()
            .await
            .map_err(unavailable)?;
        if !response.status().is_success() {
            return Err(read_failure(response, AuthOp::SignIn).await);
        }
        let session: Session = response.json().await.map_err(unavailable)?;
        if let Some(user) = &session.user {
            tracing::info!(user_id = %user.id, "signed in");
        }
        Ok(session)
    }

    /// Revokes the session behind `access_token`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AuthUnavailable`] on transport or provider failure.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), AppError> {
        let response = self
            .request(self.http.post(self.endpoint("logout", &[])?))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(unavailable)?;
        if !response.status().is_success() {
            return Err(read_failure(response, AuthOp::Other).await);
        }
        Ok(())
    }

    /// Sends a password-reset e-mail.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidRequest`] if `email` is empty.
    /// - [`AppError::AuthRejected`] if no account uses the address.
    /// - [`AppError::AuthUnavailable`] on transport or provider failure.
    pub async fn reset_password(&self, email: &str) -> Result<(), AppError> {
        if email.is_empty() {
            return Err(AppError::InvalidRequest("Email is required".to_string()));
        }
        let redirect = format!("{}/auth/reset-password", self.site_url);
        let response = self
            .request(self.http.post(self.endpoint("recover", &[("redirect_to", redirect.as_str())])?))
            .json(&RecoverRequest { email })
            .send()
            .await
            .map_err(unavailable)?;
        if !response.status().is_success() {
            return Err(read_failure(response, AuthOp::Recover).await);
        }
        Ok(())
    }

    /// URL the browser should visit to start an OAuth sign-in.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the configured base URL is invalid.
    pub fn oauth_url(&self, provider: &str) -> Result<String, AppError> {
        let callback = format!("{}/auth/callback", self.site_url);
        self.endpoint(
            "authorize",
            &[("provider", provider), ("redirect_to", callback.as_str())],
        )
        .map(String::from)
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, AppError> {
        Url::parse_with_params(&format!("{}/{path}", self.base_url), query)
            .map_err(|err| AppError::Internal(format!("invalid auth URL: {err}")))
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header("apikey", key),
            None => builder,
        }
    }
}

fn require_credentials(email: &str, password: &str) -> Result<(), AppError> {
    if email.is_empty() || password.is_empty() {
        return Err(AppError::InvalidRequest(
            "Email and password are required".to_string(),
        ));
    }
    Ok(())
}

fn unavailable(err: impl std::fmt::Display) -> AppError {
    AppError::AuthUnavailable(err.to_string())
}

async fn read_failure(response: Response, op: AuthOp) -> AppError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    classify(op, status, &provider_message(&body))
}

/// Extracts the human-readable message from a provider error body.
fn provider_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["msg", "error_description", "message", "error"]
                .iter()
                .find_map(|key| v.get(key).and_then(|m| m.as_str()).map(str::to_string))
        })
        .unwrap_or_else(|| body.to_string())
}

fn classify(op: AuthOp, status: StatusCode, message: &str) -> AppError {
    match op {
        AuthOp::SignUp
            if message.contains("already registered")
                || message.contains("already exists")
                || status == StatusCode::UNPROCESSABLE_ENTITY =>
        {
            AppError::AuthRejected(EXISTING_ACCOUNT.to_string())
        }
        AuthOp::SignIn
            if message.contains("Invalid login credentials")
                || message.contains("Invalid credentials")
                || message.contains("Email not confirmed") =>
        {
            AppError::AuthRejected(INVALID_CREDENTIALS.to_string())
        }
        AuthOp::Recover if message.contains("not found") || message.contains("does not exist") => {
            AppError::AuthRejected(UNKNOWN_EMAIL.to_string())
        }
        _ if status.is_client_error() => AppError::AuthRejected(message.to_string()),
        _ => AppError::AuthUnavailable(format!("{status}: {message}")),
    }
}
