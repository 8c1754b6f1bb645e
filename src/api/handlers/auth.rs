//! Auth handlers proxying the hosted auth provider.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{CredentialsRequest, OAuthUrlResponse, PasswordResetRequest, SignUpResponse};
use crate::app_state::AppState;
use crate::api::extract::ApiJson;
use crate::auth::{CurrentUser, Session};
use crate::error::{AppError, ErrorResponse};

const CONFIRM_EMAIL_MESSAGE: &str = "Check your email to confirm your account.";

/// `POST /auth/signup` — Register with e-mail and password.
///
/// # Errors
///
/// Returns [`AppError::InvalidRequest`] for empty credentials,
/// [`AppError::AuthRejected`] if the provider refuses, or
/// [`AppError::AuthUnavailable`] if it cannot be reached.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    tag = "Auth",
    summary = "Sign up",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account registered, confirmation pending", body = SignUpResponse),
        (status = 400, description = "Missing credentials or account exists", body = ErrorResponse),
        (status = 502, description = "Auth provider unavailable", body = ErrorResponse),
    )
)]
pub async fn sign_up(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CredentialsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.auth.sign_up(&req.email, &req.password).await?;
    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            user,
            message: CONFIRM_EMAIL_MESSAGE.to_string(),
        }),
    ))
}

/// `POST /auth/signin` — Password sign-in.
///
/// # Errors
///
/// Returns [`AppError::AuthRejected`] for bad credentials.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signin",
    tag = "Auth",
    summary = "Sign in",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Session tokens", body = Session),
        (status = 400, description = "Missing or invalid credentials", body = ErrorResponse),
        (status = 502, description = "Auth provider unavailable", body = ErrorResponse),
    )
)]
pub async fn sign_in(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CredentialsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.auth.sign_in(&req.email, &req.password).await?;
    Ok(Json(session))
}

/// `POST /auth/signout` — Revoke the bearer session.
///
/// # Errors
///
/// Returns [`AppError::Unauthorized`] without a valid bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signout",
    tag = "Auth",
    summary = "Sign out",
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Session revoked"),
        (status = 401, description = "Missing or rejected token", body = ErrorResponse),
    )
)]
pub async fn sign_out(
    user: CurrentUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    state.auth.sign_out(&user.access_token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /auth/password-reset` — Send a reset e-mail.
///
/// # Errors
///
/// Returns [`AppError::InvalidRequest`] for an empty e-mail or
/// [`AppError::AuthRejected`] for an unknown address.
#[utoipa::path(
    post,
    path = "/api/v1/auth/password-reset",
    tag = "Auth",
    summary = "Request a password reset",
    request_body = PasswordResetRequest,
    responses(
        (status = 204, description = "Reset e-mail sent"),
        (status = 400, description = "Missing or unknown e-mail", body = ErrorResponse),
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<PasswordResetRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.auth.reset_password(&req.email).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /auth/oauth/google` — Google sign-in redirect URL.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the auth base URL is misconfigured.
#[utoipa::path(
    get,
    path = "/api/v1/auth/oauth/google",
    tag = "Auth",
    summary = "Start Google sign-in",
    responses(
        (status = 200, description = "Authorization URL", body = OAuthUrlResponse),
    )
)]
pub async fn google_oauth(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let url = state.auth.oauth_url("google")?;
    Ok(Json(OAuthUrlResponse { url }))
}

/// Auth routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(sign_up))
        .route("/auth/signin", post(sign_in))
        .route("/auth/signout", post(sign_out))
        .route("/auth/password-reset", post(reset_password))
        .route("/auth/oauth/google", get(google_oauth))
}
