//! Authentication: the auth provider client and the request extractor.
//!
//! Handlers that take a [`CurrentUser`] only run for requests carrying a
//! bearer token the provider accepts.

pub mod client;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;

pub use client::{AuthClient, AuthUser, Session};

use crate::app_state::AppState;
use crate::domain::UserId;
use crate::error::AppError;

/// The authenticated caller of a request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// Identity resolved by the provider.
    pub user: AuthUser,
    /// Bearer token the request was made with.
    pub access_token: String,
}

impl CurrentUser {
    /// Id used to scope store queries.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.user.id
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AppError::Unauthorized)?;
        let user = state
            .auth
            .get_user(token)
            .await?
            .ok_or(AppError::Unauthorized)?;
        Ok(Self {
            user,
            access_token: token.to_string(),
        })
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
#[must_use]
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
