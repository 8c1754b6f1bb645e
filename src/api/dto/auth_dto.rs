//! Auth DTOs for the proxied sign-up, sign-in and reset flows.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::AuthUser;

/// E-mail and password, as entered on the sign-in and sign-up forms.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CredentialsRequest {
    /// Account e-mail.
    #[serde(default)]
    pub email: String,
    /// Account password.
    #[serde(default)]
    pub password: String,
}

/// Request body for `POST /auth/password-reset`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PasswordResetRequest {
    /// Account e-mail.
    #[serde(default)]
    pub email: String,
}

/// Response body for `POST /auth/signup`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SignUpResponse {
    /// The created (unconfirmed) user.
    pub user: AuthUser,
    /// Next step for the user.
    pub message: String,
}

/// Response body for `GET /auth/oauth/google`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OAuthUrlResponse {
    /// Provider authorization URL to redirect the browser to.
    pub url: String,
}
