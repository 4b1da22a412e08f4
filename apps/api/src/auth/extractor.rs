use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::auth::tokens::{session_token, Claims};
use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

/// The authenticated caller. Extracting it rejects the request with 401 when
/// the token is missing, invalid, expired, revoked, or names a deleted user.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    pub claims: Claims,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers).ok_or(AppError::Unauthorized)?;
        let claims = state.sessions.verify(&token)?;

        if state.revocations.is_revoked(claims.jti).await? {
            return Err(AppError::Unauthorized);
        }

        let user = state
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(AuthUser { user, claims })
    }
}
