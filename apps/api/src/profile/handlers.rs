//! Axum route handlers for the signed-in user's profile.

use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::user::UserView;
use crate::state::AppState;
use crate::validation::{check_name, password_issues, ValidationErrors};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: UserView,
}

#[derive(Debug, Serialize)]
pub struct ProfileUpdatedResponse {
    pub message: String,
    pub user: UserView,
}

/// GET /api/user/profile
pub async fn handle_get_profile(auth: AuthUser) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        user: UserView::from(&auth.user),
    })
}

/// PUT /api/user/profile
///
/// Changing the password requires the current one.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    WithRejection(Json(req), _): WithRejection<Json<UpdateProfileRequest>, AppError>,
) -> Result<Json<ProfileUpdatedResponse>, AppError> {
    let mut errors = ValidationErrors::new();
    if let Some(name) = &req.name {
        if let Err(msg) = check_name(name) {
            errors.push("name", msg);
        }
    }
    if let Some(new_password) = &req.new_password {
        for msg in password_issues(new_password) {
            errors.push("newPassword", msg);
        }
        if req.current_password.as_deref().map_or(true, str::is_empty) {
            errors.push(
                "currentPassword",
                "Current password is required to set a new password",
            );
        }
    }
    errors.into_result(())?;

    let password_hash = match (req.new_password, req.current_password) {
        (Some(new_password), Some(current_password)) => {
            if !verify_password(current_password, auth.user.password_hash.clone()).await? {
                return Err(AppError::BadRequest(
                    "Current password is incorrect".to_string(),
                ));
            }
            Some(hash_password(new_password, state.config.bcrypt_cost).await?)
        }
        _ => None,
    };
    let password_changed = password_hash.is_some();

    let user = state
        .users
        .update_profile(
            auth.user.id,
            req.name.map(|n| n.trim().to_string()),
            password_hash,
        )
        .await?
        .ok_or(AppError::Unauthorized)?;

    if password_changed {
        info!("User {} changed their password", user.id);
    }

    Ok(Json(ProfileUpdatedResponse {
        message: "Profile updated successfully".to_string(),
        user: UserView::from(&user),
    }))
}
