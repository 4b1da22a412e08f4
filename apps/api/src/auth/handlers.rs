//! Axum route handlers for the Auth API.

use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};
use axum_extra::extract::{cookie::CookieJar, WithRejection};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::reset::{digest_token, generate_reset_token, reset_url};
use crate::auth::tokens::{removal_cookie, session_token};
use crate::errors::AppError;
use crate::models::user::{NewUser, UserView};
use crate::state::AppState;
use crate::validation::{check_email, check_name, normalize_email, password_issues, ValidationErrors};

const RESET_REQUESTED_MESSAGE: &str =
    "If an account exists with this email, you will receive a password reset link";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: UserView,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/auth/signup
///
/// Creates the account, signs a session and sets the session cookie.
pub async fn handle_signup(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(req), _): WithRejection<Json<SignupRequest>, AppError>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), AppError> {
    let email = normalize_email(&req.email);

    let mut errors = ValidationErrors::new();
    if let Err(msg) = check_email(&email) {
        errors.push("email", msg);
    }
    for msg in password_issues(&req.password) {
        errors.push("password", msg);
    }
    if let Err(msg) = check_name(&req.name) {
        errors.push("name", msg);
    }
    errors.into_result(())?;

    if state.users.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict(
            "User with this email already exists".to_string(),
        ));
    }

    let password_hash = hash_password(req.password, state.config.bcrypt_cost).await?;
    let user = state
        .users
        .create(NewUser {
            email,
            name: req.name.trim().to_string(),
            password_hash,
        })
        .await?;

    let session = state.sessions.issue(user.id, &user.email)?;
    info!("User {} signed up", user.id);

    let jar = jar.add(state.sessions.cookie(&session, state.config.is_production()));
    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            message: "User created successfully".to_string(),
            user: UserView::from(&user),
            token: session.token,
        }),
    ))
}

/// POST /api/auth/login
///
/// Unknown email and wrong password produce the same 401.
pub async fn handle_login(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(req), _): WithRejection<Json<LoginRequest>, AppError>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let email = normalize_email(&req.email);

    let mut errors = ValidationErrors::new();
    if let Err(msg) = check_email(&email) {
        errors.push("email", msg);
    }
    if req.password.is_empty() {
        errors.push("password", "Password is required");
    }
    errors.into_result(())?;

    let Some(user) = state.users.find_by_email(&email).await? else {
        warn!("Login attempt for unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(req.password, user.password_hash.clone()).await? {
        warn!("Failed login for user {}", user.id);
        return Err(AppError::InvalidCredentials);
    }

    let session = state.sessions.issue(user.id, &user.email)?;
    info!("User {} logged in", user.id);

    let jar = jar.add(state.sessions.cookie(&session, state.config.is_production()));
    Ok((
        jar,
        Json(AuthResponse {
            message: "Logged in successfully".to_string(),
            user: UserView::from(&user),
            token: session.token,
        }),
    ))
}

/// POST /api/auth/logout
///
/// A valid token is revoked for the rest of its lifetime. The session cookie
/// is cleared even when the revocation store fails.
pub async fn handle_logout(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> (CookieJar, Result<Json<MessageResponse>, AppError>) {
    let jar = jar.add(removal_cookie());
    let Some(claims) = session_token(&headers).and_then(|t| state.sessions.verify(&t).ok()) else {
        return (jar, Ok(MessageResponse::new("Logged out successfully")));
    };

    let revoked = state
        .revocations
        .revoke(claims.jti, claims.remaining_secs(Utc::now()))
        .await;
    let result = revoked.map(|()| {
        info!("User {} logged out", claims.sub);
        MessageResponse::new("Logged out successfully")
    });
    (jar, result)
}

/// POST /api/auth/forgot-password
///
/// Responds identically whether or not the account exists.
pub async fn handle_forgot_password(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<ForgotPasswordRequest>, AppError>,
) -> Result<Json<MessageResponse>, AppError> {
    let email = normalize_email(&req.email);
    check_email(&email).map_err(|msg| ValidationErrors::single("email", msg))?;

    let Some(user) = state.users.find_by_email(&email).await? else {
        return Ok(MessageResponse::new(RESET_REQUESTED_MESSAGE));
    };

    let reset = generate_reset_token(Utc::now(), state.config.reset_token_ttl());
    state
        .users
        .set_reset_token(user.id, &reset.digest, reset.expires_at)
        .await?;
    info!("Password reset issued for user {}", user.id);

    let link = reset_url(&state.config.app_base_url, &reset.token);
    if let Err(e) = state.mailer.send_reset(&user.email, &link).await {
        error!("Could not deliver password reset for user {}: {e}", user.id);
    }

    Ok(MessageResponse::new(RESET_REQUESTED_MESSAGE))
}

/// POST /api/auth/reset-password
pub async fn handle_reset_password(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<ResetPasswordRequest>, AppError>,
) -> Result<Json<MessageResponse>, AppError> {
    let mut errors = ValidationErrors::new();
    if req.token.trim().is_empty() {
        errors.push("token", "Reset token is required");
    }
    for msg in password_issues(&req.password) {
        errors.push("password", msg);
    }
    errors.into_result(())?;

    let digest = digest_token(&req.token);
    let invalid_token = || AppError::BadRequest("Invalid or expired reset token".to_string());

    // Hash only once the token is known to be live.
    state
        .users
        .reset_token_holder(&digest, Utc::now())
        .await?
        .ok_or_else(invalid_token)?;

    let password_hash = hash_password(req.password, state.config.bcrypt_cost).await?;
    let user_id = state
        .users
        .consume_reset_token(&digest, &password_hash, Utc::now())
        .await?
        .ok_or_else(invalid_token)?;

    info!("Password reset completed for user {user_id}");
    Ok(MessageResponse::new("Password has been reset successfully"))
}
