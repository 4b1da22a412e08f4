//! Axum route handlers for the Resume API. Every handler is scoped to the caller.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::handlers::MessageResponse;
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::resumes::export::{export_file_name, render_resume_to_md};
use crate::resumes::models::{Resume, ResumePayload};
use crate::resumes::validation::{validate_new_resume, validate_resume_patch};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ResumeListResponse {
    pub resumes: Vec<Resume>,
}

#[derive(Debug, Serialize)]
pub struct ResumeCreatedResponse {
    pub message: String,
    pub resume: Resume,
}

fn resume_not_found() -> AppError {
    AppError::NotFound("Resume not found".to_string())
}

/// Malformed ids are reported as "not found".
fn parse_resume_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| resume_not_found())
}

/// GET /api/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ResumeListResponse>, AppError> {
    let resumes = state.resumes.list_for_user(auth.user.id).await?;
    Ok(Json(ResumeListResponse { resumes }))
}

/// POST /api/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    auth: AuthUser,
    WithRejection(Json(payload), _): WithRejection<Json<ResumePayload>, AppError>,
) -> Result<(StatusCode, Json<ResumeCreatedResponse>), AppError> {
    let draft = validate_new_resume(payload)?;
    let resume = state.resumes.create(auth.user.id, draft).await?;
    info!("User {} created resume {}", auth.user.id, resume.id);

    Ok((
        StatusCode::CREATED,
        Json(ResumeCreatedResponse {
            message: "Resume created successfully".to_string(),
            resume,
        }),
    ))
}

/// GET /api/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Resume>, AppError> {
    let id = parse_resume_id(&id)?;
    let resume = state
        .resumes
        .find_owned(id, auth.user.id)
        .await?
        .ok_or_else(resume_not_found)?;
    Ok(Json(resume))
}

/// PATCH /api/resumes/:id
///
/// Replaces only the top-level fields present in the body.
pub async fn handle_update_resume(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<ResumePayload>, AppError>,
) -> Result<Json<Resume>, AppError> {
    let id = parse_resume_id(&id)?;
    let patch = validate_resume_patch(payload)?;
    let resume = state
        .resumes
        .update_owned(id, auth.user.id, patch)
        .await?
        .ok_or_else(resume_not_found)?;
    Ok(Json(resume))
}

/// DELETE /api/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_resume_id(&id)?;
    if !state.resumes.delete_owned(id, auth.user.id).await? {
        return Err(resume_not_found());
    }
    info!("User {} deleted resume {id}", auth.user.id);
    Ok(MessageResponse::new("Resume deleted successfully"))
}

/// GET /api/resumes/:id/export
///
/// Markdown rendering of the résumé, offered as a download.
pub async fn handle_export_resume(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_resume_id(&id)?;
    let resume = state
        .resumes
        .find_owned(id, auth.user.id)
        .await?
        .ok_or_else(resume_not_found)?;

    let disposition = format!("attachment; filename=\"{}\"", export_file_name(&resume));
    Ok((
        [
            (header::CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        render_resume_to_md(&resume),
    ))
}
