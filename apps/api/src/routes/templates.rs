use axum::{extract::Path, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::resumes::models::Template;

#[derive(Debug, Serialize)]
pub struct TemplateInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

impl From<Template> for TemplateInfo {
    fn from(template: Template) -> Self {
        Self {
            id: template.as_str(),
            name: template.display_name(),
            description: template.description(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub templates: Vec<TemplateInfo>,
}

/// GET /api/templates
pub async fn handle_list_templates() -> Json<TemplateListResponse> {
    Json(TemplateListResponse {
        templates: Template::ALL.into_iter().map(TemplateInfo::from).collect(),
    })
}

/// GET /api/templates/:id
pub async fn handle_get_template(Path(id): Path<String>) -> Result<Json<TemplateInfo>, AppError> {
    id.parse::<Template>()
        .map(|t| Json(TemplateInfo::from(t)))
        .map_err(|_| AppError::NotFound(format!("Template '{id}' not found")))
}
