use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::resumes::models::{
    EducationItem, ExperienceItem, PersonalInfo, ProjectItem, Resume,
};

#[derive(Debug, Clone, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub template: String,
    pub status: String,
    pub personal_info: Json<PersonalInfo>,
    pub skills: Json<Vec<String>>,
    pub experience: Json<Vec<ExperienceItem>>,
    pub projects: Json<Vec<ProjectItem>>,
    pub education: Json<Vec<EducationItem>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ResumeRow> for Resume {
    type Error = anyhow::Error;

    fn try_from(row: ResumeRow) -> Result<Self, Self::Error> {
        Ok(Resume {
            id: row.id,
            user_id: row.user_id,
            template: row
                .template
                .parse()
                .with_context(|| format!("resume {} has unknown template", row.id))?,
            status: row
                .status
                .parse()
                .with_context(|| format!("resume {} has unknown status", row.id))?,
            title: row.title,
            personal_info: row.personal_info.0,
            skills: row.skills.0,
            experience: row.experience.0,
            projects: row.projects.0,
            education: row.education.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
