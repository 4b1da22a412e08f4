use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    #[default]
    Classic,
    Modern,
    Minimal,
    Developer,
    Creative,
    Startup,
}

impl Template {
    pub const ALL: [Template; 6] = [
        Template::Classic,
        Template::Modern,
        Template::Minimal,
        Template::Developer,
        Template::Creative,
        Template::Startup,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Template::Classic => "classic",
            Template::Modern => "modern",
            Template::Minimal => "minimal",
            Template::Developer => "developer",
            Template::Creative => "creative",
            Template::Startup => "startup",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Template::Classic => "Classic",
            Template::Modern => "Modern",
            Template::Minimal => "Minimal",
            Template::Developer => "Developer",
            Template::Creative => "Creative",
            Template::Startup => "Startup",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Template::Classic => {
                "Traditional layout with a clean, professional look. Perfect for most tech roles."
            }
            Template::Modern => {
                "Contemporary design with a sidebar layout. Great for highlighting technical skills."
            }
            Template::Minimal => {
                "Clean, minimalist design that focuses on content without distractions."
            }
            Template::Developer => {
                "Specialized for software developers with sections for code projects and tech stacks."
            }
            Template::Creative => {
                "For UI/UX designers and creative developers who want to showcase their personality."
            }
            Template::Startup => {
                "Bold and direct format ideal for startup environments and fast-paced tech companies."
            }
        }
    }
}

impl FromStr for Template {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Template::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "template",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResumeStatus {
    #[default]
    Draft,
    Published,
}

impl ResumeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResumeStatus::Draft => "draft",
            ResumeStatus::Published => "published",
        }
    }
}

impl FromStr for ResumeStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ResumeStatus::Draft),
            "published" => Ok(ResumeStatus::Published),
            other => Err(UnknownVariant {
                kind: "status",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceItem {
    pub title: String,
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectItem {
    pub title: String,
    pub description: String,
    pub technologies: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EducationItem {
    pub degree: String,
    pub institution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start_date: String,
    pub end_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A stored résumé, always scoped to the user that owns it.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub template: Template,
    pub status: ResumeStatus,
    pub personal_info: PersonalInfo,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceItem>,
    pub projects: Vec<ProjectItem>,
    pub education: Vec<EducationItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated résumé ready to insert.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResumeDraft {
    pub title: String,
    pub template: Template,
    pub status: ResumeStatus,
    pub personal_info: PersonalInfo,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceItem>,
    pub projects: Vec<ProjectItem>,
    pub education: Vec<EducationItem>,
}

/// A validated partial update. `None` leaves the stored field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResumePatch {
    pub title: Option<String>,
    pub template: Option<Template>,
    pub status: Option<ResumeStatus>,
    pub personal_info: Option<PersonalInfo>,
    pub skills: Option<Vec<String>>,
    pub experience: Option<Vec<ExperienceItem>>,
    pub projects: Option<Vec<ProjectItem>>,
    pub education: Option<Vec<EducationItem>>,
}

impl ResumePatch {
    /// Applies the provided fields to `resume` in place.
    pub fn apply_to(self, resume: &mut Resume) {
        if let Some(title) = self.title {
            resume.title = title;
        }
        if let Some(template) = self.template {
            resume.template = template;
        }
        if let Some(status) = self.status {
            resume.status = status;
        }
        if let Some(personal_info) = self.personal_info {
            resume.personal_info = personal_info;
        }
        if let Some(skills) = self.skills {
            resume.skills = skills;
        }
        if let Some(experience) = self.experience {
            resume.experience = experience;
        }
        if let Some(projects) = self.projects {
            resume.projects = projects;
        }
        if let Some(education) = self.education {
            resume.education = education;
        }
    }
}

// Request payloads. Every field is optional at the serde layer so missing
// values surface as field errors instead of a generic body rejection.

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumePayload {
    pub title: Option<String>,
    pub template: Option<String>,
    pub status: Option<String>,
    pub personal_info: Option<PersonalInfo>,
    pub skills: Option<Vec<String>>,
    pub experience: Option<Vec<ExperiencePayload>>,
    pub projects: Option<Vec<ProjectPayload>>,
    pub education: Option<Vec<EducationPayload>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperiencePayload {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub technologies: Option<String>,
    pub link: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationPayload {
    pub degree: Option<String>,
    pub institution: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub gpa: Option<String>,
    pub description: Option<String>,
}
