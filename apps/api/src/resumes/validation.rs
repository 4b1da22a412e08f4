use crate::resumes::models::{
    EducationItem, EducationPayload, ExperienceItem, ExperiencePayload, PersonalInfo,
    ProjectItem, ProjectPayload, ResumeDraft, ResumePatch, ResumePayload, ResumeStatus, Template,
};
use crate::validation::{check_email, check_url, ValidationErrors};

/// Validates a create request. Absent template and status fall back to
/// `classic` and `draft`.
pub fn validate_new_resume(payload: ResumePayload) -> Result<ResumeDraft, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let title = match non_blank(payload.title) {
        Some(title) => title,
        None => {
            errors.push("title", "Title is required");
            String::new()
        }
    };
    let template = payload
        .template
        .map(|t| parse_template(&t, &mut errors))
        .unwrap_or_default()
        .unwrap_or_default();
    let status = payload
        .status
        .map(|s| parse_status(&s, &mut errors))
        .unwrap_or_default()
        .unwrap_or_default();

    let personal_info = payload
        .personal_info
        .map(|info| check_personal_info(info, &mut errors))
        .unwrap_or_default();
    let skills = payload.skills.map(clean_skills).unwrap_or_default();
    let experience = payload
        .experience
        .map(|items| check_experience(items, &mut errors))
        .unwrap_or_default();
    let projects = payload
        .projects
        .map(|items| check_projects(items, &mut errors))
        .unwrap_or_default();
    let education = payload
        .education
        .map(|items| check_education(items, &mut errors))
        .unwrap_or_default();

    errors.into_result(ResumeDraft {
        title,
        template,
        status,
        personal_info,
        skills,
        experience,
        projects,
        education,
    })
}

/// Validates a partial update. Only fields present in the payload are checked
/// and carried into the patch.
pub fn validate_resume_patch(payload: ResumePayload) -> Result<ResumePatch, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let title = match payload.title {
        Some(raw) => {
            let title = non_blank(Some(raw));
            if title.is_none() {
                errors.push("title", "Title is required");
            }
            title
        }
        None => None,
    };

    let patch = ResumePatch {
        title,
        template: payload
            .template
            .and_then(|t| parse_template(&t, &mut errors)),
        status: payload.status.and_then(|s| parse_status(&s, &mut errors)),
        personal_info: payload
            .personal_info
            .map(|info| check_personal_info(info, &mut errors)),
        skills: payload.skills.map(clean_skills),
        experience: payload
            .experience
            .map(|items| check_experience(items, &mut errors)),
        projects: payload.projects.map(|items| check_projects(items, &mut errors)),
        education: payload.education.map(|items| check_education(items, &mut errors)),
    };

    errors.into_result(patch)
}

fn parse_template(raw: &str, errors: &mut ValidationErrors) -> Option<Template> {
    match raw.trim().parse::<Template>() {
        Ok(template) => Some(template),
        Err(_) => {
            let allowed: Vec<&str> = Template::ALL.iter().map(|t| t.as_str()).collect();
            errors.push(
                "template",
                format!("Template must be one of: {}", allowed.join(", ")),
            );
            None
        }
    }
}

fn parse_status(raw: &str, errors: &mut ValidationErrors) -> Option<ResumeStatus> {
    match raw.trim().parse::<ResumeStatus>() {
        Ok(status) => Some(status),
        Err(_) => {
            errors.push("status", "Status must be one of: draft, published");
            None
        }
    }
}

/// Trims a string and maps blank values to `None`.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(
    value: Option<String>,
    field: String,
    message: &str,
    errors: &mut ValidationErrors,
) -> String {
    match non_blank(value) {
        Some(v) => v,
        None => {
            errors.push(field, message);
            String::new()
        }
    }
}

fn optional_url(value: Option<String>, field: String, errors: &mut ValidationErrors) -> Option<String> {
    let value = non_blank(value)?;
    if let Err(msg) = check_url(&value) {
        errors.push(field, msg);
    }
    Some(value)
}

fn check_personal_info(info: PersonalInfo, errors: &mut ValidationErrors) -> PersonalInfo {
    let email = non_blank(info.email);
    if let Some(email) = &email {
        if let Err(msg) = check_email(email) {
            errors.push("personalInfo.email", msg);
        }
    }

    PersonalInfo {
        full_name: non_blank(info.full_name),
        job_title: non_blank(info.job_title),
        email,
        phone: non_blank(info.phone),
        location: non_blank(info.location),
        website: optional_url(info.website, "personalInfo.website".to_string(), errors),
        github: non_blank(info.github),
        linkedin: non_blank(info.linkedin),
        summary: non_blank(info.summary),
    }
}

fn clean_skills(skills: Vec<String>) -> Vec<String> {
    skills
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn check_experience(items: Vec<ExperiencePayload>, errors: &mut ValidationErrors) -> Vec<ExperienceItem> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let at = |field: &str| format!("experience[{i}].{field}");
            ExperienceItem {
                title: required(item.title, at("title"), "Job title is required", errors),
                company: required(item.company, at("company"), "Company name is required", errors),
                location: non_blank(item.location),
                start_date: required(item.start_date, at("startDate"), "Start date is required", errors),
                end_date: required(item.end_date, at("endDate"), "End date is required", errors),
                description: required(
                    item.description,
                    at("description"),
                    "Job description is required",
                    errors,
                ),
            }
        })
        .collect()
}

fn check_projects(items: Vec<ProjectPayload>, errors: &mut ValidationErrors) -> Vec<ProjectItem> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let at = |field: &str| format!("projects[{i}].{field}");
            ProjectItem {
                title: required(item.title, at("title"), "Project title is required", errors),
                description: required(
                    item.description,
                    at("description"),
                    "Project description is required",
                    errors,
                ),
                technologies: required(
                    item.technologies,
                    at("technologies"),
                    "Technologies used are required",
                    errors,
                ),
                link: optional_url(item.link, at("link"), errors),
                start_date: non_blank(item.start_date),
                end_date: non_blank(item.end_date),
            }
        })
        .collect()
}

fn check_education(items: Vec<EducationPayload>, errors: &mut ValidationErrors) -> Vec<EducationItem> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let at = |field: &str| format!("education[{i}].{field}");
            EducationItem {
                degree: required(item.degree, at("degree"), "Degree is required", errors),
                institution: required(
                    item.institution,
                    at("institution"),
                    "Institution name is required",
                    errors,
                ),
                location: non_blank(item.location),
                start_date: required(item.start_date, at("startDate"), "Start date is required", errors),
                end_date: required(item.end_date, at("endDate"), "End date is required", errors),
                gpa: non_blank(item.gpa),
                description: non_blank(item.description),
            }
        })
        .collect()
}
