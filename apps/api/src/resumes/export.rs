use crate::resumes::models::Resume;

/// Renders a résumé as a Markdown document. Sections with no content are skipped.
pub fn render_resume_to_md(resume: &Resume) -> String {
    let mut md = String::new();
    let info = &resume.personal_info;

    let heading = info.full_name.as_deref().unwrap_or(&resume.title);
    md.push_str(&format!("# {heading}\n\n"));
    if let Some(job_title) = &info.job_title {
        md.push_str(&format!("**{job_title}**\n\n"));
    }

    let contact: Vec<&str> = [
        &info.email,
        &info.phone,
        &info.location,
        &info.website,
        &info.github,
        &info.linkedin,
    ]
    .into_iter()
    .filter_map(|v| v.as_deref())
    .collect();
    if !contact.is_empty() {
        md.push_str(&format!("{}\n\n", contact.join(" | ")));
    }

    if let Some(summary) = &info.summary {
        md.push_str(&format!("## Summary\n\n{summary}\n\n"));
    }

    if !resume.skills.is_empty() {
        md.push_str(&format!("## Skills\n\n{}\n\n", resume.skills.join(", ")));
    }

    if !resume.experience.is_empty() {
        md.push_str("## Experience\n\n");
        for job in &resume.experience {
            md.push_str(&format!("### {} — {}\n", job.title, job.company));
            md.push_str(&dated_line(&job.start_date, &job.end_date, job.location.as_deref()));
            md.push_str(&format!("\n\n{}\n\n", job.description));
        }
    }

    if !resume.projects.is_empty() {
        md.push_str("## Projects\n\n");
        for project in &resume.projects {
            match &project.link {
                Some(link) => md.push_str(&format!("### [{}]({link})\n", project.title)),
                None => md.push_str(&format!("### {}\n", project.title)),
            }
            md.push_str(&format!("*{}*\n", project.technologies));
            if let (Some(start), Some(end)) = (&project.start_date, &project.end_date) {
                md.push_str(&format!("{start} – {end}\n"));
            }
            md.push_str(&format!("\n{}\n\n", project.description));
        }
    }

    if !resume.education.is_empty() {
        md.push_str("## Education\n\n");
        for school in &resume.education {
            md.push_str(&format!("### {} — {}\n", school.degree, school.institution));
            md.push_str(&dated_line(
                &school.start_date,
                &school.end_date,
                school.location.as_deref(),
            ));
            md.push('\n');
            if let Some(gpa) = &school.gpa {
                md.push_str(&format!("GPA: {gpa}\n"));
            }
            if let Some(description) = &school.description {
                md.push_str(&format!("\n{description}\n"));
            }
            md.push('\n');
        }
    }

    md
}

fn dated_line(start: &str, end: &str, location: Option<&str>) -> String {
    match location {
        Some(location) => format!("{start} – {end} · {location}"),
        None => format!("{start} – {end}"),
    }
}

/// File name offered for a downloaded export, derived from the résumé title.
pub fn export_file_name(resume: &Resume) -> String {
    let slug: String = resume
        .title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    let slug = slug
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "resume.md".to_string()
    } else {
        format!("{slug}.md")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resumes::models::{
        EducationItem, ExperienceItem, PersonalInfo, ProjectItem, ResumeStatus, Template,
    };
    use chrono::Utc;
    use uuid::Uuid;

    fn sample() -> Resume {
        let now = Utc::now();
        Resume {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Senior Engineer CV".into(),
            template: Template::Modern,
            status: ResumeStatus::Draft,
            personal_info: PersonalInfo {
                full_name: Some("Jane Doe".into()),
                job_title: Some("Senior Software Engineer".into()),
                email: Some("jane@example.com".into()),
                location: Some("Berlin".into()),
                summary: Some("Builds reliable backends.".into()),
                ..Default::default()
            },
            skills: vec!["Rust".into(), "PostgreSQL".into()],
            experience: vec![ExperienceItem {
                title: "Engineer".into(),
                company: "Acme".into(),
                location: None,
                start_date: "2020-01".into(),
                end_date: "Present".into(),
                description: "Owned the billing service".into(),
            }],
            projects: vec![ProjectItem {
                title: "resume-api".into(),
                description: "Résumé backend".into(),
                technologies: "Rust, axum".into(),
                link: Some("https://github.com/jane/resume-api".into()),
                start_date: None,
                end_date: None,
            }],
            education: vec![EducationItem {
                degree: "BSc".into(),
                institution: "TU Berlin".into(),
                location: Some("Berlin".into()),
                start_date: "2012".into(),
                end_date: "2016".into(),
                gpa: Some("1.3".into()),
                description: None,
            }],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_render_contains_every_section() {
        let md = render_resume_to_md(&sample());
        assert!(md.starts_with("# Jane Doe\n"));
        assert!(md.contains("**Senior Software Engineer**"));
        assert!(md.contains("jane@example.com | Berlin"));
        assert!(md.contains("## Summary"));
        assert!(md.contains("Rust, PostgreSQL"));
        assert!(md.contains("### Engineer — Acme"));
        assert!(md.contains("2020-01 – Present"));
        assert!(md.contains("### [resume-api](https://github.com/jane/resume-api)"));
        assert!(md.contains("2012 – 2016 · Berlin"));
        assert!(md.contains("GPA: 1.3"));
    }

    #[test]
    fn test_render_skips_empty_sections() {
        let mut resume = sample();
        resume.personal_info = PersonalInfo::default();
        resume.skills.clear();
        resume.experience.clear();
        resume.projects.clear();
        resume.education.clear();
        let md = render_resume_to_md(&resume);
        assert_eq!(md, "# Senior Engineer CV\n\n");
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name(&sample()), "senior-engineer-cv.md");
        let mut resume = sample();
        resume.title = "***".into();
        assert_eq!(export_file_name(&resume), "resume.md");
    }
}
