use std::fmt;

use serde::Serialize;

/// A single rejected field, addressed by its JSON path (e.g. `experience[0].company`).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every field failure found while checking one request body.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Returns `value` when nothing was recorded, otherwise the collected errors.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

pub const PASSWORD_MIN_LEN: usize = 6;
pub const NAME_MIN_LEN: usize = 2;

/// Lowercases and trims an email so lookups are case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Structural email check: one `@`, non-empty local part, dotted domain, no spaces.
pub fn check_email(email: &str) -> Result<(), &'static str> {
    const INVALID: &str = "Invalid email address";

    let email = email.trim();
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return Err(INVALID);
    }
    let (local, domain) = email.split_once('@').ok_or(INVALID)?;
    if local.is_empty() || domain.contains('@') {
        return Err(INVALID);
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(INVALID);
    }
    if domain.contains("..") {
        return Err(INVALID);
    }
    Ok(())
}

/// Returns every password policy violation, empty when the password is acceptable.
pub fn password_issues(password: &str) -> Vec<&'static str> {
    let mut issues = Vec::new();
    if password.chars().count() < PASSWORD_MIN_LEN {
        issues.push("Password must be at least 6 characters");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        issues.push("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        issues.push("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        issues.push("Password must contain at least one number");
    }
    issues
}

pub fn check_name(name: &str) -> Result<(), &'static str> {
    if name.trim().chars().count() < NAME_MIN_LEN {
        return Err("Name must be at least 2 characters");
    }
    Ok(())
}

/// Accepts absolute `http` and `https` URLs only.
pub fn check_url(url: &str) -> Result<(), &'static str> {
    const INVALID: &str = "Invalid URL";

    let parsed = reqwest::Url::parse(url.trim()).map_err(|_| INVALID)?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(()),
        _ => Err(INVALID),
    }
}
