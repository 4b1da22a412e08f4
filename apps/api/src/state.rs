use std::sync::Arc;

use crate::auth::mailer::ResetMailer;
use crate::auth::revocation::SessionRevocation;
use crate::auth::tokens::SessionKeys;
use crate::config::Config;
use crate::repo::{ResumeRepository, UserRepository};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub resumes: Arc<dyn ResumeRepository>,
    /// Logged-out session ids. Redis-backed in production.
    pub revocations: Arc<dyn SessionRevocation>,
    /// Reset-link delivery. Logs by default, webhook when `MAIL_WEBHOOK_URL` is set.
    pub mailer: Arc<dyn ResetMailer>,
    pub sessions: SessionKeys,
    pub config: Config,
}
