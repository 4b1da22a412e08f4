//! Storage seams. Handlers only see these traits; `postgres` backs them in
//! production and `memory` backs them in tests.

pub mod postgres;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{NewUser, User};
use crate::resumes::models::{Resume, ResumeDraft, ResumePatch};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user. Fails with `AppError::Conflict` when the email is taken.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Updates the name and/or password hash. Returns `None` if the user is gone.
    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<String>,
        password_hash: Option<String>,
    ) -> Result<Option<User>, AppError>;

    /// Stores a reset token digest, replacing any earlier one.
    async fn set_reset_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError>;

    /// Returns the user holding an unexpired reset token with this digest.
    async fn reset_token_holder(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Uuid>, AppError>;

    /// Swaps in `password_hash` for the user holding an unexpired token with
    /// this digest and clears the token. Returns the user id, or `None` when no
    /// user matches.
    async fn consume_reset_token(
        &self,
        token_hash: &str,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Uuid>, AppError>;
}

/// Résumé storage. Every id-based call is filtered by the owning user.
#[async_trait]
pub trait ResumeRepository: Send + Sync {
    /// Returns the user's résumés, most recently updated first.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Resume>, AppError>;

    async fn create(&self, user_id: Uuid, draft: ResumeDraft) -> Result<Resume, AppError>;

    async fn find_owned(&self, id: Uuid, user_id: Uuid) -> Result<Option<Resume>, AppError>;

    async fn update_owned(
        &self,
        id: Uuid,
        user_id: Uuid,
        patch: ResumePatch,
    ) -> Result<Option<Resume>, AppError>;

    /// Returns `true` when a résumé was deleted.
    async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> Result<bool, AppError>;
}
