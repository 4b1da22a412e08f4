use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::models::user::{NewUser, User};
use crate::repo::{ResumeRepository, UserRepository};
use crate::resumes::models::{Resume, ResumeDraft, ResumePatch};

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, name, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_user.email)
        .bind(&new_user.name)
        .bind(&new_user.password_hash)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => {
                info!("Created user {}", user.id);
                Ok(user)
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(
                AppError::Conflict("User with this email already exists".to_string()),
            ),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<String>,
        password_hash: Option<String>,
    ) -> Result<Option<User>, AppError> {
        Ok(sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                password_hash = COALESCE($3, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn set_reset_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE users
            SET reset_token_hash = $2, reset_token_expires_at = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn reset_token_holder(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Uuid>, AppError> {
        Ok(sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM users WHERE reset_token_hash = $1 AND reset_token_expires_at > $2",
        )
        .bind(token_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn consume_reset_token(
        &self,
        token_hash: &str,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Uuid>, AppError> {
        // Single statement: a token can only ever be redeemed once.
        Ok(sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE users
            SET password_hash = $2,
                reset_token_hash = NULL,
                reset_token_expires_at = NULL,
                updated_at = NOW()
            WHERE reset_token_hash = $1 AND reset_token_expires_at > $3
            RETURNING id
            "#,
        )
        .bind(token_hash)
        .bind(password_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?)
    }
}

#[derive(Clone)]
pub struct PgResumeRepository {
    pool: PgPool,
}

impl PgResumeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_resume(row: ResumeRow) -> Result<Resume, AppError> {
    Resume::try_from(row).map_err(AppError::Internal)
}

#[async_trait]
impl ResumeRepository for PgResumeRepository {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Resume>, AppError> {
        let rows = sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE user_id = $1 ORDER BY updated_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(into_resume).collect()
    }

    async fn create(&self, user_id: Uuid, draft: ResumeDraft) -> Result<Resume, AppError> {
        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            INSERT INTO resumes
                (id, user_id, title, template, status,
                 personal_info, skills, experience, projects, education)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&draft.title)
        .bind(draft.template.as_str())
        .bind(draft.status.as_str())
        .bind(Json(&draft.personal_info))
        .bind(Json(&draft.skills))
        .bind(Json(&draft.experience))
        .bind(Json(&draft.projects))
        .bind(Json(&draft.education))
        .fetch_one(&self.pool)
        .await?;

        info!("Created resume {} for user {user_id}", row.id);
        into_resume(row)
    }

    async fn find_owned(&self, id: Uuid, user_id: Uuid) -> Result<Option<Resume>, AppError> {
        sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .map(into_resume)
            .transpose()
    }

    async fn update_owned(
        &self,
        id: Uuid,
        user_id: Uuid,
        patch: ResumePatch,
    ) -> Result<Option<Resume>, AppError> {
        sqlx::query_as::<_, ResumeRow>(
            r#"
            UPDATE resumes
            SET title = COALESCE($3, title),
                template = COALESCE($4, template),
                status = COALESCE($5, status),
                personal_info = COALESCE($6, personal_info),
                skills = COALESCE($7, skills),
                experience = COALESCE($8, experience),
                projects = COALESCE($9, projects),
                education = COALESCE($10, education),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(patch.title)
        .bind(patch.template.map(|t| t.as_str()))
        .bind(patch.status.map(|s| s.as_str()))
        .bind(patch.personal_info.map(Json))
        .bind(patch.skills.map(Json))
        .bind(patch.experience.map(Json))
        .bind(patch.projects.map(Json))
        .bind(patch.education.map(Json))
        .fetch_optional(&self.pool)
        .await?
        .map(into_resume)
        .transpose()
    }

    async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
