use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{NewUser, User};
use crate::repo::{ResumeRepository, UserRepository};
use crate::resumes::models::{Resume, ResumeDraft, ResumePatch};

fn holds_reset_token(user: &User, token_hash: &str, now: DateTime<Utc>) -> bool {
    user.reset_token_hash.as_deref() == Some(token_hash)
        && user.reset_token_expires_at.is_some_and(|exp| exp > now)
}

#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == new_user.email) {
            return Err(AppError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email,
            name: new_user.name,
            password_hash: new_user.password_hash,
            reset_token_hash: None,
            reset_token_expires_at: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<String>,
        password_hash: Option<String>,
    ) -> Result<Option<User>, AppError> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = name {
            user.name = name;
        }
        if let Some(hash) = password_hash {
            user.password_hash = hash;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn set_reset_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        if let Some(user) = self.users.write().await.get_mut(&id) {
            user.reset_token_hash = Some(token_hash.to_string());
            user.reset_token_expires_at = Some(expires_at);
        }
        Ok(())
    }

    async fn reset_token_holder(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Uuid>, AppError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| holds_reset_token(u, token_hash, now))
            .map(|u| u.id))
    }

    async fn consume_reset_token(
        &self,
        token_hash: &str,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Uuid>, AppError> {
        let mut users = self.users.write().await;
        let holder = users
            .values_mut()
            .find(|u| holds_reset_token(u, token_hash, now));
        Ok(holder.map(|user| {
            user.password_hash = password_hash.to_string();
            user.reset_token_hash = None;
            user.reset_token_expires_at = None;
            user.updated_at = now;
            user.id
        }))
    }
}

#[derive(Default)]
pub struct MemoryResumeRepository {
    resumes: RwLock<HashMap<Uuid, Resume>>,
}

#[async_trait]
impl ResumeRepository for MemoryResumeRepository {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Resume>, AppError> {
        let mut owned: Vec<Resume> = self
            .resumes
            .read()
            .await
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(owned)
    }

    async fn create(&self, user_id: Uuid, draft: ResumeDraft) -> Result<Resume, AppError> {
        let now = Utc::now();
        let resume = Resume {
            id: Uuid::new_v4(),
            user_id,
            title: draft.title,
            template: draft.template,
            status: draft.status,
            personal_info: draft.personal_info,
            skills: draft.skills,
            experience: draft.experience,
            projects: draft.projects,
            education: draft.education,
            created_at: now,
            updated_at: now,
        };
        self.resumes.write().await.insert(resume.id, resume.clone());
        Ok(resume)
    }

    async fn find_owned(&self, id: Uuid, user_id: Uuid) -> Result<Option<Resume>, AppError> {
        Ok(self
            .resumes
            .read()
            .await
            .get(&id)
            .filter(|r| r.user_id == user_id)
            .cloned())
    }

    async fn update_owned(
        &self,
        id: Uuid,
        user_id: Uuid,
        patch: ResumePatch,
    ) -> Result<Option<Resume>, AppError> {
        let mut resumes = self.resumes.write().await;
        let Some(resume) = resumes.get_mut(&id).filter(|r| r.user_id == user_id) else {
            return Ok(None);
        };
        patch.apply_to(resume);
        resume.updated_at = Utc::now();
        Ok(Some(resume.clone()))
    }

    async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let mut resumes = self.resumes.write().await;
        if resumes.get(&id).is_some_and(|r| r.user_id == user_id) {
            resumes.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    async fn user_with_token(repo: &MemoryUserRepository, expires_at: DateTime<Utc>) -> Uuid {
        let user = repo
            .create(NewUser {
                email: "jane@example.com".into(),
                name: "Jane Doe".into(),
                password_hash: "old-hash".into(),
            })
            .await
            .unwrap();
        repo.set_reset_token(user.id, "digest", expires_at).await.unwrap();
        user.id
    }

    #[tokio::test]
    async fn test_reset_token_holder_requires_unexpired_digest() {
        let repo = MemoryUserRepository::default();
        let now = Utc::now();
        let id = user_with_token(&repo, now + Duration::minutes(5)).await;

        assert_eq!(repo.reset_token_holder("digest", now).await.unwrap(), Some(id));
        assert_eq!(repo.reset_token_holder("other", now).await.unwrap(), None);
        assert_eq!(
            repo.reset_token_holder("digest", now + Duration::minutes(5)).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_consume_clears_token() {
        let repo = MemoryUserRepository::default();
        let now = Utc::now();
        let id = user_with_token(&repo, now + Duration::minutes(5)).await;

        assert_eq!(
            repo.consume_reset_token("digest", "new-hash", now).await.unwrap(),
            Some(id)
        );
        assert_eq!(repo.reset_token_holder("digest", now).await.unwrap(), None);
        let user = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(user.password_hash, "new-hash");
        assert!(user.reset_token_expires_at.is_none());
    }
}
