use anyhow::anyhow;

use crate::errors::AppError;

/// Hashes a password with bcrypt on the blocking pool.
pub async fn hash_password(plain: String, cost: u32) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(plain, cost))
        .await
        .map_err(|e| anyhow!("password hashing task failed: {e}"))?
        .map_err(|e| AppError::Internal(anyhow!("bcrypt hash failed: {e}")))
}

/// Checks a password against a stored bcrypt hash. A malformed hash never matches.
pub async fn verify_password(plain: String, hash: String) -> Result<bool, AppError> {
    Ok(
        tokio::task::spawn_blocking(move || bcrypt::verify(plain, &hash).unwrap_or(false))
            .await
            .map_err(|e| anyhow!("password verification task failed: {e}"))?,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[tokio::test]
    async fn test_hash_then_verify() {
        let hash = hash_password("Secret1".into(), TEST_COST).await.unwrap();
        assert_ne!(hash, "Secret1");
        assert!(verify_password("Secret1".into(), hash.clone()).await.unwrap());
        assert!(!verify_password("secret1".into(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_hashes_are_salted() {
        let a = hash_password("Secret1".into(), TEST_COST).await.unwrap();
        let b = hash_password("Secret1".into(), TEST_COST).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_malformed_hash_does_not_match() {
        assert!(!verify_password("Secret1".into(), "not-a-hash".into()).await.unwrap());
    }
}
