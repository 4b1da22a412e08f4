use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;

/// Remembers logged-out session ids until their tokens would have expired anyway.
#[async_trait]
pub trait SessionRevocation: Send + Sync {
    async fn revoke(&self, jti: Uuid, ttl_secs: u64) -> Result<(), AppError>;

    async fn is_revoked(&self, jti: Uuid) -> Result<bool, AppError>;
}

pub struct RedisRevocation {
    client: redis::Client,
}

impl RedisRevocation {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }
}

fn revocation_key(jti: Uuid) -> String {
    format!("session:revoked:{jti}")
}

#[async_trait]
impl SessionRevocation for RedisRevocation {
    async fn revoke(&self, jti: Uuid, ttl_secs: u64) -> Result<(), AppError> {
        if ttl_secs == 0 {
            return Ok(());
        }
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        redis::cmd("SET")
            .arg(revocation_key(jti))
            .arg(1)
            .arg("EX")
            .arg(ttl_secs)
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn is_revoked(&self, jti: Uuid) -> Result<bool, AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        Ok(redis::cmd("EXISTS")
            .arg(revocation_key(jti))
            .query_async::<_, bool>(&mut conn)
            .await?)
    }
}

#[cfg(test)]
pub use memory::{MemoryRevocation, UnavailableRevocation};
