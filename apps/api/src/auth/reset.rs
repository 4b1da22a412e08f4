use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Random bytes behind each reset token (hex-encoded to 64 characters).
const RESET_TOKEN_BYTES: usize = 32;

/// A newly minted reset token. Only `digest` is persisted; `token` goes to the user.
#[derive(Debug, Clone)]
pub struct ResetToken {
    pub token: String,
    pub digest: String,
    pub expires_at: DateTime<Utc>,
}

pub fn generate_reset_token(now: DateTime<Utc>, ttl: Duration) -> ResetToken {
    let mut bytes = [0u8; RESET_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    let token = hex::encode(bytes);
    ResetToken {
        digest: digest_token(&token),
        token,
        expires_at: now + ttl,
    }
}

/// SHA-256 of the token, hex-encoded. This is what the users table stores.
pub fn digest_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.trim().as_bytes()))
}

/// Link the user follows to choose a new password.
pub fn reset_url(base_url: &str, token: &str) -> String {
    format!("{}/reset-password?token={token}", base_url.trim_end_matches('/'))
}
