//! Authentication: password hashing, signed session tokens, the `AuthUser`
//! extractor, logout revocation and the password-reset lifecycle.

pub mod extractor;
pub mod handlers;
pub mod mailer;
pub mod password;
pub mod reset;
pub mod revocation;
pub mod tokens;

pub use extractor::AuthUser;
