//! # Auth Module
//!
//! The single plaintext credential check the sync clients use: salted
//! SHA-256 with constant-time comparison, an identity projection, and the
//! FCM token registration path.

mod crypto;
mod errors;
mod user;

pub use crypto::{generate_salt, hash_password, verify_password};
pub use errors::{AuthError, AuthResult};
pub use user::{create_user, login, update_fcm_token, FcmTokenRequest, LoginRequest, UserIdentity};
