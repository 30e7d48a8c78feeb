//! # User Lookup
//!
//! Credential check and the small user-table surface the sync clients
//! consume: login, FCM token registration, and user creation for the CLI.

use rusqlite::{params, OptionalExtension};
use serde::{Deserialize, Serialize};

use super::crypto::{generate_salt, hash_password, verify_password};
use super::errors::{AuthError, AuthResult};
use crate::db::DbPool;

/// Minimal identity projection returned on login. Never carries the salt
/// or digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub user_id: i64,
    pub user_name: String,
    pub lang_id: Option<i64>,
}

/// Login request body
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub user_name: Option<String>,
    pub password: Option<String>,
}

/// FCM token registration body
#[derive(Debug, Clone, Deserialize)]
pub struct FcmTokenRequest {
    pub user_name: Option<String>,
    pub fcm_token: Option<String>,
}

/// Check credentials and return the identity projection.
pub fn login(pool: &DbPool, req: &LoginRequest) -> AuthResult<UserIdentity> {
    let user_name = req.user_name.as_deref().filter(|s| !s.is_empty());
    let password = req.password.as_deref().filter(|s| !s.is_empty());
    let (user_name, password) = match (user_name, password) {
        (Some(u), Some(p)) => (u, p),
        _ => return Err(AuthError::MissingCredentials),
    };

    let conn = pool.get()?;
    let row = conn
        .query_row(
            "SELECT user_id, user_name, lang_id, salt, password_hash
             FROM users WHERE user_name = ?1",
            [user_name],
            |r| {
                Ok((
                    UserIdentity {
                        user_id: r.get(0)?,
                        user_name: r.get(1)?,
                        lang_id: r.get(2)?,
                    },
                    r.get::<_, String>(3)?,
                    r.get::<_, String>(4)?,
                ))
            },
        )
        .optional()?;

    match row {
        Some((identity, salt, stored_hash)) if verify_password(&salt, password, &stored_hash) => {
            tracing::debug!(user_name, "login succeeded");
            Ok(identity)
        }
        _ => Err(AuthError::InvalidCredentials),
    }
}

/// Register or replace the FCM push token for a user.
pub fn update_fcm_token(pool: &DbPool, req: &FcmTokenRequest) -> AuthResult<()> {
    let user_name = req.user_name.as_deref().filter(|s| !s.is_empty());
    let fcm_token = req.fcm_token.as_deref().filter(|s| !s.is_empty());
    let (user_name, fcm_token) = match (user_name, fcm_token) {
        (Some(u), Some(t)) => (u, t),
        _ => return Err(AuthError::MissingCredentials),
    };

    let conn = pool.get()?;
    let affected = conn.execute(
        "UPDATE users SET fcm_token = ?1 WHERE user_name = ?2",
        params![fcm_token, user_name],
    )?;

    if affected == 0 {
        return Err(AuthError::UserNotFound(user_name.to_string()));
    }
    tracing::debug!(user_name, "fcm token updated");
    Ok(())
}

/// Create a user with a fresh salt. Used by the CLI; there is no signup
/// endpoint.
pub fn create_user(
    pool: &DbPool,
    user_name: &str,
    password: &str,
    lang_id: Option<i64>,
) -> AuthResult<i64> {
    let salt = generate_salt();
    let digest = hash_password(&salt, password);

    let conn = pool.get()?;
    let exists: Option<i64> = conn
        .query_row("SELECT user_id FROM users WHERE user_name = ?1", [user_name], |r| {
            r.get(0)
        })
        .optional()?;
    if exists.is_some() {
        return Err(AuthError::UserExists(user_name.to_string()));
    }

    conn.execute(
        "INSERT INTO users (user_name, salt, password_hash, lang_id) VALUES (?1, ?2, ?3, ?4)",
        params![user_name, salt, digest, lang_id],
    )?;
    Ok(conn.last_insert_rowid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ensure_schema;
    use tempfile::TempDir;

    fn pool_with_user() -> (TempDir, DbPool) {
        let dir = TempDir::new().unwrap();
        let pool = DbPool::open(dir.path().join("test.db")).unwrap();
        ensure_schema(&pool.get().unwrap()).unwrap();
        create_user(&pool, "mcmeister", "online12", Some(1)).unwrap();
        (dir, pool)
    }

    fn login_req(user: &str, pass: &str) -> LoginRequest {
        LoginRequest {
            user_name: Some(user.to_string()),
            password: Some(pass.to_string()),
        }
    }

    #[test]
    fn test_login_projection() {
        let (_dir, pool) = pool_with_user();
        let identity = login(&pool, &login_req("mcmeister", "online12")).unwrap();
        assert_eq!(identity.user_name, "mcmeister");
        assert_eq!(identity.lang_id, Some(1));

        let json = serde_json::to_value(&identity).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("salt").is_none());
    }

    #[test]
    fn test_login_rejects_bad_credentials() {
        let (_dir, pool) = pool_with_user();
        assert!(matches!(
            login(&pool, &login_req("mcmeister", "wrong")),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            login(&pool, &login_req("nobody", "online12")),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_login_requires_both_fields() {
        let (_dir, pool) = pool_with_user();
        let req = LoginRequest {
            user_name: Some("mcmeister".to_string()),
            password: None,
        };
        assert!(matches!(login(&pool, &req), Err(AuthError::MissingCredentials)));
    }

    #[test]
    fn test_fcm_token_update() {
        let (_dir, pool) = pool_with_user();
        let req = FcmTokenRequest {
            user_name: Some("mcmeister".to_string()),
            fcm_token: Some("token-abc".to_string()),
        };
        update_fcm_token(&pool, &req).unwrap();

        let stored: Option<String> = pool
            .get()
            .unwrap()
            .query_row(
                "SELECT fcm_token FROM users WHERE user_name = 'mcmeister'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(stored.as_deref(), Some("token-abc"));

        let unknown = FcmTokenRequest {
            user_name: Some("nobody".to_string()),
            fcm_token: Some("t".to_string()),
        };
        assert!(matches!(
            update_fcm_token(&pool, &unknown),
            Err(AuthError::UserNotFound(_))
        ));
    }

    #[test]
    fn test_duplicate_user_rejected() {
        let (_dir, pool) = pool_with_user();
        assert!(matches!(
            create_user(&pool, "mcmeister", "x", None),
            Err(AuthError::UserExists(_))
        ));
    }
}
