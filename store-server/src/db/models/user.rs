//! User Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// User ID type
pub type UserId = RecordId;

/// 用户角色
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Customer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Customer => "customer",
        }
    }
}

/// User model matching the `user` table
///
/// 本地账号持有 argon2 哈希；OAuth 账号 `hash_pass` 为空，
/// 以 (oauth_provider, oauth_subject) 标识。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<UserId>,
    pub email: String,
    pub display_name: String,
    #[serde(default)]
    pub hash_pass: Option<String>,
    pub role: UserRole,
    #[serde(default)]
    pub oauth_provider: Option<String>,
    #[serde(default)]
    pub oauth_subject: Option<String>,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
    /// 注册时间 (毫秒时间戳)
    #[serde(default)]
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}

impl User {
    /// Verify password using argon2
    ///
    /// OAuth-only accounts (no local hash) never match.
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let Some(hash) = &self.hash_pass else {
            return Ok(false);
        };
        let parsed_hash = PasswordHash::new(hash)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }

    /// Convert to the public wire representation (never exposes the hash)
    pub fn to_user_info(&self) -> shared::client::UserInfo {
        shared::client::UserInfo {
            id: self.id.as_ref().map(|t| t.to_string()).unwrap_or_default(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            role: self.role.as_str().to_string(),
            is_active: self.is_active,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_roundtrip() {
        let hash = User::hash_password("correct horse battery").unwrap();
        let user = User {
            id: None,
            email: "ana@example.com".into(),
            display_name: "Ana".into(),
            hash_pass: Some(hash),
            role: UserRole::Customer,
            oauth_provider: None,
            oauth_subject: None,
            is_active: true,
            created_at: 0,
        };
        assert!(user.verify_password("correct horse battery").unwrap());
        assert!(!user.verify_password("wrong").unwrap());
    }

    #[test]
    fn test_oauth_account_never_matches_password() {
        let user = User {
            id: None,
            email: "oauth@example.com".into(),
            display_name: "OAuth".into(),
            hash_pass: None,
            role: UserRole::Customer,
            oauth_provider: Some("google".into()),
            oauth_subject: Some("sub-123".into()),
            is_active: true,
            created_at: 0,
        };
        assert!(!user.verify_password("anything").unwrap());
    }
}
