//! User Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{User, UserRole};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const USER_TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find user by email (login)
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let email = email.trim().to_lowercase();
        let user: Option<User> = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email))
            .await?
            .take(0)?;
        Ok(user)
    }

    /// Find user by OAuth identity
    pub async fn find_by_oauth(
        &self,
        provider: &str,
        subject: &str,
    ) -> RepoResult<Option<User>> {
        let user: Option<User> = self
            .base
            .db()
            .query(
                "SELECT * FROM user WHERE oauth_provider = $provider AND oauth_subject = $subject LIMIT 1",
            )
            .bind(("provider", provider.to_string()))
            .bind(("subject", subject.to_string()))
            .await?
            .take(0)?;
        Ok(user)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let rid = parse_record_id(USER_TABLE, id)?;
        let user: Option<User> = self.base.db().select(rid).await?;
        Ok(user)
    }

    /// Create a new user
    ///
    /// email 唯一索引在数据库层兜底；这里把索引冲突翻译成 Duplicate。
    pub async fn create(&self, mut user: User) -> RepoResult<User> {
        user.email = user.email.trim().to_lowercase();
        let email = user.email.clone();
        let created: Option<User> = self
            .base
            .db()
            .create(USER_TABLE)
            .content(user)
            .await
            .map_err(|e| {
                let msg = e.to_string();
                if msg.contains("user_email_idx") {
                    RepoError::Duplicate(format!("email {email} already registered"))
                } else {
                    RepoError::Database(msg)
                }
            })?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Block / unblock a user (admin back-office)
    pub async fn set_active(&self, id: &str, is_active: bool) -> RepoResult<User> {
        let rid = parse_record_id(USER_TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $user SET is_active = $active RETURN AFTER")
            .bind(("user", rid))
            .bind(("active", is_active))
            .await?;
        let users: Vec<User> = result.take(0)?;
        users
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    /// List customers for the back-office, newest first
    pub async fn find_page(&self, limit: u32, offset: u32) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user WHERE role = $role ORDER BY created_at DESC LIMIT $limit START $offset")
            .bind(("role", UserRole::Customer))
            .bind(("limit", limit as i64))
            .bind(("offset", offset as i64))
            .await?
            .take(0)?;
        Ok(users)
    }

    pub async fn count(&self) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() AS total FROM user WHERE role = $role GROUP ALL")
            .bind(("role", UserRole::Customer))
            .await?;

        #[derive(serde::Deserialize)]
        struct Count {
            total: i64,
        }
        let count: Option<Count> = result.take(0)?;
        Ok(count.map(|c| c.total).unwrap_or(0))
    }
}
