//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables.

// Accounts
pub mod address;
pub mod user;

// Catalog
pub mod category;
pub mod product;

// Marketing
pub mod coupon;
pub mod offer;

// Cart & Orders
pub mod cart;
pub mod order;

// Wallet & Reports
pub mod report;
pub mod wallet;

// Re-exports
pub use address::AddressRepository;
pub use cart::CartRepository;
pub use category::CategoryRepository;
pub use coupon::CouponRepository;
pub use offer::OfferRepository;
pub use order::OrderRepository;
pub use product::{ProductFilter, ProductRepository};
pub use report::ReportRepository;
pub use user::UserRepository;
pub use wallet::WalletRepository;

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

impl From<RepoError> for shared::error::AppError {
    fn from(err: RepoError) -> Self {
        use shared::error::{AppError, ErrorCode};
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

// =============================================================================
// ID Convention: 全栈统一使用 "table:id" 格式
// =============================================================================
//
// 使用 surrealdb::RecordId 处理所有 ID：
//   - 解析: let id: RecordId = "product:abc".parse()?;
//   - 创建: let id = RecordId::from_table_key("product", "abc");
//   - 获取表名: id.table()
//   - 获取纯ID: id.key().to_string()
//   - CRUD: db.select(id) / db.delete(id) 直接使用 RecordId

/// Parse a "table:id" string, enforcing the expected table
pub fn parse_record_id(table: &str, id: &str) -> RepoResult<RecordId> {
    // Accept both "table:id" and bare "id"
    let rid: RecordId = if id.contains(':') {
        id.parse()
            .map_err(|_| RepoError::Validation(format!("invalid id: {id}")))?
    } else {
        RecordId::from_table_key(table, id)
    };
    if rid.table() != table {
        return Err(RepoError::Validation(format!(
            "expected {table} id, got {id}"
        )));
    }
    Ok(rid)
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record_id() {
        let rid = parse_record_id("product", "product:tee").unwrap();
        assert_eq!(rid.table(), "product");

        let rid = parse_record_id("product", "tee").unwrap();
        assert_eq!(rid.to_string(), "product:tee");

        assert!(parse_record_id("product", "category:tops").is_err());
    }
}
