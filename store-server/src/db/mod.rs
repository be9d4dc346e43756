//! Database Module
//!
//! Handles the embedded SurrealDB instance and schema bootstrap

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "conch";
const DATABASE: &str = "store";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database at `db_path`
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        tracing::info!(path = %db_path, "Database connection established (SurrealDB RocksDB)");

        define_schema(&db).await?;
        tracing::info!("Database schema definitions applied");

        Ok(Self { db })
    }

    /// In-memory database (测试用)
    pub async fn new_memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_schema(&db).await?;

        Ok(Self { db })
    }
}

/// Idempotent schema bootstrap: unique indexes the business rules rely on.
///
/// Tables stay schemaless (document model); only uniqueness constraints are
/// declared so duplicate emails/coupon codes are rejected at the storage layer.
async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        r#"
        DEFINE INDEX IF NOT EXISTS user_email_idx ON TABLE user COLUMNS email UNIQUE;
        DEFINE INDEX IF NOT EXISTS coupon_code_idx ON TABLE coupon COLUMNS code UNIQUE;
        DEFINE INDEX IF NOT EXISTS order_number_idx ON TABLE order COLUMNS order_number UNIQUE;
        DEFINE INDEX IF NOT EXISTS cart_user_idx ON TABLE cart COLUMNS user UNIQUE;
        DEFINE INDEX IF NOT EXISTS wallet_user_idx ON TABLE wallet COLUMNS user UNIQUE;
        "#,
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to apply schema definitions: {e}")))?;
    Ok(())
}
