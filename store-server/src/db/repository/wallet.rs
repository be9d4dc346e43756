//! Wallet Repository
//!
//! 每用户一个钱包文档 (`wallet:<user_key>`)。余额变动与流水追加在
//! 同一条单文档更新里完成；扣款的余额守卫写在 WHERE 中。

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{TxnDirection, Wallet, WalletTxn};
use shared::util::now_millis;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const WALLET_TABLE: &str = "wallet";

#[derive(Clone)]
pub struct WalletRepository {
    base: BaseRepository,
}

impl WalletRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn wallet_id(user: &RecordId) -> RecordId {
        RecordId::from_table_key(WALLET_TABLE, user.key().to_string())
    }

    /// Load a user's wallet (zero wallet when none exists yet)
    pub async fn find_by_user(&self, user: &RecordId) -> RepoResult<Wallet> {
        let wallet: Option<Wallet> = self.base.db().select(Self::wallet_id(user)).await?;
        Ok(wallet.unwrap_or_else(|| Wallet {
            id: None,
            user: user.clone(),
            balance: 0.0,
            transactions: vec![],
        }))
    }

    /// Make sure the wallet document exists before a guarded update
    async fn ensure(&self, user: &RecordId) -> RepoResult<()> {
        let id = Self::wallet_id(user);
        let existing: Option<Wallet> = self.base.db().select(id.clone()).await?;
        if existing.is_none() {
            let wallet = Wallet {
                id: None,
                user: user.clone(),
                balance: 0.0,
                transactions: vec![],
            };
            // 并发下第二个 create 会撞唯一键，忽略即可
            let _: Result<Option<Wallet>, _> = self.base.db().create(id).content(wallet).await;
        }
        Ok(())
    }

    /// Credit the wallet (refunds)
    pub async fn credit(
        &self,
        user: &RecordId,
        amount: f64,
        reason: impl Into<String>,
        order: Option<RecordId>,
    ) -> RepoResult<Wallet> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(RepoError::Validation(format!(
                "credit amount must be positive, got {amount}"
            )));
        }
        self.ensure(user).await?;

        let txn = WalletTxn {
            amount,
            direction: TxnDirection::Credit,
            reason: reason.into(),
            order,
            created_at: now_millis(),
        };

        let mut result = self
            .base
            .db()
            .query("UPDATE $wallet SET balance += $amount, transactions += $txn RETURN AFTER")
            .bind(("wallet", Self::wallet_id(user)))
            .bind(("amount", amount))
            .bind(("txn", txn))
            .await?;
        let wallets: Vec<Wallet> = result.take(0)?;
        wallets
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to credit wallet".to_string()))
    }

    /// Debit the wallet (wallet payment at checkout).
    ///
    /// 返回 false 表示余额不足 (WHERE 守卫未过)。
    pub async fn try_debit(
        &self,
        user: &RecordId,
        amount: f64,
        reason: impl Into<String>,
        order: Option<RecordId>,
    ) -> RepoResult<bool> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(RepoError::Validation(format!(
                "debit amount must be positive, got {amount}"
            )));
        }
        self.ensure(user).await?;

        let txn = WalletTxn {
            amount,
            direction: TxnDirection::Debit,
            reason: reason.into(),
            order,
            created_at: now_millis(),
        };

        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $wallet SET balance -= $amount, transactions += $txn \
                 WHERE balance >= $amount RETURN AFTER",
            )
            .bind(("wallet", Self::wallet_id(user)))
            .bind(("amount", amount))
            .bind(("txn", txn))
            .await?;
        let wallets: Vec<Wallet> = result.take(0)?;
        Ok(!wallets.is_empty())
    }
}
