//! Wallet Model
//!
//! 钱包余额 + 追加式流水账。余额恒等于流水折叠结果；
//! 退款流水引用对应订单。

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Transaction direction enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxnDirection {
    Credit,
    Debit,
}

/// One ledger entry (append-only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletTxn {
    pub amount: f64,
    pub direction: TxnDirection,
    pub reason: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub order: Option<RecordId>,
    pub created_at: i64,
}

/// Wallet entity (one per user)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    #[serde(default)]
    pub balance: f64,
    #[serde(default)]
    pub transactions: Vec<WalletTxn>,
}

/// Wallet view (balance + recent ledger page)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletView {
    pub balance: f64,
    pub transactions: Vec<WalletTxn>,
}
