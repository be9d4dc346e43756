//! Wallet API Handler

use axum::{
    Json,
    extract::{Query, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::WalletView;
use crate::db::repository::WalletRepository;
use crate::utils::{AppResult, PaginationParams};

/// GET /api/wallet - 余额与最近流水
///
/// 流水按时间倒序分页返回 (账本本身追加式存储)。
pub async fn view(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<WalletView>> {
    let repo = WalletRepository::new(state.get_db());
    let wallet = repo.find_by_user(&user.record_id()?).await?;

    let mut transactions = wallet.transactions;
    transactions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let offset = page.offset() as usize;
    let limit = page.limit() as usize;
    let transactions = transactions.into_iter().skip(offset).take(limit).collect();

    Ok(Json(WalletView {
        balance: wallet.balance,
        transactions,
    }))
}
