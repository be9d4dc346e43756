//! 后台 API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{
    OrderStatus, OrderStatusUpdate, OrderSummary, ReportQuery, ReportRange, SalesReport,
};
use crate::db::repository::{OrderRepository, ReportRepository, UserRepository};
use crate::utils::{AppError, AppResult, Page, PaginationParams};
use shared::ErrorCode;
use shared::client::UserInfo;
use shared::util::now_millis;

// =============================================================================
// Users
// =============================================================================

/// GET /api/admin/users - 顾客列表
pub async fn list_users(
    State(state): State<ServerState>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Page<UserInfo>>> {
    let repo = UserRepository::new(state.get_db());
    let users = repo.find_page(page.limit(), page.offset()).await?;
    let total = repo.count().await?;

    Ok(Json(Page {
        items: users.iter().map(|u| u.to_user_info()).collect(),
        total,
        page: page.page,
        page_size: page.limit(),
    }))
}

/// PUT /api/admin/users/{id}/block - 封禁账号
pub async fn block_user(
    State(state): State<ServerState>,
    admin: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<UserInfo>> {
    set_user_active(&state, &admin, &id, false).await
}

/// PUT /api/admin/users/{id}/unblock - 解封账号
pub async fn unblock_user(
    State(state): State<ServerState>,
    admin: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<UserInfo>> {
    set_user_active(&state, &admin, &id, true).await
}

async fn set_user_active(
    state: &ServerState,
    admin: &CurrentUser,
    id: &str,
    active: bool,
) -> AppResult<Json<UserInfo>> {
    let repo = UserRepository::new(state.get_db());
    let target = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    // 管理员账号不可被封禁，自己也不行
    let target_id = crate::api::convert::id_string(&target.id);
    if target_id == admin.id {
        return Err(AppError::new(ErrorCode::CannotBlockSelf));
    }
    if target.role == crate::db::models::UserRole::Admin {
        return Err(AppError::new(ErrorCode::CannotModifyAdmin));
    }

    let updated = repo.set_active(id, active).await?;
    tracing::info!(
        target = %target_id,
        active,
        admin = %admin.id,
        "User active flag changed"
    );
    Ok(Json(updated.to_user_info()))
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct OrderListParams {
    pub status: Option<OrderStatus>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// GET /api/admin/orders - 订单列表 (按状态过滤)
pub async fn list_orders(
    State(state): State<ServerState>,
    Query(params): Query<OrderListParams>,
) -> AppResult<Json<Page<OrderSummary>>> {
    let paging = PaginationParams {
        page: params.page.unwrap_or(1),
        page_size: params.page_size.unwrap_or(20),
    };
    let repo = OrderRepository::new(state.get_db());
    let orders = repo
        .find_page(params.status, paging.limit(), paging.offset())
        .await?;
    let items: Vec<OrderSummary> = orders.iter().map(OrderSummary::from).collect();
    let total = items.len() as i64;

    Ok(Json(Page {
        items,
        total,
        page: paging.page,
        page_size: paging.limit(),
    }))
}

/// PUT /api/admin/orders/{id}/status - 履约推进 (PENDING → SHIPPED → DELIVERED)
pub async fn set_order_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<crate::db::models::Order>> {
    let lifecycle = state.order_lifecycle();
    let order = lifecycle.set_fulfilment(&id, payload.status).await?;
    Ok(Json(order))
}

/// PUT /api/admin/orders/{id}/items/{item_id}/return - 完成退货
///
/// 回补库存并退款到钱包。
pub async fn complete_return(
    State(state): State<ServerState>,
    Path((id, item_id)): Path<(String, String)>,
) -> AppResult<Json<crate::db::models::Order>> {
    let lifecycle = state.order_lifecycle();
    let order = lifecycle.complete_return(&id, &item_id).await?;
    Ok(Json(order))
}

// =============================================================================
// Reports
// =============================================================================

/// GET /api/admin/reports/sales - 销售报表
///
/// `?range=today|week|month` 或 `?from=&to=` (epoch ms)；
/// 自定义区间优先，都缺省时默认最近 30 天。
pub async fn sales_report(
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<SalesReport>> {
    let (from, to) = resolve_range(&query);
    if from > to {
        return Err(AppError::validation("from must not be after to"));
    }

    let repo = ReportRepository::new(state.get_db());
    let report = repo.sales(from, to).await?;
    Ok(Json(report))
}

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

fn resolve_range(query: &ReportQuery) -> (i64, i64) {
    if let (Some(from), Some(to)) = (query.from, query.to) {
        return (from, to);
    }
    let now = now_millis();
    let days = match query.range {
        Some(ReportRange::Today) => 1,
        Some(ReportRange::Week) => 7,
        Some(ReportRange::Month) | None => 30,
    };
    (now - days * DAY_MS, now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_range_custom_wins() {
        let q = ReportQuery {
            range: Some(ReportRange::Today),
            from: Some(100),
            to: Some(200),
        };
        assert_eq!(resolve_range(&q), (100, 200));
    }

    #[test]
    fn test_resolve_range_defaults_to_month() {
        let q = ReportQuery {
            range: None,
            from: None,
            to: None,
        };
        let (from, to) = resolve_range(&q);
        assert_eq!(to - from, 30 * DAY_MS);
    }
}
