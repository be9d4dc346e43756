//! Order API Handlers (顾客侧)

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Order, OrderSummary};
use crate::db::repository::OrderRepository;
use crate::utils::{AppError, AppResult, Page, PaginationParams};
use shared::ErrorCode;

/// GET /api/orders - 当前用户订单列表
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Page<OrderSummary>>> {
    let repo = OrderRepository::new(state.get_db());
    let user_id = user.record_id()?;

    let orders = repo
        .find_by_user(&user_id, page.limit(), page.offset())
        .await?;
    let items: Vec<OrderSummary> = orders.iter().map(OrderSummary::from).collect();
    let total = items.len() as i64;

    Ok(Json(Page {
        items,
        total,
        page: page.page,
        page_size: page.limit(),
    }))
}

/// GET /api/orders/{id} - 订单详情 (仅本人)
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.get_db());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    // 非本人订单按不存在处理，避免订单号枚举
    if !user.is_admin() && order.user != user.record_id()? {
        return Err(AppError::new(ErrorCode::OrderNotFound));
    }
    Ok(Json(order))
}

/// POST /api/orders/{id}/cancel - 取消整单
pub async fn cancel_order(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let lifecycle = state.order_lifecycle();
    let order = lifecycle
        .cancel_order(&id, &user.record_id()?, user.is_admin())
        .await?;
    Ok(Json(order))
}

/// POST /api/orders/{id}/items/{item_id}/cancel - 取消单行
pub async fn cancel_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, item_id)): Path<(String, String)>,
) -> AppResult<Json<Order>> {
    let lifecycle = state.order_lifecycle();
    let order = lifecycle
        .cancel_item(&id, &item_id, &user.record_id()?, user.is_admin())
        .await?;
    Ok(Json(order))
}

/// POST /api/orders/{id}/items/{item_id}/return - 发起退货
pub async fn request_return(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, item_id)): Path<(String, String)>,
) -> AppResult<Json<Order>> {
    let lifecycle = state.order_lifecycle();
    let order = lifecycle
        .request_return(&id, &item_id, &user.record_id()?)
        .await?;
    Ok(Json(order))
}
