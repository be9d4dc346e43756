//! Checkout API Handler
//!
//! 薄封装：所有下单逻辑在 [`crate::orders::CheckoutEngine`]。

use axum::{Json, extract::State};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{CheckoutRequest, Order};
use crate::utils::AppResult;

/// POST /api/checkout - 把购物车转换为订单
pub async fn checkout(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<Order>> {
    let engine = state.checkout_engine();
    let order = engine.checkout(&user.record_id()?, payload).await?;
    Ok(Json(order))
}
