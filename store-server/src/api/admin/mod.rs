//! 后台 API 模块 (仅管理员)
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/admin/users | GET | 顾客列表 |
//! | /api/admin/users/{id}/block | PUT | 封禁账号 |
//! | /api/admin/users/{id}/unblock | PUT | 解封账号 |
//! | /api/admin/orders | GET | 订单列表 (按状态过滤) |
//! | /api/admin/orders/{id}/status | PUT | 履约推进 (发货/签收) |
//! | /api/admin/orders/{id}/items/{item_id}/return | PUT | 完成退货 |
//! | /api/admin/reports/sales | GET | 销售报表 |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest(
        "/api/admin",
        Router::new()
            .route("/users", get(handler::list_users))
            .route("/users/{id}/block", put(handler::block_user))
            .route("/users/{id}/unblock", put(handler::unblock_user))
            .route("/orders", get(handler::list_orders))
            .route("/orders/{id}/status", put(handler::set_order_status))
            .route(
                "/orders/{id}/items/{item_id}/return",
                put(handler::complete_return),
            )
            .route("/reports/sales", get(handler::sales_report))
            .route_layer(middleware::from_fn(require_admin)),
    )
}
