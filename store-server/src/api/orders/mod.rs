//! Order API 模块 (顾客侧)

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", order_routes())
}

fn order_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/cancel", post(handler::cancel_order))
        .route("/{id}/items/{item_id}/cancel", post(handler::cancel_item))
        .route("/{id}/items/{item_id}/return", post(handler::request_return))
}
