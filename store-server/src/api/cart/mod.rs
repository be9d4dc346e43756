//! Cart API 模块

mod handler;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest(
        "/api/cart",
        Router::new()
            .route("/", get(handler::view).delete(handler::clear))
            .route("/items", post(handler::add_item).put(handler::update_item))
            .route("/items/{product_id}/{size}", delete(handler::remove_item)),
    )
}
