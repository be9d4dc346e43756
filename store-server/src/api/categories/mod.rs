//! Category API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    // 浏览公开；增删改仅管理员
    let public = Router::new().route("/", get(handler::list));
    let admin = Router::new()
        .route("/", axum::routing::post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .route_layer(middleware::from_fn(require_admin));

    Router::new().nest("/api/categories", public.merge(admin))
}
