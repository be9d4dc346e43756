//! Coupon API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Coupon, CouponCreate, CouponUpdate};
use crate::db::repository::CouponRepository;
use crate::utils::AppResult;

/// GET /api/coupons - 全部优惠码
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Coupon>>> {
    let repo = CouponRepository::new(state.get_db());
    let coupons = repo.find_all().await?;
    Ok(Json(coupons))
}

/// POST /api/coupons - 创建优惠码
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CouponCreate>,
) -> AppResult<Json<Coupon>> {
    let repo = CouponRepository::new(state.get_db());
    let coupon = repo.create(payload).await?;
    Ok(Json(coupon))
}

/// PUT /api/coupons/{id} - 更新优惠码
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CouponUpdate>,
) -> AppResult<Json<Coupon>> {
    let repo = CouponRepository::new(state.get_db());
    let coupon = repo.update(&id, payload).await?;
    Ok(Json(coupon))
}

/// DELETE /api/coupons/{id} - 删除优惠码
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = CouponRepository::new(state.get_db());
    repo.delete(&id).await?;
    Ok(Json(true))
}
