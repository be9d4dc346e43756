//! Offer API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Offer, OfferCreate, OfferUpdate};
use crate::db::repository::OfferRepository;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::AppResult;

/// GET /api/offers - 全部优惠 (含停用/过期)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Offer>>> {
    let repo = OfferRepository::new(state.get_db());
    let offers = repo.find_all().await?;
    Ok(Json(offers))
}

/// POST /api/offers - 创建优惠
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OfferCreate>,
) -> AppResult<Json<Offer>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;

    let repo = OfferRepository::new(state.get_db());
    let offer = repo.create(payload).await?;
    Ok(Json(offer))
}

/// PUT /api/offers/{id} - 更新优惠
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OfferUpdate>,
) -> AppResult<Json<Offer>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }

    let repo = OfferRepository::new(state.get_db());
    let offer = repo.update(&id, payload).await?;
    Ok(Json(offer))
}

/// DELETE /api/offers/{id} - 删除优惠
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = OfferRepository::new(state.get_db());
    repo.delete(&id).await?;
    Ok(Json(true))
}
