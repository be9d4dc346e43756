//! Address API Handlers
//!
//! 所有操作都限定在当前用户自己的地址上。

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Address, AddressCreate, AddressUpdate};
use crate::db::repository::AddressRepository;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::ErrorCode;

/// GET /api/addresses - 当前用户的地址列表
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Address>>> {
    let repo = AddressRepository::new(state.get_db());
    let addresses = repo.find_by_user(&user.record_id()?).await?;
    Ok(Json(addresses))
}

/// POST /api/addresses - 新增地址
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<AddressCreate>,
) -> AppResult<Json<Address>> {
    validate_payload(&payload)?;

    let repo = AddressRepository::new(state.get_db());
    let address = repo.create(&user.record_id()?, payload).await?;
    Ok(Json(address))
}

/// PUT /api/addresses/{id} - 更新地址
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<AddressUpdate>,
) -> AppResult<Json<Address>> {
    let repo = AddressRepository::new(state.get_db());
    ensure_owned(&repo, &id, &user).await?;

    if let Some(recipient) = &payload.recipient {
        validate_required_text(recipient, "recipient", MAX_NAME_LEN)?;
    }
    if let Some(street) = &payload.street {
        validate_required_text(street, "street", MAX_ADDRESS_LEN)?;
    }
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;

    let address = repo.update(&id, payload).await?;
    Ok(Json(address))
}

/// DELETE /api/addresses/{id} - 删除地址
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = AddressRepository::new(state.get_db());
    ensure_owned(&repo, &id, &user).await?;
    repo.delete(&id).await?;
    Ok(Json(true))
}

async fn ensure_owned(repo: &AddressRepository, id: &str, user: &CurrentUser) -> AppResult<()> {
    let address = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::AddressNotFound))?;
    if address.user != user.record_id()? {
        return Err(AppError::new(ErrorCode::AddressNotOwned));
    }
    Ok(())
}

fn validate_payload(payload: &AddressCreate) -> AppResult<()> {
    validate_required_text(&payload.recipient, "recipient", MAX_NAME_LEN)?;
    validate_required_text(&payload.street, "street", MAX_ADDRESS_LEN)?;
    validate_required_text(&payload.city, "city", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.postal_code, "postal_code", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    Ok(())
}
