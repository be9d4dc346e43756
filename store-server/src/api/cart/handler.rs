//! Cart API Handlers
//!
//! 购物车视图总是按当前目录重新定价：价格快照仅供展示比较，
//! 下单金额以 checkout 时的重算为准。

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{CartAddItem, CartLine, CartLineView, CartUpdateItem, CartView, Size};
use crate::db::repository::{CartRepository, ProductRepository, parse_record_id};
use crate::pricing::money::{line_total, validate_quantity};
use crate::utils::{AppError, AppResult};
use rust_decimal::Decimal;
use shared::ErrorCode;

/// GET /api/cart - 当前用户购物车 (带当前价与库存)
pub async fn view(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<CartView>> {
    let user_id = user.record_id()?;
    let carts = CartRepository::new(state.get_db());
    let products = ProductRepository::new(state.get_db());
    let offers = state.offer_engine();

    let cart = carts.find_by_user(&user_id).await?;

    let mut lines = Vec::with_capacity(cart.lines.len());
    let mut subtotal = Decimal::ZERO;
    for line in &cart.lines {
        // 商品可能已下架：保留行但库存显示为 0，由前端提示
        let (current_price, available_stock) =
            match products.find_by_record(&line.product).await? {
                Some(p) if p.is_active => {
                    let (price, _) = offers.effective_price(&p).await?;
                    (price, p.stock_for(line.size))
                }
                _ => (line.price_at_add, 0),
            };

        let total = line_total(current_price, line.quantity);
        subtotal += crate::pricing::money::to_decimal(total);
        lines.push(CartLineView {
            product: line.product.to_string(),
            name: line.name.clone(),
            size: line.size,
            quantity: line.quantity,
            price_at_add: line.price_at_add,
            current_price,
            line_total: total,
            available_stock,
        });
    }

    Ok(Json(CartView {
        lines,
        subtotal: crate::pricing::money::round2(subtotal),
    }))
}

/// POST /api/cart/items - 加入购物车
pub async fn add_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CartAddItem>,
) -> AppResult<Json<CartView>> {
    validate_quantity(payload.quantity).map_err(AppError::validation)?;

    let user_id = user.record_id()?;
    let product_id = parse_record_id("product", &payload.product)?;

    let products = ProductRepository::new(state.get_db());
    let product = products
        .find_by_record(&product_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    if !product.is_active {
        return Err(AppError::new(ErrorCode::ProductInactive));
    }
    if !product.stock.contains_key(&payload.size) {
        return Err(AppError::new(ErrorCode::SizeNotStocked).with_detail("size", payload.size.as_str()));
    }
    if product.stock_for(payload.size) < payload.quantity {
        return Err(AppError::new(ErrorCode::ProductOutOfStock)
            .with_detail("size", payload.size.as_str()));
    }

    let offers = state.offer_engine();
    let (price_at_add, _) = offers.effective_price(&product).await?;

    let carts = CartRepository::new(state.get_db());
    carts
        .add_line(
            &user_id,
            CartLine {
                product: product_id,
                name: product.name.clone(),
                size: payload.size,
                quantity: payload.quantity,
                price_at_add,
            },
        )
        .await?;

    view(State(state), user).await
}

/// PUT /api/cart/items - 调整数量 (0 为移除)
pub async fn update_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CartUpdateItem>,
) -> AppResult<Json<CartView>> {
    if payload.quantity < 0 {
        return Err(AppError::new(ErrorCode::CartQuantityInvalid));
    }

    let user_id = user.record_id()?;
    let product_id = parse_record_id("product", &payload.product)?;

    let carts = CartRepository::new(state.get_db());
    carts
        .set_quantity(&user_id, &product_id, payload.size, payload.quantity)
        .await
        .map_err(|e| match e {
            crate::db::repository::RepoError::NotFound(_) => {
                AppError::new(ErrorCode::CartItemNotFound)
            }
            other => other.into(),
        })?;

    view(State(state), user).await
}

/// DELETE /api/cart/items/{product_id}/{size} - 移除一行
pub async fn remove_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((product_id, size)): Path<(String, Size)>,
) -> AppResult<Json<CartView>> {
    let user_id = user.record_id()?;
    let product_id = parse_record_id("product", &product_id)?;

    let carts = CartRepository::new(state.get_db());
    carts
        .remove_line(&user_id, &product_id, size)
        .await
        .map_err(|e| match e {
            crate::db::repository::RepoError::NotFound(_) => {
                AppError::new(ErrorCode::CartItemNotFound)
            }
            other => other.into(),
        })?;

    view(State(state), user).await
}

/// DELETE /api/cart - 清空购物车
pub async fn clear(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<bool>> {
    let carts = CartRepository::new(state.get_db());
    carts.clear(&user.record_id()?).await?;
    Ok(Json(true))
}
