//! Product API Handlers
//!
//! 店面侧的读取接口都带优惠解析：返回 effective_price 与 offer_percent。

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::convert::id_string;
use crate::core::ServerState;
use crate::db::models::{Product, ProductCreate, ProductUpdate, ProductWithPrice};
use crate::db::repository::{ProductFilter, ProductRepository};
use crate::pricing::OfferEngine;
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text};
use crate::utils::{AppError, AppResult, Page, PaginationParams};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub category: Option<String>,
    pub search: Option<String>,
    /// 后台传 true 时返回含下架商品的全量列表 (管理员视角)
    #[serde(default)]
    pub include_inactive: bool,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ListParams {
    fn paging(&self) -> PaginationParams {
        PaginationParams {
            page: self.page.unwrap_or(1),
            page_size: self.page_size.unwrap_or(20),
        }
    }
}

/// GET /api/products - 商品列表 (分页、分类/搜索过滤、带优惠价)
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Page<ProductWithPrice>>> {
    let repo = ProductRepository::new(state.get_db());
    let offers = state.offer_engine();

    let filter = ProductFilter {
        category: params.category.clone(),
        search: params.search.clone(),
        active: if params.include_inactive {
            None
        } else {
            Some(true)
        },
    };

    let paging = params.paging();
    let limit = paging.limit();
    let products = repo.find_page(&filter, limit, paging.offset()).await?;
    let total = repo.count(&filter).await?;

    let mut items = Vec::with_capacity(products.len());
    for product in &products {
        items.push(with_price(&offers, product).await?);
    }

    Ok(Json(Page {
        items,
        total,
        page: paging.page,
        page_size: limit,
    }))
}

/// GET /api/products/{id} - 商品详情 (带优惠价)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProductWithPrice>> {
    let repo = ProductRepository::new(state.get_db());
    let product = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(shared::ErrorCode::ProductNotFound))?;

    let offers = state.offer_engine();
    Ok(Json(with_price(&offers, &product).await?))
}

/// POST /api/products - 创建商品
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;

    let repo = ProductRepository::new(state.get_db());
    let product = repo.create(payload).await?;

    tracing::info!(
        product = %id_string(&product.id),
        name = %product.name,
        "Product created"
    );
    Ok(Json(product))
}

/// PUT /api/products/{id} - 更新商品
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;

    let repo = ProductRepository::new(state.get_db());
    let product = repo.update(&id, payload).await?;
    Ok(Json(product))
}

/// DELETE /api/products/{id} - 下架商品
///
/// 软删除：历史订单仍要能解析商品引用。
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = ProductRepository::new(state.get_db());
    repo.deactivate(&id).await?;
    Ok(Json(true))
}

/// Attach the resolved offer price to a product
async fn with_price(offers: &OfferEngine, product: &Product) -> AppResult<ProductWithPrice> {
    let (effective_price, offer_percent) = offers.effective_price(product).await?;
    Ok(ProductWithPrice {
        id: id_string(&product.id),
        name: product.name.clone(),
        description: product.description.clone(),
        category: product.category.to_string(),
        images: product.images.clone(),
        price: product.price,
        effective_price,
        offer_percent,
        available_sizes: product
            .stock
            .iter()
            .filter(|&(_, &q)| q > 0)
            .map(|(s, _)| *s)
            .collect(),
        stock: product.stock.clone(),
    })
}
