//! Product Repository
//!
//! 除常规 CRUD 外，这里还承载库存核销的两个原子操作：
//! [`try_decrement_stock`](ProductRepository::try_decrement_stock) 与
//! [`restore_stock`](ProductRepository::restore_stock)。两者都是单文档
//! 条件更新，`Size` 是封闭枚举，字段路径 `stock.<SIZE>` 由 `as_str()`
//! 提供，不存在动态键注入。

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Product, ProductCreate, ProductUpdate, Size};
use shared::util::now_millis;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const PRODUCT_TABLE: &str = "product";

/// Storefront listing filters
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub search: Option<String>,
    /// None = both; Some(true) = active only (storefront)
    pub active: Option<bool>,
}

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Paged product listing with optional filters
    pub async fn find_page(
        &self,
        filter: &ProductFilter,
        limit: u32,
        offset: u32,
    ) -> RepoResult<Vec<Product>> {
        let (where_clause, category) = build_filter(filter)?;
        let query_str = format!(
            "SELECT * FROM product {} ORDER BY created_at DESC LIMIT $limit START $offset",
            where_clause
        );

        let mut query = self
            .base
            .db()
            .query(&query_str)
            .bind(("limit", limit as i64))
            .bind(("offset", offset as i64));
        if let Some(cat) = category {
            query = query.bind(("cat", cat));
        }
        if let Some(search) = &filter.search {
            query = query.bind(("search", search.to_lowercase()));
        }
        if let Some(active) = filter.active {
            query = query.bind(("active", active));
        }

        let products: Vec<Product> = query.await?.take(0)?;
        Ok(products)
    }

    /// Count products matching the filter (for pagination)
    pub async fn count(&self, filter: &ProductFilter) -> RepoResult<i64> {
        let (where_clause, category) = build_filter(filter)?;
        let query_str = format!(
            "SELECT count() AS total FROM product {} GROUP ALL",
            where_clause
        );

        let mut query = self.base.db().query(&query_str);
        if let Some(cat) = category {
            query = query.bind(("cat", cat));
        }
        if let Some(search) = &filter.search {
            query = query.bind(("search", search.to_lowercase()));
        }
        if let Some(active) = filter.active {
            query = query.bind(("active", active));
        }

        #[derive(serde::Deserialize)]
        struct Count {
            total: i64,
        }
        let count: Option<Count> = query.await?.take(0)?;
        Ok(count.map(|c| c.total).unwrap_or(0))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let rid = parse_record_id(PRODUCT_TABLE, id)?;
        let product: Option<Product> = self.base.db().select(rid).await?;
        Ok(product)
    }

    pub async fn find_by_record(&self, rid: &RecordId) -> RepoResult<Option<Product>> {
        let product: Option<Product> = self.base.db().select(rid.clone()).await?;
        Ok(product)
    }

    /// Create a new product
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        if !data.price.is_finite() || data.price <= 0.0 {
            return Err(RepoError::Validation(format!(
                "price must be positive, got {}",
                data.price
            )));
        }
        let category = parse_record_id("category", &data.category)?;
        if let Some(stock) = &data.stock
            && stock.values().any(|&q| q < 0)
        {
            return Err(RepoError::Validation("stock must not be negative".into()));
        }

        let product = Product {
            id: None,
            name: data.name,
            description: data.description.unwrap_or_default(),
            category,
            price: data.price,
            images: data.images.unwrap_or_default(),
            stock: data.stock.unwrap_or_default(),
            is_active: true,
            created_at: now_millis(),
        };

        let created: Option<Product> = self
            .base
            .db()
            .create(PRODUCT_TABLE)
            .content(product)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Update a product
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let rid = parse_record_id(PRODUCT_TABLE, id)?;

        if let Some(price) = data.price
            && (!price.is_finite() || price <= 0.0)
        {
            return Err(RepoError::Validation(format!(
                "price must be positive, got {price}"
            )));
        }

        let category = match &data.category {
            Some(c) => Some(parse_record_id("category", c)?),
            None => None,
        };

        // Build dynamic SET clauses with proper type bindings
        let mut set_parts: Vec<&str> = Vec::new();
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.description.is_some() {
            set_parts.push("description = $description");
        }
        if category.is_some() {
            set_parts.push("category = $category");
        }
        if data.price.is_some() {
            set_parts.push("price = $price");
        }
        if data.images.is_some() {
            set_parts.push("images = $images");
        }
        if data.stock.is_some() {
            set_parts.push("stock = $stock");
        }
        if data.is_active.is_some() {
            set_parts.push("is_active = $is_active");
        }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)));
        }

        let query_str = format!("UPDATE $thing SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self.base.db().query(&query_str).bind(("thing", rid));

        if let Some(v) = data.name {
            query = query.bind(("name", v));
        }
        if let Some(v) = data.description {
            query = query.bind(("description", v));
        }
        if let Some(v) = category {
            query = query.bind(("category", v));
        }
        if let Some(v) = data.price {
            query = query.bind(("price", v));
        }
        if let Some(v) = data.images {
            query = query.bind(("images", v));
        }
        if let Some(v) = data.stock {
            query = query.bind(("stock", v));
        }
        if let Some(v) = data.is_active {
            query = query.bind(("is_active", v));
        }

        let mut result = query.await?;
        let products: Vec<Product> = result.take(0)?;
        products
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Soft delete: deactivate so existing orders keep a resolvable reference
    pub async fn deactivate(&self, id: &str) -> RepoResult<()> {
        let rid = parse_record_id(PRODUCT_TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET is_active = false RETURN AFTER")
            .bind(("thing", rid))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        if products.is_empty() {
            return Err(RepoError::NotFound(format!("Product {} not found", id)));
        }
        Ok(())
    }

    // =========================================================================
    // Atomic stock operations (checkout / cancellation core)
    // =========================================================================

    /// Conditionally decrement one size's stock.
    ///
    /// 单文档原子更新：WHERE 守卫保证只有库存足够时才扣减。
    /// 返回 false 表示守卫未通过 (库存不足或商品已下架)。
    pub async fn try_decrement_stock(
        &self,
        product: &RecordId,
        size: Size,
        qty: i32,
    ) -> RepoResult<bool> {
        if qty <= 0 {
            return Err(RepoError::Validation(format!(
                "quantity must be positive, got {qty}"
            )));
        }
        let field = size.as_str();
        let query_str = format!(
            "UPDATE $prod SET stock.{field} -= $qty \
             WHERE stock.{field} >= $qty AND is_active = true RETURN AFTER"
        );
        let mut result = self
            .base
            .db()
            .query(&query_str)
            .bind(("prod", product.clone()))
            .bind(("qty", qty))
            .await?;
        let updated: Vec<Product> = result.take(0)?;
        Ok(!updated.is_empty())
    }

    /// Restore one size's stock (cancellation / return / checkout rollback).
    ///
    /// `OR 0` 兜底缺失的尺码键，恢复永远不会失败于键不存在。
    pub async fn restore_stock(
        &self,
        product: &RecordId,
        size: Size,
        qty: i32,
    ) -> RepoResult<()> {
        if qty <= 0 {
            return Err(RepoError::Validation(format!(
                "quantity must be positive, got {qty}"
            )));
        }
        let field = size.as_str();
        let query_str =
            format!("UPDATE $prod SET stock.{field} = (stock.{field} OR 0) + $qty RETURN AFTER");
        let mut result = self
            .base
            .db()
            .query(&query_str)
            .bind(("prod", product.clone()))
            .bind(("qty", qty))
            .await?;
        let updated: Vec<Product> = result.take(0)?;
        if updated.is_empty() {
            return Err(RepoError::NotFound(format!(
                "Product {} not found",
                product
            )));
        }
        Ok(())
    }
}

/// Build the WHERE clause for listing queries
fn build_filter(filter: &ProductFilter) -> RepoResult<(String, Option<RecordId>)> {
    let mut conditions: Vec<&str> = Vec::new();
    let mut category = None;

    if let Some(cat) = &filter.category {
        category = Some(parse_record_id("category", cat)?);
        conditions.push("category = $cat");
    }
    if filter.search.is_some() {
        conditions.push("string::lowercase(name) CONTAINS $search");
    }
    if filter.active.is_some() {
        conditions.push("is_active = $active");
    }

    let clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    Ok((clause, category))
}
