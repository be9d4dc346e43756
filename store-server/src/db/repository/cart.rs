//! Cart Repository
//!
//! 购物车是每用户一个文档，记录 id 固定为 `cart:<user_key>`，
//! 整个文档一次写入 (单文档原子更新)。

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Cart, CartLine, Size};
use shared::util::now_millis;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const CART_TABLE: &str = "cart";

#[derive(Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Deterministic cart record id for a user
    fn cart_id(user: &RecordId) -> RecordId {
        RecordId::from_table_key(CART_TABLE, user.key().to_string())
    }

    /// Load a user's cart (empty cart when none exists yet)
    pub async fn find_by_user(&self, user: &RecordId) -> RepoResult<Cart> {
        let cart: Option<Cart> = self.base.db().select(Self::cart_id(user)).await?;
        Ok(cart.unwrap_or_else(|| Cart {
            id: None,
            user: user.clone(),
            lines: vec![],
            updated_at: 0,
        }))
    }

    /// Add quantity to a (product, size) line, merging duplicates
    pub async fn add_line(&self, user: &RecordId, line: CartLine) -> RepoResult<Cart> {
        if line.quantity <= 0 {
            return Err(RepoError::Validation(format!(
                "quantity must be positive, got {}",
                line.quantity
            )));
        }

        let mut cart = self.find_by_user(user).await?;
        if let Some(existing) = cart
            .lines
            .iter_mut()
            .find(|l| l.product == line.product && l.size == line.size)
        {
            existing.quantity += line.quantity;
            // 价格快照以最近一次加购为准
            existing.price_at_add = line.price_at_add;
        } else {
            cart.lines.push(line);
        }
        self.persist(user, cart).await
    }

    /// Set a line's quantity; 0 removes the line
    pub async fn set_quantity(
        &self,
        user: &RecordId,
        product: &RecordId,
        size: Size,
        quantity: i32,
    ) -> RepoResult<Cart> {
        if quantity < 0 {
            return Err(RepoError::Validation(format!(
                "quantity must not be negative, got {quantity}"
            )));
        }

        let mut cart = self.find_by_user(user).await?;
        let pos = cart
            .lines
            .iter()
            .position(|l| &l.product == product && l.size == size)
            .ok_or_else(|| RepoError::NotFound("cart line".to_string()))?;

        if quantity == 0 {
            cart.lines.remove(pos);
        } else {
            cart.lines[pos].quantity = quantity;
        }
        self.persist(user, cart).await
    }

    /// Remove one line
    pub async fn remove_line(
        &self,
        user: &RecordId,
        product: &RecordId,
        size: Size,
    ) -> RepoResult<Cart> {
        let mut cart = self.find_by_user(user).await?;
        let before = cart.lines.len();
        cart.lines
            .retain(|l| !(&l.product == product && l.size == size));
        if cart.lines.len() == before {
            return Err(RepoError::NotFound("cart line".to_string()));
        }
        self.persist(user, cart).await
    }

    /// Drop all lines (checkout success or explicit clear)
    pub async fn clear(&self, user: &RecordId) -> RepoResult<()> {
        let mut cart = self.find_by_user(user).await?;
        cart.lines.clear();
        self.persist(user, cart).await?;
        Ok(())
    }

    async fn persist(&self, user: &RecordId, mut cart: Cart) -> RepoResult<Cart> {
        cart.id = None; // id 由 upsert 的目标记录决定
        cart.updated_at = now_millis();
        let saved: Option<Cart> = self
            .base
            .db()
            .upsert(Self::cart_id(user))
            .content(cart)
            .await?;
        saved.ok_or_else(|| RepoError::Database("Failed to persist cart".to_string()))
    }
}
