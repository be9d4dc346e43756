//! Order Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Order, OrderStatus};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const ORDER_TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist a freshly built order snapshot
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(ORDER_TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let rid = parse_record_id(ORDER_TABLE, id)?;
        let order: Option<Order> = self.base.db().select(rid).await?;
        Ok(order)
    }

    /// A user's orders, newest first
    pub async fn find_by_user(
        &self,
        user: &RecordId,
        limit: u32,
        offset: u32,
    ) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM order WHERE user = $user \
                 ORDER BY created_at DESC LIMIT $limit START $offset",
            )
            .bind(("user", user.clone()))
            .bind(("limit", limit as i64))
            .bind(("offset", offset as i64))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// All orders for the back-office, optionally filtered by status
    pub async fn find_page(
        &self,
        status: Option<OrderStatus>,
        limit: u32,
        offset: u32,
    ) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = match status {
            Some(status) => {
                self.base
                    .db()
                    .query(
                        "SELECT * FROM order WHERE status = $status \
                         ORDER BY created_at DESC LIMIT $limit START $offset",
                    )
                    .bind(("status", status))
                    .bind(("limit", limit as i64))
                    .bind(("offset", offset as i64))
                    .await?
                    .take(0)?
            }
            None => {
                self.base
                    .db()
                    .query("SELECT * FROM order ORDER BY created_at DESC LIMIT $limit START $offset")
                    .bind(("limit", limit as i64))
                    .bind(("offset", offset as i64))
                    .await?
                    .take(0)?
            }
        };
        Ok(orders)
    }

    /// Replace an order document (status transitions update the snapshot's
    /// mutable tail: item statuses, payment status, updated_at)
    pub async fn save(&self, order: &Order) -> RepoResult<Order> {
        let rid = order
            .id
            .clone()
            .ok_or_else(|| RepoError::Validation("order has no id".to_string()))?;
        let mut to_save = order.clone();
        to_save.id = None;
        let saved: Option<Order> = self.base.db().update(rid).content(to_save).await?;
        saved.ok_or_else(|| RepoError::NotFound("Order not found".to_string()))
    }

    /// Remove an order (only used to unwind a failed checkout)
    pub async fn delete(&self, order: &Order) -> RepoResult<()> {
        if let Some(rid) = &order.id {
            let _: Option<Order> = self.base.db().delete(rid.clone()).await?;
        }
        Ok(())
    }

    /// Orders created inside [from, to] (report aggregation input)
    pub async fn find_in_range(&self, from: i64, to: i64) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE created_at >= $from AND created_at <= $to")
            .bind(("from", from))
            .bind(("to", to))
            .await?
            .take(0)?;
        Ok(orders)
    }
}
