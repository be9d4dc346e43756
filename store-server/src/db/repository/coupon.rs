//! Coupon Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Coupon, CouponCreate, CouponUpdate};
use shared::util::now_millis;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const COUPON_TABLE: &str = "coupon";

#[derive(Clone)]
pub struct CouponRepository {
    base: BaseRepository,
}

impl CouponRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Coupon>> {
        let coupons: Vec<Coupon> = self
            .base
            .db()
            .query("SELECT * FROM coupon ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(coupons)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Coupon>> {
        let rid = parse_record_id(COUPON_TABLE, id)?;
        let coupon: Option<Coupon> = self.base.db().select(rid).await?;
        Ok(coupon)
    }

    pub async fn find_by_code(&self, code: &str) -> RepoResult<Option<Coupon>> {
        let code = code.trim().to_uppercase();
        let coupon: Option<Coupon> = self
            .base
            .db()
            .query("SELECT * FROM coupon WHERE code = $code LIMIT 1")
            .bind(("code", code))
            .await?
            .take(0)?;
        Ok(coupon)
    }

    pub async fn create(&self, data: CouponCreate) -> RepoResult<Coupon> {
        let code = data.code.trim().to_uppercase();
        if code.is_empty() {
            return Err(RepoError::Validation("code must not be empty".into()));
        }
        if !data.discount_percent.is_finite()
            || data.discount_percent <= 0.0
            || data.discount_percent > 90.0
        {
            return Err(RepoError::Validation(format!(
                "discount_percent must be in (0, 90], got {}",
                data.discount_percent
            )));
        }
        if data.ends_at <= data.starts_at {
            return Err(RepoError::Validation(
                "ends_at must be after starts_at".into(),
            ));
        }

        let coupon = Coupon {
            id: None,
            code: code.clone(),
            description: data.description,
            discount_percent: data.discount_percent,
            max_discount: data.max_discount,
            min_order_amount: data.min_order_amount.unwrap_or(0.0),
            starts_at: data.starts_at,
            ends_at: data.ends_at,
            usage_limit: data.usage_limit,
            used_count: 0,
            used_by: vec![],
            is_active: true,
            created_at: now_millis(),
        };

        let created: Option<Coupon> = self
            .base
            .db()
            .create(COUPON_TABLE)
            .content(coupon)
            .await
            .map_err(|e| {
                let msg = e.to_string();
                if msg.contains("coupon_code_idx") {
                    RepoError::Duplicate(format!("coupon code {code} already exists"))
                } else {
                    RepoError::Database(msg)
                }
            })?;
        created.ok_or_else(|| RepoError::Database("Failed to create coupon".to_string()))
    }

    pub async fn update(&self, id: &str, data: CouponUpdate) -> RepoResult<Coupon> {
        let rid = parse_record_id(COUPON_TABLE, id)?;

        let mut set_parts: Vec<&str> = Vec::new();
        if data.description.is_some() {
            set_parts.push("description = $description");
        }
        if data.discount_percent.is_some() {
            set_parts.push("discount_percent = $discount_percent");
        }
        if data.max_discount.is_some() {
            set_parts.push("max_discount = $max_discount");
        }
        if data.min_order_amount.is_some() {
            set_parts.push("min_order_amount = $min_order_amount");
        }
        if data.starts_at.is_some() {
            set_parts.push("starts_at = $starts_at");
        }
        if data.ends_at.is_some() {
            set_parts.push("ends_at = $ends_at");
        }
        if data.usage_limit.is_some() {
            set_parts.push("usage_limit = $usage_limit");
        }
        if data.is_active.is_some() {
            set_parts.push("is_active = $is_active");
        }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Coupon {} not found", id)));
        }

        let query_str = format!("UPDATE $thing SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self.base.db().query(&query_str).bind(("thing", rid));

        if let Some(v) = data.description {
            query = query.bind(("description", v));
        }
        if let Some(v) = data.discount_percent {
            query = query.bind(("discount_percent", v));
        }
        if let Some(v) = data.max_discount {
            query = query.bind(("max_discount", v));
        }
        if let Some(v) = data.min_order_amount {
            query = query.bind(("min_order_amount", v));
        }
        if let Some(v) = data.starts_at {
            query = query.bind(("starts_at", v));
        }
        if let Some(v) = data.ends_at {
            query = query.bind(("ends_at", v));
        }
        if let Some(v) = data.usage_limit {
            query = query.bind(("usage_limit", v));
        }
        if let Some(v) = data.is_active {
            query = query.bind(("is_active", v));
        }

        let mut result = query.await?;
        let coupons: Vec<Coupon> = result.take(0)?;
        coupons
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Coupon {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let rid = parse_record_id(COUPON_TABLE, id)?;
        let deleted: Option<Coupon> = self.base.db().delete(rid).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("Coupon {} not found", id)));
        }
        Ok(())
    }

    /// Atomically redeem a coupon for a user.
    ///
    /// 单文档条件更新：用量上限与"每账号一次"守卫都在 WHERE 中，
    /// 守卫未过返回 false，调用方据此报 CouponUsageLimitReached /
    /// CouponAlreadyUsed (两种情况需调用方预查区分)。
    pub async fn redeem(&self, code: &str, user: &RecordId) -> RepoResult<bool> {
        let code = code.trim().to_uppercase();
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE coupon SET used_count += 1, used_by += $user \
                 WHERE code = $code AND is_active = true \
                 AND used_by CONTAINSNOT $user \
                 AND (usage_limit = NONE OR used_count < usage_limit) \
                 RETURN AFTER",
            )
            .bind(("code", code))
            .bind(("user", user.clone()))
            .await?;
        let updated: Vec<Coupon> = result.take(0)?;
        Ok(!updated.is_empty())
    }

    /// Roll back one redemption (checkout failed after the coupon was marked)
    pub async fn release(&self, code: &str, user: &RecordId) -> RepoResult<()> {
        let code = code.trim().to_uppercase();
        self.base
            .db()
            .query(
                "UPDATE coupon SET used_count -= 1, used_by -= $user \
                 WHERE code = $code AND used_by CONTAINS $user",
            )
            .bind(("code", code))
            .bind(("user", user.clone()))
            .await?;
        Ok(())
    }
}
