//! Offer Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Offer, OfferCreate, OfferType, OfferUpdate};
use shared::util::now_millis;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const OFFER_TABLE: &str = "offer";

#[derive(Clone)]
pub struct OfferRepository {
    base: BaseRepository,
}

impl OfferRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Offer>> {
        let offers: Vec<Offer> = self
            .base
            .db()
            .query("SELECT * FROM offer ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(offers)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Offer>> {
        let rid = parse_record_id(OFFER_TABLE, id)?;
        let offer: Option<Offer> = self.base.db().select(rid).await?;
        Ok(offer)
    }

    /// Live offers targeting either the product or its category at `now`.
    ///
    /// 下单与商品详情都走这一个查询；best-offer 的排序规则在
    /// `pricing::resolver` 中，仓储只负责取数。
    pub async fn find_live_for_targets(
        &self,
        product: &RecordId,
        category: &RecordId,
        now: i64,
    ) -> RepoResult<Vec<Offer>> {
        let offers: Vec<Offer> = self
            .base
            .db()
            .query(
                "SELECT * FROM offer \
                 WHERE is_active = true \
                 AND starts_at <= $now AND ends_at >= $now \
                 AND target IN [$product, $category]",
            )
            .bind(("now", now))
            .bind(("product", product.clone()))
            .bind(("category", category.clone()))
            .await?
            .take(0)?;
        Ok(offers)
    }

    pub async fn create(&self, data: OfferCreate) -> RepoResult<Offer> {
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

        let target_table = match data.offer_type {
            OfferType::Product => "product",
            OfferType::Category => "category",
        };
        let target = parse_record_id(target_table, &data.target)?;

        let offer = Offer {
            id: None,
            name: data.name,
            offer_type: data.offer_type,
            target,
            discount_percent: data.discount_percent,
            starts_at: data.starts_at,
            ends_at: data.ends_at,
            is_active: true,
            created_at: now_millis(),
        };

        let created: Option<Offer> = self.base.db().create(OFFER_TABLE).content(offer).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create offer".to_string()))
    }

    pub async fn update(&self, id: &str, data: OfferUpdate) -> RepoResult<Offer> {
        let rid = parse_record_id(OFFER_TABLE, id)?;

        if let Some(p) = data.discount_percent
            && (!p.is_finite() || p <= 0.0 || p > 90.0)
        {
            return Err(RepoError::Validation(format!(
                "discount_percent must be in (0, 90], got {p}"
            )));
        }

        let mut set_parts: Vec<&str> = Vec::new();
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.discount_percent.is_some() {
            set_parts.push("discount_percent = $discount_percent");
        }
        if data.starts_at.is_some() {
            set_parts.push("starts_at = $starts_at");
        }
        if data.ends_at.is_some() {
            set_parts.push("ends_at = $ends_at");
        }
        if data.is_active.is_some() {
            set_parts.push("is_active = $is_active");
        }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Offer {} not found", id)));
        }

        let query_str = format!("UPDATE $thing SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self.base.db().query(&query_str).bind(("thing", rid));

        if let Some(v) = data.name {
            query = query.bind(("name", v));
        }
        if let Some(v) = data.discount_percent {
            query = query.bind(("discount_percent", v));
        }
        if let Some(v) = data.starts_at {
            query = query.bind(("starts_at", v));
        }
        if let Some(v) = data.ends_at {
            query = query.bind(("ends_at", v));
        }
        if let Some(v) = data.is_active {
            query = query.bind(("is_active", v));
        }

        let mut result = query.await?;
        let offers: Vec<Offer> = result.take(0)?;
        offers
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Offer {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let rid = parse_record_id(OFFER_TABLE, id)?;
        let deleted: Option<Offer> = self.base.db().delete(rid).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("Offer {} not found", id)));
        }
        Ok(())
    }
}
