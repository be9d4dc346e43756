//! Best-offer resolution
//!
//! 一个商品在同一时刻可能命中多条优惠：指向商品本身的单品优惠，
//! 和指向其分类的分类优惠。规则：
//!
//! 1. 只考虑 `is_active` 且时间窗覆盖当前时刻的优惠
//! 2. 各自取折扣最大的一条
//! 3. 两边都有时取折扣更大的一边；**打平时单品优惠优先**

use crate::db::models::{Offer, OfferType, Product};
use crate::db::repository::{OfferRepository, RepoResult};
use crate::pricing::money::discounted_unit_price;
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// Outcome of offer resolution for one product
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOffer {
    /// "offer:xxx"
    pub offer_id: String,
    pub discount_percent: f64,
}

/// Pick the best live offer among candidates (pure, unit-testable)
///
/// `candidates` may mix product- and category-scoped offers; the caller is
/// responsible for only passing offers that target this product or its
/// category.
pub fn pick_best_offer(candidates: &[Offer], now: i64) -> Option<&Offer> {
    let best_of = |scope: OfferType| {
        candidates
            .iter()
            .filter(|o| o.offer_type == scope && o.is_live_at(now))
            .max_by(|a, b| {
                a.discount_percent
                    .partial_cmp(&b.discount_percent)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    };

    let product_best = best_of(OfferType::Product);
    let category_best = best_of(OfferType::Category);

    match (product_best, category_best) {
        (Some(p), Some(c)) => {
            // 打平时单品优惠优先
            if c.discount_percent > p.discount_percent {
                Some(c)
            } else {
                Some(p)
            }
        }
        (Some(p), None) => Some(p),
        (None, Some(c)) => Some(c),
        (None, None) => None,
    }
}

/// Offer Engine - resolves the effective price for products
#[derive(Clone)]
pub struct OfferEngine {
    offer_repo: OfferRepository,
}

impl OfferEngine {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            offer_repo: OfferRepository::new(db),
        }
    }

    /// Resolve the best offer for a product at the current instant
    pub async fn resolve_for(&self, product: &Product) -> RepoResult<Option<ResolvedOffer>> {
        let Some(product_id) = &product.id else {
            return Ok(None);
        };
        let now = now_millis();
        let candidates = self
            .offer_repo
            .find_live_for_targets(product_id, &product.category, now)
            .await?;

        Ok(pick_best_offer(&candidates, now).map(|o| ResolvedOffer {
            offer_id: o.id.as_ref().map(|t| t.to_string()).unwrap_or_default(),
            discount_percent: o.discount_percent,
        }))
    }

    /// Effective unit price after the best offer: (unit_price, offer_percent)
    pub async fn effective_price(&self, product: &Product) -> RepoResult<(f64, f64)> {
        match self.resolve_for(product).await? {
            Some(offer) => Ok((
                discounted_unit_price(product.price, offer.discount_percent),
                offer.discount_percent,
            )),
            None => Ok((product.price, 0.0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(
        offer_type: OfferType,
        percent: f64,
        starts_at: i64,
        ends_at: i64,
        active: bool,
        name: &str,
    ) -> Offer {
        let target = match offer_type {
            OfferType::Product => "product:tee",
            OfferType::Category => "category:tops",
        };
        Offer {
            id: Some(format!("offer:{name}").parse().unwrap()),
            name: name.to_string(),
            offer_type,
            target: target.parse().unwrap(),
            discount_percent: percent,
            starts_at,
            ends_at,
            is_active: active,
            created_at: 0,
        }
    }

    const NOW: i64 = 1_000;

    #[test]
    fn test_no_offers() {
        assert!(pick_best_offer(&[], NOW).is_none());
    }

    #[test]
    fn test_single_product_offer() {
        let offers = vec![offer(OfferType::Product, 20.0, 0, 2_000, true, "p20")];
        let best = pick_best_offer(&offers, NOW).unwrap();
        assert_eq!(best.name, "p20");
    }

    #[test]
    fn test_category_beats_smaller_product_offer() {
        let offers = vec![
            offer(OfferType::Product, 10.0, 0, 2_000, true, "p10"),
            offer(OfferType::Category, 25.0, 0, 2_000, true, "c25"),
        ];
        let best = pick_best_offer(&offers, NOW).unwrap();
        assert_eq!(best.name, "c25");
    }

    #[test]
    fn test_tie_prefers_product_offer() {
        let offers = vec![
            offer(OfferType::Category, 15.0, 0, 2_000, true, "c15"),
            offer(OfferType::Product, 15.0, 0, 2_000, true, "p15"),
        ];
        let best = pick_best_offer(&offers, NOW).unwrap();
        assert_eq!(best.name, "p15");
    }

    #[test]
    fn test_expired_and_inactive_skipped() {
        let offers = vec![
            // 已过期的大折扣
            offer(OfferType::Product, 50.0, 0, 500, true, "expired"),
            // 停用的大折扣
            offer(OfferType::Category, 60.0, 0, 2_000, false, "inactive"),
            // 生效的小折扣
            offer(OfferType::Product, 5.0, 0, 2_000, true, "live"),
        ];
        let best = pick_best_offer(&offers, NOW).unwrap();
        assert_eq!(best.name, "live");
    }

    #[test]
    fn test_not_yet_started_skipped() {
        let offers = vec![offer(OfferType::Product, 40.0, 1_500, 2_000, true, "future")];
        assert!(pick_best_offer(&offers, NOW).is_none());
    }

    #[test]
    fn test_largest_within_same_scope_wins() {
        let offers = vec![
            offer(OfferType::Product, 10.0, 0, 2_000, true, "p10"),
            offer(OfferType::Product, 30.0, 0, 2_000, true, "p30"),
            offer(OfferType::Product, 20.0, 0, 2_000, true, "p20"),
        ];
        let best = pick_best_offer(&offers, NOW).unwrap();
        assert_eq!(best.name, "p30");
    }
}
