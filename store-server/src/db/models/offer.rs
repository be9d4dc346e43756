//! Offer Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Offer scope enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferType {
    /// 单品优惠，target 指向 product 记录
    Product,
    /// 分类优惠，target 指向 category 记录
    Category,
}

/// Offer entity (限时折扣)
///
/// 同一商品同时命中多条优惠时，取折扣最大的一条；
/// 打平时单品优惠优先。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    pub offer_type: OfferType,
    /// Target record based on scope (product/category)
    #[serde(with = "serde_helpers::record_id")]
    pub target: RecordId,
    /// Discount percent (30 = 30% off)
    pub discount_percent: f64,
    /// Valid from timestamp (milliseconds since epoch)
    pub starts_at: i64,
    /// Valid until timestamp (milliseconds since epoch)
    pub ends_at: i64,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}

impl Offer {
    /// Window test: is this offer live at `now` (epoch ms)?
    pub fn is_live_at(&self, now: i64) -> bool {
        self.is_active && self.starts_at <= now && now <= self.ends_at
    }
}

/// Create offer payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferCreate {
    pub name: String,
    pub offer_type: OfferType,
    /// Target ID as string (e.g. "product:xxx" / "category:xxx")
    pub target: String,
    pub discount_percent: f64,
    pub starts_at: i64,
    pub ends_at: i64,
}

/// Update offer payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(starts_at: i64, ends_at: i64, active: bool) -> Offer {
        Offer {
            id: None,
            name: "summer".into(),
            offer_type: OfferType::Product,
            target: "product:tee".parse().unwrap(),
            discount_percent: 20.0,
            starts_at,
            ends_at,
            is_active: active,
            created_at: 0,
        }
    }

    #[test]
    fn test_window_bounds_inclusive() {
        let o = offer(100, 200, true);
        assert!(o.is_live_at(100));
        assert!(o.is_live_at(200));
        assert!(!o.is_live_at(99));
        assert!(!o.is_live_at(201));
    }

    #[test]
    fn test_inactive_never_live() {
        let o = offer(100, 200, false);
        assert!(!o.is_live_at(150));
    }
}
