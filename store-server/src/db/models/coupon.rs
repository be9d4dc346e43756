//! Coupon Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Coupon entity (订单级优惠码)
///
/// 每个账号只能使用一次；`used_by` 记录已使用的用户。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    /// Uppercase unique code
    pub code: String,
    pub description: Option<String>,
    /// Discount percent applied to the order subtotal
    pub discount_percent: f64,
    /// Absolute cap on the discount amount
    pub max_discount: f64,
    /// Minimum subtotal for the coupon to apply
    pub min_order_amount: f64,
    /// Valid from timestamp (milliseconds since epoch)
    pub starts_at: i64,
    /// Valid until timestamp (milliseconds since epoch)
    pub ends_at: i64,
    /// Total redemption cap (None = unlimited)
    #[serde(default)]
    pub usage_limit: Option<i32>,
    #[serde(default)]
    pub used_count: i32,
    #[serde(default, with = "serde_helpers::vec_record_id")]
    pub used_by: Vec<RecordId>,
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

/// Create coupon payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponCreate {
    pub code: String,
    pub description: Option<String>,
    pub discount_percent: f64,
    pub max_discount: f64,
    pub min_order_amount: Option<f64>,
    pub starts_at: i64,
    pub ends_at: i64,
    pub usage_limit: Option<i32>,
}

/// Update coupon payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_discount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_order_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_limit: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
