//! Sales Report Model

use serde::{Deserialize, Serialize};

/// 报表时间范围快捷选项
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportRange {
    Today,
    Week,
    Month,
}

/// Report query parameters
///
/// `range` 与 (`from`, `to`) 二选一；同时给出时自定义区间优先。
#[derive(Debug, Clone, Deserialize)]
pub struct ReportQuery {
    pub range: Option<ReportRange>,
    /// Custom range start (epoch ms, inclusive)
    pub from: Option<i64>,
    /// Custom range end (epoch ms, inclusive)
    pub to: Option<i64>,
}

/// Top-selling product row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopProduct {
    pub product: String,
    pub name: String,
    pub quantity: i64,
    pub revenue: f64,
}

/// Aggregated sales report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesReport {
    pub from: i64,
    pub to: i64,
    /// 区间内创建的订单数 (不含整单取消)
    pub order_count: i64,
    /// Σ total_amount of counted orders
    pub gross_revenue: f64,
    /// Σ coupon_discount
    pub coupon_discount: f64,
    /// Σ (base_price - unit_price) * quantity over non-cancelled lines
    pub offer_discount: f64,
    pub cancelled_count: i64,
    pub returned_count: i64,
    pub top_products: Vec<TopProduct>,
}
