//! Cart Model
//!
//! 每个用户一个购物车文档；相同 (product, size) 的行合并数量。

use super::Size;
use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// One cart line: (product, size, quantity, price at the time of adding)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    /// Denormalized product name for display
    pub name: String,
    pub size: Size,
    pub quantity: i32,
    /// 加入购物车时的折后单价 (下单时会重新计算)
    pub price_at_add: f64,
}

/// Cart entity (one per user)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    #[serde(default)]
    pub lines: Vec<CartLine>,
    #[serde(default)]
    pub updated_at: i64,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Find a line by (product, size)
    pub fn line(&self, product: &RecordId, size: Size) -> Option<&CartLine> {
        self.lines
            .iter()
            .find(|l| &l.product == product && l.size == size)
    }
}

// =============================================================================
// API Request/Response Types
// =============================================================================

/// Add item to cart payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartAddItem {
    /// Product ID as string (e.g. "product:xxx")
    pub product: String,
    pub size: Size,
    pub quantity: i32,
}

/// Update cart line quantity payload (0 removes the line)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartUpdateItem {
    pub product: String,
    pub size: Size,
    pub quantity: i32,
}

/// Cart line with the current effective price (storefront view)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLineView {
    pub product: String,
    pub name: String,
    pub size: Size,
    pub quantity: i32,
    pub price_at_add: f64,
    /// 当前折后单价
    pub current_price: f64,
    pub line_total: f64,
    /// Stock remaining for this size (so the UI can warn before checkout)
    pub available_stock: i32,
}

/// Cart view with totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub subtotal: f64,
}
