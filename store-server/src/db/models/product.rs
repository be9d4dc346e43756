//! Product Model
//!
//! 商品按尺码持有独立库存；库存对象的键是封闭的 [`Size`] 枚举，
//! 因此库存扣减可以用 `stock.<SIZE>` 字段路径做单文档条件更新。

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use surrealdb::RecordId;

/// Product ID type
pub type ProductId = RecordId;

/// Garment size (closed set — doubles as the stock-object field name)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Size {
    S,
    M,
    L,
    Xl,
    Xxl,
}

impl Size {
    /// Field name inside the product's `stock` object
    pub const fn as_str(&self) -> &'static str {
        match self {
            Size::S => "S",
            Size::M => "M",
            Size::L => "L",
            Size::Xl => "XL",
            Size::Xxl => "XXL",
        }
    }

    /// Parse a size from its string field name
    fn from_field(value: &str) -> Option<Size> {
        match value {
            "S" => Some(Size::S),
            "M" => Some(Size::M),
            "L" => Some(Size::L),
            "XL" => Some(Size::Xl),
            "XXL" => Some(Size::Xxl),
            _ => None,
        }
    }

    pub const ALL: [Size; 5] = [Size::S, Size::M, Size::L, Size::Xl, Size::Xxl];
}

// Serialize/deserialize as the plain field-name string. A string is the only
// representation SurrealDB accepts in map-key position (`BTreeMap<Size, i32>`),
// and it matches `as_str()` exactly, so value positions are unchanged.
impl Serialize for Size {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Size {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct SizeVisitor;

        impl serde::de::Visitor<'_> for SizeVisitor {
            type Value = Size;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a size field name (S, M, L, XL, XXL)")
            }

            fn visit_str<E>(self, value: &str) -> Result<Size, E>
            where
                E: serde::de::Error,
            {
                Size::from_field(value)
                    .ok_or_else(|| E::custom(format!("invalid size: {}", value)))
            }
        }

        deserializer.deserialize_str(SizeVisitor)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<ProductId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "serde_helpers::record_id")]
    pub category: RecordId,
    /// 基准单价 (未折扣)
    pub price: f64,
    #[serde(default)]
    pub images: Vec<String>,
    /// Per-size stock counts
    #[serde(default)]
    pub stock: BTreeMap<Size, i32>,
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

impl Product {
    /// Stock available for a size (missing key = not stocked)
    pub fn stock_for(&self, size: Size) -> i32 {
        self.stock.get(&size).copied().unwrap_or(0)
    }

    /// True when any size has stock left
    pub fn is_in_stock(&self) -> bool {
        self.stock.values().any(|&q| q > 0)
    }
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    /// Category ID as string (e.g. "category:xxx")
    pub category: String,
    pub price: f64,
    pub images: Option<Vec<String>>,
    pub stock: Option<BTreeMap<Size, i32>>,
}

/// Update product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<BTreeMap<Size, i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

// =============================================================================
// API Response Types (for storefront)
// =============================================================================

/// Product with its resolved offer price (storefront view)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductWithPrice {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub images: Vec<String>,
    /// 基准单价
    pub price: f64,
    /// 折后单价 (无优惠时等于 price)
    pub effective_price: f64,
    /// 生效优惠的折扣百分比 (无优惠时为 0)
    pub offer_percent: f64,
    /// Sizes currently in stock
    pub available_sizes: Vec<Size>,
    pub stock: BTreeMap<Size, i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_serde_names() {
        assert_eq!(serde_json::to_string(&Size::Xl).unwrap(), "\"XL\"");
        assert_eq!(serde_json::from_str::<Size>("\"XXL\"").unwrap(), Size::Xxl);
    }

    #[test]
    fn test_stock_for_missing_size() {
        let p = Product {
            id: None,
            name: "Tee".into(),
            description: String::new(),
            category: "category:basics".parse().unwrap(),
            price: 19.9,
            images: vec![],
            stock: BTreeMap::from([(Size::M, 3)]),
            is_active: true,
            created_at: 0,
        };
        assert_eq!(p.stock_for(Size::M), 3);
        assert_eq!(p.stock_for(Size::Xl), 0);
        assert!(p.is_in_stock());
    }
}
