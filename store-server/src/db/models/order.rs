//! Order Model
//!
//! 订单是下单时刻的不可变快照：商品名称、单价、折扣在创建后不再随
//! 目录变动。每个订单行持有独立状态，退货流程走行级状态机。

use super::Size;
use super::address::Address;
use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Order ID type
pub type OrderId = RecordId;

// =============================================================================
// Status enums
// =============================================================================

/// Order status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Shipped,
    Delivered,
    Cancelled,
    Returned,
}

/// Per-line status enum (含退货工作流)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    Pending,
    Shipped,
    Delivered,
    Cancelled,
    ReturnRequested,
    Returned,
}

impl ItemStatus {
    /// 是否允许取消 (未发货或已发货未签收)
    pub fn can_cancel(&self) -> bool {
        matches!(self, ItemStatus::Pending | ItemStatus::Shipped)
    }

    /// 是否允许发起退货 (只有签收后)
    pub fn can_request_return(&self) -> bool {
        matches!(self, ItemStatus::Delivered)
    }

    /// 是否允许完成退货
    pub fn can_complete_return(&self) -> bool {
        matches!(self, ItemStatus::ReturnRequested)
    }

    /// 终态：库存已回补，不允许再次回补
    pub fn is_terminal(&self) -> bool {
        matches!(self, ItemStatus::Cancelled | ItemStatus::Returned)
    }
}

/// Payment method enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Cash on delivery
    Cod,
    /// Pay from wallet balance
    Wallet,
    /// Online payment (gateway integration is a stub field)
    Online,
}

/// Payment status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    PartiallyRefunded,
    Refunded,
}

// =============================================================================
// Order entity
// =============================================================================

/// Frozen delivery address (copied from the user's address at checkout)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub recipient: String,
    pub street: String,
    pub city: String,
    pub state: Option<String>,
    pub postal_code: String,
    pub phone: String,
}

impl From<&Address> for ShippingAddress {
    fn from(a: &Address) -> Self {
        Self {
            recipient: a.recipient.clone(),
            street: a.street.clone(),
            city: a.city.clone(),
            state: a.state.clone(),
            postal_code: a.postal_code.clone(),
            phone: a.phone.clone(),
        }
    }
}

/// One immutable order line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    /// Stable line identifier (uuid), used by cancel/return routes
    pub item_id: String,
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    pub name: String,
    pub size: Size,
    pub quantity: i32,
    /// 下单时的基准单价 (折扣前)
    pub base_price: f64,
    /// 下单时生效优惠的折扣百分比 (无优惠为 0)
    pub offer_percent: f64,
    /// 折后单价
    pub unit_price: f64,
    /// unit_price * quantity
    pub line_total: f64,
    pub status: ItemStatus,
    /// 该行是否已退款 (防止重复退款)
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub refunded: bool,
}

/// Order entity (immutable snapshot)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<OrderId>,
    pub order_number: String,
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    /// Σ line_total
    pub subtotal: f64,
    pub shipping_fee: f64,
    pub coupon_code: Option<String>,
    #[serde(default)]
    pub coupon_discount: f64,
    /// subtotal + shipping_fee - coupon_discount
    pub total_amount: f64,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub status: OrderStatus,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl Order {
    /// 订单是否已付款 (钱包或在线支付)
    pub fn is_paid(&self) -> bool {
        matches!(
            self.payment_status,
            PaymentStatus::Paid | PaymentStatus::PartiallyRefunded
        )
    }

    /// Find an item by its stable line id
    pub fn item(&self, item_id: &str) -> Option<&OrderItem> {
        self.items.iter().find(|i| i.item_id == item_id)
    }

    pub fn item_mut(&mut self, item_id: &str) -> Option<&mut OrderItem> {
        self.items.iter_mut().find(|i| i.item_id == item_id)
    }
}

// =============================================================================
// API Request Types
// =============================================================================

/// Checkout payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Address ID as string (e.g. "address:xxx")
    pub address: String,
    pub payment_method: PaymentMethod,
    pub coupon_code: Option<String>,
}

/// Admin status transition payload (Pending → Shipped → Delivered)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

// =============================================================================
// API Response Types (for frontend)
// =============================================================================

/// Order summary for list view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSummary {
    pub order_id: String,
    pub order_number: String,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub total_amount: f64,
    pub item_count: usize,
    pub created_at: i64,
}

impl From<&Order> for OrderSummary {
    fn from(o: &Order) -> Self {
        Self {
            order_id: o.id.as_ref().map(|t| t.to_string()).unwrap_or_default(),
            order_number: o.order_number.clone(),
            status: o.status,
            payment_method: o.payment_method,
            payment_status: o.payment_status,
            total_amount: o.total_amount,
            item_count: o.items.len(),
            created_at: o.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_status_guards() {
        assert!(ItemStatus::Pending.can_cancel());
        assert!(ItemStatus::Shipped.can_cancel());
        assert!(!ItemStatus::Delivered.can_cancel());
        assert!(!ItemStatus::Cancelled.can_cancel());

        assert!(ItemStatus::Delivered.can_request_return());
        assert!(!ItemStatus::Pending.can_request_return());

        assert!(ItemStatus::ReturnRequested.can_complete_return());
        assert!(!ItemStatus::Returned.can_complete_return());

        assert!(ItemStatus::Cancelled.is_terminal());
        assert!(ItemStatus::Returned.is_terminal());
        assert!(!ItemStatus::ReturnRequested.is_terminal());
    }

    #[test]
    fn test_status_serde_names() {
        assert_eq!(
            serde_json::to_string(&ItemStatus::ReturnRequested).unwrap(),
            "\"RETURN_REQUESTED\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Cod).unwrap(),
            "\"COD\""
        );
    }
}
