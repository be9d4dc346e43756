//! Order lifecycle transitions
//!
//! 行级状态机：
//!
//! ```text
//! PENDING ──ship──▶ SHIPPED ──deliver──▶ DELIVERED ──request──▶ RETURN_REQUESTED
//!    │                 │                                              │
//!    └────cancel───────┴──▶ CANCELLED                     complete ──▶ RETURNED
//! ```
//!
//! CANCELLED / RETURNED 是终态：进入终态的那一次转换回补库存并
//! (对已付款订单) 退款；终态行拒绝再次转换，库存与钱包因此不会被
//! 重复补偿。订单级状态由行状态推导。

use crate::db::models::{
    ItemStatus, Order, OrderItem, OrderStatus, PaymentStatus,
};
use crate::db::repository::{OrderRepository, ProductRepository, WalletRepository};
use crate::orders::refund::line_refund_amounts;
use crate::pricing::money::{round2, to_decimal};
use crate::utils::{AppError, AppResult, ErrorCode};
use rust_decimal::Decimal;
use shared::util::now_millis;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

// =============================================================================
// Pure transition helpers
// =============================================================================

/// Derive the order-level status from its items.
///
/// 整单状态只在所有行到达同一类终态时坍缩；其余情况保持当前履约状态。
pub fn derive_order_status(items: &[OrderItem], current: OrderStatus) -> OrderStatus {
    if items.is_empty() {
        return current;
    }
    if items.iter().all(|i| i.status == ItemStatus::Cancelled) {
        return OrderStatus::Cancelled;
    }
    let all_terminal = items.iter().all(|i| i.status.is_terminal());
    if all_terminal && items.iter().any(|i| i.status == ItemStatus::Returned) {
        return OrderStatus::Returned;
    }
    current
}

/// Paid orders track how much of the ledger has flowed back.
pub fn derive_payment_status(order: &Order) -> PaymentStatus {
    if !order.is_paid() && order.payment_status != PaymentStatus::Refunded {
        return order.payment_status;
    }
    let refunded = order.items.iter().filter(|i| i.refunded).count();
    if refunded == 0 {
        PaymentStatus::Paid
    } else if refunded == order.items.len() {
        PaymentStatus::Refunded
    } else {
        PaymentStatus::PartiallyRefunded
    }
}

/// Fulfilment moves strictly forward: PENDING → SHIPPED → DELIVERED
pub fn validate_fulfilment_transition(
    current: OrderStatus,
    next: OrderStatus,
) -> AppResult<()> {
    let ok = matches!(
        (current, next),
        (OrderStatus::Pending, OrderStatus::Shipped)
            | (OrderStatus::Shipped, OrderStatus::Delivered)
    );
    if ok {
        Ok(())
    } else {
        Err(AppError::new(ErrorCode::InvalidStatusTransition)
            .with_detail("from", format!("{current:?}"))
            .with_detail("to", format!("{next:?}")))
    }
}

// =============================================================================
// Lifecycle engine
// =============================================================================

/// Order lifecycle engine: cancellation, returns, fulfilment
#[derive(Clone)]
pub struct OrderLifecycle {
    orders: OrderRepository,
    products: ProductRepository,
    wallets: WalletRepository,
}

impl OrderLifecycle {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            products: ProductRepository::new(db.clone()),
            wallets: WalletRepository::new(db),
        }
    }

    /// Load an order enforcing ownership (admins bypass the check)
    async fn load_for(
        &self,
        order_id: &str,
        actor: &RecordId,
        is_admin: bool,
    ) -> AppResult<Order> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
        if !is_admin && &order.user != actor {
            // 非本人订单按不存在处理，避免订单号枚举
            return Err(AppError::new(ErrorCode::OrderNotFound));
        }
        Ok(order)
    }

    /// Cancel the whole order (PENDING / SHIPPED only)
    ///
    /// 每个可取消的行：回补库存、置 CANCELLED；已付款订单一次性退款
    /// 所有未退款行的应退额。
    pub async fn cancel_order(
        &self,
        order_id: &str,
        actor: &RecordId,
        is_admin: bool,
    ) -> AppResult<Order> {
        let mut order = self.load_for(order_id, actor, is_admin).await?;

        if !matches!(order.status, OrderStatus::Pending | OrderStatus::Shipped) {
            return Err(AppError::new(ErrorCode::OrderNotCancellable)
                .with_detail("status", format!("{:?}", order.status)));
        }

        let refunds = line_refund_amounts(&order);
        let mut refund_total = Decimal::ZERO;
        let mut cancelled_any = false;

        for item in order.items.iter_mut() {
            if !item.status.can_cancel() {
                continue;
            }
            self.products
                .restore_stock(&item.product, item.size, item.quantity)
                .await?;
            item.status = ItemStatus::Cancelled;
            cancelled_any = true;

            if order.payment_status == PaymentStatus::Paid
                || order.payment_status == PaymentStatus::PartiallyRefunded
            {
                if !item.refunded {
                    refund_total += to_decimal(*refunds.get(&item.item_id).unwrap_or(&0.0));
                    item.refunded = true;
                }
            }
        }

        if !cancelled_any {
            return Err(AppError::new(ErrorCode::OrderNotCancellable));
        }

        let refund_total = round2(refund_total);
        if refund_total > 0.0 {
            self.wallets
                .credit(
                    &order.user,
                    refund_total,
                    format!("Refund for cancelled order {}", order.order_number),
                    order.id.clone(),
                )
                .await?;
        }

        order.status = derive_order_status(&order.items, order.status);
        order.payment_status = derive_payment_status(&order);
        order.updated_at = now_millis();
        let order = self.orders.save(&order).await?;

        tracing::info!(
            order_number = %order.order_number,
            refund = refund_total,
            "Order cancelled"
        );
        Ok(order)
    }

    /// Cancel a single line (PENDING / SHIPPED only)
    pub async fn cancel_item(
        &self,
        order_id: &str,
        item_id: &str,
        actor: &RecordId,
        is_admin: bool,
    ) -> AppResult<Order> {
        let mut order = self.load_for(order_id, actor, is_admin).await?;
        let refunds = line_refund_amounts(&order);

        let item = order
            .item_mut(item_id)
            .ok_or_else(|| AppError::new(ErrorCode::OrderItemNotFound))?;
        if !item.status.can_cancel() {
            return Err(AppError::new(ErrorCode::OrderItemNotCancellable)
                .with_detail("status", format!("{:?}", item.status)));
        }

        self.products
            .restore_stock(&item.product, item.size, item.quantity)
            .await?;
        item.status = ItemStatus::Cancelled;

        let mut refund = 0.0;
        if order.is_paid() {
            let item = order.item_mut(item_id).expect("item just modified");
            if !item.refunded {
                refund = *refunds.get(item_id).unwrap_or(&0.0);
                item.refunded = true;
            }
        }
        if refund > 0.0 {
            self.wallets
                .credit(
                    &order.user,
                    refund,
                    format!("Refund for cancelled item on order {}", order.order_number),
                    order.id.clone(),
                )
                .await?;
        }

        order.status = derive_order_status(&order.items, order.status);
        order.payment_status = derive_payment_status(&order);
        order.updated_at = now_millis();
        Ok(self.orders.save(&order).await?)
    }

    /// Customer requests a return on a delivered line (no stock change yet)
    pub async fn request_return(
        &self,
        order_id: &str,
        item_id: &str,
        actor: &RecordId,
    ) -> AppResult<Order> {
        let mut order = self.load_for(order_id, actor, false).await?;

        let item = order
            .item_mut(item_id)
            .ok_or_else(|| AppError::new(ErrorCode::OrderItemNotFound))?;
        if !item.status.can_request_return() {
            return Err(AppError::new(ErrorCode::OrderItemNotReturnable)
                .with_detail("status", format!("{:?}", item.status)));
        }
        item.status = ItemStatus::ReturnRequested;

        order.updated_at = now_millis();
        Ok(self.orders.save(&order).await?)
    }

    /// Admin completes a requested return: stock back, wallet credited
    pub async fn complete_return(&self, order_id: &str, item_id: &str) -> AppResult<Order> {
        let mut order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
        let refunds = line_refund_amounts(&order);

        let item = order
            .item_mut(item_id)
            .ok_or_else(|| AppError::new(ErrorCode::OrderItemNotFound))?;
        if !item.status.can_complete_return() {
            return Err(AppError::new(ErrorCode::ReturnNotRequested)
                .with_detail("status", format!("{:?}", item.status)));
        }

        self.products
            .restore_stock(&item.product, item.size, item.quantity)
            .await?;
        item.status = ItemStatus::Returned;

        // 退货路径对 COD 也退款：签收即视为已收款
        let mut refund = 0.0;
        {
            let item = order.item_mut(item_id).expect("item just modified");
            if !item.refunded {
                refund = *refunds.get(item_id).unwrap_or(&0.0);
                item.refunded = true;
            }
        }
        if refund > 0.0 {
            self.wallets
                .credit(
                    &order.user,
                    refund,
                    format!("Refund for returned item on order {}", order.order_number),
                    order.id.clone(),
                )
                .await?;
        }

        order.status = derive_order_status(&order.items, order.status);
        if order.is_paid() || order.items.iter().any(|i| i.refunded) {
            order.payment_status = derive_payment_status(&order);
        }
        order.updated_at = now_millis();
        Ok(self.orders.save(&order).await?)
    }

    /// Admin fulfilment transition (PENDING → SHIPPED → DELIVERED)
    ///
    /// 推进整单状态，同步推进仍在途的行；终态行不受影响。
    /// COD 订单签收时标记收款。
    pub async fn set_fulfilment(&self, order_id: &str, next: OrderStatus) -> AppResult<Order> {
        let mut order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

        validate_fulfilment_transition(order.status, next)?;

        let item_next = match next {
            OrderStatus::Shipped => ItemStatus::Shipped,
            OrderStatus::Delivered => ItemStatus::Delivered,
            _ => unreachable!("validated above"),
        };
        for item in order.items.iter_mut() {
            let movable = matches!(
                (item.status, item_next),
                (ItemStatus::Pending, ItemStatus::Shipped)
                    | (ItemStatus::Shipped, ItemStatus::Delivered)
            );
            if movable {
                item.status = item_next;
            }
        }

        order.status = next;
        // 货到付款在签收时收款
        if next == OrderStatus::Delivered && order.payment_status == PaymentStatus::Pending {
            order.payment_status = PaymentStatus::Paid;
        }
        order.updated_at = now_millis();
        Ok(self.orders.save(&order).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::Size;

    fn item(id: &str, status: ItemStatus, refunded: bool) -> OrderItem {
        OrderItem {
            item_id: id.to_string(),
            product: format!("product:{id}").parse().unwrap(),
            name: id.to_string(),
            size: Size::M,
            quantity: 1,
            base_price: 10.0,
            offer_percent: 0.0,
            unit_price: 10.0,
            line_total: 10.0,
            status,
            refunded,
        }
    }

    #[test]
    fn test_derive_order_status_all_cancelled() {
        let items = vec![
            item("a", ItemStatus::Cancelled, false),
            item("b", ItemStatus::Cancelled, false),
        ];
        assert_eq!(
            derive_order_status(&items, OrderStatus::Pending),
            OrderStatus::Cancelled
        );
    }

    #[test]
    fn test_derive_order_status_mixed_keeps_current() {
        let items = vec![
            item("a", ItemStatus::Cancelled, false),
            item("b", ItemStatus::Shipped, false),
        ];
        assert_eq!(
            derive_order_status(&items, OrderStatus::Shipped),
            OrderStatus::Shipped
        );
    }

    #[test]
    fn test_derive_order_status_returned() {
        let items = vec![
            item("a", ItemStatus::Returned, true),
            item("b", ItemStatus::Cancelled, false),
        ];
        assert_eq!(
            derive_order_status(&items, OrderStatus::Delivered),
            OrderStatus::Returned
        );
    }

    #[test]
    fn test_fulfilment_transitions() {
        assert!(validate_fulfilment_transition(OrderStatus::Pending, OrderStatus::Shipped).is_ok());
        assert!(
            validate_fulfilment_transition(OrderStatus::Shipped, OrderStatus::Delivered).is_ok()
        );
        assert!(
            validate_fulfilment_transition(OrderStatus::Pending, OrderStatus::Delivered).is_err()
        );
        assert!(
            validate_fulfilment_transition(OrderStatus::Delivered, OrderStatus::Shipped).is_err()
        );
        assert!(
            validate_fulfilment_transition(OrderStatus::Cancelled, OrderStatus::Shipped).is_err()
        );
    }
}
