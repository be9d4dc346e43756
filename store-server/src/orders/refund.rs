//! Per-line refund computation
//!
//! 订单级优惠券折扣按行金额占比摊到每一行；取消/退货某一行时，
//! 退款额 = 行金额 - 该行的优惠券摊额。摊额按 2 位小数四舍五入，
//! 余数由最后一行吸收，保证 Σ 摊额恰好等于 coupon_discount，
//! 从而 Σ 退款永远不会超过实付金额。运费不随行退。

use crate::db::models::Order;
use crate::pricing::money::{round2, to_decimal};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;

/// Refundable value per line: item_id -> amount
///
/// 对全部行计算（含已取消的行——它们在下单时也分摊了优惠券），
/// 调用方按行状态决定哪些行真正退款。
pub fn line_refund_amounts(order: &Order) -> HashMap<String, f64> {
    let subtotal = to_decimal(order.subtotal);
    let coupon = to_decimal(order.coupon_discount);

    let mut amounts = HashMap::with_capacity(order.items.len());
    if order.items.is_empty() {
        return amounts;
    }

    // 无优惠券时直接退行金额
    if coupon.is_zero() || subtotal.is_zero() {
        for item in &order.items {
            amounts.insert(item.item_id.clone(), item.line_total);
        }
        return amounts;
    }

    let mut allocated = Decimal::ZERO;
    let last = order.items.len() - 1;
    for (idx, item) in order.items.iter().enumerate() {
        let line = to_decimal(item.line_total);
        let share = if idx == last {
            // 最后一行吸收舍入余数
            coupon - allocated
        } else {
            let raw = coupon * line / subtotal;
            let rounded = raw.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            allocated += rounded;
            rounded
        };
        amounts.insert(item.item_id.clone(), round2(line - share));
    }
    amounts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{
        ItemStatus, Order, OrderItem, OrderStatus, PaymentMethod, PaymentStatus, ShippingAddress,
        Size,
    };

    fn item(id: &str, unit_price: f64, quantity: i32) -> OrderItem {
        OrderItem {
            item_id: id.to_string(),
            product: format!("product:{id}").parse().unwrap(),
            name: id.to_string(),
            size: Size::M,
            quantity,
            base_price: unit_price,
            offer_percent: 0.0,
            unit_price,
            line_total: round2(to_decimal(unit_price) * Decimal::from(quantity)),
            status: ItemStatus::Pending,
            refunded: false,
        }
    }

    fn order(items: Vec<OrderItem>, coupon_discount: f64) -> Order {
        let subtotal = round2(items.iter().map(|i| to_decimal(i.line_total)).sum());
        Order {
            id: None,
            order_number: "SO-1".into(),
            user: "user:u1".parse().unwrap(),
            items,
            shipping_address: ShippingAddress {
                recipient: "Ana".into(),
                street: "1 Main".into(),
                city: "Porto".into(),
                state: None,
                postal_code: "4000".into(),
                phone: "000".into(),
            },
            subtotal,
            shipping_fee: 5.0,
            coupon_code: Some("SAVE".into()),
            coupon_discount,
            total_amount: round2(
                to_decimal(subtotal) + to_decimal(5.0) - to_decimal(coupon_discount),
            ),
            payment_method: PaymentMethod::Wallet,
            payment_status: PaymentStatus::Paid,
            status: OrderStatus::Pending,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_no_coupon_refunds_line_totals() {
        let o = order(vec![item("a", 10.0, 2), item("b", 5.0, 1)], 0.0);
        let amounts = line_refund_amounts(&o);
        assert_eq!(amounts["a"], 20.0);
        assert_eq!(amounts["b"], 5.0);
    }

    #[test]
    fn test_coupon_shares_sum_to_discount() {
        // subtotal 25, coupon 10: shares 8.0 / 2.0
        let o = order(vec![item("a", 10.0, 2), item("b", 5.0, 1)], 10.0);
        let amounts = line_refund_amounts(&o);
        assert_eq!(amounts["a"], 12.0);
        assert_eq!(amounts["b"], 3.0);
        // conservation: Σ refund == subtotal - coupon
        let total: f64 = amounts.values().sum();
        assert!((total - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_rounding_remainder_absorbed_by_last_line() {
        // 三行等额 10.00，优惠券 10.00：10/3 = 3.33/3.33/3.34
        let o = order(
            vec![item("a", 10.0, 1), item("b", 10.0, 1), item("c", 10.0, 1)],
            10.0,
        );
        let amounts = line_refund_amounts(&o);
        assert_eq!(amounts["a"], 6.67);
        assert_eq!(amounts["b"], 6.67);
        assert_eq!(amounts["c"], 6.66);
        let total: f64 = amounts.values().sum();
        assert!((total - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_order() {
        let o = order(vec![], 0.0);
        assert!(line_refund_amounts(&o).is_empty());
    }
}
