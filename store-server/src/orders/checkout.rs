//! Cart-to-order transformation
//!
//! 下单是本服务最重的一条写路径：
//!
//! 1. 重新校验购物车 (商品在售、尺码、数量、当前库存)
//! 2. 以当前最优优惠重算单价 (不信任加购时的快照价)
//! 3. 校验优惠券并计算订单折扣
//! 4. 逐商品做单文档条件扣减库存；任一守卫失败则按逆序回补已扣减的行
//! 5. 钱包支付先建单再扣款，扣款失败整体回退 (删单、释放优惠券、回补库存)
//! 6. 成功后清空购物车
//!
//! 没有跨文档事务；一致性靠"先校验、原子守卫、失败补偿"三段式维持。

use crate::db::models::{
    CheckoutRequest, Coupon, ItemStatus, Order, OrderItem, OrderStatus, PaymentMethod,
    PaymentStatus, Product, ShippingAddress, Size,
};
use crate::db::repository::{
    AddressRepository, CartRepository, CouponRepository, OrderRepository, ProductRepository,
    WalletRepository,
};
use crate::pricing::money::{line_total, round2, to_decimal, validate_price, validate_quantity};
use crate::pricing::OfferEngine;
use crate::utils::{AppError, AppResult, ErrorCode};
use rust_decimal::Decimal;
use shared::util::{now_millis, snowflake_id};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use uuid::Uuid;

/// Shipping cost policy (flat fee, waived above a threshold)
#[derive(Debug, Clone, Copy)]
pub struct ShippingPolicy {
    pub flat_fee: f64,
    pub free_threshold: f64,
}

impl ShippingPolicy {
    pub fn fee_for(&self, subtotal: f64) -> f64 {
        if subtotal >= self.free_threshold {
            0.0
        } else {
            self.flat_fee
        }
    }
}

/// One cart line priced against the live catalog
struct PricedLine {
    product: RecordId,
    name: String,
    size: Size,
    quantity: i32,
    base_price: f64,
    offer_percent: f64,
    unit_price: f64,
    line_total: f64,
}

/// Checkout Engine - turns a cart into an immutable order snapshot
#[derive(Clone)]
pub struct CheckoutEngine {
    products: ProductRepository,
    carts: CartRepository,
    orders: OrderRepository,
    addresses: AddressRepository,
    coupons: CouponRepository,
    wallets: WalletRepository,
    offers: OfferEngine,
    shipping: ShippingPolicy,
}

impl CheckoutEngine {
    pub fn new(db: Surreal<Db>, shipping: ShippingPolicy) -> Self {
        Self {
            products: ProductRepository::new(db.clone()),
            carts: CartRepository::new(db.clone()),
            orders: OrderRepository::new(db.clone()),
            addresses: AddressRepository::new(db.clone()),
            coupons: CouponRepository::new(db.clone()),
            wallets: WalletRepository::new(db.clone()),
            offers: OfferEngine::new(db),
            shipping,
        }
    }

    /// Place an order from the user's cart
    pub async fn checkout(&self, user: &RecordId, req: CheckoutRequest) -> AppResult<Order> {
        // 1. Cart must have lines
        let cart = self.carts.find_by_user(user).await?;
        if cart.is_empty() {
            return Err(AppError::new(ErrorCode::CartEmpty));
        }

        // 2. Delivery address must exist and belong to the buyer
        let address = self
            .addresses
            .find_by_id(&req.address)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::AddressNotFound))?;
        if &address.user != user {
            return Err(AppError::new(ErrorCode::AddressNotOwned));
        }

        // 3. Re-price every line against the live catalog
        let mut priced: Vec<PricedLine> = Vec::with_capacity(cart.lines.len());
        for line in &cart.lines {
            let product = self
                .products
                .find_by_record(&line.product)
                .await?
                .ok_or_else(|| {
                    AppError::new(ErrorCode::ProductNotFound)
                        .with_detail("product", line.product.to_string())
                })?;
            priced.push(self.price_line(&product, line.size, line.quantity).await?);
        }

        // 4. Totals
        let subtotal = round2(priced.iter().map(|l| to_decimal(l.line_total)).sum());
        let shipping_fee = self.shipping.fee_for(subtotal);

        let coupon_discount = match &req.coupon_code {
            Some(code) => {
                let coupon = self
                    .coupons
                    .find_by_code(code)
                    .await?
                    .ok_or_else(|| AppError::new(ErrorCode::CouponNotFound))?;
                validate_coupon(&coupon, user, subtotal, now_millis())?;
                coupon_discount_amount(&coupon, subtotal)
            }
            None => 0.0,
        };

        let total_amount = round2(
            to_decimal(subtotal) + to_decimal(shipping_fee) - to_decimal(coupon_discount),
        );

        // 5. Atomically decrement stock, line by line; compensate on failure
        let mut decremented: Vec<(RecordId, Size, i32)> = Vec::with_capacity(priced.len());
        for line in &priced {
            let ok = self
                .products
                .try_decrement_stock(&line.product, line.size, line.quantity)
                .await?;
            if !ok {
                self.rollback_stock(&decremented).await;
                return Err(AppError::new(ErrorCode::ProductOutOfStock)
                    .with_detail("product", line.product.to_string())
                    .with_detail("size", line.size.as_str()));
            }
            decremented.push((line.product.clone(), line.size, line.quantity));
        }

        // 6. Redeem the coupon (single-document guard on usage limit + per-user use)
        if let Some(code) = &req.coupon_code {
            let redeemed = self.coupons.redeem(code, user).await?;
            if !redeemed {
                self.rollback_stock(&decremented).await;
                // Guard failed after validation passed: a concurrent checkout
                // consumed the last use or this user already redeemed it.
                let already_used = self
                    .coupons
                    .find_by_code(code)
                    .await?
                    .map(|c| c.used_by.iter().any(|u| u == user))
                    .unwrap_or(false);
                let code_err = if already_used {
                    ErrorCode::CouponAlreadyUsed
                } else {
                    ErrorCode::CouponUsageLimitReached
                };
                return Err(AppError::new(code_err));
            }
        }

        // 7. Build and persist the immutable snapshot
        let now = now_millis();
        let payment_status = match req.payment_method {
            PaymentMethod::Cod => PaymentStatus::Pending,
            // 钱包扣款成功后才置 Paid
            PaymentMethod::Wallet => PaymentStatus::Pending,
            // 在线支付仅保留存根字段，视为已捕获
            PaymentMethod::Online => PaymentStatus::Paid,
        };

        let order = Order {
            id: None,
            order_number: format!("SO-{}", snowflake_id()),
            user: user.clone(),
            items: priced
                .iter()
                .map(|l| OrderItem {
                    item_id: Uuid::new_v4().to_string(),
                    product: l.product.clone(),
                    name: l.name.clone(),
                    size: l.size,
                    quantity: l.quantity,
                    base_price: l.base_price,
                    offer_percent: l.offer_percent,
                    unit_price: l.unit_price,
                    line_total: l.line_total,
                    status: ItemStatus::Pending,
                    refunded: false,
                })
                .collect(),
            shipping_address: ShippingAddress::from(&address),
            subtotal,
            shipping_fee,
            coupon_code: req.coupon_code.clone().map(|c| c.trim().to_uppercase()),
            coupon_discount,
            total_amount,
            payment_method: req.payment_method,
            payment_status,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        let mut order = match self.orders.create(order).await {
            Ok(o) => o,
            Err(e) => {
                self.rollback_stock(&decremented).await;
                if let Some(code) = &req.coupon_code {
                    let _ = self.coupons.release(code, user).await;
                }
                return Err(e.into());
            }
        };

        // 8. Wallet payment: debit referencing the order, unwind everything on failure
        if req.payment_method == PaymentMethod::Wallet {
            let debited = self
                .wallets
                .try_debit(
                    user,
                    total_amount,
                    format!("Payment for order {}", order.order_number),
                    order.id.clone(),
                )
                .await?;
            if !debited {
                let _ = self.orders.delete(&order).await;
                if let Some(code) = &req.coupon_code {
                    let _ = self.coupons.release(code, user).await;
                }
                self.rollback_stock(&decremented).await;
                return Err(AppError::new(ErrorCode::WalletInsufficientBalance));
            }
            order.payment_status = PaymentStatus::Paid;
            order = self.orders.save(&order).await?;
        }

        // 9. Cart is consumed
        self.carts.clear(user).await?;

        tracing::info!(
            order_number = %order.order_number,
            user = %user,
            total = order.total_amount,
            items = order.items.len(),
            "Order placed"
        );

        Ok(order)
    }

    /// Price one line against the live catalog (availability + offer)
    async fn price_line(
        &self,
        product: &Product,
        size: Size,
        quantity: i32,
    ) -> AppResult<PricedLine> {
        let product_id = product
            .id
            .clone()
            .ok_or_else(|| AppError::internal("product without id"))?;

        if !product.is_active {
            return Err(AppError::new(ErrorCode::ProductInactive)
                .with_detail("product", product_id.to_string()));
        }
        validate_quantity(quantity).map_err(AppError::validation)?;
        validate_price(product.price)
            .map_err(|_| AppError::new(ErrorCode::ProductInvalidPrice))?;

        if !product.stock.contains_key(&size) {
            return Err(AppError::new(ErrorCode::SizeNotStocked)
                .with_detail("product", product_id.to_string())
                .with_detail("size", size.as_str()));
        }
        // 预检：原子守卫在扣减时仍会再查一次
        if product.stock_for(size) < quantity {
            return Err(AppError::new(ErrorCode::ProductOutOfStock)
                .with_detail("product", product_id.to_string())
                .with_detail("size", size.as_str()));
        }

        let (unit_price, offer_percent) = self.offers.effective_price(product).await?;

        Ok(PricedLine {
            product: product_id,
            name: product.name.clone(),
            size,
            quantity,
            base_price: product.price,
            offer_percent,
            unit_price,
            line_total: line_total(unit_price, quantity),
        })
    }

    /// Compensate already-applied decrements in reverse order
    async fn rollback_stock(&self, decremented: &[(RecordId, Size, i32)]) {
        for (product, size, qty) in decremented.iter().rev() {
            if let Err(e) = self.products.restore_stock(product, *size, *qty).await {
                // 回补失败只能记日志，人工对账兜底
                tracing::error!(
                    product = %product,
                    size = %size,
                    qty,
                    error = %e,
                    "Failed to roll back stock decrement"
                );
            }
        }
    }
}

/// Coupon validity checks (window, active, minimum, usage)
///
/// 原子守卫 (`CouponRepository::redeem`) 会再次检查用量；这里的预检
/// 用于给出精确的错误码。
pub fn validate_coupon(
    coupon: &Coupon,
    user: &RecordId,
    subtotal: f64,
    now: i64,
) -> AppResult<()> {
    if !coupon.is_active {
        return Err(AppError::new(ErrorCode::CouponInactive));
    }
    if now < coupon.starts_at || now > coupon.ends_at {
        return Err(AppError::new(ErrorCode::CouponExpired));
    }
    if subtotal < coupon.min_order_amount {
        return Err(AppError::new(ErrorCode::CouponMinAmountNotMet)
            .with_detail("min_order_amount", coupon.min_order_amount));
    }
    if coupon.used_by.iter().any(|u| u == user) {
        return Err(AppError::new(ErrorCode::CouponAlreadyUsed));
    }
    if let Some(limit) = coupon.usage_limit
        && coupon.used_count >= limit
    {
        return Err(AppError::new(ErrorCode::CouponUsageLimitReached));
    }
    Ok(())
}

/// Discount amount for a coupon on a subtotal, capped by `max_discount`
pub fn coupon_discount_amount(coupon: &Coupon, subtotal: f64) -> f64 {
    let raw = to_decimal(subtotal) * to_decimal(coupon.discount_percent) / Decimal::ONE_HUNDRED;
    let capped = raw.min(to_decimal(coupon.max_discount));
    round2(capped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coupon(percent: f64, max_discount: f64, min_order: f64) -> Coupon {
        Coupon {
            id: None,
            code: "SAVE10".into(),
            description: None,
            discount_percent: percent,
            max_discount,
            min_order_amount: min_order,
            starts_at: 0,
            ends_at: 10_000,
            usage_limit: Some(5),
            used_count: 0,
            used_by: vec![],
            is_active: true,
            created_at: 0,
        }
    }

    fn user() -> RecordId {
        "user:u1".parse().unwrap()
    }

    #[test]
    fn test_shipping_policy() {
        let p = ShippingPolicy {
            flat_fee: 5.0,
            free_threshold: 50.0,
        };
        assert_eq!(p.fee_for(20.0), 5.0);
        assert_eq!(p.fee_for(50.0), 0.0);
        assert_eq!(p.fee_for(120.0), 0.0);
    }

    #[test]
    fn test_coupon_discount_capped() {
        let c = coupon(10.0, 8.0, 0.0);
        // 10% of 200 = 20, capped at 8
        assert_eq!(coupon_discount_amount(&c, 200.0), 8.0);
        // 10% of 50 = 5, under the cap
        assert_eq!(coupon_discount_amount(&c, 50.0), 5.0);
    }

    #[test]
    fn test_validate_coupon_window() {
        let c = coupon(10.0, 100.0, 0.0);
        assert!(validate_coupon(&c, &user(), 100.0, 5_000).is_ok());
        let err = validate_coupon(&c, &user(), 100.0, 20_000).unwrap_err();
        assert_eq!(err.code, ErrorCode::CouponExpired);
    }

    #[test]
    fn test_validate_coupon_min_amount() {
        let c = coupon(10.0, 100.0, 60.0);
        let err = validate_coupon(&c, &user(), 59.99, 5_000).unwrap_err();
        assert_eq!(err.code, ErrorCode::CouponMinAmountNotMet);
        assert!(validate_coupon(&c, &user(), 60.0, 5_000).is_ok());
    }

    #[test]
    fn test_validate_coupon_single_use_per_user() {
        let mut c = coupon(10.0, 100.0, 0.0);
        c.used_by.push(user());
        let err = validate_coupon(&c, &user(), 100.0, 5_000).unwrap_err();
        assert_eq!(err.code, ErrorCode::CouponAlreadyUsed);
    }

    #[test]
    fn test_validate_coupon_usage_limit() {
        let mut c = coupon(10.0, 100.0, 0.0);
        c.used_count = 5;
        let err = validate_coupon(&c, &user(), 100.0, 5_000).unwrap_err();
        assert_eq!(err.code, ErrorCode::CouponUsageLimitReached);
    }

    #[test]
    fn test_validate_coupon_inactive() {
        let mut c = coupon(10.0, 100.0, 0.0);
        c.is_active = false;
        let err = validate_coupon(&c, &user(), 100.0, 5_000).unwrap_err();
        assert_eq!(err.code, ErrorCode::CouponInactive);
    }
}
