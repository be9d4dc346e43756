//! Orders Module
//!
//! 订单域的三块核心逻辑：
//!
//! - [`checkout`] - 购物车到订单快照的转换 (库存校验、定价、补偿回滚)
//! - [`lifecycle`] - 订单/订单行状态机 (取消、退货、履约推进)
//! - [`refund`] - 行级退款金额计算 (优惠券按行摊销)

pub mod checkout;
pub mod lifecycle;
pub mod refund;

pub use checkout::{CheckoutEngine, ShippingPolicy, coupon_discount_amount, validate_coupon};
pub use lifecycle::{
    OrderLifecycle, derive_order_status, derive_payment_status, validate_fulfilment_transition,
};
pub use refund::line_refund_amounts;
