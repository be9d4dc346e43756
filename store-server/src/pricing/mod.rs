//! Pricing Module
//!
//! 优惠解析与金额计算：
//! - [`resolver`] - 单品/分类优惠中选择最优折扣
//! - [`money`] - Decimal 精度的金额运算 (存储边界为 f64)

pub mod money;
pub mod resolver;

pub use resolver::{OfferEngine, ResolvedOffer, pick_best_offer};
