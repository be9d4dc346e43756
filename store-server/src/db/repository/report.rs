//! Sales Report Repository
//!
//! 报表基于订单快照聚合。嵌入式数据库下直接取区间订单在进程内聚合，
//! 金额用 Decimal 汇总后再落回 f64。

use super::{OrderRepository, RepoResult};
use crate::db::models::{ItemStatus, OrderStatus, SalesReport, TopProduct};
use crate::pricing::money::{round2, to_decimal};
use rust_decimal::Decimal;
use std::collections::HashMap;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// How many top sellers the dashboard shows
const TOP_PRODUCT_LIMIT: usize = 10;

#[derive(Clone)]
pub struct ReportRepository {
    orders: OrderRepository,
}

impl ReportRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            orders: OrderRepository::new(db),
        }
    }

    /// Aggregate sales over [from, to] (epoch ms, inclusive)
    pub async fn sales(&self, from: i64, to: i64) -> RepoResult<SalesReport> {
        let orders = self.orders.find_in_range(from, to).await?;

        let mut order_count = 0i64;
        let mut cancelled_count = 0i64;
        let mut returned_count = 0i64;
        let mut gross = Decimal::ZERO;
        let mut coupon = Decimal::ZERO;
        let mut offer = Decimal::ZERO;
        // product id -> (name, quantity, revenue)
        let mut per_product: HashMap<String, (String, i64, Decimal)> = HashMap::new();

        for order in &orders {
            match order.status {
                OrderStatus::Cancelled => {
                    cancelled_count += 1;
                    continue;
                }
                OrderStatus::Returned => returned_count += 1,
                _ => {}
            }

            order_count += 1;
            gross += to_decimal(order.total_amount);
            coupon += to_decimal(order.coupon_discount);

            for item in &order.items {
                // 取消的行既不算销量也不算折扣
                if item.status == ItemStatus::Cancelled {
                    continue;
                }
                let qty = Decimal::from(item.quantity);
                offer += (to_decimal(item.base_price) - to_decimal(item.unit_price)) * qty;

                let entry = per_product
                    .entry(item.product.to_string())
                    .or_insert_with(|| (item.name.clone(), 0, Decimal::ZERO));
                entry.1 += item.quantity as i64;
                entry.2 += to_decimal(item.line_total);
            }
        }

        let mut top_products: Vec<TopProduct> = per_product
            .into_iter()
            .map(|(product, (name, quantity, revenue))| TopProduct {
                product,
                name,
                quantity,
                revenue: round2(revenue),
            })
            .collect();
        top_products.sort_by(|a, b| b.quantity.cmp(&a.quantity).then(a.name.cmp(&b.name)));
        top_products.truncate(TOP_PRODUCT_LIMIT);

        Ok(SalesReport {
            from,
            to,
            order_count,
            gross_revenue: round2(gross),
            coupon_discount: round2(coupon),
            offer_discount: round2(offer),
            cancelled_count,
            returned_count,
            top_products,
        })
    }
}
