//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 注册/登录/OAuth
//! - [`categories`] - 分类浏览与管理
//! - [`products`] - 商品浏览与管理
//! - [`offers`] - 限时折扣管理
//! - [`coupons`] - 优惠码管理
//! - [`addresses`] - 收货地址
//! - [`cart`] - 购物车
//! - [`checkout`] - 下单
//! - [`orders`] - 订单查询、取消、退货
//! - [`wallet`] - 钱包
//! - [`admin`] - 后台 (用户、订单履约、报表)

pub mod convert;

pub mod auth;
pub mod health;

// Catalog API
pub mod categories;
pub mod products;

// Marketing API
pub mod coupons;
pub mod offers;

// Shopping API
pub mod addresses;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod wallet;

// Back-office API
pub mod admin;

// Re-export common types for handlers
pub use crate::utils::{AppResult, ok};
