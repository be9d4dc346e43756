//! Database Models
//!
//! Serde 模型与 API 请求/响应类型；RecordId 统一以 "table:id"
//! 字符串形式出入 JSON (见 [`serde_helpers`])。

pub mod serde_helpers;

// Accounts
pub mod address;
pub mod user;

// Catalog
pub mod category;
pub mod product;

// Marketing
pub mod coupon;
pub mod offer;

// Cart & Orders
pub mod cart;
pub mod order;

// Wallet & Reports
pub mod report;
pub mod wallet;

// Re-exports
pub use address::{Address, AddressCreate, AddressUpdate};
pub use cart::{Cart, CartAddItem, CartLine, CartLineView, CartUpdateItem, CartView};
pub use category::{Category, CategoryCreate, CategoryId, CategoryUpdate};
pub use coupon::{Coupon, CouponCreate, CouponUpdate};
pub use offer::{Offer, OfferCreate, OfferType, OfferUpdate};
pub use order::{
    CheckoutRequest, ItemStatus, Order, OrderId, OrderItem, OrderStatus, OrderStatusUpdate,
    OrderSummary, PaymentMethod, PaymentStatus, ShippingAddress,
};
pub use product::{
    Product, ProductCreate, ProductId, ProductUpdate, ProductWithPrice, Size,
};
pub use report::{ReportQuery, ReportRange, SalesReport, TopProduct};
pub use user::{User, UserId, UserRole};
pub use wallet::{TxnDirection, Wallet, WalletTxn, WalletView};
