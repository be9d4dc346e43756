//! End-to-end exercises for the order core: offer pricing, stock
//! reconciliation, wallet money conservation. Runs against an in-memory
//! SurrealDB instance, driving the same engines the HTTP handlers use.

use std::collections::BTreeMap;

use shared::ErrorCode;
use shared::util::now_millis;
use store_server::db::DbService;
use store_server::db::models::{
    AddressCreate, CartLine, CategoryCreate, CheckoutRequest, CouponCreate, ItemStatus,
    OfferCreate, OfferType, Order, OrderStatus, PaymentMethod, PaymentStatus, ProductCreate, Size,
    User, UserRole,
};
use store_server::db::repository::{
    AddressRepository, CartRepository, CategoryRepository, CouponRepository, OfferRepository,
    ProductRepository, UserRepository, WalletRepository,
};
use store_server::orders::{CheckoutEngine, OrderLifecycle, ShippingPolicy};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const SHIPPING: ShippingPolicy = ShippingPolicy {
    flat_fee: 5.0,
    free_threshold: 99.0,
};

struct World {
    db: Surreal<Db>,
    user: RecordId,
    address: String,
}

async fn setup() -> World {
    let db = DbService::new_memory()
        .await
        .expect("in-memory db should open")
        .db;

    let users = UserRepository::new(db.clone());
    let user = users
        .create(User {
            id: None,
            email: "ana@example.com".into(),
            display_name: "Ana".into(),
            hash_pass: Some(User::hash_password("secret-password").unwrap()),
            role: UserRole::Customer,
            oauth_provider: None,
            oauth_subject: None,
            is_active: true,
            created_at: now_millis(),
        })
        .await
        .expect("user created");
    let user_id = user.id.clone().unwrap();

    let addresses = AddressRepository::new(db.clone());
    let address = addresses
        .create(
            &user_id,
            AddressCreate {
                recipient: "Ana".into(),
                street: "1 Harbour Road".into(),
                city: "Porto".into(),
                state: None,
                postal_code: "4000-123".into(),
                phone: "+351000000".into(),
                is_default: Some(true),
            },
        )
        .await
        .expect("address created");

    World {
        db,
        user: user_id,
        address: address.id.unwrap().to_string(),
    }
}

/// Create a category + product with the given price and M-size stock
async fn seed_product(db: &Surreal<Db>, name: &str, price: f64, stock_m: i32) -> RecordId {
    let categories = CategoryRepository::new(db.clone());
    let category = match categories.find_by_name("Tops").await.unwrap() {
        Some(c) => c,
        None => categories
            .create(CategoryCreate {
                name: "Tops".into(),
                description: None,
            })
            .await
            .unwrap(),
    };

    let products = ProductRepository::new(db.clone());
    let product = products
        .create(ProductCreate {
            name: name.into(),
            description: None,
            category: category.id.unwrap().to_string(),
            price,
            images: None,
            stock: Some(BTreeMap::from([(Size::M, stock_m)])),
        })
        .await
        .unwrap();
    product.id.unwrap()
}

async fn add_to_cart(db: &Surreal<Db>, user: &RecordId, product: &RecordId, qty: i32, price: f64) {
    let carts = CartRepository::new(db.clone());
    let products = ProductRepository::new(db.clone());
    let name = products
        .find_by_record(product)
        .await
        .unwrap()
        .unwrap()
        .name;
    carts
        .add_line(
            user,
            CartLine {
                product: product.clone(),
                name,
                size: Size::M,
                quantity: qty,
                price_at_add: price,
            },
        )
        .await
        .unwrap();
}

async fn stock_m(db: &Surreal<Db>, product: &RecordId) -> i32 {
    ProductRepository::new(db.clone())
        .find_by_record(product)
        .await
        .unwrap()
        .unwrap()
        .stock_for(Size::M)
}

fn checkout_request(world: &World, method: PaymentMethod, coupon: Option<&str>) -> CheckoutRequest {
    CheckoutRequest {
        address: world.address.clone(),
        payment_method: method,
        coupon_code: coupon.map(|c| c.to_string()),
    }
}

#[tokio::test]
async fn checkout_applies_best_offer_and_decrements_stock() {
    let world = setup().await;
    let product = seed_product(&world.db, "Linen Shirt", 100.0, 10).await;

    // Two live offers: 20% on the product, 10% on its category.
    // The product-scoped 20% must win.
    let offers = OfferRepository::new(world.db.clone());
    let category = ProductRepository::new(world.db.clone())
        .find_by_record(&product)
        .await
        .unwrap()
        .unwrap()
        .category;
    let now = now_millis();
    offers
        .create(OfferCreate {
            name: "Shirt promo".into(),
            offer_type: OfferType::Product,
            target: product.to_string(),
            discount_percent: 20.0,
            starts_at: now - 1_000,
            ends_at: now + 3_600_000,
        })
        .await
        .unwrap();
    offers
        .create(OfferCreate {
            name: "Tops promo".into(),
            offer_type: OfferType::Category,
            target: category.to_string(),
            discount_percent: 10.0,
            starts_at: now - 1_000,
            ends_at: now + 3_600_000,
        })
        .await
        .unwrap();

    add_to_cart(&world.db, &world.user, &product, 2, 100.0).await;

    let engine = CheckoutEngine::new(world.db.clone(), SHIPPING);
    let order = engine
        .checkout(&world.user, checkout_request(&world, PaymentMethod::Cod, None))
        .await
        .expect("checkout succeeds");

    // 100 * 0.8 = 80 per unit, 2 units, over the free-shipping threshold
    let item = &order.items[0];
    assert_eq!(item.offer_percent, 20.0);
    assert_eq!(item.unit_price, 80.0);
    assert_eq!(item.line_total, 160.0);
    assert_eq!(order.subtotal, 160.0);
    assert_eq!(order.shipping_fee, 0.0);
    assert_eq!(order.total_amount, 160.0);
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.payment_status, PaymentStatus::Pending);

    // Inventory reconciled and cart consumed
    assert_eq!(stock_m(&world.db, &product).await, 8);
    let cart = CartRepository::new(world.db.clone())
        .find_by_user(&world.user)
        .await
        .unwrap();
    assert!(cart.is_empty());
}

#[tokio::test]
async fn checkout_rejects_insufficient_stock_without_side_effects() {
    let world = setup().await;
    let product = seed_product(&world.db, "Scarce Tee", 40.0, 1).await;
    add_to_cart(&world.db, &world.user, &product, 2, 40.0).await;

    let engine = CheckoutEngine::new(world.db.clone(), SHIPPING);
    let err = engine
        .checkout(&world.user, checkout_request(&world, PaymentMethod::Cod, None))
        .await
        .expect_err("must reject");
    assert_eq!(err.code, ErrorCode::ProductOutOfStock);

    // Nothing was deducted, the cart is untouched
    assert_eq!(stock_m(&world.db, &product).await, 1);
    let cart = CartRepository::new(world.db.clone())
        .find_by_user(&world.user)
        .await
        .unwrap();
    assert_eq!(cart.lines.len(), 1);
}

#[tokio::test]
async fn wallet_payment_debits_then_cancel_refunds_exactly_once() {
    let world = setup().await;
    let product = seed_product(&world.db, "Wool Jumper", 30.0, 5).await;
    add_to_cart(&world.db, &world.user, &product, 1, 30.0).await;

    let wallets = WalletRepository::new(world.db.clone());
    wallets
        .credit(&world.user, 100.0, "Top up", None)
        .await
        .unwrap();

    // subtotal 30 < 99 → flat fee 5 → total 35
    let engine = CheckoutEngine::new(world.db.clone(), SHIPPING);
    let order = engine
        .checkout(
            &world.user,
            checkout_request(&world, PaymentMethod::Wallet, None),
        )
        .await
        .expect("wallet checkout succeeds");
    assert_eq!(order.total_amount, 35.0);
    assert_eq!(order.payment_status, PaymentStatus::Paid);

    let wallet = wallets.find_by_user(&world.user).await.unwrap();
    assert_eq!(wallet.balance, 65.0);
    assert_eq!(stock_m(&world.db, &product).await, 4);

    // Cancel: stock back, line value (not the shipping fee) refunded
    let lifecycle = OrderLifecycle::new(world.db.clone());
    let order_id = order.id.clone().unwrap().to_string();
    let cancelled = lifecycle
        .cancel_order(&order_id, &world.user, false)
        .await
        .expect("cancellation succeeds");
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(cancelled.payment_status, PaymentStatus::Refunded);
    assert!(cancelled.items.iter().all(|i| i.status == ItemStatus::Cancelled));

    assert_eq!(stock_m(&world.db, &product).await, 5);
    let wallet = wallets.find_by_user(&world.user).await.unwrap();
    assert_eq!(wallet.balance, 95.0);
    // 充值 + 扣款 + 退款 = 3 条流水
    assert_eq!(wallet.transactions.len(), 3);

    // A second cancellation must be rejected: no double restore, no double refund
    let err = lifecycle
        .cancel_order(&order_id, &world.user, false)
        .await
        .expect_err("second cancel rejected");
    assert_eq!(err.code, ErrorCode::OrderNotCancellable);
    assert_eq!(stock_m(&world.db, &product).await, 5);
    let wallet = wallets.find_by_user(&world.user).await.unwrap();
    assert_eq!(wallet.balance, 95.0);
}

#[tokio::test]
async fn insufficient_wallet_balance_unwinds_checkout() {
    let world = setup().await;
    let product = seed_product(&world.db, "Silk Dress", 80.0, 3).await;
    add_to_cart(&world.db, &world.user, &product, 1, 80.0).await;

    // No top-up: balance 0
    let engine = CheckoutEngine::new(world.db.clone(), SHIPPING);
    let err = engine
        .checkout(
            &world.user,
            checkout_request(&world, PaymentMethod::Wallet, None),
        )
        .await
        .expect_err("must reject");
    assert_eq!(err.code, ErrorCode::WalletInsufficientBalance);

    // Checkout unwound completely: stock untouched, no dangling order
    assert_eq!(stock_m(&world.db, &product).await, 3);
    let orders = store_server::db::repository::OrderRepository::new(world.db.clone());
    assert!(orders
        .find_by_user(&world.user, 10, 0)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn coupon_discount_applies_and_is_single_use() {
    let world = setup().await;
    let product = seed_product(&world.db, "Denim Jacket", 50.0, 10).await;

    let coupons = CouponRepository::new(world.db.clone());
    let now = now_millis();
    coupons
        .create(CouponCreate {
            code: "save10".into(),
            description: None,
            discount_percent: 10.0,
            max_discount: 100.0,
            min_order_amount: Some(50.0),
            starts_at: now - 1_000,
            ends_at: now + 3_600_000,
            usage_limit: Some(10),
        })
        .await
        .unwrap();

    add_to_cart(&world.db, &world.user, &product, 2, 50.0).await;

    // subtotal 100, free shipping, 10% coupon → total 90
    let engine = CheckoutEngine::new(world.db.clone(), SHIPPING);
    let order = engine
        .checkout(
            &world.user,
            checkout_request(&world, PaymentMethod::Cod, Some("SAVE10")),
        )
        .await
        .expect("coupon checkout succeeds");
    assert_eq!(order.coupon_discount, 10.0);
    assert_eq!(order.total_amount, 90.0);
    assert_eq!(order.coupon_code.as_deref(), Some("SAVE10"));

    let coupon = coupons.find_by_code("SAVE10").await.unwrap().unwrap();
    assert_eq!(coupon.used_count, 1);
    assert!(coupon.used_by.contains(&world.user));

    // 同一账号第二次使用同一优惠码被拒
    add_to_cart(&world.db, &world.user, &product, 2, 50.0).await;
    let err = engine
        .checkout(
            &world.user,
            checkout_request(&world, PaymentMethod::Cod, Some("SAVE10")),
        )
        .await
        .expect_err("second use rejected");
    assert_eq!(err.code, ErrorCode::CouponAlreadyUsed);
    // The failed attempt must not leak stock
    assert_eq!(stock_m(&world.db, &product).await, 8);
}

#[tokio::test]
async fn return_flow_restores_stock_after_completion_only() {
    let world = setup().await;
    let product = seed_product(&world.db, "Canvas Tote", 40.0, 6).await;
    add_to_cart(&world.db, &world.user, &product, 1, 40.0).await;

    let engine = CheckoutEngine::new(world.db.clone(), SHIPPING);
    let order = engine
        .checkout(&world.user, checkout_request(&world, PaymentMethod::Cod, None))
        .await
        .unwrap();
    let order_id = order.id.clone().unwrap().to_string();
    let item_id = order.items[0].item_id.clone();
    assert_eq!(stock_m(&world.db, &product).await, 5);

    let lifecycle = OrderLifecycle::new(world.db.clone());

    // Return before delivery is not allowed
    let err = lifecycle
        .request_return(&order_id, &item_id, &world.user)
        .await
        .expect_err("pending item cannot be returned");
    assert_eq!(err.code, ErrorCode::OrderItemNotReturnable);

    // Ship, deliver (COD collects payment at the door)
    lifecycle
        .set_fulfilment(&order_id, OrderStatus::Shipped)
        .await
        .unwrap();
    let delivered = lifecycle
        .set_fulfilment(&order_id, OrderStatus::Delivered)
        .await
        .unwrap();
    assert_eq!(delivered.payment_status, PaymentStatus::Paid);

    // Request + complete the return
    let requested = lifecycle
        .request_return(&order_id, &item_id, &world.user)
        .await
        .unwrap();
    assert_eq!(requested.items[0].status, ItemStatus::ReturnRequested);
    // 发起退货不回补库存
    assert_eq!(stock_m(&world.db, &product).await, 5);

    let completed = lifecycle
        .complete_return(&order_id, &item_id)
        .await
        .unwrap();
    assert_eq!(completed.items[0].status, ItemStatus::Returned);
    assert_eq!(completed.status, OrderStatus::Returned);
    assert_eq!(stock_m(&world.db, &product).await, 6);

    let wallet = WalletRepository::new(world.db.clone())
        .find_by_user(&world.user)
        .await
        .unwrap();
    assert_eq!(wallet.balance, 40.0);

    // Completing the same return twice is rejected
    let err = lifecycle
        .complete_return(&order_id, &item_id)
        .await
        .expect_err("double completion rejected");
    assert_eq!(err.code, ErrorCode::ReturnNotRequested);
    assert_eq!(stock_m(&world.db, &product).await, 6);
}

#[tokio::test]
async fn order_item_total_invariant_holds() {
    let world = setup().await;
    let product = seed_product(&world.db, "Rib Socks", 7.35, 20).await;
    add_to_cart(&world.db, &world.user, &product, 3, 7.35).await;

    let engine = CheckoutEngine::new(world.db.clone(), SHIPPING);
    let order: Order = engine
        .checkout(&world.user, checkout_request(&world, PaymentMethod::Cod, None))
        .await
        .unwrap();

    for item in &order.items {
        let expected = (item.unit_price * item.quantity as f64 * 100.0).round() / 100.0;
        assert!((item.line_total - expected).abs() < 1e-9);
    }
    let items_sum: f64 = order.items.iter().map(|i| i.line_total).sum();
    let expected_total =
        ((items_sum + order.shipping_fee - order.coupon_discount) * 100.0).round() / 100.0;
    assert!((order.total_amount - expected_total).abs() < 1e-9);
}
