//! Order placement is all-or-nothing.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;
use std::time::Duration;

use wellnest_admin::db::{AdminOrderRepository, RepositoryError as AdminRepositoryError};
use wellnest_core::{MAX_LINE_QUANTITY, OrderItem, OrderStatus, Price};
use wellnest_integration_tests::{
    cart_len, create_address, create_product, create_user, order_count, test_pool,
};
use wellnest_storefront::db::{CartRepository, OrderRepository, RepositoryError};
use wellnest_storefront::models::NewOrder;

fn looks_like_order_number(value: &str) -> bool {
    let Some(rest) = value.strip_prefix("WN") else {
        return false;
    };
    rest.len() == 12
        && rest[..6].chars().all(|c| c.is_ascii_digit())
        && rest[6..]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn ordering_the_cart_empties_it() {
    let pool = test_pool().await;
    let owner = create_user(&pool).await;
    let vitamin = create_product(&pool, 1_290_000, true).await;
    let probiotic = create_product(&pool, 3_450_000, true).await;
    let address = create_address(&pool, owner, true).await;

    let cart = CartRepository::new(&pool);
    cart.add_item(owner, vitamin, 2, None).await.unwrap();
    cart.add_item(owner, probiotic, 1, None).await.unwrap();

    let detail = OrderRepository::new(&pool)
        .create(
            owner,
            NewOrder {
                address_id: Some(address),
                memo: Some("  leave at the door ".to_owned()),
                items: Vec::new(),
            },
        )
        .await
        .unwrap();

    assert_eq!(detail.lines.len(), 2);
    assert_eq!(detail.order.status, OrderStatus::Pending);
    assert_eq!(detail.order.memo.as_deref(), Some("leave at the door"));
    assert_eq!(
        detail.order.total_amount,
        Price::from_minor(2 * 1_290_000 + 3_450_000)
    );
    assert_eq!(detail.order.shipping.unwrap().postal_code, "04524");
    assert!(looks_like_order_number(detail.order.order_number.as_str()));
    assert_eq!(cart_len(&pool, owner).await, 0);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn explicit_items_are_merged_and_cart_is_cleared() {
    let pool = test_pool().await;
    let owner = create_user(&pool).await;
    let product = create_product(&pool, 990_000, true).await;
    let other = create_product(&pool, 500_000, true).await;

    CartRepository::new(&pool)
        .add_item(owner, other, 3, None)
        .await
        .unwrap();

    let detail = OrderRepository::new(&pool)
        .create(
            owner,
            NewOrder {
                items: vec![
                    OrderItem { product_id: product, quantity: 1 },
                    OrderItem { product_id: product, quantity: 2 },
                ],
                ..NewOrder::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(detail.lines.len(), 1);
    assert_eq!(detail.lines[0].quantity, 3);
    assert_eq!(detail.lines[0].line_total(), Price::from_minor(2_970_000));
    assert_eq!(cart_len(&pool, owner).await, 0);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn failure_leaves_cart_and_orders_untouched() {
    let pool = test_pool().await;
    let owner = create_user(&pool).await;
    let active = create_product(&pool, 1_000_000, true).await;
    let retired = create_product(&pool, 1_000_000, false).await;

    let cart = CartRepository::new(&pool);
    cart.add_item(owner, active, 1, None).await.unwrap();

    let orders = OrderRepository::new(&pool);
    let err = orders
        .create(
            owner,
            NewOrder {
                items: vec![
                    OrderItem { product_id: active, quantity: 1 },
                    OrderItem { product_id: retired, quantity: 1 },
                ],
                ..NewOrder::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound(_)));

    assert_eq!(order_count(&pool, owner).await, 0);
    assert_eq!(cart_len(&pool, owner).await, 1);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn line_added_during_checkout_is_ordered_or_kept() {
    let pool = test_pool().await;
    let owner = create_user(&pool).await;
    let early = create_product(&pool, 100_000, true).await;
    let late = create_product(&pool, 200_000, true).await;
    CartRepository::new(&pool)
        .add_item(owner, early, 1, None)
        .await
        .unwrap();

    // Hold the owner row so checkout waits on its order insert while the
    // late line is still uncommitted.
    let mut tx = pool.begin().await.unwrap();
    sqlx::query("SELECT id FROM shop.user WHERE id = $1 FOR UPDATE")
        .bind(owner)
        .execute(&mut *tx)
        .await
        .unwrap();
    sqlx::query("INSERT INTO shop.cart_line (owner_id, product_id, quantity) VALUES ($1, $2, 1)")
        .bind(owner)
        .bind(late)
        .execute(&mut *tx)
        .await
        .unwrap();

    let checkout = {
        let pool = pool.clone();
        tokio::spawn(async move {
            OrderRepository::new(&pool)
                .create(owner, NewOrder::default())
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(500)).await;
    tx.commit().await.unwrap();

    let detail = checkout.await.unwrap().unwrap();
    let ordered: Vec<_> = detail.lines.iter().map(|l| l.product_id).collect();
    let in_cart: Vec<_> = CartRepository::new(&pool)
        .list(owner)
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.product_id)
        .collect();

    assert!(ordered.contains(&early));
    assert!(!in_cart.contains(&early));
    assert_ne!(
        ordered.contains(&late),
        in_cart.contains(&late),
        "the late line must end up either ordered or still in the cart"
    );
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn oversized_orders_are_validation_errors() {
    let pool = test_pool().await;
    let owner = create_user(&pool).await;
    let vitamin = create_product(&pool, 10_000, true).await;
    let device = create_product(&pool, 999_999_999_999, true).await;
    let orders = OrderRepository::new(&pool);

    let place = |product_id, quantity| NewOrder {
        items: vec![OrderItem {
            product_id,
            quantity,
        }],
        ..NewOrder::default()
    };

    for input in [
        place(vitamin, 2_000_000_000),
        place(vitamin, MAX_LINE_QUANTITY + 1),
        place(device, 2),
    ] {
        let err = orders.create(owner, input).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Validation(_)), "{err}");
    }

    let detail = orders.create(owner, place(device, 1)).await.unwrap();
    assert_eq!(detail.order.total_amount, Price::MAX_STORED);
    assert_eq!(order_count(&pool, owner).await, 1);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn empty_cart_cannot_be_ordered() {
    let pool = test_pool().await;
    let owner = create_user(&pool).await;

    let err = OrderRepository::new(&pool)
        .create(owner, NewOrder::default())
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Validation(_)));
    assert_eq!(order_count(&pool, owner).await, 0);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn foreign_address_is_rejected() {
    let pool = test_pool().await;
    let owner = create_user(&pool).await;
    let stranger = create_user(&pool).await;
    let product = create_product(&pool, 100_000, true).await;
    let address = create_address(&pool, stranger, true).await;

    let err = OrderRepository::new(&pool)
        .create(
            owner,
            NewOrder {
                address_id: Some(address),
                items: vec![OrderItem { product_id: product, quantity: 1 }],
                ..NewOrder::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound(_)));
    assert_eq!(order_count(&pool, owner).await, 0);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn order_numbers_are_distinct() {
    let pool = test_pool().await;
    let owner = create_user(&pool).await;
    let product = create_product(&pool, 100_000, true).await;
    let orders = OrderRepository::new(&pool);

    let mut numbers = HashSet::new();
    for _ in 0..10 {
        let detail = orders
            .create(
                owner,
                NewOrder {
                    items: vec![OrderItem { product_id: product, quantity: 1 }],
                    ..NewOrder::default()
                },
            )
            .await
            .unwrap();
        assert!(numbers.insert(detail.order.order_number.as_str().to_owned()));
    }

    let listed = orders.list_for_owner(owner).await.unwrap();
    assert_eq!(listed.len(), 10);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn console_status_changes_follow_the_lifecycle() {
    let pool = test_pool().await;
    let owner = create_user(&pool).await;
    let product = create_product(&pool, 100_000, true).await;

    let order = OrderRepository::new(&pool)
        .create(
            owner,
            NewOrder {
                items: vec![OrderItem { product_id: product, quantity: 1 }],
                ..NewOrder::default()
            },
        )
        .await
        .unwrap()
        .order;

    let console = AdminOrderRepository::new(&pool);
    let paid = console.transition(order.id, OrderStatus::Paid).await.unwrap();
    assert_eq!(paid.status, OrderStatus::Paid);

    let err = console
        .transition(order.id, OrderStatus::Shipped)
        .await
        .unwrap_err();
    assert!(matches!(err, AdminRepositoryError::Conflict(_)));

    let stored = OrderRepository::new(&pool)
        .get_for_owner(owner, order.id)
        .await
        .unwrap();
    assert_eq!(stored.order.status, OrderStatus::Paid);
}
