//! Coupon validity window and grant consumption.

#![allow(clippy::unwrap_used)]

use chrono::{DateTime, TimeZone, Utc};

use wellnest_integration_tests::{create_coupon, create_user, test_pool};
use wellnest_storefront::db::{CouponRepository, RepositoryError};

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn redeem_respects_january_window() {
    let pool = test_pool().await;
    let owner = create_user(&pool).await;
    let (_, code) = create_coupon(
        &pool,
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 1, 31, 23, 59, 59).unwrap(),
        true,
    )
    .await;
    let repo = CouponRepository::new(&pool);

    let err = repo.redeem(&code, owner, at(2026, 2, 1)).await.unwrap_err();
    assert!(matches!(err, RepositoryError::WindowInvalid(_)));
    assert!(repo.list_grants(owner).await.unwrap().is_empty());

    let redemption = repo
        .redeem(&format!("  {}  ", code.to_lowercase()), owner, at(2026, 1, 15))
        .await
        .unwrap();
    assert_eq!(redemption.coupon.code, code);
    assert_eq!(redemption.grant.owner_id, owner);
    assert!(redemption.grant.used_at.is_none());
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn inactive_and_unknown_coupons_are_rejected() {
    let pool = test_pool().await;
    let owner = create_user(&pool).await;
    let (_, code) = create_coupon(&pool, at(2026, 1, 1), at(2026, 12, 31), false).await;
    let repo = CouponRepository::new(&pool);

    assert!(matches!(
        repo.redeem(&code, owner, at(2026, 6, 1)).await,
        Err(RepositoryError::WindowInvalid(_))
    ));
    assert!(matches!(
        repo.redeem("NO-SUCH-CODE", owner, at(2026, 6, 1)).await,
        Err(RepositoryError::NotFound(_))
    ));
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn grant_is_consumed_once() {
    let pool = test_pool().await;
    let owner = create_user(&pool).await;
    let other = create_user(&pool).await;
    let (_, code) = create_coupon(&pool, at(2026, 1, 1), at(2026, 12, 31), true).await;
    let repo = CouponRepository::new(&pool);

    let grant = repo.redeem(&code, owner, at(2026, 3, 1)).await.unwrap().grant;

    assert!(matches!(
        repo.consume(other, grant.id).await,
        Err(RepositoryError::NotFound(_))
    ));
    let used = repo.consume(owner, grant.id).await.unwrap();
    assert!(used.used_at.is_some());
    assert!(matches!(
        repo.consume(owner, grant.id).await,
        Err(RepositoryError::Conflict(_))
    ));
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn same_owner_may_redeem_again() {
    let pool = test_pool().await;
    let owner = create_user(&pool).await;
    let (_, code) = create_coupon(&pool, at(2026, 1, 1), at(2026, 12, 31), true).await;
    let repo = CouponRepository::new(&pool);

    repo.redeem(&code, owner, at(2026, 3, 1)).await.unwrap();
    repo.redeem(&code, owner, at(2026, 3, 2)).await.unwrap();
    assert_eq!(repo.list_grants(owner).await.unwrap().len(), 2);
}
