//! Display-order overwrites and promotion membership from the console.

#![allow(clippy::unwrap_used)]

use sqlx::PgPool;

use wellnest_admin::db::{CatalogOrderRepository, PromotionRepository, RepositoryError};
use wellnest_admin::models::RankedCollection;
use wellnest_core::{PromotionId, RankAssignment, RankError, RankList};
use wellnest_integration_tests::{
    create_banner, create_plan, create_product, create_promotion, test_pool,
};

fn ranks(pairs: &[(i32, i32)]) -> RankList {
    RankList::new(
        pairs
            .iter()
            .map(|&(id, rank)| RankAssignment { id, rank })
            .collect(),
    )
    .unwrap()
}

/// `ids` in the order the collection returns them, ignoring other rows.
async fn ordered_subset(pool: &PgPool, collection: RankedCollection, ids: &[i32]) -> Vec<i32> {
    CatalogOrderRepository::new(pool)
        .ordered_ids(collection)
        .await
        .unwrap()
        .into_iter()
        .filter(|id| ids.contains(id))
        .collect()
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn plan_reorder_overwrites_only_named_rows() {
    let pool = test_pool().await;
    let a = create_plan(&pool, 1_000).await.as_i32();
    let b = create_plan(&pool, 1_001).await.as_i32();
    let c = create_plan(&pool, 1_002).await.as_i32();
    let untouched = create_plan(&pool, 7).await.as_i32();

    let updated = CatalogOrderRepository::new(&pool)
        .reorder(
            RankedCollection::SubscriptionPlans,
            &ranks(&[(c, 0), (a, 1), (b, 2)]),
        )
        .await
        .unwrap();
    assert_eq!(updated, 3);

    assert_eq!(
        ordered_subset(&pool, RankedCollection::SubscriptionPlans, &[a, b, c]).await,
        vec![c, a, b]
    );

    let rank: i32 =
        sqlx::query_scalar("SELECT display_order FROM shop.subscription_plan WHERE id = $1")
            .bind(untouched)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(rank, 7);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn unknown_ids_are_skipped() {
    let pool = test_pool().await;
    let banner = create_banner(&pool, 3).await.as_i32();

    let updated = CatalogOrderRepository::new(&pool)
        .reorder(
            RankedCollection::Banners,
            &ranks(&[(banner, 9), (i32::MAX, 0)]),
        )
        .await
        .unwrap();
    assert_eq!(updated, 1);
}

#[test]
fn duplicate_ids_never_reach_the_database() {
    let err = RankList::new(vec![
        RankAssignment { id: 4, rank: 0 },
        RankAssignment { id: 4, rank: 1 },
    ])
    .unwrap_err();
    assert_eq!(err, RankError::DuplicateId(4));
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn promotion_products_are_replaced_and_reordered() {
    let pool = test_pool().await;
    let promotion = create_promotion(&pool).await;
    let x = create_product(&pool, 100_000, true).await;
    let y = create_product(&pool, 100_000, true).await;
    let z = create_product(&pool, 100_000, true).await;

    let repo = PromotionRepository::new(&pool);
    assert_eq!(repo.set_members(promotion, &[x, y]).await.unwrap(), 2);
    assert_eq!(repo.set_members(promotion, &[z, x]).await.unwrap(), 2);

    let members = repo.list_members(promotion).await.unwrap();
    let ids: Vec<_> = members.iter().map(|m| m.product_id).collect();
    assert_eq!(ids, vec![z, x]);
    assert_eq!(members[0].display_order, 0);
    assert_eq!(members[1].display_order, 1);

    let collection = RankedCollection::PromotionProducts(promotion);
    let updated = CatalogOrderRepository::new(&pool)
        .reorder(collection, &ranks(&[(x.as_i32(), 0), (z.as_i32(), 5), (y.as_i32(), 1)]))
        .await
        .unwrap();
    assert_eq!(updated, 2, "y is no longer linked to the promotion");

    assert_eq!(
        CatalogOrderRepository::new(&pool)
            .ordered_ids(collection)
            .await
            .unwrap(),
        vec![x.as_i32(), z.as_i32()]
    );
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn reorder_of_missing_promotion_is_not_found() {
    let pool = test_pool().await;
    let repo = CatalogOrderRepository::new(&pool);
    let missing = RankedCollection::PromotionProducts(PromotionId::new(i32::MAX));

    for list in [ranks(&[(1, 0)]), ranks(&[])] {
        let err = repo.reorder(missing, &list).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(ref what) if what == "promotion"));
    }

    let empty = create_promotion(&pool).await;
    assert_eq!(
        repo.reorder(RankedCollection::PromotionProducts(empty), &ranks(&[(1, 0)]))
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn failed_replace_changes_nothing() {
    let pool = test_pool().await;
    let promotion = create_promotion(&pool).await;
    let x = create_product(&pool, 100_000, true).await;
    let repo = PromotionRepository::new(&pool);
    repo.set_members(promotion, &[x]).await.unwrap();

    assert!(matches!(
        repo.set_members(promotion, &[x, x]).await,
        Err(RepositoryError::Validation(_))
    ));
    assert!(matches!(
        repo.set_members(promotion, &[x, wellnest_core::ProductId::new(i32::MAX)])
            .await,
        Err(RepositoryError::NotFound(ref what)) if what == "product"
    ));
    assert!(matches!(
        repo.set_members(PromotionId::new(i32::MAX), &[x]).await,
        Err(RepositoryError::NotFound(_))
    ));
    assert!(matches!(
        repo.list_members(PromotionId::new(i32::MAX)).await,
        Err(RepositoryError::NotFound(_))
    ));

    let ids: Vec<_> = repo
        .list_members(promotion)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.product_id)
        .collect();
    assert_eq!(ids, vec![x]);
}
