//! At most one default address per owner.

#![allow(clippy::unwrap_used)]

use tokio::task::JoinSet;

use wellnest_core::AddressId;
use wellnest_integration_tests::{create_address, create_user, default_count, test_pool};
use wellnest_storefront::db::{AddressRepository, RepositoryError};
use wellnest_storefront::models::NewAddress;

fn new_address(recipient: &str, is_default: bool) -> NewAddress {
    NewAddress {
        recipient: recipient.to_owned(),
        phone: "010-1234-5678".to_owned(),
        postal_code: "06236".to_owned(),
        line1: "152 Teheran-ro".to_owned(),
        line2: Some("  ".to_owned()),
        is_default,
    }
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn default_moves_with_each_write() {
    let pool = test_pool().await;
    let owner = create_user(&pool).await;
    let repo = AddressRepository::new(&pool);

    let home = repo.create(owner, new_address("Home", true)).await.unwrap();
    assert!(home.is_default);
    assert!(home.line2.is_none());
    assert_eq!(default_count(&pool, owner).await, 1);

    let office = repo.create(owner, new_address("Office", true)).await.unwrap();
    assert_eq!(default_count(&pool, owner).await, 1);

    let cabin = repo.create(owner, new_address("Cabin", false)).await.unwrap();
    assert_eq!(default_count(&pool, owner).await, 1);

    repo.set_default(owner, cabin.id).await.unwrap();
    assert_eq!(default_count(&pool, owner).await, 1);

    let listed = repo.list(owner).await.unwrap();
    let defaults: Vec<_> = listed.iter().filter(|a| a.is_default).map(|a| a.id).collect();
    assert_eq!(defaults, vec![cabin.id]);
    assert!(listed.iter().any(|a| a.id == office.id && !a.is_default));
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn concurrent_set_default_keeps_one() {
    let pool = test_pool().await;
    let owner = create_user(&pool).await;

    let mut ids = Vec::new();
    for _ in 0..6 {
        ids.push(create_address(&pool, owner, false).await);
    }

    let mut tasks = JoinSet::new();
    for id in ids.iter().copied() {
        let pool = pool.clone();
        tasks.spawn(async move { AddressRepository::new(&pool).set_default(owner, id).await });
    }
    while let Some(result) = tasks.join_next().await {
        result.unwrap().unwrap();
    }

    assert_eq!(default_count(&pool, owner).await, 1);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn deleting_the_default_promotes_nothing() {
    let pool = test_pool().await;
    let owner = create_user(&pool).await;
    let default = create_address(&pool, owner, true).await;
    create_address(&pool, owner, false).await;

    let repo = AddressRepository::new(&pool);
    repo.delete(owner, default).await.unwrap();

    assert_eq!(default_count(&pool, owner).await, 0);
    assert_eq!(repo.list(owner).await.unwrap().len(), 1);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn other_owners_addresses_are_out_of_reach() {
    let pool = test_pool().await;
    let owner = create_user(&pool).await;
    let stranger = create_user(&pool).await;
    let mine = create_address(&pool, owner, true).await;
    let theirs = create_address(&pool, stranger, true).await;

    let repo = AddressRepository::new(&pool);
    assert!(matches!(
        repo.set_default(owner, theirs).await,
        Err(RepositoryError::NotFound(_))
    ));
    assert!(matches!(
        repo.delete(owner, theirs).await,
        Err(RepositoryError::NotFound(_))
    ));
    assert!(matches!(
        repo.set_default(owner, AddressId::new(i32::MAX)).await,
        Err(RepositoryError::NotFound(_))
    ));

    assert_eq!(default_count(&pool, owner).await, 1);
    assert_eq!(default_count(&pool, stranger).await, 1);
    let listed = repo.list(owner).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, mine);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn blank_required_field_is_rejected() {
    let pool = test_pool().await;
    let owner = create_user(&pool).await;

    let err = AddressRepository::new(&pool)
        .create(owner, new_address("   ", true))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Validation(_)));
    assert_eq!(default_count(&pool, owner).await, 0);
}
