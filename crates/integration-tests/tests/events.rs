//! Event capacity under concurrent registration.

#![allow(clippy::unwrap_used)]

use tokio::task::JoinSet;

use wellnest_core::{Email, EventId};
use wellnest_integration_tests::{create_event, test_pool};
use wellnest_storefront::db::{EventRepository, RepositoryError};
use wellnest_storefront::models::Registrant;

fn guest(n: usize) -> Registrant {
    Registrant {
        registrant_id: None,
        name: format!("Guest {n}"),
        email: Email::parse(&format!("guest{n}@test.wellnest.health")).unwrap(),
        phone: None,
    }
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn concurrent_registrations_never_exceed_capacity() {
    const CAPACITY: i32 = 5;
    const ATTEMPTS: usize = 25;

    let pool = test_pool().await;
    let event = create_event(&pool, Some(CAPACITY)).await;

    let mut tasks = JoinSet::new();
    for n in 0..ATTEMPTS {
        let pool = pool.clone();
        tasks.spawn(async move { EventRepository::new(&pool).register(event, &guest(n)).await });
    }

    let mut admitted = 0;
    let mut rejected = 0;
    while let Some(result) = tasks.join_next().await {
        match result.unwrap() {
            Ok(_) => admitted += 1,
            Err(RepositoryError::CapacityExceeded) => rejected += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(admitted, 5);
    assert_eq!(rejected, ATTEMPTS - 5);

    let repo = EventRepository::new(&pool);
    let stored = repo.get(event).await.unwrap();
    assert_eq!(stored.current_count, CAPACITY);
    assert_eq!(stored.remaining(), Some(0));
    assert_eq!(repo.registrations(event).await.unwrap().len(), 5);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn unlimited_event_admits_everyone() {
    let pool = test_pool().await;
    let event = create_event(&pool, None).await;
    let repo = EventRepository::new(&pool);

    for n in 0..8 {
        repo.register(event, &guest(n)).await.unwrap();
    }

    let stored = repo.get(event).await.unwrap();
    assert_eq!(stored.current_count, 8);
    assert_eq!(stored.remaining(), None);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn full_and_missing_events_are_distinguished() {
    let pool = test_pool().await;
    let event = create_event(&pool, Some(0)).await;
    let repo = EventRepository::new(&pool);

    assert!(matches!(
        repo.register(event, &guest(0)).await,
        Err(RepositoryError::CapacityExceeded)
    ));
    assert!(matches!(
        repo.register(EventId::new(i32::MAX), &guest(0)).await,
        Err(RepositoryError::NotFound(_))
    ));
    assert!(repo.registrations(event).await.unwrap().is_empty());
}
