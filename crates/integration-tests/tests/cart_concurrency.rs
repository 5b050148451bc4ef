//! Integration tests for concurrent writers on one cart store.

#![allow(clippy::unwrap_used)]

use corner_shop_core::ProductId;
use corner_shop_integration_tests::{TestDatabase, item};

#[tokio::test]
async fn test_concurrent_adds_of_one_id_admit_exactly_one() {
    let db = TestDatabase::new().unwrap();
    let store = db.open().await.unwrap();
    let first = item("p1", "Widget", 999, "w.png");
    let second = item("p1", "Widget", 999, "w.png");

    let (a, b) = tokio::join!(store.add_item(&first), store.add_item(&second));

    assert!(a.is_ok() ^ b.is_ok());
    let err = a.err().or(b.err()).unwrap();
    assert!(err.is_duplicate());
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_concurrent_adds_from_spawned_tasks() {
    let db = TestDatabase::new().unwrap();
    let store = db.open().await.unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.add_item(&item("shared", "S", 100, "s.png")).await })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => successes += 1,
            Err(e) => assert!(e.is_duplicate()),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_two_stores_on_one_file_admit_exactly_one() {
    let db = TestDatabase::new().unwrap();
    let first = db.open().await.unwrap();
    let second = db.open().await.unwrap();

    for round in 0..10 {
        let id = format!("r{round}");
        let handles: Vec<_> = (0..6)
            .map(|n| {
                let store = (if n % 2 == 0 { &first } else { &second }).clone();
                let cart_item = item(&id, "Shared", 100, "s.png");
                tokio::spawn(async move { store.add_item(&cart_item).await })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => successes += 1,
                Err(e) => assert!(e.is_duplicate(), "expected a duplicate, got {e}"),
            }
        }
        assert_eq!(successes, 1, "round {round}");
    }

    assert_eq!(first.count().await.unwrap(), 10);
    assert_eq!(second.count().await.unwrap(), 10);
}

#[tokio::test]
async fn test_two_stores_on_one_file_keep_distinct_adds() {
    let db = TestDatabase::new().unwrap();
    let first = db.open().await.unwrap();
    let second = db.open().await.unwrap();

    let handles: Vec<_> = (0..12)
        .map(|n| {
            let store = (if n % 2 == 0 { &first } else { &second }).clone();
            tokio::spawn(async move {
                store
                    .add_item(&item(&format!("p{n}"), "P", 100, "p.png"))
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(first.count().await.unwrap(), 12);
}

#[tokio::test]
async fn test_concurrent_distinct_adds_all_land() {
    let db = TestDatabase::new().unwrap();
    let store = db.open().await.unwrap();

    let handles: Vec<_> = (0..10)
        .map(|n| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .add_item(&item(&format!("p{n}"), "P", 100, "p.png"))
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(store.count().await.unwrap(), 10);
    assert_eq!(store.list_all().await.unwrap().len(), 10);
}

#[tokio::test]
async fn test_one_completion_signal_per_committed_write() {
    let db = TestDatabase::new().unwrap();
    let store = db.open().await.unwrap();
    let mut completions = store.subscribe_completions();

    store.add_item(&item("p1", "Widget", 999, "w.png")).await.unwrap();
    store.remove_item(&ProductId::from("p1")).await.unwrap();

    let first = completions.recv().await.unwrap();
    let second = completions.recv().await.unwrap();
    assert_eq!(first.collection, "cart_items");
    assert_ne!(first.transaction_id, second.transaction_id);
    assert!(completions.try_recv().is_err());
}
