//! A shared table used from several tasks

use std::sync::Arc;
use tablewithaccept_core::application::TableState;
use tablewithaccept_integration_tests::{book_table, open_repository};

#[tokio::test]
async fn test_concurrent_adds_commit_once_each() {
    let repo = open_repository("sqlite::memory:").await;
    let table = book_table(repo.clone()).into_shared();

    let mut handles = Vec::new();
    for i in 0..8 {
        let table = Arc::clone(&table);
        handles.push(tokio::spawn(async move {
            let mut table = table.lock().await;
            let index = table.add().unwrap();
            table
                .edit_row(index, |book| book.title = format!("Volume {}", i))
                .unwrap();
            table.accept().await.unwrap().is_committed()
        }));
    }

    for handle in handles {
        assert!(handle.await.unwrap());
    }

    let table = table.lock().await;
    assert_eq!(repo.count().await.unwrap(), 8);
    assert_eq!(table.len(), 8);
    assert_eq!(table.state(), TableState::Clean);
}
