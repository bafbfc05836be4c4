//! Accepted changes survive a reopen; unaccepted ones do not

use tablewithaccept_core::application::TableState;
use tablewithaccept_integration_tests::{book_table, open_repository, seed, Book};
use uuid::Uuid;

struct TempDb {
    path: std::path::PathBuf,
}

impl TempDb {
    fn new() -> Self {
        let path = std::env::temp_dir().join(format!("tablewithaccept_{}.db", Uuid::new_v4()));
        Self { path }
    }

    fn url(&self) -> String {
        format!("sqlite://{}", self.path.display())
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", self.path.display(), suffix));
        }
    }
}

#[tokio::test]
async fn test_accepted_rows_survive_reopen() {
    let db = TempDb::new();

    {
        let repo = open_repository(&db.url()).await;
        seed(&repo, &[Book::new(1, "Dune", 2)]).await;
        let mut table = book_table(repo);
        table.update_list().await.unwrap();

        let added = table.add().unwrap();
        table.edit_row(added, |book| book.title = "Emma".to_string()).unwrap();
        assert!(table.accept().await.unwrap().is_committed());

        // Staged but never accepted
        table.add().unwrap();
        table.edit_row(0, |book| book.copies = 9).unwrap();
        assert_eq!(table.state(), TableState::Dirty);
    }

    let repo = open_repository(&db.url()).await;
    let mut table = book_table(repo);
    table.update_list().await.unwrap();

    let titles: Vec<String> = table.items().into_iter().map(|b| b.title).collect();
    assert_eq!(titles, vec!["Dune", "Emma"]);
    assert_eq!(table.row(0).unwrap().item().copies, 2);
}

#[tokio::test]
async fn test_collections_are_separate() {
    let db = TempDb::new();
    let books = open_repository(&db.url()).await;
    seed(&books, &[Book::new(1, "Dune", 2)]).await;

    let pool = tablewithaccept_infra_sqlite::create_pool(&db.url()).await.unwrap();
    let magazines =
        tablewithaccept_infra_sqlite::SqliteRepository::<Book>::new(pool, "magazines");

    assert_eq!(books.count().await.unwrap(), 1);
    assert_eq!(magazines.count().await.unwrap(), 0);
}
