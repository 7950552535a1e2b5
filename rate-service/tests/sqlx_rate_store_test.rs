use sqlx::Row;
use uuid::Uuid;

use rate_service::db::{Backend, Db};
use rate_service::market::types::Rate;
use rate_service::storage::{RateStore, SqlxRateStore};

/// Isolated in-memory DB per test.
/// `cache=shared` lets every connection in the pool see the same database.
async fn setup_db() -> Db {
    let db_name = Uuid::new_v4().to_string();
    let db = Db::connect(&format!("sqlite:file:{db_name}?mode=memory&cache=shared"))
        .await
        .expect("connect sqlite memory db");

    sqlx::query(
        r#"
CREATE TABLE IF NOT EXISTS rates (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  ask REAL NOT NULL,
  bid REAL NOT NULL,
  timestamp TEXT NOT NULL
);
"#,
    )
    .execute(&db.pool)
    .await
    .expect("create rates table");

    db
}

async fn count_rows(db: &Db) -> i64 {
    sqlx::query("SELECT COUNT(*) AS n FROM rates;")
        .fetch_one(&db.pool)
        .await
        .unwrap()
        .get::<i64, _>("n")
}

const RATE: Rate = Rate {
    ask: 100.5,
    bid: 99.5,
    timestamp: 1_717_171_717,
};

#[tokio::test]
async fn save_rate_inserts_one_row() {
    let db = setup_db().await;
    assert_eq!(db.backend, Backend::Sqlite);
    let store = SqlxRateStore::new(&db);

    store.save_rate(&RATE).await.unwrap();

    let row = sqlx::query(
        r#"
SELECT ask, bid, timestamp AS ts_text,
       CAST(strftime('%s', timestamp) AS INTEGER) AS ts
FROM rates;
"#,
    )
    .fetch_one(&db.pool)
    .await
    .unwrap();

    assert_eq!(row.get::<f64, _>("ask"), 100.5);
    assert_eq!(row.get::<f64, _>("bid"), 99.5);
    assert_eq!(row.get::<i64, _>("ts"), RATE.timestamp);
    assert_eq!(row.get::<String, _>("ts_text"), "2024-05-31 16:08:37");
}

#[tokio::test]
async fn repeated_saves_are_not_deduplicated() {
    let db = setup_db().await;
    let store = SqlxRateStore::new(&db);

    store.save_rate(&RATE).await.unwrap();
    store.save_rate(&RATE).await.unwrap();

    assert_eq!(count_rows(&db).await, 2);
}

#[tokio::test]
async fn missing_table_surfaces_database_error() {
    let db_name = Uuid::new_v4().to_string();
    let db = Db::connect(&format!("sqlite:file:{db_name}?mode=memory&cache=shared"))
        .await
        .unwrap();
    let store = SqlxRateStore::new(&db);

    let err = store.save_rate(&RATE).await.unwrap_err();

    assert!(err.to_string().contains("no such table"), "{err}");
}

#[tokio::test]
async fn save_after_close_fails() {
    let db = setup_db().await;
    let store = SqlxRateStore::new(&db);

    store.close().await;

    let err = store.save_rate(&RATE).await.unwrap_err();
    assert!(matches!(err.0, sqlx::Error::PoolClosed));
}

#[tokio::test]
async fn unsupported_url_is_rejected_before_connecting() {
    let res = Db::connect("mysql://localhost/rates").await;
    assert!(res.is_err());
}
