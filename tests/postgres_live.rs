//! Tests against a real PostgreSQL server.
//!
//! Ignored by default. Run with the `DB_*` variables pointing at a scratch
//! database:
//!
//! ```bash
//! DB_HOST=localhost DB_PORT=5432 DB_USERNAME=postgres DB_PASSWORD=postgres \
//!     DB_DATABASE=postgres cargo test --test postgres_live -- --ignored
//! ```

use sqlx::Row;

use pg_facade::args;
use pg_facade::config::Settings;
use pg_facade::database::{self, DatabaseError, Service};

async fn connect() -> database::PgService {
    let settings = Settings::new().expect("settings should load");
    database::connect(&settings.db)
        .await
        .expect("pool should open")
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL server"]
async fn test_health_against_live_database() {
    let service = connect().await;

    let payload = service.health().await.unwrap();
    assert_eq!(payload["message"], "It's healthy");

    service.close().await.unwrap();
    assert!(service.ping().await.is_err());
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL server"]
async fn test_query_exec_and_transaction() {
    let service = connect().await;

    service
        .exec(
            "CREATE TABLE IF NOT EXISTS facade_items (id BIGINT PRIMARY KEY, name TEXT)",
            &[],
        )
        .await
        .unwrap();
    service.exec("DELETE FROM facade_items", &[]).await.unwrap();

    let result = service
        .exec(
            "INSERT INTO facade_items (id, name) VALUES ($1, $2)",
            &args![1_i64, "first"],
        )
        .await
        .unwrap();
    assert_eq!(result.rows_affected(), 1);

    let rows = service
        .query("SELECT $1::BIGINT + 1 AS next", &args![41_i64])
        .await
        .unwrap();
    assert_eq!(rows[0].get::<i64, _>("next"), 42);

    let mut tx = service.begin().await.unwrap();
    sqlx::query("SELECT 1").execute(&mut *tx).await.unwrap();
    tx.rollback().await.unwrap();

    let result = service.query("SELECT * FROM no_such_table", &[]).await;
    assert!(matches!(result, Err(DatabaseError::Sqlx(_))));

    service.exec("DROP TABLE facade_items", &[]).await.unwrap();
    service.close().await.unwrap();
}
