use std::path::Path;

use migration::Migrator;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory db");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Connects to a sqlite file at `path` with a pool of at most `max_connections`
/// and applies migrations. Use when a test needs several connections to see the
/// same data, e.g. to hold a lock from one of them.
pub async fn setup_file_test_db(path: &Path, max_connections: u32) -> DatabaseConnection {
    let db = connect_file(path, max_connections).await;

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Opens another pool on an existing sqlite file without touching its schema.
pub async fn connect_file(path: &Path, max_connections: u32) -> DatabaseConnection {
    let mut opts = ConnectOptions::new(format!("sqlite://{}?mode=rwc", path.display()));
    opts.max_connections(max_connections)
        .min_connections(1)
        .sqlx_logging(false);

    Database::connect(opts)
        .await
        .expect("Failed to connect to file-backed db")
}
