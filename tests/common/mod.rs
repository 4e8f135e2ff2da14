use std::sync::Arc;

use chainfolio_core::db::{self, DbPool};
use tempfile::TempDir;

/// Builds a fresh migrated database in a temp directory.
///
/// The returned TempDir must stay alive for the duration of the test; the
/// database file is deleted with it.
pub fn setup_pool() -> (Arc<DbPool>, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let db_path =
        db::init(dir.path().to_str().unwrap()).expect("Failed to initialize database");
    let pool = db::create_pool(&db_path).expect("Failed to create database pool");
    db::run_migrations(&pool).expect("Failed to run migrations");
    (pool, dir)
}
