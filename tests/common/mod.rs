//! Shared database fixture for integration tests.

use std::path::{Path, PathBuf};

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use storefront::db::{DbPool, establish_connection_pool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!(); // assumes migrations/ exists

/// A throwaway SQLite database, migrated and catalog-seeded, that removes
/// its files when dropped.
pub struct TestDb {
    path: PathBuf,
    pool: DbPool,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let path = PathBuf::from(format!("storefront-{name}.db"));
        std::fs::remove_file(&path).ok(); // Clean up old DB

        let database_url = path.to_str().expect("database path is valid UTF-8");
        let pool = establish_connection_pool(database_url)
            .expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");

        TestDb { path, pool }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        let base = self.path.display().to_string();
        std::fs::remove_file(&self.path).ok();
        std::fs::remove_file(format!("{base}-shm")).ok();
        std::fs::remove_file(format!("{base}-wal")).ok();
    }
}
