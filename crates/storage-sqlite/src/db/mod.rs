//! Database connection management: pool creation, per-connection PRAGMAs,
//! embedded migrations, and the single-writer actor.

pub mod write_actor;

use std::path::Path;
use std::sync::Arc;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::info;

use carhub_core::errors::{DatabaseError, Result};

use crate::errors::StorageError;

pub use write_actor::{spawn_writer, WriteHandle};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Connection-level PRAGMAs applied to every pooled connection: foreign keys
/// must be on for the cars -> items cascade, WAL and a busy timeout let the
/// readers coexist with the single writer.
#[derive(Debug)]
struct ConnectionOptions;

impl r2d2::CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(
        &self,
        conn: &mut SqliteConnection,
    ) -> std::result::Result<(), diesel::r2d2::Error> {
        conn.batch_execute(
            "PRAGMA foreign_keys = ON; PRAGMA journal_mode = WAL; PRAGMA busy_timeout = 5000;",
        )
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Resolves the database file location, creating its parent directory when
/// missing, and returns the path actually in use.
pub fn init(db_path: &str) -> Result<String> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;
        }
    }
    Ok(db_path.to_string())
}

/// Creates the r2d2 connection pool for the given database file.
pub fn create_pool(db_path: &str) -> Result<Arc<DbPool>> {
    let manager = ConnectionManager::<SqliteConnection>::new(db_path);
    let pool = Pool::builder()
        .connection_customizer(Box::new(ConnectionOptions))
        .build(manager)
        .map_err(StorageError::from)?;
    Ok(Arc::new(pool))
}

/// Checks out a connection from the pool.
pub fn get_connection(pool: &Arc<DbPool>) -> Result<DbConnection> {
    Ok(pool.get().map_err(StorageError::from)?)
}

/// Applies all pending embedded migrations.
pub fn run_migrations(pool: &Arc<DbPool>) -> Result<()> {
    let mut conn = get_connection(pool)?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
    info!("Database migrations are up to date");
    Ok(())
}
