//! SQLite storage implementation for Carhub.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements the repository traits defined in `carhub-core`
//! and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for cars and their items
//! - Database-specific model types (with Diesel derives)
//!
//! This crate is the only place in the application where Diesel dependencies
//! exist; `carhub-core` is database-agnostic and works with traits.

pub mod cars;
pub mod db;
pub mod errors;
pub mod schema;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors
pub use errors::StorageError;

// Re-export from carhub-core for convenience
pub use carhub_core::errors::{DatabaseError, Error, Result};
