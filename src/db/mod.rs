//! Database layer
//!
//! This module provides database abstraction for the Inkdex blog platform.
//! It supports:
//! - SQLite (default, for single-binary deployment)
//! - MySQL (for larger deployments)
//!
//! The database driver is selected based on configuration. A trait-based
//! abstraction (`DatabasePool`) lets the repositories work with either
//! backend without knowing which one is configured.

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{
    create_pool, create_test_pool, DatabasePool, DynDatabasePool, MysqlDatabase, SqliteDatabase,
};
