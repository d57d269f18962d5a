// Postgres storage layer with sqlx
//
// This crate provides the database implementation of the core Store trait:
// - Database: Store backed by a PgPool, with embedded migrations

pub mod database;
pub mod models;

pub use database::Database;
pub use models::*;
