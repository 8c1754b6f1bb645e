//! Persistence layer: PostgreSQL storage for events, venues and links.
//!
//! [`EventStore`] wraps a `sqlx::PgPool`. Every event read and write is
//! scoped by the owning user's id; venues are shared.

pub mod models;
pub mod postgres;

pub use postgres::EventStore;

/// Embedded schema migrations from `migrations/`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
