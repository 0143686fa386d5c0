//! Infrastructure errors for the appointments database
//!
//! Raised while configuring, connecting to or migrating PostgreSQL; the
//! service crate wraps them at its startup boundary.

use sqlx::Error as SqlxError;
use sqlx::migrate::MigrateError;
use thiserror::Error;

/// Failure to bring up or probe the appointments database
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// The pool could not open a connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// The connectivity probe query failed
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Applying the bundled users/appointments schema failed
    #[error("Database migration error: {0}")]
    Migration(#[source] MigrateError),

    /// `DATABASE_URL` or a pool setting is unusable
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Result of a `common::database` call
pub type DatabaseResult<T> = Result<T, DatabaseError>;
