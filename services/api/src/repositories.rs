//! Persistence port for users and appointments
//!
//! Services only talk to [`Repository`]; `postgres` and `memory` provide
//! the concrete stores.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    Appointment, AppointmentId, AppointmentWithOwner, NewAppointment, NewUser, SortField, User,
    UserId,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

/// Errors raised by repository adapters
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// A user with this name already exists
    #[error("Duplicate user name: {0}")]
    DuplicateName(String),

    /// A stored row could not be mapped to a domain record
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// The appointment was removed between being read and being written
    #[error("Appointment {0} no longer exists")]
    AppointmentGone(AppointmentId),

    /// Error returned by the database driver
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    /// The backing store cannot serve requests
    #[error("Repository unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                Self::Unavailable(err.to_string())
            }
            other => Self::Database(other),
        }
    }
}

/// Type alias for repository results
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// CRUD and sorted queries over users and appointments
#[async_trait]
pub trait Repository: Send + Sync {
    /// Find a user by ID
    async fn find_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;

    /// Insert a user and return it with its assigned ID
    ///
    /// Fails with [`RepositoryError::DuplicateName`] when the name is taken.
    async fn insert_user(&self, user: &NewUser) -> RepositoryResult<User>;

    /// Get all users
    async fn list_all_users(&self) -> RepositoryResult<Vec<User>>;

    /// Find an appointment by ID
    async fn find_appointment_by_id(
        &self,
        id: AppointmentId,
    ) -> RepositoryResult<Option<Appointment>>;

    /// Get the appointments owned by a user, ordered by `sort_by`
    async fn list_appointments_by_user(
        &self,
        user_id: UserId,
        sort_by: SortField,
        ascending: bool,
    ) -> RepositoryResult<Vec<Appointment>>;

    /// Get every appointment together with its owner's name
    async fn list_all_appointments(
        &self,
        sort_by: SortField,
        ascending: bool,
    ) -> RepositoryResult<Vec<AppointmentWithOwner>>;

    /// Insert an appointment with status `Pending` and return it with its assigned ID
    async fn insert_appointment(&self, appointment: &NewAppointment)
    -> RepositoryResult<Appointment>;

    /// Replace the description, date and status of a stored appointment
    ///
    /// Fails with [`RepositoryError::AppointmentGone`] when no row has that ID.
    async fn update_appointment(&self, appointment: &Appointment) -> RepositoryResult<()>;

    /// Delete an appointment
    async fn delete_appointment(&self, appointment: &Appointment) -> RepositoryResult<()>;
}
