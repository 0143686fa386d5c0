//! Business rules for users and appointments

use std::sync::Arc;

use crate::clock::Clock;
use crate::error::{ServiceError, ServiceResult};
use crate::repositories::Repository;

pub mod appointment;
pub mod user;

pub use appointment::AppointmentService;
pub use user::UserService;

/// Reject blank text and text longer than `max_chars` characters
fn validate_text(field: &str, value: &str, max_chars: usize) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::validation(format!("{} cannot be empty", field)));
    }

    if value.chars().count() > max_chars {
        return Err(ServiceError::validation(format!(
            "{} must be at most {} characters long",
            field, max_chars
        )));
    }

    Ok(())
}

/// Both services wired to the same repository and clock
#[derive(Clone)]
pub struct Services {
    pub appointments: AppointmentService,
    pub users: UserService,
}

impl Services {
    pub fn new(repository: Arc<dyn Repository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            appointments: AppointmentService::new(repository.clone(), clock),
            users: UserService::new(repository),
        }
    }
}
