//! Appointment lifecycle service
//!
//! Status transitions:
//!
//! ```text
//! Pending --approve--> Approved
//! Pending | Approved | Canceled --cancel--> Canceled
//! Canceled --delete--> (removed)
//! ```
//!
//! Only `Pending` appointments can be edited, approving a `Canceled`
//! appointment is rejected, and only `Canceled` appointments can be deleted.
//! Each operation reads the record, checks its preconditions, then writes;
//! the first failing check aborts before anything is persisted.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::validate_text;
use crate::clock::Clock;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{
    Appointment, AppointmentChanges, AppointmentId, AppointmentStatus, AppointmentWithOwner,
    NewAppointment, SortField, UserId, appointment::MAX_DESCRIPTION_LENGTH,
};
use crate::repositories::Repository;

/// Enforces appointment validation and status-transition rules
#[derive(Clone)]
pub struct AppointmentService {
    repository: Arc<dyn Repository>,
    clock: Arc<dyn Clock>,
}

impl AppointmentService {
    pub fn new(repository: Arc<dyn Repository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    fn ensure_future(&self, date: DateTime<Utc>) -> ServiceResult<()> {
        if date <= self.clock.utc() {
            return Err(ServiceError::validation(
                "Appointment date must be in the future.",
            ));
        }
        Ok(())
    }

    async fn load(&self, appointment_id: AppointmentId) -> ServiceResult<Appointment> {
        self.repository
            .find_appointment_by_id(appointment_id)
            .await?
            .ok_or_else(ServiceError::appointment_not_found)
    }

    /// Appointments owned by `user_id`; an empty list when there are none
    pub async fn list_for_user(
        &self,
        user_id: UserId,
        sort_by: SortField,
        ascending: bool,
    ) -> ServiceResult<Vec<Appointment>> {
        if user_id <= 0 {
            return Err(ServiceError::validation("Invalid User ID."));
        }

        Ok(self
            .repository
            .list_appointments_by_user(user_id, sort_by, ascending)
            .await?)
    }

    /// Appointments of every user, each with its owner's name
    pub async fn list_all(
        &self,
        sort_by: SortField,
        ascending: bool,
    ) -> ServiceResult<Vec<AppointmentWithOwner>> {
        Ok(self
            .repository
            .list_all_appointments(sort_by, ascending)
            .await?)
    }

    pub async fn get_by_id(&self, appointment_id: AppointmentId) -> ServiceResult<Appointment> {
        if appointment_id <= 0 {
            return Err(ServiceError::validation("Invalid Appointment ID."));
        }

        self.load(appointment_id).await
    }

    /// Create a `Pending` appointment for an existing user
    pub async fn create(&self, appointment: NewAppointment) -> ServiceResult<Appointment> {
        validate_text(
            "Description",
            &appointment.description,
            MAX_DESCRIPTION_LENGTH,
        )?;

        if self
            .repository
            .find_user_by_id(appointment.user_id)
            .await?
            .is_none()
        {
            debug!("Appointment requested for unknown user {}", appointment.user_id);
            return Err(ServiceError::user_not_found(appointment.user_id));
        }

        self.ensure_future(appointment.date)?;

        let created = self.repository.insert_appointment(&appointment).await?;
        info!(
            appointment_id = created.id,
            user_id = created.user_id,
            "Created appointment"
        );

        Ok(created)
    }

    /// Reschedule or redescribe a `Pending` appointment
    ///
    /// The owner and status of the stored record are never changed.
    pub async fn update(&self, changes: AppointmentChanges) -> ServiceResult<Appointment> {
        validate_text("Description", &changes.description, MAX_DESCRIPTION_LENGTH)?;

        let mut existing = self.load(changes.id).await?;

        if existing.user_id != changes.user_id {
            warn!(
                appointment_id = existing.id,
                owner = existing.user_id,
                caller = changes.user_id,
                "Rejected update of another user's appointment"
            );
            return Err(ServiceError::forbidden());
        }

        if existing.status != AppointmentStatus::Pending {
            return Err(ServiceError::not_pending());
        }

        self.ensure_future(changes.date)?;

        existing.date = changes.date;
        existing.description = changes.description;
        self.repository.update_appointment(&existing).await?;
        info!(appointment_id = existing.id, "Updated appointment");

        Ok(existing)
    }

    /// Permanently remove a `Canceled` appointment
    pub async fn delete(&self, appointment_id: AppointmentId) -> ServiceResult<()> {
        let existing = self.load(appointment_id).await?;

        if existing.status != AppointmentStatus::Canceled {
            return Err(ServiceError::not_canceled());
        }

        self.repository.delete_appointment(&existing).await?;
        info!(appointment_id, "Deleted appointment");

        Ok(())
    }

    pub async fn approve(&self, appointment_id: AppointmentId) -> ServiceResult<Appointment> {
        let mut existing = self.load(appointment_id).await?;

        if existing.status == AppointmentStatus::Canceled {
            return Err(ServiceError::canceled());
        }

        existing.status = AppointmentStatus::Approved;
        self.repository.update_appointment(&existing).await?;
        info!(appointment_id, "Approved appointment");

        Ok(existing)
    }

    /// Cancel from any status; canceling twice is not an error
    pub async fn cancel(&self, appointment_id: AppointmentId) -> ServiceResult<Appointment> {
        let mut existing = self.load(appointment_id).await?;

        existing.status = AppointmentStatus::Canceled;
        self.repository.update_appointment(&existing).await?;
        info!(appointment_id, "Canceled appointment");

        Ok(existing)
    }
}
