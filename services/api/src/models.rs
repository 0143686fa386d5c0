//! Domain records and API payloads

use serde::Deserialize;

pub mod appointment;
pub mod user;

pub use appointment::{
    Appointment, AppointmentChanges, AppointmentId, AppointmentStatus, AppointmentWithOwner,
    NewAppointment,
};
pub use user::{NewUser, User, UserId};

/// Field an appointment listing is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Date,
    Status,
    Description,
    /// Owner name; only meaningful when listing across users
    Name,
}

impl SortField {
    /// Parse a `sortBy` value, case-insensitively. Unknown values sort by date.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "status" => Self::Status,
            "description" => Self::Description,
            "name" => Self::Name,
            _ => Self::Date,
        }
    }

    /// The field to use when every row shares one owner
    pub fn for_single_owner(self) -> Self {
        match self {
            Self::Name => Self::Date,
            other => other,
        }
    }
}

/// Sorting parameters accepted by the listing endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub sort_by: Option<String>,
    pub ascending: Option<bool>,
}

impl ListQuery {
    pub fn sort_field(&self) -> SortField {
        self.sort_by
            .as_deref()
            .map(SortField::parse)
            .unwrap_or_default()
    }

    pub fn ascending(&self) -> bool {
        self.ascending.unwrap_or(true)
    }
}

/// Query parameters for listing one user's appointments
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAppointmentsQuery {
    pub user_id: UserId,
    pub sort_by: Option<String>,
    pub ascending: Option<bool>,
}

impl UserAppointmentsQuery {
    pub fn list(&self) -> ListQuery {
        ListQuery {
            sort_by: self.sort_by.clone(),
            ascending: self.ascending,
        }
    }
}

/// Query parameter addressing a single appointment
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentIdQuery {
    pub appointment_id: AppointmentId,
}
