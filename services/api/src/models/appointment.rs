//! Appointment model and lifecycle status

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserId;

/// Repository-assigned appointment identifier
pub type AppointmentId = i64;

/// Maximum length of an appointment description, in characters
pub const MAX_DESCRIPTION_LENGTH: usize = 250;

/// Lifecycle state of an appointment
///
/// Declaration order is lifecycle order; sorting by status follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Pending,
    Approved,
    Canceled,
}

impl AppointmentStatus {
    /// Ordinal stored in the `appointments.status` column
    pub fn as_i16(self) -> i16 {
        match self {
            Self::Pending => 0,
            Self::Approved => 1,
            Self::Canceled => 2,
        }
    }

    pub fn from_i16(value: i16) -> Option<Self> {
        match value {
            0 => Some(Self::Pending),
            1 => Some(Self::Approved),
            2 => Some(Self::Canceled),
            _ => None,
        }
    }
}

/// Appointment entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: AppointmentId,
    pub user_id: UserId,
    pub description: String,
    pub date: DateTime<Utc>,
    pub status: AppointmentStatus,
}

/// Appointment joined with its owner's display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentWithOwner {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub user_name: String,
}

/// New appointment creation payload; the status is always `Pending`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub user_id: UserId,
    pub description: String,
    pub date: DateTime<Utc>,
}

/// Appointment update payload
///
/// `user_id` must match the stored owner; only `description` and `date`
/// are applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentChanges {
    #[serde(alias = "appointmentId")]
    pub id: AppointmentId,
    pub user_id: UserId,
    pub description: String,
    pub date: DateTime<Utc>,
}
