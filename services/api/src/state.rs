//! Application state shared across handlers

use sqlx::PgPool;

use crate::services::{AppointmentService, UserService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Present when records live in PostgreSQL; probed by `/health`
    pub db_pool: Option<PgPool>,
    pub appointment_service: AppointmentService,
    pub user_service: UserService,
}
