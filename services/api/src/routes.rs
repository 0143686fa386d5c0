//! API service routes
//!
//! `/api/users/*` serves a user managing their own appointments,
//! `/api/manager/*` serves a manager acting across all users.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde_json::json;

use crate::{
    error::ApiResult,
    models::{
        AppointmentChanges, AppointmentId, AppointmentIdQuery, ListQuery, NewAppointment, NewUser,
        UserAppointmentsQuery,
    },
    state::AppState,
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let user_routes = Router::new()
        .route(
            "/appointments",
            get(list_user_appointments).post(create_appointment),
        )
        .route("/appointments/:id", get(get_appointment))
        .route(
            "/appointment",
            put(update_appointment).delete(delete_appointment),
        );

    let manager_routes = Router::new()
        .route("/appointments", get(list_all_appointments))
        .route("/appointment/approve", put(approve_appointment))
        .route("/appointment/cancel", put(cancel_appointment))
        .route("/user", post(create_user))
        .route("/users", get(list_users));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/users", user_routes)
        .nest("/api/manager", manager_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = match &state.db_pool {
        None => "not configured",
        Some(pool) => match common::database::health_check(pool).await {
            Ok(_) => "ok",
            Err(e) => {
                tracing::error!("Database health check failed: {}", e);
                "unavailable"
            }
        },
    };

    let (status, overall) = if database == "unavailable" {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    } else {
        (StatusCode::OK, "ok")
    };

    (
        status,
        Json(json!({
            "status": overall,
            "service": "appointments-api",
            "database": database,
        })),
    )
}

/// List the appointments of one user
pub async fn list_user_appointments(
    State(state): State<AppState>,
    Query(query): Query<UserAppointmentsQuery>,
) -> ApiResult<impl IntoResponse> {
    let list = query.list();
    let appointments = state
        .appointment_service
        .list_for_user(query.user_id, list.sort_field(), list.ascending())
        .await?;

    Ok(Json(appointments))
}

/// Create an appointment
pub async fn create_appointment(
    State(state): State<AppState>,
    Json(payload): Json<NewAppointment>,
) -> ApiResult<impl IntoResponse> {
    let appointment = state.appointment_service.create(payload).await?;

    Ok((StatusCode::CREATED, Json(appointment)))
}

/// Get an appointment by ID
pub async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<AppointmentId>,
) -> ApiResult<impl IntoResponse> {
    let appointment = state.appointment_service.get_by_id(id).await?;

    Ok(Json(appointment))
}

/// Update the date and description of a pending appointment
pub async fn update_appointment(
    State(state): State<AppState>,
    Json(payload): Json<AppointmentChanges>,
) -> ApiResult<impl IntoResponse> {
    state.appointment_service.update(payload).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a canceled appointment
pub async fn delete_appointment(
    State(state): State<AppState>,
    Query(query): Query<AppointmentIdQuery>,
) -> ApiResult<impl IntoResponse> {
    state
        .appointment_service
        .delete(query.appointment_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// List every appointment with its owner's name
pub async fn list_all_appointments(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<impl IntoResponse> {
    let appointments = state
        .appointment_service
        .list_all(query.sort_field(), query.ascending())
        .await?;

    Ok(Json(appointments))
}

/// Approve an appointment
pub async fn approve_appointment(
    State(state): State<AppState>,
    Query(query): Query<AppointmentIdQuery>,
) -> ApiResult<impl IntoResponse> {
    state
        .appointment_service
        .approve(query.appointment_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Cancel an appointment
pub async fn cancel_appointment(
    State(state): State<AppState>,
    Query(query): Query<AppointmentIdQuery>,
) -> ApiResult<impl IntoResponse> {
    state
        .appointment_service
        .cancel(query.appointment_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Create a new user
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<NewUser>,
) -> ApiResult<impl IntoResponse> {
    let user = state.user_service.create(payload).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Get all users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let users = state.user_service.list().await?;

    Ok(Json(users))
}
