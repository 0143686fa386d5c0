//! PostgreSQL repository

use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::debug;

use super::{Repository, RepositoryError, RepositoryResult};
use crate::models::{
    Appointment, AppointmentId, AppointmentStatus, AppointmentWithOwner, NewAppointment, NewUser,
    SortField, User, UserId,
};

/// Repository backed by the `users` and `appointments` tables
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    /// Create a new PostgreSQL repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `ORDER BY` clause for an appointment listing, with `a` aliasing
/// `appointments` and `u` aliasing `users`
fn order_clause(sort_by: SortField, ascending: bool) -> String {
    let column = match sort_by {
        SortField::Date => "a.date",
        SortField::Status => "a.status",
        SortField::Description => "a.description",
        SortField::Name => "u.name",
    };
    let direction = if ascending { "ASC" } else { "DESC" };

    format!("ORDER BY {} {}, a.id ASC", column, direction)
}

fn map_appointment(row: &PgRow) -> RepositoryResult<Appointment> {
    let raw_status: i16 = row.try_get("status")?;
    let status = AppointmentStatus::from_i16(raw_status).ok_or_else(|| {
        RepositoryError::InvalidRecord(format!("unknown appointment status {}", raw_status))
    })?;

    Ok(Appointment {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        description: row.try_get("description")?,
        date: row.try_get("date")?,
        status,
    })
}

#[async_trait]
impl Repository for PgRepository {
    async fn find_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, name
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| User {
            id: row.get("id"),
            name: row.get("name"),
        }))
    }

    async fn insert_user(&self, user: &NewUser) -> RepositoryResult<User> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (name)
            VALUES ($1)
            RETURNING id, name
            "#,
        )
        .bind(&user.name)
        .fetch_one(&self.pool)
        .await;

        let row = match result {
            Ok(row) => row,
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                return Err(RepositoryError::DuplicateName(user.name.clone()));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(User {
            id: row.get("id"),
            name: row.get("name"),
        })
    }

    async fn list_all_users(&self) -> RepositoryResult<Vec<User>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let users = rows
            .into_iter()
            .map(|row| User {
                id: row.get("id"),
                name: row.get("name"),
            })
            .collect();

        Ok(users)
    }

    async fn find_appointment_by_id(
        &self,
        id: AppointmentId,
    ) -> RepositoryResult<Option<Appointment>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, description, date, status
            FROM appointments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_appointment).transpose()
    }

    async fn list_appointments_by_user(
        &self,
        user_id: UserId,
        sort_by: SortField,
        ascending: bool,
    ) -> RepositoryResult<Vec<Appointment>> {
        let sql = format!(
            r#"
            SELECT a.id, a.user_id, a.description, a.date, a.status
            FROM appointments a
            WHERE a.user_id = $1
            {}
            "#,
            order_clause(sort_by.for_single_owner(), ascending)
        );
        debug!(user_id, ?sort_by, ascending, "Listing appointments for user");

        let rows = sqlx::query(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(map_appointment).collect()
    }

    async fn list_all_appointments(
        &self,
        sort_by: SortField,
        ascending: bool,
    ) -> RepositoryResult<Vec<AppointmentWithOwner>> {
        let sql = format!(
            r#"
            SELECT a.id, a.user_id, a.description, a.date, a.status, u.name AS user_name
            FROM appointments a
            JOIN users u ON u.id = a.user_id
            {}
            "#,
            order_clause(sort_by, ascending)
        );

        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| -> RepositoryResult<AppointmentWithOwner> {
                Ok(AppointmentWithOwner {
                    appointment: map_appointment(row)?,
                    user_name: row.try_get("user_name")?,
                })
            })
            .collect()
    }

    async fn insert_appointment(
        &self,
        appointment: &NewAppointment,
    ) -> RepositoryResult<Appointment> {
        let row = sqlx::query(
            r#"
            INSERT INTO appointments (user_id, description, date, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, description, date, status
            "#,
        )
        .bind(appointment.user_id)
        .bind(&appointment.description)
        .bind(appointment.date)
        .bind(AppointmentStatus::Pending.as_i16())
        .fetch_one(&self.pool)
        .await?;

        map_appointment(&row)
    }

    async fn update_appointment(&self, appointment: &Appointment) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE appointments
            SET description = $2, date = $3, status = $4
            WHERE id = $1
            "#,
        )
        .bind(appointment.id)
        .bind(&appointment.description)
        .bind(appointment.date)
        .bind(appointment.status.as_i16())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::AppointmentGone(appointment.id));
        }

        Ok(())
    }

    async fn delete_appointment(&self, appointment: &Appointment) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            DELETE FROM appointments
            WHERE id = $1
            "#,
        )
        .bind(appointment.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_clause_columns() {
        assert_eq!(
            order_clause(SortField::Date, true),
            "ORDER BY a.date ASC, a.id ASC"
        );
        assert_eq!(
            order_clause(SortField::Status, false),
            "ORDER BY a.status DESC, a.id ASC"
        );
        assert_eq!(
            order_clause(SortField::Description, true),
            "ORDER BY a.description ASC, a.id ASC"
        );
        assert_eq!(
            order_clause(SortField::Name, false),
            "ORDER BY u.name DESC, a.id ASC"
        );
    }
}
