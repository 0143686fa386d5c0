//! In-process repository
//!
//! Keeps both tables behind one `RwLock`; each trait call takes the lock
//! once, so name uniqueness is checked and enforced atomically.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Repository, RepositoryError, RepositoryResult};
use crate::models::{
    Appointment, AppointmentId, AppointmentStatus, AppointmentWithOwner, NewAppointment, NewUser,
    SortField, User, UserId,
};

#[derive(Debug, Default)]
struct Store {
    users: BTreeMap<UserId, User>,
    appointments: BTreeMap<AppointmentId, Appointment>,
    last_user_id: UserId,
    last_appointment_id: AppointmentId,
}

/// Repository holding all records in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    store: Arc<RwLock<Store>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare(
    a: &Appointment,
    b: &Appointment,
    a_owner: &str,
    b_owner: &str,
    sort_by: SortField,
    ascending: bool,
) -> Ordering {
    let primary = match sort_by {
        SortField::Date => a.date.cmp(&b.date),
        SortField::Status => a.status.cmp(&b.status),
        SortField::Description => a.description.cmp(&b.description),
        SortField::Name => a_owner.cmp(b_owner),
    };
    let primary = if ascending { primary } else { primary.reverse() };

    primary.then_with(|| a.id.cmp(&b.id))
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn find_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>> {
        let store = self.store.read().await;
        Ok(store.users.get(&id).cloned())
    }

    async fn insert_user(&self, user: &NewUser) -> RepositoryResult<User> {
        let mut store = self.store.write().await;

        if store.users.values().any(|existing| existing.name == user.name) {
            return Err(RepositoryError::DuplicateName(user.name.clone()));
        }

        store.last_user_id += 1;
        let created = User {
            id: store.last_user_id,
            name: user.name.clone(),
        };
        store.users.insert(created.id, created.clone());

        Ok(created)
    }

    async fn list_all_users(&self) -> RepositoryResult<Vec<User>> {
        let store = self.store.read().await;
        Ok(store.users.values().cloned().collect())
    }

    async fn find_appointment_by_id(
        &self,
        id: AppointmentId,
    ) -> RepositoryResult<Option<Appointment>> {
        let store = self.store.read().await;
        Ok(store.appointments.get(&id).cloned())
    }

    async fn list_appointments_by_user(
        &self,
        user_id: UserId,
        sort_by: SortField,
        ascending: bool,
    ) -> RepositoryResult<Vec<Appointment>> {
        let store = self.store.read().await;
        let sort_by = sort_by.for_single_owner();

        let mut appointments: Vec<Appointment> = store
            .appointments
            .values()
            .filter(|appointment| appointment.user_id == user_id)
            .cloned()
            .collect();
        appointments.sort_by(|a, b| compare(a, b, "", "", sort_by, ascending));

        Ok(appointments)
    }

    async fn list_all_appointments(
        &self,
        sort_by: SortField,
        ascending: bool,
    ) -> RepositoryResult<Vec<AppointmentWithOwner>> {
        let store = self.store.read().await;

        let mut rows = store
            .appointments
            .values()
            .map(|appointment| -> RepositoryResult<AppointmentWithOwner> {
                let owner = store.users.get(&appointment.user_id).ok_or_else(|| {
                    RepositoryError::InvalidRecord(format!(
                        "appointment {} references missing user {}",
                        appointment.id, appointment.user_id
                    ))
                })?;
                Ok(AppointmentWithOwner {
                    appointment: appointment.clone(),
                    user_name: owner.name.clone(),
                })
            })
            .collect::<RepositoryResult<Vec<_>>>()?;

        rows.sort_by(|a, b| {
            compare(
                &a.appointment,
                &b.appointment,
                &a.user_name,
                &b.user_name,
                sort_by,
                ascending,
            )
        });

        Ok(rows)
    }

    async fn insert_appointment(
        &self,
        appointment: &NewAppointment,
    ) -> RepositoryResult<Appointment> {
        let mut store = self.store.write().await;

        if !store.users.contains_key(&appointment.user_id) {
            return Err(RepositoryError::InvalidRecord(format!(
                "user {} does not exist",
                appointment.user_id
            )));
        }

        store.last_appointment_id += 1;
        let created = Appointment {
            id: store.last_appointment_id,
            user_id: appointment.user_id,
            description: appointment.description.clone(),
            date: appointment.date,
            status: AppointmentStatus::Pending,
        };
        store.appointments.insert(created.id, created.clone());

        Ok(created)
    }

    async fn update_appointment(&self, appointment: &Appointment) -> RepositoryResult<()> {
        let mut store = self.store.write().await;

        let stored = store
            .appointments
            .get_mut(&appointment.id)
            .ok_or(RepositoryError::AppointmentGone(appointment.id))?;

        stored.description = appointment.description.clone();
        stored.date = appointment.date;
        stored.status = appointment.status;

        Ok(())
    }

    async fn delete_appointment(&self, appointment: &Appointment) -> RepositoryResult<()> {
        let mut store = self.store.write().await;
        store.appointments.remove(&appointment.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};

    fn at(hours: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_900_000_000, 0).unwrap() + Duration::hours(hours)
    }

    async fn seed() -> (MemoryRepository, User, User) {
        let repo = MemoryRepository::new();
        let bob = repo
            .insert_user(&NewUser {
                name: "Bob".to_string(),
            })
            .await
            .unwrap();
        let alice = repo
            .insert_user(&NewUser {
                name: "Alice".to_string(),
            })
            .await
            .unwrap();
        (repo, bob, alice)
    }

    async fn add(repo: &MemoryRepository, user_id: UserId, description: &str, hours: i64) -> Appointment {
        repo.insert_appointment(&NewAppointment {
            user_id,
            description: description.to_string(),
            date: at(hours),
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_insert_user_assigns_sequential_ids() {
        let (repo, bob, alice) = seed().await;
        assert_eq!(bob.id, 1);
        assert_eq!(alice.id, 2);
        assert_eq!(repo.list_all_users().await.unwrap().len(), 2);
        assert_eq!(repo.find_user_by_id(2).await.unwrap(), Some(alice));
        assert_eq!(repo.find_user_by_id(9).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_insert_user_rejects_duplicate_name() {
        let (repo, _, _) = seed().await;
        let result = repo
            .insert_user(&NewUser {
                name: "Bob".to_string(),
            })
            .await;
        assert!(matches!(result, Err(RepositoryError::DuplicateName(name)) if name == "Bob"));
        assert_eq!(repo.list_all_users().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_insert_appointment_forces_pending() {
        let (repo, bob, _) = seed().await;
        let created = add(&repo, bob.id, "Dentist", 1).await;
        assert_eq!(created.id, 1);
        assert_eq!(created.status, AppointmentStatus::Pending);
        assert_eq!(repo.find_appointment_by_id(1).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn test_list_by_user_sorting() {
        let (repo, bob, alice) = seed().await;
        add(&repo, bob.id, "b-late", 5).await;
        add(&repo, bob.id, "a-early", 1).await;
        add(&repo, alice.id, "other", 3).await;

        let ascending = repo
            .list_appointments_by_user(bob.id, SortField::Date, true)
            .await
            .unwrap();
        let descriptions: Vec<_> = ascending.iter().map(|a| a.description.as_str()).collect();
        assert_eq!(descriptions, ["a-early", "b-late"]);

        let descending = repo
            .list_appointments_by_user(bob.id, SortField::Description, false)
            .await
            .unwrap();
        let descriptions: Vec<_> = descending.iter().map(|a| a.description.as_str()).collect();
        assert_eq!(descriptions, ["b-late", "a-early"]);

        assert!(
            repo.list_appointments_by_user(42, SortField::Date, true)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_list_all_sorts_by_owner_name_and_status() {
        let (repo, bob, alice) = seed().await;
        let first = add(&repo, bob.id, "bob's", 1).await;
        add(&repo, alice.id, "alice's", 2).await;

        let rows = repo
            .list_all_appointments(SortField::Name, true)
            .await
            .unwrap();
        let owners: Vec<_> = rows.iter().map(|r| r.user_name.as_str()).collect();
        assert_eq!(owners, ["Alice", "Bob"]);

        let mut canceled = first.clone();
        canceled.status = AppointmentStatus::Canceled;
        repo.update_appointment(&canceled).await.unwrap();

        let rows = repo
            .list_all_appointments(SortField::Status, false)
            .await
            .unwrap();
        assert_eq!(rows[0].appointment.status, AppointmentStatus::Canceled);
        assert_eq!(rows[1].appointment.status, AppointmentStatus::Pending);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (repo, bob, _) = seed().await;
        let mut appointment = add(&repo, bob.id, "Dentist", 1).await;

        appointment.description = "Orthodontist".to_string();
        appointment.date = at(10);
        repo.update_appointment(&appointment).await.unwrap();
        assert_eq!(
            repo.find_appointment_by_id(appointment.id).await.unwrap(),
            Some(appointment.clone())
        );

        repo.delete_appointment(&appointment).await.unwrap();
        assert_eq!(repo.find_appointment_by_id(appointment.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_of_deleted_appointment_fails() {
        let (repo, bob, _) = seed().await;
        let mut appointment = add(&repo, bob.id, "Dentist", 1).await;
        repo.delete_appointment(&appointment).await.unwrap();

        appointment.status = AppointmentStatus::Canceled;
        let result = repo.update_appointment(&appointment).await;
        assert!(matches!(result, Err(RepositoryError::AppointmentGone(id)) if id == appointment.id));
        assert_eq!(repo.find_appointment_by_id(appointment.id).await.unwrap(), None);
    }
}
