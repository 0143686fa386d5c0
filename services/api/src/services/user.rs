//! User registry service

use std::sync::Arc;

use tracing::{info, warn};

use super::validate_text;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{NewUser, User, user::MAX_NAME_LENGTH};
use crate::repositories::{Repository, RepositoryError};

const NAME_TAKEN: &str = "User name already exists";

/// Enforces user-creation rules on top of the repository
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn Repository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }

    /// Create a user with a non-empty, unique name
    ///
    /// The service scans existing names first; the repository enforces the
    /// same constraint atomically, so concurrent creations cannot both win.
    pub async fn create(&self, user: NewUser) -> ServiceResult<User> {
        validate_text("User Name", &user.name, MAX_NAME_LENGTH)?;

        let existing = self.repository.list_all_users().await?;
        if existing.iter().any(|u| u.name == user.name) {
            warn!("Rejected duplicate user name: {}", user.name);
            return Err(ServiceError::validation(NAME_TAKEN));
        }

        let created = match self.repository.insert_user(&user).await {
            Ok(created) => created,
            Err(RepositoryError::DuplicateName(name)) => {
                warn!("Concurrent creation of user name: {}", name);
                return Err(ServiceError::validation(NAME_TAKEN));
            }
            Err(e) => return Err(e.into()),
        };

        info!(user_id = created.id, "Created user {}", created.name);
        Ok(created)
    }

    /// Get all users
    pub async fn list(&self) -> ServiceResult<Vec<User>> {
        Ok(self.repository.list_all_users().await?)
    }
}
