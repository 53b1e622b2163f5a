use async_trait::async_trait;
use std::sync::Mutex;
use time::OffsetDateTime;
use uuid::Uuid;

use super::user_repository::{RepositoryError, UserRepository};
use crate::models::{
    signup::RegisterPayload,
    user::{User, UserRole},
};

pub struct MockDb {
    pub find_user_result: Option<User>,
    pub email_taken: bool,
    pub should_fail: bool,
    pub created_users: Mutex<Vec<User>>,
}

impl Default for MockDb {
    fn default() -> Self {
        Self {
            find_user_result: None,
            email_taken: false,
            should_fail: false,
            created_users: Mutex::new(Vec::new()),
        }
    }
}

impl MockDb {
    fn fail_if_requested(&self) -> Result<(), RepositoryError> {
        if self.should_fail {
            return Err(RepositoryError::Unavailable("mock failure".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MockDb {
    async fn find_user_by_email(&self, _email: &str) -> Result<Option<User>, RepositoryError> {
        self.fail_if_requested()?;
        Ok(self.find_user_result.clone())
    }

    async fn is_email_taken(&self, _email: &str) -> Result<bool, RepositoryError> {
        self.fail_if_requested()?;
        Ok(self.email_taken)
    }

    async fn create_user(
        &self,
        payload: &RegisterPayload,
        password_hash: &str,
        role: UserRole,
    ) -> Result<User, RepositoryError> {
        self.fail_if_requested()?;
        let user = User {
            id: Uuid::new_v4(),
            email: payload.email.clone(),
            password_hash: password_hash.to_string(),
            role,
            company_name: Some(payload.company_name.clone()),
            contact_person: Some(payload.contact_person.clone()),
            phone: payload.phone.clone(),
            address: payload.address.clone(),
            created_at: OffsetDateTime::now_utc(),
        };
        if let Ok(mut created) = self.created_users.lock() {
            created.push(user.clone());
        }
        Ok(user)
    }
}
