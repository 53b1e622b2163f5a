use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    signup::RegisterPayload,
    user::{User, UserRole},
};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("a user with email {0} already exists")]
    Duplicate(String),
    #[error("user store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
    async fn is_email_taken(&self, email: &str) -> Result<bool, RepositoryError>;
    async fn create_user(
        &self,
        payload: &RegisterPayload,
        password_hash: &str,
        role: UserRole,
    ) -> Result<User, RepositoryError>;
}
