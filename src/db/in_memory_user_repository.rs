use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use super::user_repository::{RepositoryError, UserRepository};
use crate::models::{
    signup::RegisterPayload,
    user::{User, UserRole},
};
use crate::utils::password::hash_password;

pub const DEMO_PASSWORD: &str = "admin123";

/// Process-local user store keyed by normalized email.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: DashMap<String, User>,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the portal's two demo accounts, both using `DEMO_PASSWORD`.
    pub fn with_demo_users() -> Result<Self, password_hash::Error> {
        let repo = Self::new();
        let hash = hash_password(DEMO_PASSWORD)?;

        let seeds = [
            (
                "admin@platform.com",
                UserRole::Admin,
                "Platform Admin",
                "System Administrator",
            ),
            (
                "contractor1@example.com",
                UserRole::Subcontractor,
                "ABC Construction",
                "John Smith",
            ),
        ];

        for (email, role, company, contact) in seeds {
            repo.insert(User {
                id: Uuid::new_v4(),
                email: email.to_string(),
                password_hash: hash.clone(),
                role,
                company_name: Some(company.to_string()),
                contact_person: Some(contact.to_string()),
                phone: None,
                address: None,
                created_at: OffsetDateTime::now_utc(),
            });
        }

        info!(count = repo.users.len(), "Seeded demo users");
        Ok(repo)
    }

    pub fn insert(&self, user: User) {
        self.users.insert(normalize_email(&user.email), user);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .users
            .get(&normalize_email(email))
            .map(|entry| entry.value().clone()))
    }

    async fn is_email_taken(&self, email: &str) -> Result<bool, RepositoryError> {
        Ok(self.users.contains_key(&normalize_email(email)))
    }

    async fn create_user(
        &self,
        payload: &RegisterPayload,
        password_hash: &str,
        role: UserRole,
    ) -> Result<User, RepositoryError> {
        let key = normalize_email(&payload.email);
        match self.users.entry(key.clone()) {
            Entry::Occupied(_) => Err(RepositoryError::Duplicate(key)),
            Entry::Vacant(slot) => {
                let user = User {
                    id: Uuid::new_v4(),
                    email: key,
                    password_hash: password_hash.to_string(),
                    role,
                    company_name: Some(payload.company_name.clone()),
                    contact_person: Some(payload.contact_person.clone()),
                    phone: payload.phone.clone(),
                    address: payload.address.clone(),
                    created_at: OffsetDateTime::now_utc(),
                };
                slot.insert(user.clone());
                Ok(user)
            }
        }
    }
}
