use core::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")] // <- matches the JSON the portal has always emitted ("admin")
pub enum UserRole {
    Admin,
    Subcontractor,
}

impl UserRole {
    /// Landing page a principal of this role is sent to after login.
    pub fn dashboard_path(self) -> &'static str {
        match self {
            UserRole::Admin => "/admin/dashboard",
            UserRole::Subcontractor => "/dashboard",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UserRole::Admin => "admin",
            UserRole::Subcontractor => "subcontractor",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    pub id: uuid::Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub company_name: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: time::OffsetDateTime,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PublicUser {
    pub id: uuid::Uuid,
    pub email: String,
    pub role: UserRole,
    pub company_name: Option<String>,
    pub contact_person: Option<String>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        PublicUser {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
            company_name: user.company_name.clone(),
            contact_person: user.contact_person.clone(),
        }
    }
}
