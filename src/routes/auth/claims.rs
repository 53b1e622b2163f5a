use serde::{Deserialize, Serialize};

use crate::models::user::{User, UserRole};

/// Identity carried inside a session token.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Claims {
    pub id: String, // user ID or UUID
    pub email: String,
    pub role: UserRole,
    // Display only, never used for access decisions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
}

impl From<&User> for Claims {
    fn from(user: &User) -> Self {
        Claims {
            id: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            company_name: user.company_name.clone(),
            contact_person: user.contact_person.clone(),
        }
    }
}
