use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct RegisterPayload {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub contact_person: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}
