use serde::{Deserialize, Serialize};

/// A registered doctor. The password hash and pending verification token are
/// never serialized outward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub full_name: String,
    pub contact_number: String,
    #[serde(default)]
    pub gender: String,
    pub email: String,
    pub username: String,
    #[serde(rename = "password", default, skip_serializing)]
    pub password_hash: String,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default, skip_serializing)]
    pub verification_token: Option<String>,
}

/// Insert payload for the doctor directory; the store assigns the id.
#[derive(Debug, Clone, Serialize)]
pub struct NewDoctor {
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub contact_number: String,
    pub gender: String,
    pub email: String,
    pub username: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    pub is_verified: bool,
    pub verification_token: Option<String>,
}

impl NewDoctor {
    pub fn full_name(first_name: &str, last_name: &str) -> String {
        format!("{} {}", first_name, last_name).trim_end().to_string()
    }

    pub fn into_doctor(self, id: i64) -> Doctor {
        Doctor {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            full_name: self.full_name,
            contact_number: self.contact_number,
            gender: self.gender,
            email: self.email,
            username: self.username,
            password_hash: self.password_hash,
            is_verified: self.is_verified,
            verification_token: self.verification_token,
        }
    }
}
