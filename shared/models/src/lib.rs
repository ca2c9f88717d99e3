use serde::{Deserialize, Serialize};

/// A user record as the backend reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64, // assigned by the backend
    pub full_name: String,
    pub email: String,
    pub is_active: bool,
}

/// The editable part of a [`User`]; what the admin form holds while creating
/// or editing a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    pub full_name: String,
    pub email: String,
    pub is_active: bool,
}

impl Default for UserDraft {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            email: String::new(),
            is_active: true,
        }
    }
}

impl From<&User> for UserDraft {
    fn from(user: &User) -> Self {
        Self {
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            is_active: user.is_active,
        }
    }
}
