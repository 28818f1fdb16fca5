use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{self, Validate, ValidationError, ValidationLimits};

/// Privilege tier of a back-office user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    Admin,
    SuperAdmin,
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdminRole::Admin => write!(f, "admin"),
            AdminRole::SuperAdmin => write!(f, "super_admin"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub role: AdminRole,
    pub created_at: DateTime<Utc>,
}

impl Validate for AdminUser {
    fn validate(&self, _limits: &ValidationLimits) -> Result<(), ValidationError> {
        validation::non_blank("id", &self.id)?;
        validation::email("email", &self.email)
    }
}
