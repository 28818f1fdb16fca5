use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{self, Validate, ValidationError, ValidationLimits};

/// A person who books the venue. `id` is stable; the rest is contact metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Contact data for a customer created inline with a reservation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCustomer {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

fn contact(
    name: &str,
    phone: &str,
    instagram: Option<&str>,
    email: Option<&str>,
) -> Result<(), ValidationError> {
    validation::non_blank("nombre", name)?;
    validation::phone("telefono", phone)?;
    validation::optional("instagram", instagram, validation::instagram)?;
    validation::optional("email", email, validation::email)
}

impl Validate for Customer {
    fn validate(&self, _limits: &ValidationLimits) -> Result<(), ValidationError> {
        validation::non_blank("id", &self.id)?;
        contact(&self.name, &self.phone, self.instagram.as_deref(), self.email.as_deref())?;
        if self.updated_at < self.created_at {
            return Err(ValidationError::new("updatedAt", "must not precede createdAt"));
        }
        Ok(())
    }
}

impl Validate for NewCustomer {
    fn validate(&self, _limits: &ValidationLimits) -> Result<(), ValidationError> {
        contact(&self.name, &self.phone, self.instagram.as_deref(), self.email.as_deref())
    }
}
