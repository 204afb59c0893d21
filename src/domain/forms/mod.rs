//! Forms domain: form definitions, fields, and submissions.

pub mod export;
pub mod intake;

pub use export::submissions_to_csv;
pub use intake::{internal_keys_stripped, is_honeypot_tripped, HONEYPOT_FIELD};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::foundation::DomainError;

/// Field types a form can declare.
pub const FIELD_TYPES: &[&str] = &[
    "text", "email", "textarea", "number", "checkbox", "select", "radio", "date", "url",
];

/// A form owned by a user. `endpoint_id` is the unguessable public handle
/// submissions are posted to.
#[derive(Debug, Clone, Serialize)]
pub struct Form {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub endpoint_id: String,
    pub redirect_url: Option<String>,
    pub spam_protection: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Form {
    /// Generate a fresh public endpoint handle.
    pub fn generate_endpoint_id() -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// An ordered field on a form.
#[derive(Debug, Clone, Serialize)]
pub struct FormField {
    pub id: Uuid,
    pub form_id: Uuid,
    pub name: String,
    pub label: String,
    pub field_type: String,
    pub required: bool,
    pub position: i32,
    /// Options for select/radio fields
    pub options: Option<Value>,
}

/// Field definition supplied on form create/update. Fields are replaced
/// wholesale; position is taken from list order.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub field_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Option<Value>,
}

impl FieldSpec {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name", "Field name is required"));
        }
        if !FIELD_TYPES.contains(&self.field_type.as_str()) {
            return Err(DomainError::validation(
                "field_type",
                format!("Unknown field type: {}", self.field_type),
            ));
        }
        Ok(())
    }
}

/// Fields for creating a form.
#[derive(Debug, Clone)]
pub struct NewForm {
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub endpoint_id: String,
    pub redirect_url: Option<String>,
    pub spam_protection: bool,
    pub fields: Vec<FieldSpec>,
}

/// A stored submission. `data` holds the sanitized key/value payload.
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub id: Uuid,
    pub form_id: Uuid,
    pub data: Value,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields for storing a submission.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub form_id: Uuid,
    pub data: Value,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}
