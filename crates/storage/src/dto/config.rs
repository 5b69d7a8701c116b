use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::ConfigEntry;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateConfigRequest {
    #[schema(value_type = Object)]
    pub value: Value,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConfigResponse {
    pub key: String,
    #[schema(value_type = Object)]
    pub value: Value,
}

impl From<ConfigEntry> for ConfigResponse {
    fn from(entry: ConfigEntry) -> Self {
        // Values are stored as JSON text; a row written by hand that fails
        // to parse is surfaced as a plain string rather than dropped.
        let value = serde_json::from_str(&entry.value)
            .unwrap_or_else(|_| Value::String(entry.value.clone()));
        Self {
            key: entry.key,
            value,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AddAllowedEmailRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}
